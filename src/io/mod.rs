//! External file formats the engine reads/writes directly (§6): the mzML codec, and a
//! minimal protein-sequence list reader used to feed the fragment index (§4.5). Other
//! formats mentioned in §6 (traML, idXML, qcML) are explicitly out of scope and
//! consumed via standard readers elsewhere, not reimplemented here.

pub mod mzml;
mod protein_list;

pub use protein_list::{read_protein_list, ProteinRecord};
