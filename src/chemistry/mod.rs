//! Chemistry primitives: elements, residues, and modifications, each backed by a
//! process-wide read-mostly singleton database (§3, §9).

mod element;
mod modification;
mod residue;

pub use element::{Element, Isotope};
pub use modification::{Modification, ModificationsDb};
pub use residue::{AminoAcid, ResidueDb};
