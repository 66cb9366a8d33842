//! Tunables for fragment index construction and querying (§4.5, `SPEC_FULL.md` §0.3).

use crate::chemistry::AminoAcid;
use crate::sequence::Protease;
use crate::system::f64::{Mass, MassOverCharge};
use crate::util::Tolerance;

/// Construction and query parameters for a [`super::FragmentIndex`].
pub struct FragmentIndexConfig {
    /// Digestion enzyme; `None` selects top-down mode (§4.5 step 1).
    pub protease: Option<Protease>,
    /// Maximum number of missed cleavage sites per candidate peptide.
    pub missed_cleavages: usize,
    /// Minimum candidate peptide length, in residues.
    pub min_length: usize,
    /// Maximum candidate peptide length, in residues.
    pub max_length: usize,
    /// Minimum candidate peptide neutral mass, if bounded.
    pub min_mass: Option<Mass>,
    /// Maximum candidate peptide neutral mass, if bounded.
    pub max_mass: Option<Mass>,
    /// Modifications applied to every matching residue, in place, before variable
    /// modification expansion.
    pub fixed_modifications: Vec<(AminoAcid, String)>,
    /// Modifications optionally applied to matching residues; combinations up to
    /// [`FragmentIndexConfig::max_variable_mods_per_peptide`] are enumerated per
    /// peptide.
    pub variable_modifications: Vec<(AminoAcid, String)>,
    /// Upper bound on the number of variable modifications carried by one peptide.
    pub max_variable_mods_per_peptide: usize,
    /// Lower bound of the fragment m/z window indexed (§4.5 step 4).
    pub fragment_min_mz: MassOverCharge,
    /// Upper bound of the fragment m/z window indexed (§4.5 step 4).
    pub fragment_max_mz: MassOverCharge,
    /// Fragment ion charge states to generate, e.g. `[1, 2]`.
    pub fragment_charges: Vec<u8>,
    /// Number of fragments per bucket (§4.5 step 5).
    pub bucketsize: usize,
    /// Tolerance applied to the precursor mass window (§4.5 query step 1).
    pub precursor_tolerance: Tolerance<Mass>,
    /// Tolerance applied to each fragment peak match (§4.5 query step 3c).
    pub fragment_tolerance: Tolerance<MassOverCharge>,
    /// Additional constant mass window added on both sides of the precursor window in
    /// open-search mode (§9.3): widens the precursor window beyond what
    /// `precursor_tolerance` alone would give.
    pub open_search_window: Option<Mass>,
}

impl Default for FragmentIndexConfig {
    fn default() -> Self {
        use crate::system::mass_over_charge::mz;
        Self {
            protease: Some(Protease::trypsin()),
            missed_cleavages: 1,
            min_length: 6,
            max_length: 40,
            min_mass: None,
            max_mass: None,
            fixed_modifications: Vec::new(),
            variable_modifications: Vec::new(),
            max_variable_mods_per_peptide: 2,
            fragment_min_mz: MassOverCharge::new::<mz>(150.0),
            fragment_max_mz: MassOverCharge::new::<mz>(2000.0),
            fragment_charges: vec![1, 2],
            bucketsize: 32,
            precursor_tolerance: Tolerance::Ppm(10.0),
            fragment_tolerance: Tolerance::Ppm(20.0),
            open_search_window: None,
        }
    }
}
