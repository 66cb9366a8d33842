//! Amino acid residues and the residue database singleton.
//!
//! The teacher's `aminoacids.rs`/`IsAminoAcid` trait is ProForma-aware and far richer
//! than this engine needs (glycan attachment points, satellite ions, immonium losses).
//! This module keeps the teacher's closed-enum-plus-mass-table shape but trims it down
//! to what §3's `AASequence`/`Residue` data model actually requires: the 20 natural
//! amino acids, the four ambiguous codes (B, Z, J, X), and selenocysteine (U).

use std::sync::OnceLock;

use crate::system::f64::Mass;

/// A single amino acid, including the ambiguous/non-standard codes the data model
/// allows (`AASequence` §3: "the 20 naturals plus ambiguous codes B/Z/J/X and
/// selenocysteine U").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    Glutamine,
    GlutamicAcid,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,
    /// Selenocysteine, the 21st proteinogenic amino acid.
    Selenocysteine,
    /// Ambiguous: Asparagine or Aspartic acid.
    AmbiguousAsparagine,
    /// Ambiguous: Glutamine or Glutamic acid.
    AmbiguousGlutamine,
    /// Ambiguous: Leucine or Isoleucine.
    AmbiguousLeucine,
    /// Completely unknown residue.
    Unknown,
}

impl AminoAcid {
    /// The single-letter IUPAC code.
    pub const fn one_letter_code(self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::Arginine => 'R',
            Self::Asparagine => 'N',
            Self::AsparticAcid => 'D',
            Self::Cysteine => 'C',
            Self::Glutamine => 'Q',
            Self::GlutamicAcid => 'E',
            Self::Glycine => 'G',
            Self::Histidine => 'H',
            Self::Isoleucine => 'I',
            Self::Leucine => 'L',
            Self::Lysine => 'K',
            Self::Methionine => 'M',
            Self::Phenylalanine => 'F',
            Self::Proline => 'P',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Tryptophan => 'W',
            Self::Tyrosine => 'Y',
            Self::Valine => 'V',
            Self::Selenocysteine => 'U',
            Self::AmbiguousAsparagine => 'B',
            Self::AmbiguousGlutamine => 'Z',
            Self::AmbiguousLeucine => 'J',
            Self::Unknown => 'X',
        }
    }

    /// Parse a single-letter IUPAC code.
    pub fn from_one_letter_code(code: char) -> Option<Self> {
        Some(match code.to_ascii_uppercase() {
            'A' => Self::Alanine,
            'R' => Self::Arginine,
            'N' => Self::Asparagine,
            'D' => Self::AsparticAcid,
            'C' => Self::Cysteine,
            'Q' => Self::Glutamine,
            'E' => Self::GlutamicAcid,
            'G' => Self::Glycine,
            'H' => Self::Histidine,
            'I' => Self::Isoleucine,
            'L' => Self::Leucine,
            'K' => Self::Lysine,
            'M' => Self::Methionine,
            'F' => Self::Phenylalanine,
            'P' => Self::Proline,
            'S' => Self::Serine,
            'T' => Self::Threonine,
            'W' => Self::Tryptophan,
            'Y' => Self::Tyrosine,
            'V' => Self::Valine,
            'U' => Self::Selenocysteine,
            'B' => Self::AmbiguousAsparagine,
            'Z' => Self::AmbiguousGlutamine,
            'J' => Self::AmbiguousLeucine,
            'X' => Self::Unknown,
            _ => return None,
        })
    }

    /// Whether this amino acid is one of the 20 naturals (excludes U and the ambiguous
    /// codes).
    pub const fn is_canonical(self) -> bool {
        !matches!(
            self,
            Self::Selenocysteine
                | Self::AmbiguousAsparagine
                | Self::AmbiguousGlutamine
                | Self::AmbiguousLeucine
                | Self::Unknown
        )
    }

    /// Whether `self` and `other` should be treated as the same residue for protease
    /// cut-site matching, i.e. L/I isobarism collapses (see §4.5 edge cases).
    pub fn canonical_identical(self, other: Self) -> bool {
        self == other
            || (matches!(self, Self::Leucine | Self::Isoleucine)
                && matches!(other, Self::Leucine | Self::Isoleucine))
    }

    /// The monoisotopic residue mass (amino acid minus water), looked up in the
    /// [`ResidueDb`] singleton.
    pub fn monoisotopic_mass(self) -> Option<Mass> {
        ResidueDb::singleton().mass(self)
    }
}

impl std::fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.one_letter_code())
    }
}

struct ResidueEntry {
    amino_acid: AminoAcid,
    monoisotopic_mass: f64,
}

// Residue (not free amino acid) monoisotopic masses, Da.
const RESIDUES: &[ResidueEntry] = &[
    ResidueEntry { amino_acid: AminoAcid::Glycine, monoisotopic_mass: 57.021_464 },
    ResidueEntry { amino_acid: AminoAcid::Alanine, monoisotopic_mass: 71.037_114 },
    ResidueEntry { amino_acid: AminoAcid::Serine, monoisotopic_mass: 87.032_028 },
    ResidueEntry { amino_acid: AminoAcid::Proline, monoisotopic_mass: 97.052_764 },
    ResidueEntry { amino_acid: AminoAcid::Valine, monoisotopic_mass: 99.068_414 },
    ResidueEntry { amino_acid: AminoAcid::Threonine, monoisotopic_mass: 101.047_678 },
    ResidueEntry { amino_acid: AminoAcid::Cysteine, monoisotopic_mass: 103.009_185 },
    ResidueEntry { amino_acid: AminoAcid::Leucine, monoisotopic_mass: 113.084_064 },
    ResidueEntry { amino_acid: AminoAcid::Isoleucine, monoisotopic_mass: 113.084_064 },
    ResidueEntry { amino_acid: AminoAcid::Asparagine, monoisotopic_mass: 114.042_927 },
    ResidueEntry { amino_acid: AminoAcid::AsparticAcid, monoisotopic_mass: 115.026_943 },
    ResidueEntry { amino_acid: AminoAcid::Glutamine, monoisotopic_mass: 128.058_578 },
    ResidueEntry { amino_acid: AminoAcid::Lysine, monoisotopic_mass: 128.094_963 },
    ResidueEntry { amino_acid: AminoAcid::GlutamicAcid, monoisotopic_mass: 129.042_593 },
    ResidueEntry { amino_acid: AminoAcid::Methionine, monoisotopic_mass: 131.040_485 },
    ResidueEntry { amino_acid: AminoAcid::Histidine, monoisotopic_mass: 137.058_912 },
    ResidueEntry { amino_acid: AminoAcid::Phenylalanine, monoisotopic_mass: 147.068_414 },
    ResidueEntry { amino_acid: AminoAcid::Arginine, monoisotopic_mass: 156.101_111 },
    ResidueEntry { amino_acid: AminoAcid::Tyrosine, monoisotopic_mass: 163.063_329 },
    ResidueEntry { amino_acid: AminoAcid::Tryptophan, monoisotopic_mass: 186.079_313 },
    ResidueEntry { amino_acid: AminoAcid::Selenocysteine, monoisotopic_mass: 150.953_636 },
];

/// The process-wide read-mostly residue database.
///
/// Lazily constructed on first access (§3: "lazily constructed on first access, never
/// destroyed before process exit"). Mutation (`add_custom_residue`) is permitted but,
/// per §5, must happen before any parallel region starts; this type does not attempt to
/// enforce that at runtime, it only documents the contract.
pub struct ResidueDb {
    custom: std::sync::RwLock<Vec<ResidueEntry>>,
}

static RESIDUE_DB: OnceLock<ResidueDb> = OnceLock::new();

impl ResidueDb {
    /// Access the process-wide singleton, constructing it on first call.
    pub fn singleton() -> &'static Self {
        RESIDUE_DB.get_or_init(|| Self {
            custom: std::sync::RwLock::new(Vec::new()),
        })
    }

    /// Look up the monoisotopic residue mass for `amino_acid`.
    ///
    /// Returns `None` for [`AminoAcid::Unknown`] and the ambiguous codes B/Z/J (mass is
    /// not well-defined for these; callers working with `AASequence` must resolve
    /// ambiguity before requesting a mass, per §4.5 "ambiguous residues are handled by
    /// the sequence generator, not the index").
    pub fn mass(&self, amino_acid: AminoAcid) -> Option<Mass> {
        RESIDUES
            .iter()
            .chain(self.custom.read().unwrap().iter())
            .find(|e| e.amino_acid == amino_acid)
            .map(|e| Mass::new::<crate::system::mass::dalton>(e.monoisotopic_mass))
    }

    /// Register a custom residue mass, e.g. for a non-standard modified residue used
    /// as a building block.
    ///
    /// # Panics
    /// Not thread-safe to call concurrently with a parallel query region; the engine
    /// relies on callers honoring the single-threaded initialization contract (§5).
    pub fn add_custom_residue(&self, amino_acid: AminoAcid, monoisotopic_mass: f64) {
        self.custom.write().unwrap().push(ResidueEntry {
            amino_acid,
            monoisotopic_mass,
        });
    }
}
