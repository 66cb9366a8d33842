//! The peptide/protein sequence model (§3 `AASequence`) and digestion (§4.5 step 1).

mod protease;

pub use protease::Protease;

use crate::chemistry::{AminoAcid, ModificationsDb, ResidueDb};
use crate::system::f64::Mass;

/// One position in an `AASequence`: an amino acid, optionally decorated with a
/// modification keyed by its Unimod accession.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// The underlying amino acid.
    pub amino_acid: AminoAcid,
    /// Unimod accession of a modification applied to this residue, if any.
    pub modification: Option<String>,
}

impl Residue {
    /// An unmodified residue.
    pub const fn new(amino_acid: AminoAcid) -> Self {
        Self {
            amino_acid,
            modification: None,
        }
    }

    /// The same residue with a modification applied.
    #[must_use]
    pub fn with_modification(mut self, accession: impl Into<String>) -> Self {
        self.modification = Some(accession.into());
        self
    }

    /// The monoisotopic mass of this residue (base residue mass plus any modification
    /// delta).
    pub fn monoisotopic_mass(&self) -> Option<Mass> {
        let base = ResidueDb::singleton().mass(self.amino_acid)?;
        match &self.modification {
            None => Some(base),
            Some(accession) => {
                let delta = ModificationsDb::singleton().get(accession)?.mono_mass_delta;
                Some(base + delta)
            }
        }
    }
}

/// An ordered sequence of [`Residue`]s plus optional N-/C-terminal modifications (§3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AaSequence {
    residues: Vec<Residue>,
    /// N-terminal modification accession, if any.
    pub n_term_modification: Option<String>,
    /// C-terminal modification accession, if any.
    pub c_term_modification: Option<String>,
}

impl AaSequence {
    /// Build a sequence from unmodified amino acids.
    pub fn from_amino_acids(amino_acids: impl IntoIterator<Item = AminoAcid>) -> Self {
        Self {
            residues: amino_acids.into_iter().map(Residue::new).collect(),
            n_term_modification: None,
            c_term_modification: None,
        }
    }

    /// Parse a one-letter-code string into a sequence. Unknown characters become
    /// [`AminoAcid::Unknown`], matching the engine's "do not guess, be explicit"
    /// posture for malformed input rather than silently dropping characters.
    pub fn parse(sequence: &str) -> Self {
        Self::from_amino_acids(
            sequence
                .chars()
                .map(|c| AminoAcid::from_one_letter_code(c).unwrap_or(AminoAcid::Unknown)),
        )
    }

    /// The residues of this sequence, in N- to C-terminal order.
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Mutable access to the residues, for callers applying modifications at specific
    /// positions (e.g. the fragment index's variable modification combinations, §4.5
    /// step 2).
    pub fn residues_mut(&mut self) -> &mut [Residue] {
        &mut self.residues
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Whether this sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// A sub-sequence, residue-index half-open range, with no terminal modifications
    /// copied (used when slicing a protein into candidate peptides, §4.5).
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            residues: self.residues[range].to_vec(),
            n_term_modification: None,
            c_term_modification: None,
        }
    }

    /// Apply a fixed modification to every residue matching `amino_acid`, in place.
    pub fn apply_fixed_modification(&mut self, amino_acid: AminoAcid, accession: &str) {
        for residue in &mut self.residues {
            if residue.amino_acid == amino_acid {
                residue.modification = Some(accession.to_string());
            }
        }
    }

    /// The neutral monoisotopic mass of the full peptide: sum of residue masses plus
    /// the mass of one water molecule (the two termini), plus any terminal
    /// modification deltas.
    ///
    /// Returns `None` if any residue (e.g. an ambiguous or unknown one) has no defined
    /// mass — callers querying the fragment index must resolve ambiguity first (§4.5).
    pub fn neutral_mass(&self) -> Option<Mass> {
        use crate::system::mass::dalton;
        const WATER: f64 = 18.010_565;
        let mut total = Mass::new::<dalton>(WATER);
        for residue in &self.residues {
            total += residue.monoisotopic_mass()?;
        }
        if let Some(accession) = &self.n_term_modification {
            total += ModificationsDb::singleton().get(accession)?.mono_mass_delta;
        }
        if let Some(accession) = &self.c_term_modification {
            total += ModificationsDb::singleton().get(accession)?.mono_mass_delta;
        }
        Some(total)
    }
}

/// Digest a protein sequence with `protease`, allowing up to `missed_cleavages` missed
/// cut sites, and filter the resulting peptides by `[min_length, max_length]` (§4.5
/// step 1). Passing `protease = None` selects top-down mode: the whole protein is
/// returned as a single "peptide".
pub fn digest(
    protein: &AaSequence,
    protease: Option<&Protease>,
    missed_cleavages: usize,
    min_length: usize,
    max_length: usize,
) -> Vec<AaSequence> {
    let Some(protease) = protease else {
        return vec![protein.clone()];
    };
    let amino_acids: Vec<AminoAcid> = protein.residues().iter().map(|r| r.amino_acid).collect();
    let mut boundaries = vec![0usize];
    boundaries.extend(protease.match_locations(&amino_acids));
    boundaries.push(protein.len());
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut peptides = Vec::new();
    for start_idx in 0..boundaries.len() - 1 {
        for end_idx in start_idx + 1..boundaries.len() {
            if end_idx - start_idx > missed_cleavages + 1 {
                break;
            }
            let (start, end) = (boundaries[start_idx], boundaries[end_idx]);
            let length = end - start;
            if length < min_length || length > max_length {
                continue;
            }
            peptides.push(protein.slice(start..end));
        }
    }
    peptides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_respects_missed_cleavages_and_length_bounds() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPK");
        let peptides = digest(&protein, Some(&Protease::trypsin()), 1, 2, 50);
        assert!(!peptides.is_empty());
        assert!(peptides.iter().all(|p| p.len() >= 2));
    }

    #[test]
    fn top_down_mode_yields_one_peptide() {
        let protein = AaSequence::parse("MSDER");
        let peptides = digest(&protein, None, 0, 1, 50);
        assert_eq!(peptides.len(), 1);
        assert_eq!(peptides[0].len(), protein.len());
    }
}
