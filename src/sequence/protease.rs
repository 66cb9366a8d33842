//! Digestion enzymes, adapted near-verbatim from the teacher's `protease.rs`.

use crate::chemistry::AminoAcid;

/// A protease defined by its ability to cut at any site identified by the right amino
/// acids at the N- and C-terminal positions around the cut. `None` at a position means
/// no specificity there; `Some(set)` means any amino acid in `set` is accepted (L/I
/// collapse via [`AminoAcid::canonical_identical`]).
pub struct Protease {
    /// Amino acids N-terminal of the cut site, closest-to-cut last.
    pub n_term: Vec<Option<Vec<AminoAcid>>>,
    /// Amino acids C-terminal of the cut site, closest-to-cut first.
    pub c_term: Vec<Option<Vec<AminoAcid>>>,
}

impl Protease {
    /// Trypsin: cuts C-terminal of K/R, except when followed by proline.
    pub fn trypsin() -> Self {
        let all_but_proline: Vec<AminoAcid> = "ACDEFGHIKLMNQRSTVWY"
            .chars()
            .filter_map(AminoAcid::from_one_letter_code)
            .collect();
        Self {
            n_term: vec![Some(vec![AminoAcid::Lysine, AminoAcid::Arginine])],
            c_term: vec![Some(all_but_proline)],
        }
    }

    /// A protease that cuts on the N-terminal side of the provided residues.
    pub fn n_terminal_of(residues: &[AminoAcid]) -> Self {
        Self {
            n_term: vec![Some(residues.to_vec())],
            c_term: Vec::new(),
        }
    }

    /// A protease that cuts on the C-terminal side of the provided residues.
    pub fn c_terminal_of(residues: &[AminoAcid]) -> Self {
        Self {
            c_term: vec![Some(residues.to_vec())],
            n_term: Vec::new(),
        }
    }

    /// No specificity cleavage (top-down / "unspecific" mode): every position is a
    /// valid cut site.
    pub fn unspecific() -> Self {
        Self {
            n_term: Vec::new(),
            c_term: Vec::new(),
        }
    }

    /// All locations in `sequence` where this protease could cut, i.e. the boundary
    /// index is between `sequence[i-1]` and `sequence[i]`.
    pub fn match_locations(&self, sequence: &[AminoAcid]) -> Vec<usize> {
        if sequence.len() < self.n_term.len() + self.c_term.len() {
            return Vec::new();
        }
        (self.n_term.len()..=sequence.len() - self.c_term.len())
            .filter(|&i| self.matches_at(&sequence[i - self.n_term.len()..(i + self.c_term.len()).min(sequence.len())]))
            .collect()
    }

    fn matches_at(&self, slice: &[AminoAcid]) -> bool {
        'positions: for (actual, pattern) in slice.iter().zip(self.n_term.iter().chain(self.c_term.iter())) {
            if let Some(pattern) = pattern {
                for option in pattern {
                    if option.canonical_identical(*actual) {
                        continue 'positions;
                    }
                }
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::AminoAcid::*;

    #[test]
    fn trypsin_cuts_after_k_and_r_but_not_before_proline() {
        let protease = Protease::trypsin();
        let sequence = vec![Methionine, Lysine, Proline, Arginine, Glycine];
        let cuts = protease.match_locations(&sequence);
        // K at index 1 is followed by Proline: not a cut site.
        // R at index 3 is followed by Glycine: a cut site at index 4.
        assert_eq!(cuts, vec![4]);
    }
}
