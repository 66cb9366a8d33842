//! Fragment index construction (§4.5 steps 1-5).

use itertools::Itertools;

use crate::chemistry::AminoAcid;
use crate::sequence::{digest, AaSequence};
use crate::system::f64::{Mass, MassOverCharge};

use super::config::FragmentIndexConfig;

/// One candidate peptide: a range into its owning protein plus a modification
/// combination, never an owned sequence (§4.5 structures).
#[derive(Debug, Clone, PartialEq)]
pub struct Peptide {
    /// Index into [`FragmentIndex::proteins`].
    pub protein_idx: usize,
    /// Half-open residue range within the protein.
    pub sequence_range: std::ops::Range<usize>,
    /// Index into [`FragmentIndex::combos`], the applied variable modifications.
    pub modification_combo_idx: usize,
    /// Neutral monoisotopic precursor mass, after fixed and variable modifications.
    pub mass: Mass,
}

/// One theoretical fragment ion belonging to a [`Peptide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Index into [`FragmentIndex::peptides`].
    pub peptide_idx: usize,
    /// Fragment ion m/z.
    pub fragment_mz: MassOverCharge,
}

/// A fragment-indexed peptide search structure (§4.5): a mass-sorted peptide table
/// and a bucketed, fragment-m/z-sorted fragment table supporting sub-linear per-peak
/// queries.
#[derive(Debug, Clone)]
pub struct FragmentIndex {
    pub(super) proteins: Vec<AaSequence>,
    pub(super) combos: Vec<Vec<(usize, String)>>,
    pub(super) peptides: Vec<Peptide>,
    pub(super) fragments: Vec<Fragment>,
    pub(super) bucket_min_mz: Vec<f64>,
    pub(super) bucketsize: usize,
}

const PROTON_MASS: f64 = 1.007_276_466_88;
const WATER_MASS: f64 = 18.010_565;

/// All subsets (size `0..=max_k`) of `candidates`, each subset guaranteed to touch
/// distinct residue positions.
fn enumerate_combos(
    candidates: &[(usize, String)],
    max_k: usize,
) -> Vec<Vec<(usize, String)>> {
    let mut combos = vec![Vec::new()];
    for k in 1..=max_k.min(candidates.len()) {
        combos.extend(
            candidates
                .iter()
                .cloned()
                .combinations(k)
                .filter(|combo| combo.iter().map(|(idx, _)| idx).all_unique()),
        );
    }
    combos
}

fn sequence_with_combo(base: &AaSequence, combo: &[(usize, String)]) -> AaSequence {
    let mut sequence = base.clone();
    for (position, accession) in combo {
        if let Some(residue) = sequence.residues_mut().get_mut(*position) {
            residue.modification = Some(accession.clone());
        }
    }
    sequence
}

/// Generate b-/y-ion fragment m/z values for `sequence` at the given charges, within
/// `[min_mz, max_mz]` (§4.5 step 4).
///
/// Leucine and Isoleucine share an identical residue mass ([`AminoAcid`]'s residue
/// table assigns them the same value), so fragment masses never need the L/I
/// branching the ion tagger performs when working backward from an observed mass —
/// here the residue identity is already known from the protein sequence.
fn generate_fragments(
    sequence: &AaSequence,
    charges: &[u8],
    min_mz: MassOverCharge,
    max_mz: MassOverCharge,
) -> Vec<MassOverCharge> {
    use crate::system::mass_over_charge::mz;

    let residues = sequence.residues();
    let n = residues.len();
    if n < 2 {
        return Vec::new();
    }
    let masses: Vec<f64> = residues
        .iter()
        .map(|r| r.monoisotopic_mass().map(|m| m.value))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();
    if masses.len() != n {
        return Vec::new();
    }

    let mut prefix = vec![0.0_f64; n + 1];
    for i in 0..n {
        prefix[i + 1] = prefix[i] + masses[i];
    }
    let total = prefix[n];

    let mut out = Vec::new();
    for cleavage in 1..n {
        let b_neutral = prefix[cleavage];
        let y_neutral = total - prefix[cleavage] + WATER_MASS;
        for &charge in charges {
            let z = f64::from(charge);
            let b_mz = MassOverCharge::new::<mz>((b_neutral + z * PROTON_MASS) / z);
            let y_mz = MassOverCharge::new::<mz>((y_neutral + z * PROTON_MASS) / z);
            if b_mz >= min_mz && b_mz <= max_mz {
                out.push(b_mz);
            }
            if y_mz >= min_mz && y_mz <= max_mz {
                out.push(y_mz);
            }
        }
    }
    out
}

impl FragmentIndex {
    /// Build a fragment index from a set of proteins (§4.5 steps 1-5).
    pub fn build(proteins: Vec<AaSequence>, config: &FragmentIndexConfig) -> Self {
        let mut peptides = Vec::new();
        let mut combos_table = Vec::new();

        for (protein_idx, protein) in proteins.iter().enumerate() {
            let amino_acids: Vec<AminoAcid> = protein.residues().iter().map(|r| r.amino_acid).collect();
            let digested = digest(
                protein,
                config.protease.as_ref(),
                config.missed_cleavages,
                config.min_length,
                config.max_length,
            );
            for mut candidate in digested {
                for (amino_acid, accession) in &config.fixed_modifications {
                    candidate.apply_fixed_modification(*amino_acid, accession);
                }
                let range = find_range(&amino_acids, &candidate);

                let variable_candidates: Vec<(usize, String)> = candidate
                    .residues()
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, residue)| {
                        config
                            .variable_modifications
                            .iter()
                            .filter(move |(amino_acid, _)| *amino_acid == residue.amino_acid)
                            .map(move |(_, accession)| (idx, accession.clone()))
                    })
                    .collect();
                let combos = enumerate_combos(&variable_candidates, config.max_variable_mods_per_peptide);

                for combo in combos {
                    let modified = sequence_with_combo(&candidate, &combo);
                    let Some(mass) = modified.neutral_mass() else {
                        continue;
                    };
                    if config.min_mass.is_some_and(|min| mass < min)
                        || config.max_mass.is_some_and(|max| mass > max)
                    {
                        continue;
                    }
                    let combo_idx = combos_table.len();
                    combos_table.push(combo);
                    peptides.push((
                        Peptide {
                            protein_idx,
                            sequence_range: range.clone(),
                            modification_combo_idx: combo_idx,
                            mass,
                        },
                        modified,
                    ));
                }
            }
        }

        peptides.sort_by(|(a, _), (b, _)| a.mass.value.total_cmp(&b.mass.value));
        let (peptides, sequences): (Vec<Peptide>, Vec<AaSequence>) = peptides.into_iter().unzip();

        let mut fragments = Vec::new();
        for (peptide_idx, sequence) in sequences.iter().enumerate() {
            for fragment_mz in generate_fragments(
                sequence,
                &config.fragment_charges,
                config.fragment_min_mz,
                config.fragment_max_mz,
            ) {
                fragments.push(Fragment { peptide_idx, fragment_mz });
            }
        }
        fragments.sort_by(|a, b| a.fragment_mz.value.total_cmp(&b.fragment_mz.value));

        let bucketsize = config.bucketsize.max(1);
        let mut bucket_min_mz = Vec::new();
        for chunk in fragments.chunks_mut(bucketsize) {
            bucket_min_mz.push(chunk[0].fragment_mz.value);
            chunk.sort_by_key(|f| f.peptide_idx);
        }

        Self {
            proteins,
            combos: combos_table,
            peptides,
            fragments,
            bucket_min_mz,
            bucketsize,
        }
    }

    /// All candidate peptides, sorted ascending by precursor mass.
    pub fn peptides(&self) -> &[Peptide] {
        &self.peptides
    }

    /// Reconstruct the fully modified sequence of the `index`-th peptide.
    pub fn peptide_sequence(&self, index: usize) -> AaSequence {
        let peptide = &self.peptides[index];
        let base = self.proteins[peptide.protein_idx].slice(peptide.sequence_range.clone());
        sequence_with_combo(&base, &self.combos[peptide.modification_combo_idx])
    }
}

/// Locate `candidate` (a slice produced by [`digest`]) within `amino_acids` by residue
/// identity. `digest` always returns contiguous sub-ranges of the input, so the first
/// match is the correct one.
fn find_range(amino_acids: &[AminoAcid], candidate: &AaSequence) -> std::ops::Range<usize> {
    let candidate_aas: Vec<AminoAcid> = candidate.residues().iter().map(|r| r.amino_acid).collect();
    if candidate_aas.is_empty() {
        return 0..0;
    }
    let start = amino_acids
        .windows(candidate_aas.len())
        .position(|w| w == candidate_aas.as_slice())
        .unwrap_or(0);
    start..start + candidate_aas.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peptides_are_sorted_ascending_by_mass() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPK");
        let index = FragmentIndex::build(vec![protein], &FragmentIndexConfig::default());
        assert!(index.peptides.windows(2).all(|w| w[0].mass.value <= w[1].mass.value));
    }

    #[test]
    fn bucket_min_mz_is_non_decreasing_and_matches_bucket_contents() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPKMSDEREVAEAATGEDASSPPPK");
        let index = FragmentIndex::build(vec![protein], &FragmentIndexConfig::default());
        assert!(index.bucket_min_mz.windows(2).all(|w| w[0] <= w[1]));
        for (bucket_idx, chunk) in index.fragments.chunks(index.bucketsize).enumerate() {
            let min_in_chunk = chunk.iter().map(|f| f.fragment_mz.value).fold(f64::INFINITY, f64::min);
            assert!(index.bucket_min_mz[bucket_idx] <= min_in_chunk + 1e-9);
        }
    }
}
