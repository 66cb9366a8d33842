//! Ion series tagger (§4.8): extract short amino-acid sequence tags from a fragment
//! peak list by depth-first search over mass differences.

use crate::chemistry::{AminoAcid, ResidueDb};
use crate::system::f64::MassOverCharge;

/// Settings controlling tag extraction.
#[derive(Debug, Clone, Copy)]
pub struct TaggerConfig {
    /// Minimum tag length (in residues) to report.
    pub min_length: usize,
    /// Maximum tag length (in residues) to report.
    pub max_length: usize,
    /// Mass-matching tolerance for a peak-to-peak gap against a residue mass.
    pub tolerance_ppm: f64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 6,
            tolerance_ppm: 20.0,
        }
    }
}

/// A sequence tag extracted from a peak list: the string of residues and the indices of
/// the peaks that bound it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The residues making up this tag, in peak order.
    pub residues: Vec<AminoAcid>,
    /// Indices into the input peak list, one more than `residues.len()`.
    pub peak_indices: Vec<usize>,
}

/// Extract all sequence tags of length in `[config.min_length, config.max_length]` from
/// a sorted peak list, via depth-first search over consecutive mass differences.
///
/// Leucine/Isoleucine isobarism is handled by branching: whenever a gap matches the
/// shared Leu/Ile residue mass, both `L` and `I` branches are explored (§4.5 edge
/// case, reused here for tags as well as for the fragment index).
pub fn extract_tags(peaks: &[MassOverCharge], config: TaggerConfig) -> Vec<Tag> {
    let db = ResidueDb::singleton();
    let residue_masses: Vec<(AminoAcid, f64)> = canonical_amino_acids()
        .into_iter()
        .filter_map(|aa| db.mass(aa).map(|m| (aa, m.value)))
        .collect();

    let mut tags = Vec::new();
    for start in 0..peaks.len() {
        let mut path_residues = Vec::new();
        let mut path_indices = vec![start];
        dfs(
            peaks,
            start,
            &residue_masses,
            config,
            &mut path_residues,
            &mut path_indices,
            &mut tags,
        );
    }
    tags
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    peaks: &[MassOverCharge],
    current: usize,
    residue_masses: &[(AminoAcid, f64)],
    config: TaggerConfig,
    path_residues: &mut Vec<AminoAcid>,
    path_indices: &mut Vec<usize>,
    out: &mut Vec<Tag>,
) {
    if path_residues.len() >= config.min_length && path_residues.len() <= config.max_length {
        out.push(Tag {
            residues: path_residues.clone(),
            peak_indices: path_indices.clone(),
        });
    }
    if path_residues.len() == config.max_length {
        return;
    }
    for next in current + 1..peaks.len() {
        let gap = peaks[next].value - peaks[current].value;
        for &(aa, mass) in residue_masses {
            let ppm = ((gap - mass) / mass).abs() * 1e6;
            if ppm <= config.tolerance_ppm {
                path_residues.push(aa);
                path_indices.push(next);
                dfs(
                    peaks,
                    next,
                    residue_masses,
                    config,
                    path_residues,
                    path_indices,
                    out,
                );
                path_indices.pop();
                path_residues.pop();
            }
        }
    }
}

fn canonical_amino_acids() -> Vec<AminoAcid> {
    use AminoAcid::*;
    vec![
        Glycine, Alanine, Serine, Proline, Valine, Threonine, Cysteine, Leucine, Isoleucine,
        Asparagine, AsparticAcid, Glutamine, Lysine, GlutamicAcid, Methionine, Histidine,
        Phenylalanine, Arginine, Tyrosine, Tryptophan,
    ]
}
