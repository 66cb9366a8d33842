//! The fragment-indexed peptide search structure (C5, §4.5): enumerate candidate
//! peptides from a protein list, generate their theoretical b-/y-ion fragments, and
//! answer per-spectrum queries in sub-linear time per observed peak.

mod build;
mod config;
mod query;

pub use build::{Fragment, FragmentIndex, Peptide};
pub use config::FragmentIndexConfig;
pub use query::QueryHit;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::AaSequence;
    use crate::system::f64::MassOverCharge;
    use crate::system::mass_over_charge::mz;

    const PROTON_MASS: f64 = 1.007_276_466_88;

    /// S3: digest a protein, pull each candidate peptide's own theoretical b/y peaks
    /// straight from the built index, query with them, and confirm the peptide comes
    /// back with every peak accounted for.
    #[test]
    fn fragment_index_recovers_every_digested_peptide_from_its_own_spectrum() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPKMSDEREVAEAATGEDASSPPPK");
        let config = FragmentIndexConfig {
            fragment_charges: vec![1, 2, 3, 4],
            ..FragmentIndexConfig::default()
        };
        let index = FragmentIndex::build(vec![protein], &config);
        assert!(!index.peptides().is_empty());

        for peptide_idx in 0..index.peptides().len() {
            let peptide = &index.peptides()[peptide_idx];

            let mut peaks: Vec<f64> = index
                .fragments
                .iter()
                .filter(|f| f.peptide_idx == peptide_idx)
                .map(|f| f.fragment_mz.value)
                .collect();
            if peaks.is_empty() {
                continue;
            }
            peaks.sort_by(f64::total_cmp);
            peaks.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            let peaks: Vec<MassOverCharge> = peaks.into_iter().map(MassOverCharge::new::<mz>).collect();

            let precursor_mz = MassOverCharge::new::<mz>(peptide.mass.value + PROTON_MASS);
            let hits = index.query(precursor_mz, 1, &peaks, &config, 10);

            let own_hit = hits
                .iter()
                .find(|hit| hit.peptide_idx == peptide_idx)
                .unwrap_or_else(|| panic!("peptide {peptide_idx} missing from its own query hits"));
            assert_eq!(own_hit.match_count, peaks.len());
        }
    }
}
