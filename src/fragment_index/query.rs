//! Fragment index querying (§4.5 query algorithm).

use std::collections::HashMap;

use crate::spectrum::neutral_mass_from_mz;
use crate::system::f64::MassOverCharge;
use crate::util::{Tolerance, WithinTolerance};

use super::build::FragmentIndex;
use super::config::FragmentIndexConfig;

/// One peptide's aggregate match result against a query spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryHit {
    /// Index into [`FragmentIndex::peptides`].
    pub peptide_idx: usize,
    /// Number of distinct observed fragment peaks matched to this peptide.
    pub match_count: usize,
    /// Aggregate score; currently the match count, matching "top-N by (match count,
    /// score)" (§4.5) with no further weighting specified.
    pub score: f64,
}

impl FragmentIndex {
    /// Query this index with one spectrum's precursor and fragment peaks, returning
    /// the `top_n` best-matching peptides (§4.5 query algorithm).
    pub fn query(
        &self,
        precursor_mz: MassOverCharge,
        precursor_charge: u8,
        fragment_peaks: &[MassOverCharge],
        config: &FragmentIndexConfig,
        top_n: usize,
    ) -> Vec<QueryHit> {
        let Some(precursor_mass) = neutral_mass_from_mz(precursor_mz, precursor_charge) else {
            return Vec::new();
        };
        let (mut lo, mut hi) = config.precursor_tolerance.bounds(precursor_mass);
        if let Some(window) = config.open_search_window {
            lo -= window;
            hi += window;
        }

        let p_lo = self.peptides.partition_point(|p| p.mass < lo);
        let p_hi = self.peptides.partition_point(|p| p.mass <= hi);
        if p_lo >= p_hi {
            return Vec::new();
        }

        let mut match_counts: HashMap<usize, usize> = HashMap::new();
        for &peak_mz in fragment_peaks {
            let (peak_lo, peak_hi) = config.fragment_tolerance.bounds(peak_mz);
            let mut matched_peptides_for_this_peak: std::collections::HashSet<usize> =
                std::collections::HashSet::new();
            for bucket_idx in self.candidate_buckets(peak_lo.value, peak_hi.value) {
                let bucket = self.bucket_slice(bucket_idx);
                let start = bucket.partition_point(|f| f.peptide_idx < p_lo);
                let end = bucket.partition_point(|f| f.peptide_idx < p_hi);
                for fragment in &bucket[start..end] {
                    if config.fragment_tolerance.within(&peak_mz, &fragment.fragment_mz) {
                        matched_peptides_for_this_peak.insert(fragment.peptide_idx);
                    }
                }
            }
            for peptide_idx in matched_peptides_for_this_peak {
                *match_counts.entry(peptide_idx).or_insert(0) += 1;
            }
        }

        let mut hits: Vec<QueryHit> = match_counts
            .into_iter()
            .map(|(peptide_idx, match_count)| QueryHit {
                peptide_idx,
                match_count,
                score: match_count as f64,
            })
            .collect();
        hits.sort_by(|a, b| {
            b.match_count
                .cmp(&a.match_count)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| a.peptide_idx.cmp(&b.peptide_idx))
        });
        hits.truncate(top_n);
        hits
    }

    /// Bucket indices whose underlying m/z range can overlap `[lo_mz, hi_mz]` (§4.5
    /// query step 3a): found via two partition-point searches over the
    /// non-decreasing `bucket_min_mz` table rather than a linear scan.
    fn candidate_buckets(&self, lo_mz: f64, hi_mz: f64) -> std::ops::Range<usize> {
        if self.bucket_min_mz.is_empty() {
            return 0..0;
        }
        let start = self
            .bucket_min_mz
            .partition_point(|&m| m <= lo_mz)
            .saturating_sub(1);
        let end = self.bucket_min_mz.partition_point(|&m| m <= hi_mz);
        start..end.max(start + 1).min(self.bucket_min_mz.len())
    }

    fn bucket_slice(&self, bucket_idx: usize) -> &[super::build::Fragment] {
        let start = bucket_idx * self.bucketsize;
        let end = (start + self.bucketsize).min(self.fragments.len());
        &self.fragments[start..end]
    }

    /// Query every spectrum in `queries` in parallel (§5 "queries are thread-safe
    /// (read-only access)"), one independent [`query`](Self::query) call per
    /// spectrum. Only available with the `rayon` feature; the index is built
    /// single-threaded and never mutated afterwards, so this parallel-for over a
    /// shared `&self` needs no locking.
    #[cfg(feature = "rayon")]
    pub fn par_query_many(
        &self,
        queries: &[(MassOverCharge, u8, Vec<MassOverCharge>)],
        config: &FragmentIndexConfig,
        top_n: usize,
    ) -> Vec<Vec<QueryHit>> {
        use rayon::prelude::*;
        queries
            .par_iter()
            .map(|(precursor_mz, precursor_charge, fragment_peaks)| {
                self.query(*precursor_mz, *precursor_charge, fragment_peaks, config, top_n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::AaSequence;

    #[test]
    fn querying_a_peptides_own_fragments_matches_it_with_full_count() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPK");
        let config = FragmentIndexConfig::default();
        let index = FragmentIndex::build(vec![protein], &config);
        assert!(!index.peptides().is_empty());

        let peptide_idx = index.peptides().len() / 2;
        let peptide = &index.peptides()[peptide_idx];

        let mut own_fragments: Vec<f64> = index
            .fragments
            .iter()
            .filter(|f| f.peptide_idx == peptide_idx)
            .map(|f| f.fragment_mz.value)
            .collect();
        own_fragments.sort_by(|a, b| a.total_cmp(b));
        own_fragments.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        assert!(!own_fragments.is_empty());

        use crate::system::mass_over_charge::mz;
        let peaks: Vec<MassOverCharge> = own_fragments
            .iter()
            .map(|&v| MassOverCharge::new::<mz>(v))
            .collect();

        const PROTON_MASS: f64 = 1.007_276_466_88;
        let precursor_mz = MassOverCharge::new::<mz>(peptide.mass.value + PROTON_MASS);

        let hits = index.query(precursor_mz, 1, &peaks, &config, 5);
        let own_hit = hits.iter().find(|h| h.peptide_idx == peptide_idx);
        assert!(own_hit.is_some());
        assert_eq!(own_hit.unwrap().match_count, peaks.len());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn par_query_many_matches_sequential_query_per_spectrum() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPK");
        let config = FragmentIndexConfig::default();
        let index = FragmentIndex::build(vec![protein], &config);
        use crate::system::mass_over_charge::mz;

        let peptide_idx = index.peptides().len() / 2;
        let peptide = &index.peptides()[peptide_idx];
        let mut own_fragments: Vec<f64> = index
            .fragments
            .iter()
            .filter(|f| f.peptide_idx == peptide_idx)
            .map(|f| f.fragment_mz.value)
            .collect();
        own_fragments.sort_by(|a, b| a.total_cmp(b));
        own_fragments.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        let peaks: Vec<MassOverCharge> = own_fragments.iter().map(|&v| MassOverCharge::new::<mz>(v)).collect();

        const PROTON_MASS: f64 = 1.007_276_466_88;
        let precursor_mz = MassOverCharge::new::<mz>(peptide.mass.value + PROTON_MASS);

        let queries = vec![(precursor_mz, 1u8, peaks.clone()), (precursor_mz, 1u8, peaks.clone())];
        let results = index.par_query_many(&queries, &config, 5);
        assert_eq!(results.len(), 2);
        for hits in &results {
            let own_hit = hits.iter().find(|h| h.peptide_idx == peptide_idx);
            assert_eq!(own_hit.unwrap().match_count, peaks.len());
        }
    }

    #[test]
    fn empty_precursor_window_yields_no_hits() {
        let protein = AaSequence::parse("MSDEREVAEAATGEDASSPPPK");
        let config = FragmentIndexConfig::default();
        let index = FragmentIndex::build(vec![protein], &config);
        use crate::system::mass_over_charge::mz;
        let hits = index.query(MassOverCharge::new::<mz>(1.0), 1, &[], &config, 5);
        assert!(hits.is_empty());
    }
}
