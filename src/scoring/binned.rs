//! Binned spectrum hashing and dense-sparse similarity (§4.7, used by clustering).

use std::collections::HashMap;

/// Bin index of `mz` in ppm-width mode: `floor(log(mz) / log(1 + ppm * 1e-6))`,
/// starting at 1 Th.
pub fn bin_index_ppm(mz: f64, ppm: f64) -> i64 {
    (mz.ln() / (1.0 + ppm * 1e-6).ln()).floor() as i64
}

/// Bin index of `mz` in Da-width mode: `floor((mz - offset) / size)`.
pub fn bin_index_da(mz: f64, offset: f64, size: f64) -> i64 {
    ((mz - offset) / size).floor() as i64
}

/// A sparse, bin-index-keyed intensity vector built from a peak list (§4.7).
#[derive(Debug, Clone, Default)]
pub struct BinnedSpectrum {
    bins: HashMap<i64, f64>,
}

impl BinnedSpectrum {
    /// Hash `peaks` (m/z, intensity pairs) into ppm-width bins, accumulating
    /// intensity for peaks that land in the same bin.
    pub fn from_peaks_ppm(peaks: &[(f64, f64)], ppm: f64) -> Self {
        Self::from_peaks_with(peaks, |mz| bin_index_ppm(mz, ppm))
    }

    /// Hash `peaks` into fixed-width Da bins.
    pub fn from_peaks_da(peaks: &[(f64, f64)], offset: f64, size: f64) -> Self {
        Self::from_peaks_with(peaks, |mz| bin_index_da(mz, offset, size))
    }

    fn from_peaks_with(peaks: &[(f64, f64)], bin_of: impl Fn(f64) -> i64) -> Self {
        let mut bins = HashMap::new();
        for &(mz, intensity) in peaks {
            *bins.entry(bin_of(mz)).or_insert(0.0) += intensity;
        }
        Self { bins }
    }

    /// Intensity accumulated in `bin_index`, `0.0` if empty.
    pub fn intensity(&self, bin_index: i64) -> f64 {
        self.bins.get(&bin_index).copied().unwrap_or(0.0)
    }

    /// Number of non-empty bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether there are no non-empty bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Cosine similarity between two sparse binned spectra: dot product over the union
/// of occupied bins, divided by the product of their norms. `0.0` if either is
/// empty.
pub fn cosine_similarity(a: &BinnedSpectrum, b: &BinnedSpectrum) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.bins.iter().map(|(bin, &intensity)| intensity * b.intensity(*bin)).sum();
    let norm_a = a.bins.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.bins.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Contrast angle similarity: `1 - 2 * acos(cosine_similarity) / pi`, the standard
/// rescaling of spectral cosine similarity into a symmetric `[0, 1]`-ish contrast
/// measure used in spectral library search.
pub fn contrast_angle(a: &BinnedSpectrum, b: &BinnedSpectrum) -> f64 {
    let cosine = cosine_similarity(a, b).clamp(-1.0, 1.0);
    1.0 - 2.0 * cosine.acos() / std::f64::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_index_da_matches_hand_computation() {
        assert_eq!(bin_index_da(105.0, 0.0, 10.0), 10);
        assert_eq!(bin_index_da(99.9, 0.0, 10.0), 9);
    }

    #[test]
    fn bin_index_ppm_is_monotonic_in_mz() {
        assert!(bin_index_ppm(1000.0, 10.0) > bin_index_ppm(500.0, 10.0));
    }

    #[test]
    fn identical_spectra_have_cosine_similarity_one() {
        let peaks = [(100.0, 10.0), (200.0, 5.0), (300.0, 1.0)];
        let a = BinnedSpectrum::from_peaks_da(&peaks, 0.0, 1.0);
        let b = BinnedSpectrum::from_peaks_da(&peaks, 0.0, 1.0);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_spectra_have_cosine_similarity_zero() {
        let a = BinnedSpectrum::from_peaks_da(&[(100.0, 10.0)], 0.0, 1.0);
        let b = BinnedSpectrum::from_peaks_da(&[(500.0, 10.0)], 0.0, 1.0);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
