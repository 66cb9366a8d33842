//! Scoring kernels (C7, §4.7): vector similarity measures, cross-correlation, and
//! binned-spectrum similarity, grounded on `OpenSwath::Scoring`
//! (`original_source/src/openswathalgo/.../Scoring.h`).

mod binned;
mod dia_prescore;
mod similarity;
mod xcorr;

pub use binned::{bin_index_da, bin_index_ppm, contrast_angle, cosine_similarity, BinnedSpectrum};
pub use dia_prescore::{dia_prescore, DiaPrescore};
pub use similarity::{normalized_manhattan_distance, rmsd, spectral_angle};
pub use xcorr::{best_xcorr_peak, cross_correlation, XCorrEntry};

#[cfg(test)]
mod tests {
    use super::*;

    /// A signal cross-correlated with itself peaks at lag 0 with correlation 1.0
    /// once normalized.
    #[test]
    fn normalized_self_correlation_peaks_at_lag_zero_with_value_one() {
        let signal = vec![1.0, 3.0, 7.0, 2.0, 5.0, 4.0, 1.0];
        let xcorr = cross_correlation(&signal, &signal, 3, true);
        let best = best_xcorr_peak(&xcorr).unwrap();
        assert_eq!(best.lag, 0);
        assert!((best.correlation - 1.0).abs() < 1e-6);
    }
}
