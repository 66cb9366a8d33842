//! DIA pre-scoring (§4.7 "DIA prescoring"), grounded on the shape of
//! `OpenMS::DiaPrescore` (invoked from `OpenSwathDIAPreScoring.cpp`): a handful of
//! per-transition scores computed from the kernels in this module.

use crate::system::f64::MassOverCharge;

/// Per-transition DIA pre-score feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiaPrescore {
    /// Cosine similarity between observed and library fragment intensities.
    pub library_dot_product: f64,
    /// Cosine similarity between the observed and theoretical isotope envelopes.
    pub isotope_correlation: f64,
    /// Signed mass accuracy, in ppm, of the observed vs. theoretical precursor m/z.
    pub mass_accuracy_ppm: f64,
    /// Pearson correlation between the observed and library intensity-over-RT
    /// profiles, sampled on the same RT grid.
    pub rt_correlation: f64,
}

/// Compute a [`DiaPrescore`] feature vector (§4.7).
pub fn dia_prescore(
    observed_intensities: &[f64],
    library_intensities: &[f64],
    observed_isotope_envelope: &[f64],
    theoretical_isotope_envelope: &[f64],
    observed_mz: MassOverCharge,
    theoretical_mz: MassOverCharge,
    observed_rt_profile: &[f64],
    library_rt_profile: &[f64],
) -> DiaPrescore {
    DiaPrescore {
        library_dot_product: cosine(observed_intensities, library_intensities),
        isotope_correlation: cosine(observed_isotope_envelope, theoretical_isotope_envelope),
        mass_accuracy_ppm: (observed_mz.value - theoretical_mz.value) / theoretical_mz.value * 1e6,
        rt_correlation: pearson_correlation(observed_rt_profile, library_rt_profile),
    }
}

fn cosine(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let dot: f64 = x.iter().zip(y).map(|(&a, &b)| a * b).sum();
    let norm_x = x.iter().map(|&a| a * a).sum::<f64>().sqrt();
    let norm_y = y.iter().map(|&b| b * b).sum::<f64>().sqrt();
    if norm_x == 0.0 || norm_y == 0.0 {
        return 0.0;
    }
    dot / (norm_x * norm_y)
}

fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let cov: f64 = x.iter().zip(y).map(|(&a, &b)| (a - mean_x) * (b - mean_y)).sum();
    let var_x: f64 = x.iter().map(|&a| (a - mean_x).powi(2)).sum();
    let var_y: f64 = y.iter().map(|&b| (b - mean_y).powi(2)).sum();
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mass_over_charge::mz;

    #[test]
    fn identical_inputs_score_perfectly() {
        let intensities = [10.0, 20.0, 5.0, 1.0];
        let envelope = [1.0, 0.4, 0.08];
        let rt_profile = [1.0, 5.0, 10.0, 4.0, 1.0];
        let target_mz = MassOverCharge::new::<mz>(500.0);

        let score = dia_prescore(&intensities, &intensities, &envelope, &envelope, target_mz, target_mz, &rt_profile, &rt_profile);
        assert!((score.library_dot_product - 1.0).abs() < 1e-9);
        assert!((score.isotope_correlation - 1.0).abs() < 1e-9);
        assert_eq!(score.mass_accuracy_ppm, 0.0);
        assert!((score.rt_correlation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mass_accuracy_reports_signed_ppm_error() {
        let observed = MassOverCharge::new::<mz>(500.05);
        let theoretical = MassOverCharge::new::<mz>(500.0);
        let score = dia_prescore(&[], &[], &[], &[], observed, theoretical, &[], &[]);
        assert!((score.mass_accuracy_ppm - 100.0).abs() < 1e-6);
    }
}
