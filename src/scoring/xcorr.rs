//! Cross-correlation (§4.7), ported from
//! `OpenSwath::Scoring::{normalizedCrossCorrelation, calculateCrossCorrelation,
//! xcorrArrayGetMaxPeak, standardize_data}`.

/// One (lag, correlation) entry of a cross-correlation map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XCorrEntry {
    /// Integer lag, in `[-maxdelay, +maxdelay]`.
    pub lag: i32,
    /// Correlation value at this lag.
    pub correlation: f64,
}

/// Cross-correlation map between two equal-length signals sampled on the same grid:
/// for each integer lag `k` in `[-maxdelay, +maxdelay]`, `sum_i x_i * y_{i+k}` over
/// the indices where both sides are in range. When `normalize` is set, both inputs
/// are z-standardized first (subtract mean, divide by sample standard deviation);
/// a zero-variance input standardizes to the all-zero signal rather than producing
/// NaNs from a division by zero. The normalized variant additionally divides each
/// lag's sum by the signal length, so two identical signals normalize to a
/// correlation of exactly `1.0` at lag `0`.
pub fn cross_correlation(data1: &[f64], data2: &[f64], maxdelay: i32, normalize: bool) -> Vec<XCorrEntry> {
    let (x, y) = if normalize {
        (standardize(data1), standardize(data2))
    } else {
        (data1.to_vec(), data2.to_vec())
    };
    let n = x.len().min(y.len()) as i32;

    (-maxdelay..=maxdelay)
        .map(|lag| {
            let mut correlation = 0.0;
            for i in 0..n {
                let j = i + lag;
                if j >= 0 && j < n {
                    correlation += x[i as usize] * y[j as usize];
                }
            }
            if normalize && n > 0 {
                correlation /= f64::from(n);
            }
            XCorrEntry { lag, correlation }
        })
        .collect()
}

/// Subtract the mean and divide by the (population) standard deviation. A
/// zero-variance input (including an empty one) standardizes to all zeros (§4.7
/// "zero-variance inputs are defined to yield the zero signal").
fn standardize(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let variance = data.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / data.len() as f64;
    if variance == 0.0 {
        return vec![0.0; data.len()];
    }
    let stdev = variance.sqrt();
    data.iter().map(|&v| (v - mean) / stdev).collect()
}

/// The lag with maximum correlation; ties are broken by smallest `|lag|` (§4.7).
pub fn best_xcorr_peak(xcorr: &[XCorrEntry]) -> Option<XCorrEntry> {
    xcorr
        .iter()
        .copied()
        .max_by(|a, b| {
            a.correlation
                .total_cmp(&b.correlation)
                .then_with(|| b.lag.abs().cmp(&a.lag.abs()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnormalized_self_correlation_peaks_at_lag_zero() {
        let signal = vec![1.0, 4.0, 2.0, 9.0, 3.0];
        let xcorr = cross_correlation(&signal, &signal, 2, false);
        let best = best_xcorr_peak(&xcorr).unwrap();
        assert_eq!(best.lag, 0);
    }

    #[test]
    fn zero_variance_input_normalizes_to_zero_correlation_everywhere() {
        let flat = vec![5.0; 6];
        let other = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let xcorr = cross_correlation(&flat, &other, 2, true);
        assert!(xcorr.iter().all(|e| e.correlation == 0.0));
    }

    #[test]
    fn ties_break_toward_smallest_absolute_lag() {
        let entries = vec![
            XCorrEntry { lag: -2, correlation: 1.0 },
            XCorrEntry { lag: 0, correlation: 1.0 },
            XCorrEntry { lag: 1, correlation: 1.0 },
        ];
        let best = best_xcorr_peak(&entries).unwrap();
        assert_eq!(best.lag, 0);
    }

    #[test]
    fn empty_input_has_no_best_peak() {
        assert!(best_xcorr_peak(&[]).is_none());
    }
}
