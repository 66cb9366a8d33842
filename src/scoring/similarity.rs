//! Pairwise vector similarity/distance kernels (§4.7), ported from
//! `OpenSwath::Scoring::NormalizedManhattanDist`/`RootMeanSquareDeviation`/
//! `SpectralAngle`.

/// Normalized Manhattan distance: `sqrt((1/N) * sum |x_i/mean(x) - y_i/mean(y)|)`.
/// Zero when `x` and `y` are proportional. Returns `0.0` for empty or all-zero
/// inputs (the original's `delta_ratio_sum` is undefined there; this engine treats
/// "nothing to compare" as perfect agreement rather than propagating a NaN).
pub fn normalized_manhattan_distance(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "normalized_manhattan_distance: inputs must have the same length");
    if x.is_empty() {
        return 0.0;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);
    if mean_x == 0.0 || mean_y == 0.0 {
        return 0.0;
    }
    let sum: f64 = x.iter().zip(y).map(|(&xi, &yi)| (xi / mean_x - yi / mean_y).abs()).sum();
    (sum / x.len() as f64).sqrt()
}

/// Root mean square deviation: `sqrt((1/N) * sum (x_i - y_i)^2)`.
pub fn rmsd(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "rmsd: inputs must have the same length");
    if x.is_empty() {
        return 0.0;
    }
    let sum: f64 = x.iter().zip(y).map(|(&xi, &yi)| (xi - yi).powi(2)).sum();
    (sum / x.len() as f64).sqrt()
}

/// Spectral angle: `acos(<x,y> / (||x|| * ||y||))`, in radians. Returns `0.0` when
/// either vector has zero norm (perfectly "angle-less" degenerate case), rather than
/// `acos(NaN)`.
pub fn spectral_angle(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "spectral_angle: inputs must have the same length");
    let dot: f64 = x.iter().zip(y).map(|(&xi, &yi)| xi * yi).sum();
    let norm_x = x.iter().map(|&xi| xi * xi).sum::<f64>().sqrt();
    let norm_y = y.iter().map(|&yi| yi * yi).sum::<f64>().sqrt();
    if norm_x == 0.0 || norm_y == 0.0 {
        return 0.0;
    }
    (dot / (norm_x * norm_y)).clamp(-1.0, 1.0).acos()
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_manhattan_distance_is_zero_for_proportional_vectors() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!(normalized_manhattan_distance(&x, &y).abs() < 1e-9);
    }

    #[test]
    fn rmsd_of_identical_vectors_is_zero() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(rmsd(&x, &x), 0.0);
    }

    #[test]
    fn rmsd_matches_hand_computed_value() {
        let x = [0.0, 0.0];
        let y = [3.0, 4.0];
        // sqrt((9 + 16) / 2) = sqrt(12.5)
        assert!((rmsd(&x, &y) - 12.5_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn spectral_angle_of_identical_vectors_is_zero() {
        let x = [1.0, 2.0, 3.0];
        assert!(spectral_angle(&x, &x).abs() < 1e-9);
    }

    #[test]
    fn spectral_angle_of_orthogonal_vectors_is_right_angle() {
        let x = [1.0, 0.0];
        let y = [0.0, 1.0];
        assert!((spectral_angle(&x, &y) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
