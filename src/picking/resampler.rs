//! The linear resampler (§4.3): redistribute a non-uniform `(pos, intensity)` sequence
//! onto a uniform grid of spacing `Δ`, splitting each input peak's intensity linearly
//! between the two nearest bins.

/// One output bin of a [`linear_resample`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampledBin {
    /// Bin center: `start + index * spacing`.
    pub position: f64,
    /// Accumulated intensity.
    pub intensity: f64,
}

/// Resample `points` (assumed sorted ascending by position, not required to be
/// evenly spaced) onto bins of uniform `spacing` starting at `start`.
///
/// Each input peak's intensity is split between its two bracketing bins in
/// proportion to `(1 - d/spacing)` on each side (§4.3), so the total intensity is
/// preserved exactly up to floating-point rounding, and the centroid of an isolated
/// peak is preserved. Only recommended when `spacing <= ` the input's own spacing;
/// this function does not enforce that, matching the spec's "recommended only when"
/// phrasing rather than a hard precondition.
pub fn linear_resample(points: &[(f64, f64)], start: f64, spacing: f64) -> Vec<ResampledBin> {
    if points.is_empty() || spacing <= 0.0 {
        return Vec::new();
    }
    let max_pos = points.iter().map(|&(p, _)| p).fold(f64::MIN, f64::max);
    let bin_count = (((max_pos - start) / spacing).floor() as isize + 2).max(1) as usize;
    let mut bins = vec![0.0_f64; bin_count];

    for &(pos, intensity) in points {
        if pos < start {
            continue;
        }
        let offset = (pos - start) / spacing;
        let left_idx = offset.floor() as usize;
        let fraction = offset - offset.floor();
        if left_idx >= bins.len() {
            continue;
        }
        bins[left_idx] += intensity * (1.0 - fraction);
        if let Some(right) = bins.get_mut(left_idx + 1) {
            *right += intensity * fraction;
        }
    }

    bins.into_iter()
        .enumerate()
        .map(|(i, intensity)| ResampledBin {
            position: start + i as f64 * spacing,
            intensity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S1: total intensity is preserved by construction.
    #[test]
    fn s1_total_intensity_is_preserved() {
        let points = [(0.0, 3.0), (0.5, 6.0), (1.0, 8.0), (1.6, 2.0), (1.8, 1.0)];
        let bins = linear_resample(&points, 0.0, 0.5);
        let total: f64 = bins.iter().map(|b| b.intensity).sum();
        assert!((total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn isolated_peak_on_grid_lands_entirely_in_one_bin() {
        let points = [(1.0, 10.0)];
        let bins = linear_resample(&points, 0.0, 1.0);
        let nonzero: Vec<_> = bins.iter().filter(|b| b.intensity > 0.0).collect();
        assert_eq!(nonzero.len(), 1);
        assert!((nonzero[0].position - 1.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_isolated_peak_is_preserved() {
        let points = [(1.25, 10.0)];
        let bins = linear_resample(&points, 0.0, 1.0);
        let total: f64 = bins.iter().map(|b| b.intensity).sum();
        let centroid: f64 = bins.iter().map(|b| b.position * b.intensity).sum::<f64>() / total;
        assert!((centroid - 1.25).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_no_bins() {
        assert!(linear_resample(&[], 0.0, 0.5).is_empty());
    }
}
