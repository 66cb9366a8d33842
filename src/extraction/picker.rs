//! Chromatographic peak picking and cross-transition clustering (§4.6 extraction
//! stage 2, `MRMTransitionGroupPicker`).

use crate::spectrum::Chromatogram;
use crate::system::f64::Time;

use super::config::ExtractionConfig;

/// One local-maximum peak picked from a single chromatogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromatogramPeak {
    /// RT of the peak apex.
    pub apex_rt: Time,
    /// Intensity at the apex.
    pub apex_intensity: f32,
    /// Left boundary of the peak (nearest local minimum or the chromatogram's start).
    pub left_rt: Time,
    /// Right boundary of the peak (nearest local minimum or the chromatogram's end).
    pub right_rt: Time,
    /// Trapezoidal area under the peak between `left_rt` and `right_rt`.
    pub area: f64,
}

/// Find local-maxima peaks in a chromatogram, plain (no smoothing step): a rising
/// edge (`prev < cur`) followed by a flat-or-falling run (`cur >= next, next >= ...`)
/// up to the next strict fall marks one apex, taken at the first point of the
/// plateau. Boundaries extend outward to the nearest local minimum on each side.
pub fn pick_chromatogram_peaks(chromatogram: &Chromatogram) -> Vec<ChromatogramPeak> {
    let points = chromatogram.points();
    if points.len() < 3 {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    let mut i = 1;
    while i < points.len() - 1 {
        let rising = points[i].intensity > points[i - 1].intensity;
        if !rising {
            i += 1;
            continue;
        }
        let mut plateau_end = i;
        while plateau_end < points.len() - 1 && points[plateau_end + 1].intensity == points[i].intensity {
            plateau_end += 1;
        }
        let is_apex = plateau_end == points.len() - 1 || points[plateau_end + 1].intensity < points[i].intensity;
        if !is_apex {
            i = plateau_end + 1;
            continue;
        }

        let mut left = i;
        while left > 0 && points[left - 1].intensity <= points[left].intensity {
            left -= 1;
        }
        let mut right = plateau_end;
        while right < points.len() - 1 && points[right + 1].intensity <= points[right].intensity {
            right += 1;
        }

        let area = trapezoidal_area(&points[left..=right]);
        peaks.push(ChromatogramPeak {
            apex_rt: points[i].retention_time,
            apex_intensity: points[i].intensity,
            left_rt: points[left].retention_time,
            right_rt: points[right].retention_time,
            area,
        });
        i = right + 1;
    }
    peaks
}

fn trapezoidal_area(points: &[crate::spectrum::ChromatogramPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let dt = w[1].retention_time.value - w[0].retention_time.value;
            dt * f64::from(w[0].intensity + w[1].intensity) / 2.0
        })
        .sum()
}

/// One clustered peak group spanning several co-eluting transitions of the same
/// peptide (§4.6 extraction stage 2).
#[derive(Debug, Clone)]
pub struct PeakGroup {
    /// Left RT boundary of the group, the union of its members' boundaries.
    pub best_left: Time,
    /// Right RT boundary of the group.
    pub best_right: Time,
    /// RT of the seed (largest) peak's apex.
    pub apex_rt: Time,
    /// Indices into the input `chromatograms` slice of this group's members.
    pub transition_indices: Vec<usize>,
    /// Total integrated area across member transitions, after optional background
    /// subtraction.
    pub total_area: f64,
}

/// Cluster peaks across `chromatograms` (one per transition of a single peptide's
/// transition group) into [`PeakGroup`]s (§4.6 `MRMTransitionGroupPicker`):
/// 1. Pick peaks per chromatogram.
/// 2. Sort all peaks, across all transitions, by apex intensity descending.
/// 3. Repeatedly take the largest unused peak as a seed, collect overlapping peaks
///    from the other transitions (at most one per transition) while the running
///    intensity ratio against the seed and the member count stay within
///    `config`'s thresholds, and mark every collected peak used.
pub fn mrm_transition_group_picker(chromatograms: &[Chromatogram], config: &ExtractionConfig) -> Vec<PeakGroup> {
    let per_transition_peaks: Vec<Vec<ChromatogramPeak>> = chromatograms.iter().map(pick_chromatogram_peaks).collect();

    let mut all_peaks: Vec<(usize, usize)> = Vec::new();
    for (transition_idx, peaks) in per_transition_peaks.iter().enumerate() {
        for peak_idx in 0..peaks.len() {
            all_peaks.push((transition_idx, peak_idx));
        }
    }
    all_peaks.sort_by(|a, b| {
        let ia = per_transition_peaks[a.0][a.1].apex_intensity;
        let ib = per_transition_peaks[b.0][b.1].apex_intensity;
        ib.total_cmp(&ia)
    });

    let mut used = vec![false; all_peaks.len()];
    let mut groups = Vec::new();

    for seed_pos in 0..all_peaks.len() {
        if used[seed_pos] {
            continue;
        }
        let (seed_transition, seed_peak_idx) = all_peaks[seed_pos];
        let seed = per_transition_peaks[seed_transition][seed_peak_idx];
        used[seed_pos] = true;

        let mut member_transitions = vec![seed_transition];
        let mut claimed_transitions = vec![seed_transition];
        let mut best_left = seed.left_rt;
        let mut best_right = seed.right_rt;
        let mut total_area = seed.area;

        for pos in (seed_pos + 1)..all_peaks.len() {
            if used[pos] || member_transitions.len() >= config.max_feature_count {
                continue;
            }
            let (transition_idx, peak_idx) = all_peaks[pos];
            if claimed_transitions.contains(&transition_idx) {
                continue;
            }
            let candidate = per_transition_peaks[transition_idx][peak_idx];
            let ratio = f64::from(candidate.apex_intensity) / f64::from(seed.apex_intensity).max(f64::EPSILON);
            if ratio < config.intensity_ratio_threshold {
                continue;
            }
            let overlaps = candidate.left_rt.value <= best_right.value && candidate.right_rt.value >= best_left.value;
            if !overlaps {
                continue;
            }

            used[pos] = true;
            claimed_transitions.push(transition_idx);
            member_transitions.push(transition_idx);
            best_left = Time::new::<crate::system::time::second>(best_left.value.min(candidate.left_rt.value));
            best_right = Time::new::<crate::system::time::second>(best_right.value.max(candidate.right_rt.value));
            total_area += candidate.area;
        }

        if config.background_subtraction {
            for &transition_idx in &member_transitions {
                let chromatogram = &chromatograms[transition_idx];
                let baseline = background_baseline(chromatogram, best_left, best_right);
                let n_points = chromatogram
                    .points()
                    .iter()
                    .filter(|p| p.retention_time.value >= best_left.value && p.retention_time.value <= best_right.value)
                    .count();
                total_area -= baseline * n_points as f64;
            }
        }

        groups.push(PeakGroup {
            best_left,
            best_right,
            apex_rt: seed.apex_rt,
            transition_indices: member_transitions,
            total_area: total_area.max(0.0),
        });
    }

    groups
}

/// Baseline estimate: the average of the chromatogram's intensity nearest `left` and
/// nearest `right` (§4.6 "average of intensities at (best_left, best_right)").
fn background_baseline(chromatogram: &Chromatogram, left: Time, right: Time) -> f64 {
    let intensity_near = |target: Time| -> f64 {
        chromatogram
            .points()
            .iter()
            .min_by(|a, b| {
                (a.retention_time.value - target.value)
                    .abs()
                    .total_cmp(&(b.retention_time.value - target.value).abs())
            })
            .map(|p| f64::from(p.intensity))
            .unwrap_or(0.0)
    };
    (intensity_near(left) + intensity_near(right)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::ChromatogramPoint;
    use crate::system::time::second;

    fn chrom_from(points: &[(f64, f32)]) -> Chromatogram {
        let mut chromatogram = Chromatogram::new("xic");
        for &(rt, intensity) in points {
            chromatogram.push_point(ChromatogramPoint { retention_time: Time::new::<second>(rt), intensity });
        }
        chromatogram
    }

    #[test]
    fn picks_a_single_local_maximum() {
        let chromatogram = chrom_from(&[(1.0, 0.0), (2.0, 5.0), (3.0, 10.0), (4.0, 4.0), (5.0, 0.0)]);
        let peaks = pick_chromatogram_peaks(&chromatogram);
        assert_eq!(peaks.len(), 1);
        assert!((peaks[0].apex_rt.value - 3.0).abs() < 1e-9);
        assert!(peaks[0].area > 0.0);
    }

    #[test]
    fn clusters_co_eluting_transitions_into_one_group() {
        let c1 = chrom_from(&[(1.0, 0.0), (2.0, 5.0), (3.0, 10.0), (4.0, 4.0), (5.0, 0.0)]);
        let c2 = chrom_from(&[(1.0, 0.0), (2.0, 3.0), (3.0, 6.0), (4.0, 2.0), (5.0, 0.0)]);
        let config = ExtractionConfig::default();
        let groups = mrm_transition_group_picker(&[c1, c2], &config);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].transition_indices.len(), 2);
    }

    #[test]
    fn non_overlapping_peaks_form_separate_groups() {
        let c1 = chrom_from(&[(1.0, 0.0), (2.0, 10.0), (3.0, 0.0)]);
        let c2 = chrom_from(&[(10.0, 0.0), (11.0, 8.0), (12.0, 0.0)]);
        let config = ExtractionConfig::default();
        let groups = mrm_transition_group_picker(&[c1, c2], &config);
        assert_eq!(groups.len(), 2);
    }
}
