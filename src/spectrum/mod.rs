//! The spectrum/chromatogram/map data model (C1, §3, §4.1).

mod map;
mod peak;
mod precursor;

pub use map::Experiment;
pub use peak::Peak1D;
pub use precursor::{Activation, IonMobility, IsolationWindow, Precursor, Product, neutral_mass_from_mz};

use crate::system::f64::{MassOverCharge, Time};
use crate::util::{Tolerance, WithinTolerance};

/// An ordered sequence of [`Peak1D`], carrying retention time, MS level, the precursor
/// list, and a native identifier (§3).
///
/// Invariant: peaks are sorted ascending by m/z. The invariant is not maintained
/// automatically on every mutation — an explicit [`Spectrum::sort_by_mz`] call is
/// required, matching §4.1's `Spectrum.sortByMZ()`; [`Spectrum::is_sorted`] reports
/// whether it currently holds (§8 invariant 2).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Native identifier, as assigned by the source file (e.g. an mzML `id` attribute).
    pub native_id: String,
    /// Retention time of this scan.
    pub retention_time: Time,
    /// MS level (1 for survey scans, 2+ for fragment scans).
    pub ms_level: u8,
    /// Precursors that gave rise to this spectrum (empty for MS1).
    pub precursors: Vec<Precursor>,
    peaks: Vec<Peak1D>,
}

impl Spectrum {
    /// Build a new, empty spectrum.
    pub fn new(native_id: impl Into<String>, retention_time: Time, ms_level: u8) -> Self {
        Self {
            native_id: native_id.into(),
            retention_time,
            ms_level,
            precursors: Vec::new(),
            peaks: Vec::new(),
        }
    }

    /// Build a spectrum from a set of peaks, sorting them immediately.
    pub fn from_peaks(
        native_id: impl Into<String>,
        retention_time: Time,
        ms_level: u8,
        mut peaks: Vec<Peak1D>,
    ) -> Self {
        peaks.sort_unstable();
        Self {
            native_id: native_id.into(),
            retention_time,
            ms_level,
            precursors: Vec::new(),
            peaks,
        }
    }

    /// The peaks of this spectrum, in whatever order they currently are (see
    /// [`Spectrum::is_sorted`]).
    pub fn peaks(&self) -> &[Peak1D] {
        &self.peaks
    }

    /// Append a peak without re-sorting; callers must call [`Spectrum::sort_by_mz`]
    /// before relying on the sorted-invariant again.
    pub fn push_peak(&mut self, peak: Peak1D) {
        self.peaks.push(peak);
    }

    /// Stable ascending sort on m/z. O(n log n) (§4.1).
    pub fn sort_by_mz(&mut self) {
        self.peaks.sort();
    }

    /// Whether the sorted-by-m/z invariant currently holds.
    pub fn is_sorted(&self) -> bool {
        self.peaks.windows(2).all(|w| w[0] <= w[1])
    }

    /// Retain only peaks with intensity `>= filter_threshold * max_intensity`.
    pub fn relative_noise_filter(&mut self, filter_threshold: f32) {
        let max = self
            .peaks
            .iter()
            .map(|p| p.intensity)
            .fold(0.0_f32, f32::max);
        self.peaks.retain(|p| p.intensity >= max * filter_threshold);
    }

    /// Retain only peaks with intensity `>= filter_threshold`.
    pub fn absolute_noise_filter(&mut self, filter_threshold: f32) {
        self.peaks.retain(|p| p.intensity >= filter_threshold);
    }

    /// Divide the m/z axis into windows of `window_size` and within each window keep
    /// only the `top` most intense peaks.
    pub fn top_x_filter(&mut self, window_size: f64, top: usize) {
        if self.peaks.is_empty() {
            return;
        }
        self.sort_by_mz();
        let mut retained = Vec::new();
        let mut window_start = self.peaks[0].mz.value;
        let mut window = Vec::new();
        for peak in self.peaks.drain(..) {
            if peak.mz.value > window_start + window_size {
                retained.extend(top_n_by_intensity(&mut window, top));
                window_start = peak.mz.value;
            }
            window.push(peak);
        }
        retained.extend(top_n_by_intensity(&mut window, top));
        retained.sort();
        self.peaks = retained;
    }

    /// Closest-match search within `tolerance` around `query`, generalizing the
    /// teacher's `RawSpectrum::search`: binary-search to the nearest index, then
    /// compare `index-1, index, index+1` and keep whichever is ppm-closest.
    pub fn find_nearest(&self, query: MassOverCharge, tolerance: Tolerance<MassOverCharge>) -> Option<usize> {
        if self.peaks.is_empty() {
            return None;
        }
        let index = self
            .peaks
            .binary_search_by(|p| p.mz.value.total_cmp(&query.value))
            .unwrap_or_else(|i| i);
        let lo = index.saturating_sub(1);
        let hi = (index + 1).min(self.peaks.len() - 1);
        let mut best = (lo, f64::INFINITY);
        for i in lo..=hi {
            let diff = (self.peaks[i].mz.value - query.value).abs();
            if diff < best.1 {
                best = (i, diff);
            }
        }
        tolerance
            .within(&query, &self.peaks[best.0].mz)
            .then_some(best.0)
    }
}

fn top_n_by_intensity(window: &mut Vec<Peak1D>, top: usize) -> Vec<Peak1D> {
    window.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
    let kept = window.drain(..window.len().min(top)).collect();
    window.clear();
    kept
}

/// A single (RT, intensity) sample of a chromatogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromatogramPoint {
    /// Retention time of this sample.
    pub retention_time: Time,
    /// Intensity at this retention time.
    pub intensity: f32,
}

/// An ordered sequence of (RT, intensity) samples, plus optional precursor/product
/// descriptors (§3). Same sorted-by-RT invariant as [`Spectrum`]'s sorted-by-m/z one.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromatogram {
    /// Native identifier.
    pub native_id: String,
    /// Precursor isolation window, for SRM/PRM and XIC chromatograms.
    pub precursor: Option<Precursor>,
    /// Product isolation window, for SRM/PRM transitions.
    pub product: Option<Product>,
    points: Vec<ChromatogramPoint>,
}

impl Chromatogram {
    /// Build an empty chromatogram.
    pub fn new(native_id: impl Into<String>) -> Self {
        Self {
            native_id: native_id.into(),
            precursor: None,
            product: None,
            points: Vec::new(),
        }
    }

    /// The points of this chromatogram, in whatever order they currently are.
    pub fn points(&self) -> &[ChromatogramPoint] {
        &self.points
    }

    /// Append a point without re-sorting.
    pub fn push_point(&mut self, point: ChromatogramPoint) {
        self.points.push(point);
    }

    /// Stable ascending sort on retention time.
    pub fn sort_by_rt(&mut self) {
        self.points
            .sort_by(|a, b| a.retention_time.value.total_cmp(&b.retention_time.value));
    }

    /// Whether the sorted-by-RT invariant currently holds.
    pub fn is_sorted(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[0].retention_time.value <= w[1].retention_time.value)
    }

    /// Total intensity across all points.
    pub fn total_intensity(&self) -> f64 {
        self.points.iter().map(|p| f64::from(p.intensity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mass_over_charge::mz;
    use crate::system::time::second;

    fn p(value: f64, intensity: f32) -> Peak1D {
        Peak1D::new(MassOverCharge::new::<mz>(value), intensity)
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut spectrum = Spectrum::new("scan=1", Time::new::<second>(1.0), 1);
        spectrum.push_peak(p(300.0, 1.0));
        spectrum.push_peak(p(100.0, 2.0));
        assert!(!spectrum.is_sorted());
        spectrum.sort_by_mz();
        assert!(spectrum.is_sorted());
        let first = spectrum.clone();
        spectrum.sort_by_mz();
        assert_eq!(first, spectrum);
    }

    #[test]
    fn relative_noise_filter_keeps_only_loud_peaks() {
        let mut spectrum = Spectrum::from_peaks(
            "scan=1",
            Time::new::<second>(0.0),
            1,
            vec![p(100.0, 10.0), p(101.0, 1.0)],
        );
        spectrum.relative_noise_filter(0.5);
        assert_eq!(spectrum.peaks().len(), 1);
    }
}
