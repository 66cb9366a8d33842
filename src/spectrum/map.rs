//! `Map`/`Experiment` (§3, §4.1): an ordered collection of spectra and chromatograms
//! with lazily-recomputed range indices.

use super::{Chromatogram, Spectrum};
use crate::util::RangeManager;

/// An ordered sequence of spectra (chronological RT) and a parallel sequence of
/// chromatograms, with range indices recomputed on demand via
/// [`Experiment::update_ranges`].
#[derive(Debug, Clone, Default)]
pub struct Experiment {
    spectra: Vec<Spectrum>,
    chromatograms: Vec<Chromatogram>,
    ranges: RangeManager,
}

impl Experiment {
    /// A fresh, empty experiment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spectra.
    pub fn size(&self) -> usize {
        self.spectra.len()
    }

    /// All spectra, in insertion (expected: RT-chronological) order.
    pub fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    /// All chromatograms.
    pub fn chromatograms(&self) -> &[Chromatogram] {
        &self.chromatograms
    }

    /// Append a spectrum. Readers are expected to deliver spectra already in RT order
    /// (§5 "Ordering guarantees"); this method does not re-sort.
    pub fn push_spectrum(&mut self, spectrum: Spectrum) {
        self.spectra.push(spectrum);
    }

    /// Append a chromatogram.
    pub fn push_chromatogram(&mut self, chromatogram: Chromatogram) {
        self.chromatograms.push(chromatogram);
    }

    /// Single pass recomputing min/max over m/z, RT, and intensity across every
    /// spectrum. Idempotent: calling twice without intervening mutation yields
    /// identical ranges (§4.1, §8).
    pub fn update_ranges(&mut self) {
        let peaks = self
            .spectra
            .iter()
            .flat_map(|s| s.peaks().iter().map(|p| (p.mz.value, f64::from(p.intensity))));
        let rts = self.spectra.iter().map(|s| s.retention_time.value);
        self.ranges.update_from_peaks(peaks, rts);
    }

    /// The current range index. Reflects the contents as of the last
    /// [`Experiment::update_ranges`] call; an empty map leaves every dimension at its
    /// sentinel (empty) value (§8 boundary behavior).
    pub fn ranges(&self) -> &RangeManager {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::Peak1D;
    use crate::system::f64::{MassOverCharge, Time};
    use crate::system::mass_over_charge::mz;
    use crate::system::time::second;

    #[test]
    fn empty_experiment_has_sentinel_ranges() {
        let mut experiment = Experiment::new();
        experiment.update_ranges();
        assert_eq!(experiment.size(), 0);
        assert!(experiment.ranges().mz.is_empty());
    }

    #[test]
    fn update_ranges_is_idempotent() {
        let mut experiment = Experiment::new();
        let mut spectrum = Spectrum::new("scan=1", Time::new::<second>(1.0), 1);
        spectrum.push_peak(Peak1D::new(MassOverCharge::new::<mz>(500.0), 10.0));
        experiment.push_spectrum(spectrum);
        experiment.update_ranges();
        let first = experiment.ranges().clone();
        experiment.update_ranges();
        assert_eq!(first, *experiment.ranges());
    }
}
