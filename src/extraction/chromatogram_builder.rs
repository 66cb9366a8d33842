//! Per-transition XIC chromatogram building (§4.6 extraction stage 1).

use crate::spectrum::{Chromatogram, ChromatogramPoint, Spectrum};
use crate::system::f64::Time;

use super::config::ExtractionConfig;
use super::targeted::Transition;

/// Build one chromatogram per transition: sum each MS2 spectrum's intensity within
/// `±mz_tolerance` of the transition's product m/z, across every spectrum of `map`,
/// RT-windowed around `assay_rt` when the config carries a window.
pub fn build_transition_chromatograms(
    spectra: &[Spectrum],
    transitions: &[&Transition],
    assay_rt: Option<Time>,
    config: &ExtractionConfig,
) -> Vec<Chromatogram> {
    let rt_bounds = match (assay_rt, config.rt_window) {
        (Some(rt), Some(window)) => Some((rt.value - window.value, rt.value + window.value)),
        _ => None,
    };

    transitions
        .iter()
        .map(|transition| {
            let mut chromatogram = Chromatogram::new(format!("{}_{}", transition.peptide_ref, transition.product_mz.value));
            for spectrum in spectra {
                if spectrum.ms_level < 2 {
                    continue;
                }
                if let Some((lo, hi)) = rt_bounds {
                    if spectrum.retention_time.value < lo || spectrum.retention_time.value > hi {
                        continue;
                    }
                }
                let intensity = sum_intensity_within(spectrum, transition.product_mz.value, config.mz_tolerance.value);
                chromatogram.push_point(ChromatogramPoint {
                    retention_time: spectrum.retention_time,
                    intensity,
                });
            }
            chromatogram.sort_by_rt();
            chromatogram
        })
        .collect()
}

fn sum_intensity_within(spectrum: &Spectrum, center_mz: f64, tolerance: f64) -> f32 {
    spectrum
        .peaks()
        .iter()
        .filter(|peak| (peak.mz.value - center_mz).abs() <= tolerance)
        .map(|peak| peak.intensity)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::Peak1D;
    use crate::system::mass_over_charge::mz;
    use crate::system::time::second;
    use crate::system::MassOverCharge;

    fn spectrum_with_peak(rt: f64, peak_mz: f64, intensity: f32) -> Spectrum {
        Spectrum::from_peaks(
            "scan",
            Time::new::<second>(rt),
            2,
            vec![Peak1D::new(MassOverCharge::new::<mz>(peak_mz), intensity)],
        )
    }

    fn transition(peptide_ref: &str, product_mz: f64) -> Transition {
        Transition {
            precursor_mz: MassOverCharge::new::<mz>(500.0),
            product_mz: MassOverCharge::new::<mz>(product_mz),
            library_intensity: 1.0,
            peptide_ref: peptide_ref.to_string(),
            charge: 2,
            decoy: false,
            detecting: true,
            quantifying: true,
            identifying: false,
        }
    }

    #[test]
    fn sums_intensity_within_tolerance_per_scan() {
        let spectra = vec![spectrum_with_peak(1.0, 600.01, 100.0), spectrum_with_peak(2.0, 700.0, 50.0)];
        let t = transition("PEPA", 600.0);
        let config = ExtractionConfig { mz_tolerance: MassOverCharge::new::<mz>(0.05), ..ExtractionConfig::default() };
        let chromatograms = build_transition_chromatograms(&spectra, &[&t], None, &config);
        assert_eq!(chromatograms.len(), 1);
        let points = chromatograms[0].points();
        assert_eq!(points.len(), 2);
        assert!((points[0].intensity - 100.0).abs() < 1e-6);
        assert!((points[1].intensity - 0.0).abs() < 1e-6);
    }

    #[test]
    fn rt_window_excludes_scans_outside_it() {
        let spectra = vec![spectrum_with_peak(1.0, 600.0, 100.0), spectrum_with_peak(50.0, 600.0, 100.0)];
        let t = transition("PEPA", 600.0);
        let config = ExtractionConfig {
            mz_tolerance: MassOverCharge::new::<mz>(0.05),
            rt_window: Some(Time::new::<second>(5.0)),
            ..ExtractionConfig::default()
        };
        let chromatograms = build_transition_chromatograms(&spectra, &[&t], Some(Time::new::<second>(1.0)), &config);
        assert_eq!(chromatograms[0].points().len(), 1);
    }
}
