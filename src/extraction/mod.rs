//! The SWATH/DIA targeted extraction pipeline (C6, §4.6): annotate SWATH windows,
//! select transitions per window, build per-transition XICs, and cluster them into
//! scored peak groups keyed by peptide reference.

mod chromatogram_builder;
mod config;
mod picker;
mod swath;
mod targeted;

pub use chromatogram_builder::build_transition_chromatograms;
pub use config::ExtractionConfig;
pub use picker::{mrm_transition_group_picker, pick_chromatogram_peaks, ChromatogramPeak, PeakGroup};
pub use swath::{annotate_swath_maps_from_file, check_swath_map, read_swath_windows, SwathMap};
pub use targeted::{select_swath_transitions, TargetedExperiment, Transition};

use std::collections::HashMap;

use crate::scoring::{normalized_manhattan_distance, spectral_angle};
use crate::system::f64::Time;

/// One scored peak group belonging to a peptide, the extraction pipeline's final
/// per-peptide output (§4.6 stage 4).
#[derive(Debug, Clone)]
pub struct PeptideGroupFeature {
    /// RT of the group's seed apex.
    pub retention_time: Time,
    /// Library (expected) RT, if the assay carried one.
    pub library_retention_time: Option<Time>,
    /// Left/right RT boundaries of the group.
    pub best_left: Time,
    pub best_right: Time,
    /// Total integrated area, background-subtracted if configured.
    pub total_area: f64,
    /// Per-kernel score components (§4.7), keyed by score name.
    pub score_components: HashMap<String, f64>,
}

/// A feature map keyed by peptide reference (§4.6 stage 4 "Output: a feature map
/// keyed by PeptideRef").
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    features: HashMap<String, Vec<PeptideGroupFeature>>,
}

impl ExtractionResult {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// The peak-group features found for one peptide reference, if any.
    pub fn features_for(&self, peptide_ref: &str) -> &[PeptideGroupFeature] {
        self.features.get(peptide_ref).map_or(&[], Vec::as_slice)
    }

    /// Every peptide reference with at least one feature.
    pub fn peptide_refs(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    fn push(&mut self, peptide_ref: String, feature: PeptideGroupFeature) {
        self.features.entry(peptide_ref).or_default().push(feature);
    }
}

/// Run the full extraction pipeline over one SWATH map: select its transitions,
/// build one transition group per peptide, pick and cluster peaks, and package the
/// clustered groups into an [`ExtractionResult`] (§4.6 stages 1-4).
pub fn extract_transition_groups(
    map: &SwathMap,
    experiment: &TargetedExperiment,
    library_rt: &HashMap<String, Time>,
    config: &ExtractionConfig,
) -> ExtractionResult {
    let selected = select_swath_transitions(experiment, map, config);

    let mut by_peptide: HashMap<&str, Vec<&Transition>> = HashMap::new();
    for transition in &selected {
        by_peptide.entry(transition.peptide_ref.as_str()).or_default().push(transition);
    }

    let mut result = ExtractionResult::new();
    for (peptide_ref, transitions) in by_peptide {
        let assay_rt = library_rt.get(peptide_ref).copied();
        let chromatograms = build_transition_chromatograms(&map.spectra, &transitions, assay_rt, config);
        let groups = mrm_transition_group_picker(&chromatograms, config);

        for group in groups {
            let mut score_components = HashMap::new();
            score_components.insert("total_area".to_string(), group.total_area);
            score_components.insert(
                "n_transitions".to_string(),
                group.transition_indices.len() as f64,
            );

            let observed_intensities: Vec<f64> = group
                .transition_indices
                .iter()
                .map(|&idx| intensity_nearest(&chromatograms[idx], group.apex_rt))
                .collect();
            let library_intensities: Vec<f64> = group
                .transition_indices
                .iter()
                .map(|&idx| transitions[idx].library_intensity)
                .collect();
            score_components.insert(
                "spectral_angle".to_string(),
                spectral_angle(&observed_intensities, &library_intensities),
            );
            score_components.insert(
                "normalized_manhattan_distance".to_string(),
                normalized_manhattan_distance(&observed_intensities, &library_intensities),
            );

            result.push(
                peptide_ref.to_string(),
                PeptideGroupFeature {
                    retention_time: group.apex_rt,
                    library_retention_time: assay_rt,
                    best_left: group.best_left,
                    best_right: group.best_right,
                    total_area: group.total_area,
                    score_components,
                },
            );
        }
    }
    result
}

/// Run [`extract_transition_groups`] over several SWATH maps in parallel (§5
/// "shared-memory parallelism over data-parallel loops (per-spectrum,
/// per-transition-group, per-peptide)"). Only available with the `rayon` feature.
/// Each map is extracted independently; results are returned in the same order as
/// `maps`, so aggregation stays order-independent regardless of which thread
/// finishes first.
#[cfg(feature = "rayon")]
pub fn par_extract_transition_groups(
    maps: &[SwathMap],
    experiment: &TargetedExperiment,
    library_rt: &HashMap<String, Time>,
    config: &ExtractionConfig,
) -> Vec<ExtractionResult> {
    use rayon::prelude::*;
    maps.par_iter()
        .map(|map| extract_transition_groups(map, experiment, library_rt, config))
        .collect()
}

/// Intensity of the chromatogram point nearest `target` RT, `0.0` for an empty
/// chromatogram. Used to read a per-transition observed intensity at a group's apex
/// for the library-comparison scores (§4.7).
fn intensity_nearest(chromatogram: &crate::spectrum::Chromatogram, target: Time) -> f64 {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{Peak1D, Spectrum};
    use crate::system::f64::MassOverCharge;
    use crate::system::mass_over_charge::mz;
    use crate::system::time::second;

    fn transition(peptide_ref: &str, precursor_mz: f64, product_mz: f64) -> Transition {
        Transition {
            precursor_mz: MassOverCharge::new::<mz>(precursor_mz),
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

    fn ms2_spectrum(rt: f64, peaks: &[(f64, f32)]) -> Spectrum {
        Spectrum::from_peaks(
            "scan",
            Time::new::<second>(rt),
            2,
            peaks.iter().map(|&(m, i)| Peak1D::new(MassOverCharge::new::<mz>(m), i)).collect(),
        )
    }

    #[test]
    fn end_to_end_pipeline_produces_a_feature_for_a_coeluting_pair() {
        let spectra: Vec<Spectrum> = (0..10)
            .map(|i| {
                let rt = f64::from(i);
                let shape = if (3..=6).contains(&i) { 100.0 } else { 1.0 };
                ms2_spectrum(rt, &[(600.0, shape), (700.0, shape * 0.8)])
            })
            .collect();
        let map = SwathMap { lower: 400.0, upper: 425.0, ms1: false, spectra };

        let experiment = TargetedExperiment {
            transitions: vec![transition("PEPA", 410.0, 600.0), transition("PEPA", 410.0, 700.0)],
        };

        let config = ExtractionConfig::default();
        let result = extract_transition_groups(&map, &experiment, &HashMap::new(), &config);

        let features = result.features_for("PEPA");
        assert!(!features.is_empty());
        assert!(features[0].total_area > 0.0);
        assert!(features[0].score_components.contains_key("spectral_angle"));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_extraction_matches_sequential_extraction_per_map() {
        let spectra: Vec<Spectrum> = (0..10)
            .map(|i| {
                let rt = f64::from(i);
                let shape = if (3..=6).contains(&i) { 100.0 } else { 1.0 };
                ms2_spectrum(rt, &[(600.0, shape), (700.0, shape * 0.8)])
            })
            .collect();
        let maps = vec![
            SwathMap { lower: 400.0, upper: 425.0, ms1: false, spectra: spectra.clone() },
            SwathMap { lower: 425.0, upper: 450.0, ms1: false, spectra },
        ];
        let experiment = TargetedExperiment {
            transitions: vec![transition("PEPA", 410.0, 600.0), transition("PEPA", 410.0, 700.0)],
        };
        let config = ExtractionConfig::default();

        let parallel = par_extract_transition_groups(&maps, &experiment, &HashMap::new(), &config);
        let sequential: Vec<ExtractionResult> = maps
            .iter()
            .map(|map| extract_transition_groups(map, &experiment, &HashMap::new(), &config))
            .collect();

        assert_eq!(parallel.len(), sequential.len());
        assert_eq!(parallel[0].features_for("PEPA").len(), sequential[0].features_for("PEPA").len());
        assert!(parallel[1].features_for("PEPA").is_empty());
    }
}
