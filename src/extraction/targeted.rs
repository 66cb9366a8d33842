//! The targeted experiment model: protein/peptide/transition rows consumed by the
//! extraction pipeline (§4.6 inputs), and SWATH transition selection.

use crate::system::f64::MassOverCharge;

use super::config::ExtractionConfig;
use super::swath::SwathMap;

/// One row of a spectral library / transition list.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Precursor m/z of the peptide this transition belongs to.
    pub precursor_mz: MassOverCharge,
    /// Product ion m/z monitored by this transition.
    pub product_mz: MassOverCharge,
    /// Relative intensity expected from the spectral library.
    pub library_intensity: f64,
    /// Identifier of the peptide this transition belongs to.
    pub peptide_ref: String,
    /// Precursor charge state.
    pub charge: u8,
    /// Whether this is a decoy transition.
    pub decoy: bool,
    /// Used to build the quantitative signal.
    pub detecting: bool,
    /// Used for peak group selection/scoring but not quantification.
    pub quantifying: bool,
    /// Used to confirm peptide identity but not for quantification.
    pub identifying: bool,
}

/// A (protein, peptide, transition) library, as consumed from a traML file.
#[derive(Debug, Clone, Default)]
pub struct TargetedExperiment {
    /// All transitions in the library.
    pub transitions: Vec<Transition>,
}

impl TargetedExperiment {
    /// An empty experiment.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Select the transitions whose precursor m/z falls strictly inside `(map.lower,
/// map.upper)` and at least `min_upper_edge_dist` from the upper edge (§4.6
/// `selectSwathTransitions`). The referenced peptides (identified by `peptide_ref`)
/// are included transitively: every transition belonging to a peptide that has at
/// least one selected transition is kept, not just the one that triggered selection.
pub fn select_swath_transitions<'a>(
    experiment: &'a TargetedExperiment,
    map: &SwathMap,
    config: &ExtractionConfig,
) -> Vec<&'a Transition> {
    use std::collections::HashSet;

    let min_edge_dist = config.min_upper_edge_dist.value;
    let matching_peptide_refs: HashSet<&str> = experiment
        .transitions
        .iter()
        .filter(|t| {
            let mz = t.precursor_mz.value;
            mz > map.lower && mz < map.upper && (map.upper - mz) >= min_edge_dist
        })
        .map(|t| t.peptide_ref.as_str())
        .collect();

    experiment
        .transitions
        .iter()
        .filter(|t| matching_peptide_refs.contains(t.peptide_ref.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mass_over_charge::mz;

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

    #[test]
    fn selects_transitions_strictly_inside_window_with_edge_margin() {
        let experiment = TargetedExperiment {
            transitions: vec![
                transition("PEPA", 410.0, 500.0),
                transition("PEPA", 410.0, 600.0),
                transition("PEPB", 424.9, 700.0),
                transition("PEPC", 400.0, 800.0),
            ],
        };
        let map = SwathMap { lower: 400.0, upper: 425.0, ms1: false, spectra: Vec::new() };
        let config = ExtractionConfig { min_upper_edge_dist: MassOverCharge::new::<mz>(1.0), ..ExtractionConfig::default() };

        let selected = select_swath_transitions(&experiment, &map, &config);
        let refs: Vec<&str> = selected.iter().map(|t| t.peptide_ref.as_str()).collect();
        assert!(refs.contains(&"PEPA"));
        assert_eq!(selected.iter().filter(|t| t.peptide_ref == "PEPA").count(), 2);
        assert!(!refs.contains(&"PEPB"));
        assert!(!refs.contains(&"PEPC"));
    }
}
