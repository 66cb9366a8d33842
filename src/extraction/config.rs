//! Tunables for the targeted extraction pipeline (§4.6, `SPEC_FULL.md` §0.3).

use crate::system::f64::{MassOverCharge, Time};

/// Construction and picking parameters for [`super::extract_transition_groups`].
pub struct ExtractionConfig {
    /// Half-width of the m/z window summed into each transition's XIC (§4.6 step 1).
    pub mz_tolerance: MassOverCharge,
    /// Half-width of the retention-time window applied around the assay RT, if the
    /// assay carries one.
    pub rt_window: Option<Time>,
    /// Minimum distance a transition's precursor m/z must keep from a SWATH window's
    /// upper edge to be selected (§4.6 `selectSwathTransitions`).
    pub min_upper_edge_dist: MassOverCharge,
    /// Stop growing a peak group once its running intensity ratio against the seed
    /// peak's intensity drops below this fraction.
    pub intensity_ratio_threshold: f64,
    /// Stop growing a peak group once it has collected this many member peaks.
    pub max_feature_count: usize,
    /// Whether to subtract an estimated baseline from each peak group's integrated
    /// area (§4.6 step 2).
    pub background_subtraction: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        use crate::system::mass_over_charge::mz;
        Self {
            mz_tolerance: MassOverCharge::new::<mz>(0.05),
            rt_window: None,
            min_upper_edge_dist: MassOverCharge::new::<mz>(1.0),
            intensity_ratio_threshold: 0.01,
            max_feature_count: 5,
            background_subtraction: true,
        }
    }
}
