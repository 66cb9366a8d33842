//! `Feature`/`ConsensusFeature` (§3): arena + index ownership, per the "cyclic
//! references ... better modeled as arena + index" redesign flag (§9).

use crate::system::f64::{MassOverCharge, Time};
use crate::util::{UniqueIdIndexer, UniqueIdInterface};
use std::collections::HashMap;

/// A 2-D region (RT x m/z convex hull) with intensity, charge, and quality (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    unique_id: u64,
    /// Retention time of the feature apex.
    pub retention_time: Time,
    /// m/z of the feature apex.
    pub mz: MassOverCharge,
    /// Integrated intensity.
    pub intensity: f64,
    /// Charge state; `0` if unknown.
    pub charge: u8,
    /// Overall quality in `[0, 1]`; `-1.0` marks a feature whose fit failed
    /// (`UnableToFit`, recovered locally per §7) rather than being dropped.
    pub overall_quality: f64,
    /// Per-dimension qualities (e.g. RT-fit quality, m/z-fit quality), in the same
    /// `[0, 1]` / `-1.0` convention as `overall_quality`.
    pub dimension_qualities: Vec<f64>,
    /// Arbitrary string-keyed metadata.
    pub meta_values: HashMap<String, String>,
}

impl Feature {
    /// Build a feature with a fresh unique id (caller-assigned, typically monotonic
    /// per `FeatureMap`).
    pub fn new(unique_id: u64, retention_time: Time, mz: MassOverCharge, intensity: f64) -> Self {
        Self {
            unique_id,
            retention_time,
            mz,
            intensity,
            charge: 0,
            overall_quality: 1.0,
            dimension_qualities: Vec::new(),
            meta_values: HashMap::new(),
        }
    }

    /// Mark this feature as a failed fit: `quality = -1`, recovered locally rather
    /// than propagated (§7 "numerical errors (UnableToFit) are recovered locally").
    pub fn mark_unfittable(&mut self) {
        self.overall_quality = -1.0;
    }
}

impl UniqueIdInterface for Feature {
    fn unique_id(&self) -> u64 {
        self.unique_id
    }
}

/// Owns an array of [`Feature`]s plus the id-to-index cache backing
/// [`FeatureMap::by_id`].
#[derive(Debug, Default)]
pub struct FeatureMap {
    features: Vec<Feature>,
    indexer: UniqueIdIndexer,
}

impl FeatureMap {
    /// A fresh, empty feature map.
    pub fn new() -> Self {
        Self::default()
    }

    /// All features, in whatever order they were inserted (sorted to canonical
    /// `(RT, m/z)` order at end-of-pipeline per §5).
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Append a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Sort features into the canonical end-of-pipeline order: ascending by
    /// `(retention_time, mz)` (§5 "feature maps are sorted at end-of-pipeline to a
    /// canonical order by (RT, m/z)").
    pub fn sort_canonical(&mut self) {
        self.features.sort_by(|a, b| {
            a.retention_time
                .value
                .total_cmp(&b.retention_time.value)
                .then_with(|| a.mz.value.total_cmp(&b.mz.value))
        });
    }

    /// Look up a feature's index by its unique id (§4.1 `UniqueIdIndexer.byId`).
    pub fn by_id(&self, unique_id: u64) -> crate::error::Result<Option<usize>> {
        self.indexer.unique_id_to_index(&self.features, unique_id)
    }
}

/// A handle referencing one element inside a particular [`FeatureMap`], without owning
/// it: `(map_index, element_index)` per the arena+index redesign (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureHandle {
    /// Index of the map this handle's element lives in, e.g. an index into a
    /// `Vec<FeatureMap>` maintained by the caller.
    pub map_index: usize,
    /// Index of the element within that map's `FeatureMap::features()`.
    pub element_index: usize,
    /// Cached intensity of the referenced feature, used for weighted aggregation
    /// without re-dereferencing the map.
    pub intensity: f64,
    /// Cached retention time of the referenced feature.
    pub retention_time: Time,
    /// Cached m/z of the referenced feature.
    pub mz: MassOverCharge,
}

/// A set of [`FeatureHandle`]s whose aggregate RT/m/z/intensity is the
/// intensity-weighted mean of its members (§3, §8 invariant 3).
#[derive(Debug, Clone, Default)]
pub struct ConsensusFeature {
    handles: Vec<FeatureHandle>,
}

impl ConsensusFeature {
    /// Build a consensus feature from its member handles.
    pub fn new(handles: Vec<FeatureHandle>) -> Self {
        Self { handles }
    }

    /// The member handles.
    pub fn handles(&self) -> &[FeatureHandle] {
        &self.handles
    }

    /// The intensity-weighted mean retention time of the members, or `None` if there
    /// are no members or their total intensity is zero.
    pub fn aggregate_retention_time(&self) -> Option<Time> {
        self.weighted_mean(|h| h.retention_time.value)
            .map(Time::new::<crate::system::time::second>)
    }

    /// The intensity-weighted mean m/z of the members.
    pub fn aggregate_mz(&self) -> Option<MassOverCharge> {
        self.weighted_mean(|h| h.mz.value)
            .map(MassOverCharge::new::<crate::system::mass_over_charge::mz>)
    }

    /// The total intensity of the members.
    pub fn aggregate_intensity(&self) -> f64 {
        self.handles.iter().map(|h| h.intensity).sum()
    }

    fn weighted_mean(&self, value_of: impl Fn(&FeatureHandle) -> f64) -> Option<f64> {
        let total_intensity: f64 = self.handles.iter().map(|h| h.intensity).sum();
        if total_intensity <= 0.0 {
            return None;
        }
        Some(
            self.handles
                .iter()
                .map(|h| value_of(h) * h.intensity)
                .sum::<f64>()
                / total_intensity,
        )
    }
}

/// Owns a set of [`ConsensusFeature`]s; does NOT own the original features they
/// reference (only handles by `(map_index, element_index)`), per §3's ownership
/// summary.
#[derive(Debug, Default)]
pub struct ConsensusMap {
    consensus_features: Vec<ConsensusFeature>,
}

impl ConsensusMap {
    /// A fresh, empty consensus map.
    pub fn new() -> Self {
        Self::default()
    }

    /// All consensus features.
    pub fn consensus_features(&self) -> &[ConsensusFeature] {
        &self.consensus_features
    }

    /// Append a consensus feature.
    pub fn push(&mut self, consensus_feature: ConsensusFeature) {
        self.consensus_features.push(consensus_feature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mass_over_charge::mz as mz_unit;
    use crate::system::time::second;

    fn handle(map_index: usize, element_index: usize, rt: f64, mz_value: f64, intensity: f64) -> FeatureHandle {
        FeatureHandle {
            map_index,
            element_index,
            intensity,
            retention_time: Time::new::<second>(rt),
            mz: MassOverCharge::new::<mz_unit>(mz_value),
        }
    }

    #[test]
    fn consensus_aggregate_is_intensity_weighted_mean() {
        let consensus = ConsensusFeature::new(vec![
            handle(0, 0, 10.0, 500.0, 100.0),
            handle(1, 0, 20.0, 500.0, 300.0),
        ]);
        let rt = consensus.aggregate_retention_time().unwrap();
        // (10*100 + 20*300) / 400 = 17.5
        assert!((rt.value - 17.5).abs() < 1e-9);
    }

    #[test]
    fn feature_map_by_id_roundtrips() {
        let mut map = FeatureMap::new();
        map.push(Feature::new(42, Time::new::<second>(1.0), MassOverCharge::new::<mz_unit>(500.0), 1000.0));
        assert_eq!(map.by_id(42).unwrap(), Some(0));
        assert_eq!(map.by_id(7).unwrap(), None);
    }
}
