//! The modifications database: Unimod-accession-keyed mass deltas.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::system::f64::Mass;

/// A post-translational or chemical modification, keyed by its Unimod accession.
#[derive(Debug, Clone, PartialEq)]
pub struct Modification {
    /// Unimod accession, e.g. `"UniMod:35"` for oxidation.
    pub accession: String,
    /// Human-readable name.
    pub name: String,
    /// Monoisotopic mass delta applied to the residue/terminus it decorates.
    pub mono_mass_delta: Mass,
}

/// The process-wide modifications database, lazily populated with a small built-in set
/// of common modifications (oxidation, carbamidomethylation, phosphorylation,
/// acetylation, deamidation) and extensible with custom entries.
///
/// Same lifecycle contract as [`crate::chemistry::residue::ResidueDb`]: lazily
/// constructed, read-mostly, mutation only outside parallel regions (§5, §9).
pub struct ModificationsDb {
    by_accession: std::sync::RwLock<HashMap<String, Modification>>,
}

static MODIFICATIONS_DB: OnceLock<ModificationsDb> = OnceLock::new();

fn builtin() -> Vec<Modification> {
    use crate::system::mass::dalton;
    vec![
        Modification {
            accession: "UniMod:35".into(),
            name: "Oxidation".into(),
            mono_mass_delta: Mass::new::<dalton>(15.994_915),
        },
        Modification {
            accession: "UniMod:4".into(),
            name: "Carbamidomethyl".into(),
            mono_mass_delta: Mass::new::<dalton>(57.021_464),
        },
        Modification {
            accession: "UniMod:21".into(),
            name: "Phospho".into(),
            mono_mass_delta: Mass::new::<dalton>(79.966_331),
        },
        Modification {
            accession: "UniMod:1".into(),
            name: "Acetyl".into(),
            mono_mass_delta: Mass::new::<dalton>(42.010_565),
        },
        Modification {
            accession: "UniMod:7".into(),
            name: "Deamidated".into(),
            mono_mass_delta: Mass::new::<dalton>(0.984_016),
        },
    ]
}

impl ModificationsDb {
    /// Access the process-wide singleton, constructing it on first call.
    pub fn singleton() -> &'static Self {
        MODIFICATIONS_DB.get_or_init(|| {
            let mut map = HashMap::new();
            for modification in builtin() {
                map.insert(modification.accession.clone(), modification);
            }
            Self {
                by_accession: std::sync::RwLock::new(map),
            }
        })
    }

    /// Look up a modification by its Unimod accession.
    pub fn get(&self, accession: &str) -> Option<Modification> {
        self.by_accession.read().unwrap().get(accession).cloned()
    }

    /// Register a custom modification. See [`ResidueDb::add_custom_residue`] for the
    /// single-threaded-initialization contract this method shares.
    ///
    /// [`ResidueDb::add_custom_residue`]: crate::chemistry::residue::ResidueDb::add_custom_residue
    pub fn add_custom_modification(&self, modification: Modification) {
        self.by_accession
            .write()
            .unwrap()
            .insert(modification.accession.clone(), modification);
    }
}
