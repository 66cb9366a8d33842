//! `Precursor`/`Product` (§3): selected mass windows, with activation and optional
//! ion-mobility metadata.

use crate::system::f64::{Mass, MassOverCharge, Time};
use crate::util::RangeMobility;

/// The closed set of fragmentation activation methods (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Activation {
    Cid,
    Hcd,
    Etd,
    EthcD,
    EtciD,
    Ecd,
    Pqd,
    Psd,
}

/// Ion-mobility metadata attached to a precursor or product: a drift time with unit,
/// plus optional window offsets either side of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IonMobility {
    /// Drift time. Unit is tracked by the caller's choice of `Time`-compatible
    /// construction (ms) or, for field-asymmetric mobility, a raw `f64` in V·s·cm⁻²;
    /// this engine only models the time-domain case, the common one in mzML.
    pub drift_time: Time,
    /// Lower drift-time window offset.
    pub lower_offset: Time,
    /// Upper drift-time window offset.
    pub upper_offset: Time,
}

impl IonMobility {
    /// The mobility range implied by `drift_time ± offsets`, for use with
    /// [`crate::util::passes_mobility_filter`].
    pub fn as_range(&self) -> RangeMobility {
        RangeMobility::new(
            (self.drift_time - self.lower_offset).value,
            (self.drift_time + self.upper_offset).value,
        )
    }
}

/// A selected precursor (MS1 isolation window feeding an MS2 scan) or product
/// (isolation window on the product side, used by SRM/PRM) mass window.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationWindow {
    /// Target m/z of the isolation window center.
    pub target_mz: MassOverCharge,
    /// Precursor charge state; `0` means unknown.
    pub charge: u8,
    /// Lower isolation offset from `target_mz`; always `>= 0`.
    pub isolation_lower: MassOverCharge,
    /// Upper isolation offset from `target_mz`; always `>= 0`.
    pub isolation_upper: MassOverCharge,
    /// Activation methods applied, if this is a precursor (empty for products).
    pub activation: Vec<Activation>,
    /// Activation energy, in whatever unit the activation method conventionally uses
    /// (eV for CID/HCD); opaque to this engine.
    pub activation_energy: Option<f64>,
    /// Ion mobility metadata, if present.
    pub ion_mobility: Option<IonMobility>,
}

impl IsolationWindow {
    /// The `[lower, upper]` m/z bounds of this isolation window.
    pub fn bounds(&self) -> (MassOverCharge, MassOverCharge) {
        (
            self.target_mz - self.isolation_lower,
            self.target_mz + self.isolation_upper,
        )
    }
}

/// Precursor metadata on an MS2 (or higher) spectrum.
pub type Precursor = IsolationWindow;
/// Product metadata on a chromatogram (SRM/PRM transition).
pub type Product = IsolationWindow;

/// Precursor target mass for a neutral-mass computation: `(target_mz - proton_mass) *
/// charge` for a singly protonated ion series. Kept as a free function since it is
/// needed by both the fragment index (C5) and the extraction pipeline (C6).
pub fn neutral_mass_from_mz(mz: MassOverCharge, charge: u8) -> Option<Mass> {
    use crate::system::mass::dalton;
    const PROTON_MASS: f64 = 1.007_276_466_88;
    if charge == 0 {
        return None;
    }
    Some(Mass::new::<dalton>(
        (mz.value - PROTON_MASS) * f64::from(charge),
    ))
}
