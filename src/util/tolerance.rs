//! Mass/mz tolerances, adapted near-verbatim from the teacher's `tolerance.rs`.

use crate::system::f64::{Mass, MassOverCharge};

/// A tolerance window, either relative (ppm) or absolute, generic over the quantity it
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance<T> {
    /// A relative tolerance expressed in parts per million.
    Ppm(f64),
    /// An absolute tolerance in the same unit as the bounded quantity.
    Abs(T),
}

impl Tolerance<Mass> {
    /// The `[low, high]` bounds around `center`.
    pub fn bounds(&self, center: Mass) -> (Mass, Mass) {
        match self {
            Self::Ppm(ppm) => {
                let delta = Mass::new::<crate::system::mass::dalton>(
                    center.value * ppm * 1e-6,
                );
                (center - delta, center + delta)
            }
            Self::Abs(abs) => (center - *abs, center + *abs),
        }
    }
}

impl Tolerance<MassOverCharge> {
    /// The `[low, high]` bounds around `center`.
    pub fn bounds(&self, center: MassOverCharge) -> (MassOverCharge, MassOverCharge) {
        match self {
            Self::Ppm(ppm) => {
                let delta = MassOverCharge::new::<crate::system::mass_over_charge::mz>(
                    center.value * ppm * 1e-6,
                );
                (center - delta, center + delta)
            }
            Self::Abs(abs) => (center - *abs, center + *abs),
        }
    }
}

impl std::str::FromStr for Tolerance<Mass> {
    type Err = crate::error::Error;

    /// Parse e.g. `"10 ppm"` or `"0.01 da"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, unit) = s
            .split_once(char::is_whitespace)
            .ok_or_else(|| tolerance_parse_error(s))?;
        let number: f64 = number.parse().map_err(|_| tolerance_parse_error(s))?;
        match unit.trim().to_ascii_lowercase().as_str() {
            "ppm" => Ok(Self::Ppm(number)),
            "da" | "dalton" => Ok(Self::Abs(Mass::new::<crate::system::mass::dalton>(number))),
            _ => Err(tolerance_parse_error(s)),
        }
    }
}

fn tolerance_parse_error(s: &str) -> crate::error::Error {
    crate::error::Error::new(
        crate::error::ErrorKind::ParseError,
        format!("could not parse tolerance: '{s}'"),
        crate::error::Context::none(),
    )
}

/// Checks whether a value lies within a [`Tolerance`] of a reference value.
pub trait WithinTolerance<A> {
    /// Whether `value` is within `self` of `reference`.
    fn within(&self, reference: &A, value: &A) -> bool;
}

impl WithinTolerance<Mass> for Tolerance<Mass> {
    fn within(&self, reference: &Mass, value: &Mass) -> bool {
        let (low, high) = self.bounds(*reference);
        *value >= low && *value <= high
    }
}

impl WithinTolerance<MassOverCharge> for Tolerance<MassOverCharge> {
    fn within(&self, reference: &MassOverCharge, value: &MassOverCharge) -> bool {
        let (low, high) = self.bounds(*reference);
        *value >= low && *value <= high
    }
}
