//! Typed physical quantities used throughout the engine, built on `uom`.
//!
//! Following the teacher crate's pattern: every quantity that flows between modules
//! (mass, charge, time, mass-over-charge, dimensionless ratio) is a `uom` quantity
//! rather than a bare `f64`, so unit mistakes (minutes vs seconds, Th vs Da) are caught
//! at the type level.

use uom::system;

system! {
    quantities: Q {
        mass: dalton, M;
        charge: e, C;
        time: second, T;
        mass_over_charge: mz, MZ;
        ratio: fraction, R;
    }
    units: U {
        mod mass::Mass {
            millidalton: prefix!(milli); "mDa", "millidalton", "millidaltons";
            dalton: prefix!(none); "Da", "dalton", "daltons";
            kilodalton: prefix!(kilo); "kDa", "kilodalton", "kilodaltons";
            megadalton: prefix!(mega); "MDa", "megadalton", "megadaltons";
        }
        mod charge::Charge {
            e: prefix!(none); "e", "elementary charge", "elementary charges";
        }
        mod time::Time {
            nanosecond: prefix!(nano); "ns", "nanosecond", "nanoseconds";
            microsecond: prefix!(micro); "µs", "microsecond", "microseconds";
            millisecond: prefix!(milli); "ms", "millisecond", "milliseconds";
            second: prefix!(none); "s", "second", "seconds";
            minute: 60.0; "min", "minute", "minutes";
            hour: 3_600.0; "h", "hour", "hours";
        }
        mod mass_over_charge::MassOverCharge {
            mz: prefix!(none); "Th", "thomson", "thomson";
        }
        mod ratio::Ratio {
            fraction: prefix!(none); "", "fraction", "fractions";
            percent: 1.0e-2; "%", "percent", "percent";
            promille: 1.0e-3; "‰", "promille", "promille";
            ppm: 1.0e-6; "ppm", "part per million", "parts per million";
            ppb: 1.0e-9; "ppb", "part per billion", "parts per billion";
        }
    }
}

pub mod f64 {
    ::uom::system!(f64, crate::system);
}

pub mod usize {
    ::uom::system!(usize, crate::system);
}

pub use f64::{Mass, MassOverCharge, Ratio, Time};

/// Construct a `Mass` value directly in Dalton.
pub fn da(value: f64) -> Mass {
    Mass::new::<mass::dalton>(value)
}

impl MassOverCharge {
    /// The ppm difference between `self` (the reference) and `other`.
    pub fn ppm(&self, other: Self) -> Ratio {
        Ratio::new::<ratio::fraction>(((other.value - self.value) / self.value).abs()
            * 1.0)
    }
}

impl Mass {
    /// The ppm difference between `self` (the reference) and `other`.
    pub fn ppm(&self, other: Self) -> Ratio {
        Ratio::new::<ratio::fraction>(((other.value - self.value) / self.value).abs())
    }

    /// The signed ppm difference between `self` (the reference) and `other`.
    pub fn signed_ppm(&self, other: Self) -> Ratio {
        Ratio::new::<ratio::fraction>((other.value - self.value) / self.value)
    }
}

/// A newtype wrapping `f64::Time` that provides a total order (via `total_cmp`) so it
/// can be used as a sort/hash key, matching the teacher's `OrderedMass`/`OrderedTime`.
#[derive(Debug, Clone, Copy)]
pub struct OrderedTime(pub Time);

impl OrderedTime {
    /// Zero retention time.
    pub fn zero() -> Self {
        Self(Time::new::<time::second>(0.0))
    }

    /// Unwrap into the underlying `Time`.
    pub fn into_inner(self) -> Time {
        self.0
    }
}

impl PartialEq for OrderedTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.value.total_cmp(&other.0.value) == std::cmp::Ordering::Equal
    }
}
impl Eq for OrderedTime {}
impl PartialOrd for OrderedTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.value.total_cmp(&other.0.value)
    }
}
