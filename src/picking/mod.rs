//! Peak picking and resampling (C3, §4.3): a linear resampler for profile data onto a
//! uniform grid, and a spline-interpolated "packages" model with a stateful
//! [`Navigator`] cursor.

mod resampler;
mod spline;

pub use resampler::{linear_resample, ResampledBin};
pub use spline::{Navigator, SplineInterpolatedPeaks};
