//! Elution-profile and isotope-envelope fitting (C4, §4.4): closed-form peak shapes,
//! a generic Levenberg-Marquardt refiner, and the dummy sum-of-intensities fallback.

mod dummy;
mod egh;
mod gaussian;
#[cfg(feature = "isotopes")]
mod isotope;
mod levenberg_marquardt;
mod lognormal;
mod model;

pub use dummy::fit_dummy;
pub use egh::Egh;
pub use gaussian::Gaussian;
#[cfg(feature = "isotopes")]
pub use isotope::Isotope;
pub use levenberg_marquardt::{fit_curve, levenberg_marquardt, LmConfig, LmResult};
pub use lognormal::LogNormal;
pub use model::{ElutionModel, Model, Sample};

/// A stand-in isotope model for builds without the `isotopes` feature: `Model::Isotope`
/// still type-checks, but constructing one is a logic error since the averagine
/// machinery that computes its distribution is feature-gated out.
#[cfg(not(feature = "isotopes"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope;

#[cfg(not(feature = "isotopes"))]
impl ElutionModel for Isotope {
    fn set_samples(&mut self) {}

    fn get_intensity(&self, _pos: f64) -> f64 {
        0.0
    }

    fn get_center(&self) -> f64 {
        0.0
    }

    fn set_offset(&mut self, _delta: f64) {}
}
