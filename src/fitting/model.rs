//! The common fitter surface (§4.4): every elution/isotope model is a tagged variant
//! of [`Model`] implementing [`ElutionModel`], replacing the original deep
//! inheritance hierarchy (`BaseModel -> InterpolationModel -> ...`) with a sum type
//! plus trait, per the redesign notes (§9, `SPEC_FULL.md` §10).

use super::{Egh, Gaussian, Isotope, LogNormal};

/// A single `(position, intensity)` sample emitted by [`ElutionModel::get_samples`],
/// suitable for plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position along the model's axis (RT or m/z).
    pub position: f64,
    /// Model intensity at that position.
    pub intensity: f64,
}

/// The operations every 1-D intensity-vs-position model supports (§4.4).
pub trait ElutionModel {
    /// (Re)compute any internal linear-interpolation cache from the current
    /// parameters. A no-op for models with a closed-form [`ElutionModel::get_intensity`]
    /// (Gaussian, EGH, LogNormal); meaningful for [`Isotope`], whose envelope is
    /// built once from its parameters and then sampled by position.
    fn set_samples(&mut self);

    /// Intensity at `pos`.
    fn get_intensity(&self, pos: f64) -> f64;

    /// The model's center position (e.g. the apex retention time).
    fn get_center(&self) -> f64;

    /// Shift the model by `delta` without resampling (§4.4).
    fn set_offset(&mut self, delta: f64);

    /// Emit samples at the given positions, suitable for plotting.
    fn get_samples(&self, positions: &[f64]) -> Vec<Sample> {
        positions
            .iter()
            .map(|&position| Sample {
                position,
                intensity: self.get_intensity(position),
            })
            .collect()
    }
}

/// One concrete elution/isotope model, dispatched by variant.
#[derive(Debug, Clone)]
pub enum Model {
    /// A symmetric Gaussian peak.
    Gaussian(Gaussian),
    /// An Exponentially-Gaussian Hybrid peak.
    Egh(Egh),
    /// An asymmetric log-normal peak.
    LogNormal(LogNormal),
    /// An isotope envelope.
    Isotope(Isotope),
}

impl ElutionModel for Model {
    fn set_samples(&mut self) {
        match self {
            Self::Gaussian(m) => m.set_samples(),
            Self::Egh(m) => m.set_samples(),
            Self::LogNormal(m) => m.set_samples(),
            Self::Isotope(m) => m.set_samples(),
        }
    }

    fn get_intensity(&self, pos: f64) -> f64 {
        match self {
            Self::Gaussian(m) => m.get_intensity(pos),
            Self::Egh(m) => m.get_intensity(pos),
            Self::LogNormal(m) => m.get_intensity(pos),
            Self::Isotope(m) => m.get_intensity(pos),
        }
    }

    fn get_center(&self) -> f64 {
        match self {
            Self::Gaussian(m) => m.get_center(),
            Self::Egh(m) => m.get_center(),
            Self::LogNormal(m) => m.get_center(),
            Self::Isotope(m) => m.get_center(),
        }
    }

    fn set_offset(&mut self, delta: f64) {
        match self {
            Self::Gaussian(m) => m.set_offset(delta),
            Self::Egh(m) => m.set_offset(delta),
            Self::LogNormal(m) => m.set_offset(delta),
            Self::Isotope(m) => m.set_offset(delta),
        }
    }
}
