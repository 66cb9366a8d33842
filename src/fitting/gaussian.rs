//! The Gaussian elution model (§4.4): `(mean, variance, scaling)`.

use super::model::ElutionModel;

/// A symmetric Gaussian peak: `scaling * exp(-(x - mean)^2 / (2 * variance))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    /// Apex position.
    pub mean: f64,
    /// Peak variance (width squared).
    pub variance: f64,
    /// Peak height at the apex.
    pub scaling: f64,
}

impl Gaussian {
    /// Build a Gaussian model from its three parameters.
    pub fn new(mean: f64, variance: f64, scaling: f64) -> Self {
        Self { mean, variance, scaling }
    }
}

impl ElutionModel for Gaussian {
    fn set_samples(&mut self) {}

    fn get_intensity(&self, pos: f64) -> f64 {
        if self.variance <= 0.0 {
            return if pos == self.mean { self.scaling } else { 0.0 };
        }
        let d = pos - self.mean;
        self.scaling * (-(d * d) / (2.0 * self.variance)).exp()
    }

    fn get_center(&self) -> f64 {
        self.mean
    }

    fn set_offset(&mut self, delta: f64) {
        self.mean += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_equals_scaling() {
        let model = Gaussian::new(10.0, 2.0, 100.0);
        assert!((model.get_intensity(10.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn symmetric_around_mean() {
        let model = Gaussian::new(10.0, 2.0, 100.0);
        assert!((model.get_intensity(9.0) - model.get_intensity(11.0)).abs() < 1e-9);
    }

    #[test]
    fn set_offset_shifts_the_center() {
        let mut model = Gaussian::new(10.0, 2.0, 100.0);
        model.set_offset(5.0);
        assert!((model.get_center() - 15.0).abs() < 1e-9);
    }
}
