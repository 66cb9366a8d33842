//! The isotope envelope model (§4.4): a sum of Gaussian-smoothed isotope peaks at
//! `center + i * isotope_distance / charge`, weighted by a theoretical isotope
//! distribution computed from an averagine elemental composition.
//!
//! Grounded on the teacher's `isotopes.rs`: per-element isotope distributions are
//! computed via binomial convolution (`probability::distribution::{Binomial,
//! Discrete}`) and combined across elements by polynomial (outer-sum) convolution
//! using `ndarray`. Since this crate's sequence model has no `MolecularFormula` type,
//! the element counts are approximated from a neutral mass via the standard averagine
//! ratios (Senko et al., 1995) rather than read off an exact formula.

use ndarray::Array1;
use probability::distribution::{Binomial, Discrete};

use super::model::ElutionModel;

/// One averagine element: `(atoms per 111.1254 Da, isotope shift, isotope probability)`.
/// Carbon, nitrogen and oxygen are modeled with a single heavy isotope one mass unit
/// above the light one; sulfur's (33S, 34S) pair is approximated as two independent
/// single-isotope shifts layered onto the same binomial machinery.
struct AveragineElement {
    atoms_per_unit: f64,
    shift: usize,
    probability: f64,
}

const AVERAGINE_UNIT_MASS: f64 = 111.1254;
const AVERAGINE_ELEMENTS: [AveragineElement; 5] = [
    AveragineElement { atoms_per_unit: 4.9384, shift: 1, probability: 0.0107 }, // 13C
    AveragineElement { atoms_per_unit: 7.7583, shift: 1, probability: 0.000115 }, // D
    AveragineElement { atoms_per_unit: 1.3577, shift: 1, probability: 0.00364 }, // 15N
    AveragineElement { atoms_per_unit: 1.4773, shift: 1, probability: 0.00038 }, // 17O
    AveragineElement { atoms_per_unit: 0.0417, shift: 1, probability: 0.0425 }, // 34S
];

/// Convolve two probability-mass arrays (full polynomial convolution).
fn convolve(a: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    let mut out = Array1::<f64>::zeros(a.len() + b.len() - 1);
    for (i, &av) in a.iter().enumerate() {
        if av == 0.0 {
            continue;
        }
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}

/// The binomial isotope distribution for `n` atoms of an element whose heavy isotope
/// has natural abundance `p`, shifted by `shift` mass units, truncated to `max_k`
/// heavy substitutions.
fn element_distribution(n: f64, p: f64, shift: usize, max_k: usize) -> Array1<f64> {
    let n = n.round().max(0.0) as usize;
    let binomial = Binomial::new(n, p);
    let mut light_heavy = Array1::<f64>::zeros(max_k + 1);
    for k in 0..=max_k.min(n) {
        light_heavy[k] = binomial.mass(k);
    }
    if shift <= 1 {
        return light_heavy;
    }
    // Interleave zeros for a heavy isotope that sits more than one mass unit above
    // the light one.
    let mut spread = Array1::<f64>::zeros((max_k + 1) * shift - (shift - 1));
    for (k, &v) in light_heavy.iter().enumerate() {
        spread[k * shift] = v;
    }
    spread
}

/// Approximate elemental isotope distribution for a peptide of the given
/// monoisotopic neutral mass, via the averagine model.
fn averagine_distribution(neutral_mass: f64, max_isotope: usize) -> Vec<f64> {
    let units = (neutral_mass / AVERAGINE_UNIT_MASS).max(0.0);
    let mut distribution = Array1::from_elem(1, 1.0);
    for element in &AVERAGINE_ELEMENTS {
        let atoms = units * element.atoms_per_unit;
        let element_dist =
            element_distribution(atoms, element.probability, element.shift, max_isotope);
        distribution = convolve(&distribution, &element_dist);
    }
    let mut values: Vec<f64> = distribution.into_iter().take(max_isotope + 1).collect();
    while values.len() < max_isotope + 1 {
        values.push(0.0);
    }
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in &mut values {
            *v /= total;
        }
    }
    values
}

/// A theoretical isotope envelope, smoothed onto a continuous m/z or mass axis.
#[derive(Debug, Clone)]
pub struct Isotope {
    /// Monoisotopic apex position (m/z, or neutral mass if `charge == 0`).
    pub center: f64,
    /// Charge state; isotope spacing in m/z is `isotope_distance / charge.max(1)`.
    pub charge: u32,
    /// Spacing between adjacent isotopes in neutral-mass units (≈ 1.0033548).
    pub isotope_distance: f64,
    /// Gaussian smoothing width applied to each isotope component.
    pub isotope_stdev: f64,
    /// Overall area scaling.
    pub scaling: f64,
    /// Neutral monoisotopic mass used to derive the averagine composition.
    pub neutral_mass: f64,
    /// Number of isotopes to model beyond the monoisotopic peak.
    pub max_isotope: usize,
    /// Isotopes whose relative abundance falls below this fraction of the tallest
    /// isotope are trimmed from the right tail (§4.4).
    pub trim_right_cutoff: f64,
    distribution: Vec<f64>,
}

impl Isotope {
    /// Build an isotope envelope and compute its distribution immediately.
    pub fn new(
        center: f64,
        charge: u32,
        neutral_mass: f64,
        isotope_distance: f64,
        isotope_stdev: f64,
        scaling: f64,
        max_isotope: usize,
        trim_right_cutoff: f64,
    ) -> Self {
        let mut model = Self {
            center,
            charge,
            isotope_distance,
            isotope_stdev,
            scaling,
            neutral_mass,
            max_isotope,
            trim_right_cutoff,
            distribution: Vec::new(),
        };
        model.set_samples();
        model
    }

    fn mz_spacing(&self) -> f64 {
        self.isotope_distance / (self.charge.max(1) as f64)
    }
}

impl ElutionModel for Isotope {
    fn set_samples(&mut self) {
        let mut distribution = averagine_distribution(self.neutral_mass, self.max_isotope);
        let peak = distribution.iter().cloned().fold(0.0_f64, f64::max);
        if peak > 0.0 {
            while distribution.len() > 1
                && *distribution.last().unwrap() < self.trim_right_cutoff * peak
            {
                distribution.pop();
            }
        }
        self.distribution = distribution;
    }

    fn get_intensity(&self, pos: f64) -> f64 {
        if self.isotope_stdev <= 0.0 {
            return 0.0;
        }
        let spacing = self.mz_spacing();
        let variance = self.isotope_stdev * self.isotope_stdev;
        let mut total = 0.0;
        for (i, &weight) in self.distribution.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let isotope_center = self.center + i as f64 * spacing;
            let d = pos - isotope_center;
            total += weight * (-(d * d) / (2.0 * variance)).exp();
        }
        self.scaling * total
    }

    fn get_center(&self) -> f64 {
        self.center
    }

    fn set_offset(&mut self, delta: f64) {
        self.center += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_sums_to_one() {
        let model = Isotope::new(500.0, 1, 2000.0, 1.0033548, 0.05, 1.0, 5, 0.0);
        let sum: f64 = model.distribution.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn heavier_peptides_have_a_more_prominent_second_isotope() {
        let light = averagine_distribution(500.0, 3);
        let heavy = averagine_distribution(5000.0, 3);
        assert!(heavy[1] / heavy[0] > light[1] / light[0]);
    }

    #[test]
    fn monoisotopic_apex_is_near_the_expected_height() {
        let model = Isotope::new(500.0, 2, 1500.0, 1.0033548, 0.02, 10.0, 4, 0.0);
        let apex = model.get_intensity(500.0);
        assert!(apex > 0.0);
        assert!(apex <= 10.0 + 1e-6);
    }

    #[test]
    fn trim_right_cutoff_shortens_the_distribution() {
        let untrimmed = Isotope::new(500.0, 1, 1000.0, 1.0033548, 0.05, 1.0, 8, 0.0);
        let trimmed = Isotope::new(500.0, 1, 1000.0, 1.0033548, 0.05, 1.0, 8, 0.2);
        assert!(trimmed.distribution.len() <= untrimmed.distribution.len());
    }
}
