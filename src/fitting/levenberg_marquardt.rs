//! A generic Levenberg-Marquardt non-linear least squares optimizer (§4.4), used by
//! every closed-form fitter to refine its parameters against a sampled profile.
//!
//! No Levenberg-Marquardt crate is available in this workspace's dependency stack, so
//! this is hand-written over `nalgebra::{DMatrix, DVector}` with a finite-difference
//! Jacobian, in the classic damping-factor accept/reject loop.

use nalgebra::{DMatrix, DVector};

/// Tuning knobs for [`levenberg_marquardt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmConfig {
    pub max_iterations: usize,
    pub initial_lambda: f64,
    pub lambda_up: f64,
    pub lambda_down: f64,
    /// Stop once the relative reduction in residual norm falls below this.
    pub residual_tolerance: f64,
    /// Finite-difference step used to approximate the Jacobian.
    pub finite_difference_step: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            residual_tolerance: 1e-10,
            finite_difference_step: 1e-6,
        }
    }
}

/// The outcome of a Levenberg-Marquardt run.
#[derive(Debug, Clone, PartialEq)]
pub struct LmResult {
    pub parameters: Vec<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn residual_norm(residuals: &DVector<f64>) -> f64 {
    residuals.norm()
}

fn jacobian<F>(params: &DVector<f64>, residuals_fn: &F, step: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let base = residuals_fn(params.as_slice());
    let m = base.len();
    let n = params.len();
    let mut jac = DMatrix::<f64>::zeros(m, n);
    for j in 0..n {
        let mut perturbed = params.clone();
        let h = step.max(step * perturbed[j].abs());
        perturbed[j] += h;
        let perturbed_residuals = residuals_fn(perturbed.as_slice());
        for i in 0..m {
            jac[(i, j)] = (perturbed_residuals[i] - base[i]) / h;
        }
    }
    jac
}

/// Minimize `residuals_fn(params)` in the least-squares sense, starting from
/// `initial_params`.
///
/// `residuals_fn` must return one residual per sample, in a fixed order, for any
/// parameter vector of the same length as `initial_params`. On repeated Jacobian
/// singularities the current best estimate is returned with `converged == false`,
/// matching the "recover locally, mark the feature `quality = -1.0`" policy (§7)
/// applied by callers rather than by the optimizer itself.
pub fn levenberg_marquardt<F>(
    initial_params: &[f64],
    config: &LmConfig,
    residuals_fn: F,
) -> LmResult
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut params = DVector::from_row_slice(initial_params);
    let mut residuals = DVector::from_vec(residuals_fn(params.as_slice()));
    let mut current_norm = residual_norm(&residuals);
    let mut lambda = config.initial_lambda;
    let n = params.len();

    for iteration in 0..config.max_iterations {
        let jac = jacobian(&params, &residuals_fn, config.finite_difference_step);
        let jt = jac.transpose();
        let jtj = &jt * &jac;
        let jtr = &jt * &residuals;

        let mut accepted = false;
        for _ in 0..config.max_iterations {
            let damped = &jtj + DMatrix::<f64>::identity(n, n) * lambda;
            let step = match damped.clone().lu().solve(&jtr) {
                Some(s) => s,
                None => {
                    lambda *= config.lambda_up;
                    continue;
                }
            };
            let candidate = &params - &step;
            let candidate_residuals = DVector::from_vec(residuals_fn(candidate.as_slice()));
            let candidate_norm = residual_norm(&candidate_residuals);

            if candidate_norm < current_norm {
                let improvement = (current_norm - candidate_norm) / current_norm.max(1e-300);
                params = candidate;
                residuals = candidate_residuals;
                current_norm = candidate_norm;
                lambda *= config.lambda_down;
                accepted = true;
                if improvement < config.residual_tolerance {
                    return LmResult {
                        parameters: params.as_slice().to_vec(),
                        residual_norm: current_norm,
                        iterations: iteration + 1,
                        converged: true,
                    };
                }
                break;
            }
            lambda *= config.lambda_up;
            if lambda > 1e30 {
                break;
            }
        }

        if !accepted {
            return LmResult {
                parameters: params.as_slice().to_vec(),
                residual_norm: current_norm,
                iterations: iteration + 1,
                converged: false,
            };
        }
    }

    LmResult {
        parameters: params.as_slice().to_vec(),
        residual_norm: current_norm,
        iterations: config.max_iterations,
        converged: false,
    }
}

/// Fit `predict_fn(params, position)` to `samples` by least squares, returning the
/// refined parameters alongside the raw [`LmResult`].
pub fn fit_curve<F>(
    samples: &[(f64, f64)],
    initial_params: &[f64],
    config: &LmConfig,
    predict_fn: F,
) -> LmResult
where
    F: Fn(&[f64], f64) -> f64,
{
    let residuals_fn = |params: &[f64]| -> Vec<f64> {
        samples
            .iter()
            .map(|&(pos, intensity)| predict_fn(params, pos) - intensity)
            .collect()
    };
    levenberg_marquardt(initial_params, config, residuals_fn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_gaussian_to_noise_free_samples() {
        let true_mean = 12.0;
        let true_variance = 3.0;
        let true_scaling = 80.0;
        let samples: Vec<(f64, f64)> = (0..40)
            .map(|i| {
                let x = i as f64 * 0.5;
                let d = x - true_mean;
                let y = true_scaling * (-(d * d) / (2.0 * true_variance)).exp();
                (x, y)
            })
            .collect();

        let predict = |params: &[f64], pos: f64| {
            let d = pos - params[0];
            params[2] * (-(d * d) / (2.0 * params[1])).exp()
        };

        let result = fit_curve(&samples, &[10.0, 2.0, 60.0], &LmConfig::default(), predict);
        assert!(result.converged);
        assert!((result.parameters[0] - true_mean).abs() < 1e-2);
        assert!((result.parameters[2] - true_scaling).abs() < 1e-1);
    }

    #[test]
    fn residual_norm_never_increases_across_the_run() {
        let samples = vec![(0.0, 1.0), (1.0, 2.0), (2.0, 1.5), (3.0, 0.5)];
        let predict = |params: &[f64], pos: f64| params[0] + params[1] * pos;
        let result = fit_curve(&samples, &[0.0, 0.0], &LmConfig::default(), predict);
        let final_residuals: Vec<f64> = samples
            .iter()
            .map(|&(pos, intensity)| predict(&result.parameters, pos) - intensity)
            .collect();
        let final_norm = DVector::from_vec(final_residuals).norm();
        assert!((final_norm - result.residual_norm).abs() < 1e-6);
    }
}
