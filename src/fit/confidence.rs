//! Profile-likelihood confidence estimation.
//!
//! For one target parameter, the profile objective is obtained by freezing
//! the target at a trial factor and re-optimizing every other free
//! parameter. The confidence bound at `sigma` is the factor offset at which
//! the profile objective rises `sigma²` above the reference optimum; it is
//! located with a bracketed root-finder between the current factor and the
//! parameter's bound in the search direction.
//!
//! Expected numerical failures (a bracketing interval that does not contain
//! the crossing, or a root run that hits its iteration cap) are reported
//! through per-side `success` flags and messages, never as errors,
//! so scans over many parameters can continue past individual failures.

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;
use ndarray::Array2;
use rayon::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{LikeFitError, Result};
use crate::fit::config::{ConfidenceConfig, OptimizeConfig};
use crate::fit::optimize::optimize;
use crate::likelihood::ObjectiveFunction;
use crate::parameters::{Parameter, Parameters};

/// Excursion applied when a search direction has no configured bound:
/// the far endpoint becomes `factor ± 100 × stderr / scale`. A heuristic,
/// not a principled bound; override through [`ConfidenceConfig::b`] when it
/// does not reach the crossing.
const FALLBACK_EXCURSION: f64 = 1e2;

const SUCCESS_MESSAGE: &str = "Confidence terminated successfully.";

const BRACKET_MESSAGE: &str = "Confidence estimation failed, because bracketing interval \
     does not contain a unique solution. Try setting the interval by hand.";

/// Result of an asymmetric confidence estimation.
///
/// The two sides are estimated independently; inspect `success_errn` and
/// `success_errp` before trusting the corresponding distance. A failed side
/// still carries the best available estimate in its distance field.
#[derive(Debug, Clone)]
pub struct ConfidenceResult {
    /// Distance from the reference factor to the lower bound
    pub errn: f64,

    /// Distance from the reference factor to the upper bound
    pub errp: f64,

    /// Whether the downward search converged on a crossing
    pub success_errn: bool,

    /// Whether the upward search converged on a crossing
    pub success_errp: bool,

    /// Termination message of the downward search
    pub message_errn: String,

    /// Termination message of the upward search
    pub message_errp: String,

    /// Profile evaluations spent on the downward search
    pub nfev_errn: usize,

    /// Profile evaluations spent on the upward search
    pub nfev_errp: usize,

    /// Objective value at the reference optimum
    pub loglike_ref: f64,
}

impl fmt::Display for ConfidenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confidence Result:")?;
        writeln!(f, "  errn: {:.6e} (success: {})", self.errn, self.success_errn)?;
        writeln!(f, "  errp: {:.6e} (success: {})", self.errp, self.success_errp)?;
        writeln!(f, "  Message (errn): {}", self.message_errn)?;
        writeln!(f, "  Message (errp): {}", self.message_errp)?;
        writeln!(
            f,
            "  Profile evaluations: {} + {}",
            self.nfev_errn, self.nfev_errp
        )?;
        writeln!(f, "  Reference objective: {:.6e}", self.loglike_ref)?;
        Ok(())
    }
}

/// One-sided search outcome, merged pairwise into a [`ConfidenceResult`].
struct ConfidenceBound {
    err: f64,
    success: bool,
    message: String,
    nfev: usize,
    loglike_ref: f64,
}

/// Profile test-statistic difference for one frozen target parameter.
///
/// Evaluating at a trial factor sets the target, re-optimizes the remaining
/// free parameters, and returns the objective offset from the reference
/// optimum minus the target difference `sigma²`. The root of this function
/// in factor space is the confidence bound.
struct TsDifference<'a, F: ?Sized> {
    function: &'a F,
    parameters: RefCell<&'a mut Parameters>,
    target: String,
    ts_diff: f64,
    loglike_ref: f64,
    optimize_config: &'a OptimizeConfig,
    nfev: Arc<AtomicUsize>,
}

impl<'a, F: ObjectiveFunction + ?Sized> TsDifference<'a, F> {
    fn eval(&self, factor: f64) -> Result<f64> {
        self.nfev.fetch_add(1, Ordering::Relaxed);

        let mut guard = self.parameters.borrow_mut();
        let params: &mut Parameters = &mut **guard;

        params
            .get_mut(&self.target)
            .ok_or_else(|| LikeFitError::ParameterNotFound(self.target.clone()))?
            .set_factor(factor);

        // Profile step: re-optimize whatever is still free, then measure the
        // objective at the best point found. With the target as the only
        // free parameter there is nothing left to optimize.
        if !params.varying().is_empty() {
            let fit = optimize(params, self.function, self.optimize_config)?;
            params.set_varying_factors(&fit.factors)?;
        }

        let value = self.function.eval(params)?;
        Ok(value - self.loglike_ref - self.ts_diff)
    }
}

impl<'a, F: ObjectiveFunction + ?Sized> CostFunction for TsDifference<'a, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, factor: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        self.eval(*factor)
            .map_err(|e| argmin::core::Error::msg(e.to_string()))
    }
}

/// Far endpoint of the bracketing interval for one search direction.
///
/// The configured factor bound wins; an unbounded direction falls back to
/// the stderr-based excursion from the current factor.
fn default_endpoint(target: &Parameter, error: f64, upper: bool) -> f64 {
    let bound = if upper {
        target.factor_max()
    } else {
        target.factor_min()
    };

    match bound {
        Some(bound) => bound,
        None => {
            let excursion = FALLBACK_EXCURSION * error / target.scale();
            if upper {
                target.factor() + excursion
            } else {
                target.factor() - excursion
            }
        }
    }
}

/// Run one bracketed search for the threshold crossing.
///
/// The caller is responsible for wrapping this in
/// [`Parameters::restore_values`]; the search freezes the target and leaves
/// the set wherever the last profile evaluation put it.
fn bracket_search<F>(
    parameters: &mut Parameters,
    name: &str,
    function: &F,
    sigma: f64,
    upper: bool,
    config: &ConfidenceConfig,
) -> Result<ConfidenceBound>
where
    F: ObjectiveFunction + ?Sized,
{
    // Reference objective at the caller's starting state, before freezing
    let loglike_ref = function.eval(parameters)?;

    let error = parameters.error(name);
    let target = parameters
        .get(name)
        .ok_or_else(|| LikeFitError::ParameterNotFound(name.to_string()))?;

    let a = config.a.unwrap_or_else(|| target.factor());
    let b = config
        .b
        .unwrap_or_else(|| default_endpoint(target, error, upper));

    parameters
        .get_mut(name)
        .ok_or_else(|| LikeFitError::ParameterNotFound(name.to_string()))?
        .set_vary(false);

    let nfev = Arc::new(AtomicUsize::new(0));
    let ts_diff = TsDifference {
        function,
        parameters: RefCell::new(parameters),
        target: name.to_string(),
        ts_diff: sigma * sigma,
        loglike_ref,
        optimize_config: &config.optimize,
        nfev: Arc::clone(&nfev),
    };

    // Bracket precondition: the root-finder needs opposite signs at the
    // endpoints. Same-signed values are an expected numerical outcome, not
    // an error; report them structurally with the excursion width as the
    // best available distance estimate.
    let g_a = ts_diff.eval(a)?;
    let g_b = ts_diff.eval(b)?;
    if g_a * g_b > 0.0 {
        return Ok(ConfidenceBound {
            err: (b - a).abs(),
            success: false,
            message: BRACKET_MESSAGE.to_string(),
            nfev: nfev.load(Ordering::Relaxed),
            loglike_ref,
        });
    }

    let solver = BrentRoot::new(a.min(b), a.max(b), config.tol);
    let res = Executor::new(ts_diff, solver)
        .configure(|state| state.max_iters(config.max_iterations))
        .run()
        .map_err(|e| LikeFitError::OptimizationFailure(e.to_string()))?;

    let state = res.state();
    let root = state.get_best_param().copied().ok_or_else(|| {
        LikeFitError::OptimizationFailure("root-finder returned no estimate".to_string())
    })?;

    let termination = state.get_termination_status();
    let success = matches!(
        termination,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let message = if success {
        SUCCESS_MESSAGE.to_string()
    } else {
        termination.to_string()
    };

    Ok(ConfidenceBound {
        err: (root - a).abs(),
        success,
        message,
        nfev: nfev.load(Ordering::Relaxed),
        loglike_ref,
    })
}

/// Estimate the asymmetric confidence interval of one parameter.
///
/// Runs two independent bracketed searches around the reference optimum,
/// one downward for `errn` and one upward for `errp`, each inside its own
/// scoped state capture, so neither search sees the other's perturbations
/// and the caller's parameter values and frozen flags are untouched after
/// the call, on success and on failure alike.
///
/// The parameter set should be at its best-fit state when calling: the
/// reference objective value is taken from the current state.
///
/// # Arguments
///
/// * `parameters` - The parameter set at its best-fit state
/// * `name` - Name of the target parameter
/// * `function` - The objective function
/// * `sigma` - Confidence level; the profile crossing is at `sigma²`
/// * `config` - Search interval overrides and solver options
///
/// # Returns
///
/// A [`ConfidenceResult`] carrying both distances, per-side success flags
/// and messages, and the reference objective value. Bracketing failures and
/// root-finder non-convergence are reported in the result, not as errors.
///
/// # Examples
///
/// ```
/// use likefit::parameters::Parameters;
/// use likefit::{confidence, ConfidenceConfig};
///
/// let mut params = Parameters::new();
/// params.add_param("x", 3.0).unwrap();
/// params.get_mut("x").unwrap().set_stderr(Some(1.0));
///
/// let objective = |params: &Parameters| -> likefit::Result<f64> {
///     let x = params.get("x").unwrap().factor();
///     Ok((x - 3.0).powi(2))
/// };
///
/// let result = confidence(&mut params, "x", &objective, 1.0, &ConfidenceConfig::default()).unwrap();
/// assert!(result.success_errn && result.success_errp);
/// assert!((result.errn - 1.0).abs() < 1e-6);
/// assert!((result.errp - 1.0).abs() < 1e-6);
/// ```
pub fn confidence<F>(
    parameters: &mut Parameters,
    name: &str,
    function: &F,
    sigma: f64,
    config: &ConfidenceConfig,
) -> Result<ConfidenceResult>
where
    F: ObjectiveFunction + ?Sized,
{
    if !parameters.contains(name) {
        return Err(LikeFitError::ParameterNotFound(name.to_string()));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LikeFitError::InvalidInput(format!(
            "sigma must be positive and finite, got {}",
            sigma
        )));
    }

    let errn = parameters
        .restore_values(|params| bracket_search(params, name, function, sigma, false, config))?;

    let errp = parameters
        .restore_values(|params| bracket_search(params, name, function, sigma, true, config))?;

    Ok(ConfidenceResult {
        errn: errn.err,
        errp: errp.err,
        success_errn: errn.success,
        success_errp: errp.success,
        message_errn: errn.message,
        message_errp: errp.message,
        nfev_errn: errn.nfev,
        nfev_errp: errp.nfev,
        loglike_ref: errn.loglike_ref,
    })
}

/// Estimate confidence intervals for every free parameter in parallel.
///
/// Each parameter is processed on its own clone of the parameter set, so the
/// searches share no mutable state and the input set is never touched.
///
/// # Returns
///
/// A map from parameter name to its [`ConfidenceResult`]. The first hard
/// error (bad configuration, failed objective evaluation) aborts the scan;
/// per-parameter numerical failures land in the individual results.
pub fn confidence_all<F>(
    parameters: &Parameters,
    function: &F,
    sigma: f64,
    config: &ConfidenceConfig,
) -> Result<HashMap<String, ConfidenceResult>>
where
    F: ObjectiveFunction + Sync,
{
    let names: Vec<String> = parameters
        .varying()
        .iter()
        .map(|p| p.name().to_string())
        .collect();

    names
        .par_iter()
        .map(|name| {
            let mut local = parameters.clone();
            confidence(&mut local, name, function, sigma, config).map(|r| (name.clone(), r))
        })
        .collect()
}

/// Estimate the parameter covariance matrix at the best-fit point.
///
/// # Errors
///
/// Always fails with [`LikeFitError::NotImplemented`]; declared so that a
/// Hessian-based estimate can slot in without an API break.
// TODO: implement via a finite-difference Hessian of the objective
pub fn covariance<F>(_parameters: &Parameters, _function: &F) -> Result<Array2<f64>>
where
    F: ObjectiveFunction + ?Sized,
{
    Err(LikeFitError::NotImplemented(
        "covariance estimation from the objective Hessian".to_string(),
    ))
}
