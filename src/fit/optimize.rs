//! Point optimization over the free parameters.
//!
//! Drives an external minimization routine over the free-parameter factors,
//! respecting bounds, and reports the best-fit factors plus convergence
//! metadata. Non-convergence is not an error: it is surfaced through the
//! `success` flag with the solver's own termination message.

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use std::fmt;

use crate::error::{LikeFitError, Result};
use crate::fit::config::{OptimizeConfig, OptimizeMethod};
use crate::likelihood::{Likelihood, ObjectiveFunction};
use crate::parameters::Parameters;

/// Result of a point optimization.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    /// Best-fit factors, one per free parameter in set order
    pub factors: Vec<f64>,

    /// Whether the solver reported convergence
    pub success: bool,

    /// The solver's termination message
    pub message: String,

    /// Number of objective evaluations
    pub nfev: usize,
}

impl fmt::Display for OptimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Function evaluations: {}", self.nfev)?;
        writeln!(f, "  Factors: {:?}", self.factors)?;
        Ok(())
    }
}

/// Clamp a trial factor vector into the per-parameter bounds.
///
/// Bounds are independently optional per side; an absent bound leaves that
/// direction unconstrained.
fn clamp_factors(factors: &[f64], bounds: &[(Option<f64>, Option<f64>)]) -> Vec<f64> {
    factors
        .iter()
        .zip(bounds.iter())
        .map(|(&v, &(lo, hi))| {
            v.clamp(
                lo.unwrap_or(f64::NEG_INFINITY),
                hi.unwrap_or(f64::INFINITY),
            )
        })
        .collect()
}

/// Seed the initial simplex around a starting point.
///
/// Each coordinate is displaced relatively; a small absolute step stands in
/// for coordinates that start at exactly zero.
fn initial_simplex(start: &[f64], step: f64) -> Vec<Vec<f64>> {
    const ZERO_STEP: f64 = 0.00025;

    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());

    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        if vertex[i] != 0.0 {
            vertex[i] *= 1.0 + step;
        } else {
            vertex[i] = ZERO_STEP;
        }
        simplex.push(vertex);
    }

    simplex
}

/// Adapter presenting the bounded likelihood to the solver.
struct BoundedCost<'a, 'b, F: ?Sized> {
    likelihood: &'b Likelihood<'a, F>,
    bounds: &'b [(Option<f64>, Option<f64>)],
}

impl<'a, 'b, F: ObjectiveFunction + ?Sized> CostFunction for BoundedCost<'a, 'b, F> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, factors: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        let clamped = clamp_factors(factors, self.bounds);
        self.likelihood
            .eval_factors(&clamped)
            .map_err(|e| argmin::core::Error::msg(e.to_string()))
    }
}

/// Minimize an objective function over the free parameters of a set.
///
/// Builds the free-parameter factor vector and the corresponding bound
/// pairs, runs the configured minimization backend, and returns the best
/// factors found together with convergence metadata.
///
/// The parameter set is mutated as a byproduct of evaluation: after return
/// it reflects the last evaluated point, not necessarily the best one. Use
/// [`Parameters::set_varying_factors`] with the returned factors to move the
/// set to the best-fit point, or wrap the call in
/// [`Parameters::restore_values`] to discard the exploration entirely.
///
/// # Arguments
///
/// * `parameters` - The parameter set; at least one parameter must be free
/// * `function` - The objective function to minimize
/// * `config` - Solver selection and termination options
///
/// # Returns
///
/// An [`OptimizeResult`], or an error if the free-parameter set is empty or
/// an objective evaluation fails. Non-convergence is reported through
/// `success = false`, never as an error.
///
/// # Examples
///
/// ```
/// use likefit::parameters::Parameters;
/// use likefit::{optimize, OptimizeConfig};
///
/// let mut params = Parameters::new();
/// params.add_param("x", 0.0).unwrap();
///
/// let objective = |params: &Parameters| -> likefit::Result<f64> {
///     let x = params.get("x").unwrap().factor();
///     Ok((x - 3.0).powi(2))
/// };
///
/// let result = optimize(&mut params, &objective, &OptimizeConfig::default()).unwrap();
/// assert!(result.success);
/// assert!((result.factors[0] - 3.0).abs() < 1e-4);
/// ```
pub fn optimize<F>(
    parameters: &mut Parameters,
    function: &F,
    config: &OptimizeConfig,
) -> Result<OptimizeResult>
where
    F: ObjectiveFunction + ?Sized,
{
    let start = parameters.varying_factors();
    if start.is_empty() {
        return Err(LikeFitError::InvalidInput(
            "no free parameters to optimize; unfreeze at least one parameter".to_string(),
        ));
    }

    let bounds = parameters.varying_factor_bounds();
    let likelihood = Likelihood::new(function, parameters);

    match config.method {
        OptimizeMethod::NelderMead => run_nelder_mead(&likelihood, &start, &bounds, config),
    }
}

fn run_nelder_mead<F: ObjectiveFunction + ?Sized>(
    likelihood: &Likelihood<'_, F>,
    start: &[f64],
    bounds: &[(Option<f64>, Option<f64>)],
    config: &OptimizeConfig,
) -> Result<OptimizeResult> {
    let problem = BoundedCost { likelihood, bounds };

    let solver = NelderMead::new(initial_simplex(start, config.initial_step))
        .with_sd_tolerance(config.sd_tolerance)
        .map_err(|e| {
            LikeFitError::OptimizationFailure(format!("invalid solver configuration: {}", e))
        })?;

    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(config.max_iterations))
        .run()
        .map_err(|e| LikeFitError::OptimizationFailure(e.to_string()))?;

    let state = res.state();
    let best = state.get_best_param().ok_or_else(|| {
        LikeFitError::OptimizationFailure("solver returned no best point".to_string())
    })?;
    let factors = clamp_factors(best, bounds);

    let termination = state.get_termination_status();
    let success = matches!(
        termination,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );
    let message = termination.to_string();

    Ok(OptimizeResult {
        factors,
        success,
        message,
        nfev: likelihood.nfev(),
    })
}
