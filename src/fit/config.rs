//! Configuration options for the fitting entry points.
//!
//! This module defines the configuration structs for point optimization and
//! confidence estimation. Every recognized option is an explicit field with
//! a documented default; there is no dynamic keyword passing.

/// Minimization backend used for point optimization.
///
/// The default is a derivative-free simplex method: objective functions over
/// physical parameters are frequently non-smooth or expensive to
/// differentiate. Further backends hang off this enum without touching the
/// confidence machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeMethod {
    /// Nelder-Mead simplex, bounds enforced by clamping trial points
    NelderMead,
}

impl Default for OptimizeMethod {
    fn default() -> Self {
        OptimizeMethod::NelderMead
    }
}

/// Configuration options for point optimization.
#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Minimization backend. Default: NelderMead
    pub method: OptimizeMethod,

    /// Maximum number of solver iterations. Default: 500
    pub max_iterations: u64,

    /// Tolerance on the standard deviation of the simplex cost values;
    /// the solver terminates once the simplex has collapsed below it.
    /// Default: 1e-10
    pub sd_tolerance: f64,

    /// Relative displacement used to seed the initial simplex around the
    /// starting point. Default: 0.05
    pub initial_step: f64,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            method: OptimizeMethod::default(),
            max_iterations: 500,
            sd_tolerance: 1e-10,
            initial_step: 0.05,
        }
    }
}

/// Configuration options for confidence estimation.
///
/// The endpoint overrides apply to both the upward and the downward search;
/// when unset, each search starts at the target parameter's current factor
/// and ends at its configured bound in the search direction, or at a
/// synthesized excursion when that bound is unset.
#[derive(Debug, Clone)]
pub struct ConfidenceConfig {
    /// Override for the reference endpoint of the bracketing interval.
    /// Default: the target parameter's current factor
    pub a: Option<f64>,

    /// Override for the far endpoint of the bracketing interval.
    /// Default: the factor bound in the search direction, or
    /// `factor ± 100 × stderr / scale` when that bound is unset
    pub b: Option<f64>,

    /// Absolute tolerance on the root position. Default: 2e-12
    pub tol: f64,

    /// Maximum number of root-finder iterations. Default: 100
    pub max_iterations: u64,

    /// Configuration for the profile re-optimizations performed at each
    /// trial factor.
    pub optimize: OptimizeConfig,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            a: None,
            b: None,
            tol: 2e-12,
            max_iterations: 100,
            optimize: OptimizeConfig::default(),
        }
    }
}
