//! # likefit
//!
//! `likefit` is a Rust library for likelihood-based parameter estimation
//! over named, bounded parameters: point optimization and asymmetric
//! confidence-interval estimation via profile-likelihood bracketing.
//!
//! The library provides:
//! - A parameter system with scale factors, optional bounds and frozen flags
//! - A point optimizer driving a derivative-free simplex method
//! - Profile-likelihood confidence intervals with bracketed root finding
//! - Structured reporting of expected numerical failures (non-convergence,
//!   non-bracketing intervals) instead of errors
//!
//! ## Basic Usage
//!
//! ```
//! use likefit::parameters::Parameters;
//! use likefit::{confidence, optimize, ConfidenceConfig, OptimizeConfig};
//!
//! let mut params = Parameters::new();
//! params.add_param("x", 0.0).unwrap();
//! params.get_mut("x").unwrap().set_stderr(Some(1.0));
//!
//! let objective = |params: &Parameters| -> likefit::Result<f64> {
//!     let x = params.get("x").unwrap().factor();
//!     Ok((x - 3.0).powi(2))
//! };
//!
//! // Point estimate
//! let fit = optimize(&mut params, &objective, &OptimizeConfig::default()).unwrap();
//! params.set_varying_factors(&fit.factors).unwrap();
//!
//! // Asymmetric 1-sigma interval around the best fit
//! let interval = confidence(&mut params, "x", &objective, 1.0, &ConfidenceConfig::default()).unwrap();
//! assert!(interval.success_errn && interval.success_errp);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

// Likelihood adapter
pub mod likelihood;

// Fitting entry points
pub mod fit;

// Re-exports for convenience
pub use error::{LikeFitError, Result};

pub use fit::{
    confidence, confidence_all, covariance, optimize, ConfidenceConfig, ConfidenceResult,
    OptimizeConfig, OptimizeMethod, OptimizeResult,
};

pub use likelihood::{Likelihood, ObjectiveFunction};

pub use parameters::{Parameter, Parameters};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
