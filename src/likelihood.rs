//! Likelihood adapter between the optimizer and the parameter system
//!
//! The optimizer works on a flat vector of factors; the objective function
//! works on a named [`Parameters`] collection. The [`Likelihood`] adapter
//! translates between the two: it writes each trial factor into the
//! corresponding free parameter, in collection order, and evaluates the
//! objective against the whole set.
//!
//! Evaluation mutates the parameter set as a byproduct. Callers that need a
//! pristine set afterwards wrap the computation in
//! [`Parameters::restore_values`].

use crate::error::Result;
use crate::parameters::Parameters;
use std::cell::{Cell, RefCell};

/// Objective function over a parameter set
///
/// Any `Fn(&Parameters) -> Result<f64>` closure implements this trait, so a
/// fit statistic (e.g. a negative log-likelihood) can be passed directly:
///
/// ```
/// use likefit::likelihood::ObjectiveFunction;
/// use likefit::parameters::Parameters;
///
/// let stat = |params: &Parameters| -> likefit::Result<f64> {
///     let x = params.get("x").unwrap().factor();
///     Ok((x - 3.0).powi(2))
/// };
///
/// let mut params = Parameters::new();
/// params.add_param("x", 1.0).unwrap();
/// assert_eq!(stat.eval(&params).unwrap(), 4.0);
/// ```
///
/// Implementations must be deterministic for a fixed parameter state.
pub trait ObjectiveFunction {
    /// Evaluate the objective for the current state of the parameter set
    fn eval(&self, parameters: &Parameters) -> Result<f64>;
}

impl<F> ObjectiveFunction for F
where
    F: Fn(&Parameters) -> Result<f64>,
{
    fn eval(&self, parameters: &Parameters) -> Result<f64> {
        self(parameters)
    }
}

/// Adapter evaluating an objective function from a flat factor vector
///
/// Holds references to the objective function and the parameter set, and
/// counts evaluations. No other state.
pub struct Likelihood<'a, F: ?Sized> {
    function: &'a F,
    parameters: RefCell<&'a mut Parameters>,
    nfev: Cell<usize>,
}

impl<'a, F: ObjectiveFunction + ?Sized> Likelihood<'a, F> {
    /// Create an adapter for the given function and parameter set
    pub fn new(function: &'a F, parameters: &'a mut Parameters) -> Self {
        Self {
            function,
            parameters: RefCell::new(parameters),
            nfev: Cell::new(0),
        }
    }

    /// Evaluate the objective at the given free-parameter factors
    ///
    /// Writes each factor into the corresponding free parameter (in the
    /// set's order) and evaluates the objective against the whole set. The
    /// vector length must equal the number of free parameters; a mismatch
    /// fails with a dimension error before anything is written.
    pub fn eval_factors(&self, factors: &[f64]) -> Result<f64> {
        let mut params = self.parameters.borrow_mut();
        params.set_varying_factors(factors)?;
        self.nfev.set(self.nfev.get() + 1);
        self.function.eval(&**params)
    }

    /// Number of objective evaluations performed through this adapter
    pub fn nfev(&self) -> usize {
        self.nfev.get()
    }
}
