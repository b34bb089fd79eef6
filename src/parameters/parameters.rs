//! Parameters collection implementation
//!
//! This module provides the Parameters struct, an ordered collection of
//! uniquely named Parameter objects. The insertion order is significant: it
//! defines the layout of the flat factor vector exchanged with the
//! optimizer, so the free-parameter views returned here are stable across
//! calls as long as the collection is not modified.

use crate::error::{LikeFitError, Result};
use crate::parameters::parameter::{Parameter, ParameterError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An ordered collection of named parameters
///
/// Unlike a plain map, the collection preserves insertion order, which fixes
/// the correspondence between parameter names and positions in the
/// optimizer's factor vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    /// Parameters in insertion order
    params: Vec<Parameter>,
}

/// Snapshot of the mutable state of every parameter in a collection
///
/// Captures value and vary flag per parameter, in collection order. Produced
/// by [`Parameters::snapshot`] and consumed by [`Parameters::restore`].
#[derive(Debug, Clone)]
pub struct ParameterState {
    values: Vec<(f64, bool)>,
}

impl Parameters {
    /// Create a new empty parameters collection
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::Parameters;
    ///
    /// let params = Parameters::new();
    /// assert_eq!(params.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter to the collection
    ///
    /// # Returns
    ///
    /// `Ok(())` if the parameter was added, or an error if a parameter with
    /// the same name already exists
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::{Parameter, Parameters};
    ///
    /// let mut params = Parameters::new();
    /// params.add(Parameter::new("amplitude", 10.0)).unwrap();
    /// assert_eq!(params.len(), 1);
    /// ```
    pub fn add(&mut self, param: Parameter) -> std::result::Result<(), ParameterError> {
        if self.contains(param.name()) {
            return Err(ParameterError::DuplicateName {
                name: param.name().to_string(),
            });
        }

        self.params.push(param);
        Ok(())
    }

    /// Add a new free parameter with the given name and value
    pub fn add_param(&mut self, name: &str, value: f64) -> std::result::Result<(), ParameterError> {
        self.add(Parameter::new(name, value))
    }

    /// Add a new free parameter with factor-space bounds
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `value` - Initial physical value
    /// * `factor_min` - Lower factor bound, or `None` for unbounded
    /// * `factor_max` - Upper factor bound, or `None` for unbounded
    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        factor_min: Option<f64>,
        factor_max: Option<f64>,
    ) -> std::result::Result<(), ParameterError> {
        self.add(Parameter::with_factor_bounds(
            name, value, factor_min, factor_max,
        )?)
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Get a mutable reference to a parameter by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name() == name)
    }

    /// Get the position of a parameter in the collection
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name() == name)
    }

    /// Check if the collection contains a parameter with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name() == name)
    }

    /// Remove a parameter from the collection
    ///
    /// # Returns
    ///
    /// The removed parameter, or `None` if no such parameter exists
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let idx = self.index_of(name)?;
        Some(self.params.remove(idx))
    }

    /// Get the number of parameters in the collection
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get the names of all parameters, in collection order
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    /// Get an iterator over the parameters, in collection order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Get the free parameters, in collection order
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.add_param("amplitude", 10.0).unwrap();
    /// params.add_param("center", 5.0).unwrap();
    /// params.get_mut("center").unwrap().set_vary(false);
    ///
    /// let varying = params.varying();
    /// assert_eq!(varying.len(), 1);
    /// assert_eq!(varying[0].name(), "amplitude");
    /// ```
    pub fn varying(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.vary()).collect()
    }

    /// Get the frozen parameters, in collection order
    pub fn fixed(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| !p.vary()).collect()
    }

    /// Get the factors of the free parameters, in collection order
    pub fn varying_factors(&self) -> Vec<f64> {
        self.params
            .iter()
            .filter(|p| p.vary())
            .map(|p| p.factor())
            .collect()
    }

    /// Get the factor-space bound pairs of the free parameters
    ///
    /// Each pair is `(factor_min, factor_max)` with `None` meaning unbounded
    /// in that direction, in the same order as [`Parameters::varying`].
    pub fn varying_factor_bounds(&self) -> Vec<(Option<f64>, Option<f64>)> {
        self.params
            .iter()
            .filter(|p| p.vary())
            .map(|p| (p.factor_min(), p.factor_max()))
            .collect()
    }

    /// Write a flat factor vector back into the free parameters
    ///
    /// The vector must have exactly one entry per free parameter, in the
    /// order of [`Parameters::varying`].
    ///
    /// # Returns
    ///
    /// `Ok(())`, or a dimension-mismatch error if the length differs from
    /// the number of free parameters
    pub fn set_varying_factors(&mut self, factors: &[f64]) -> Result<()> {
        let n_vary = self.params.iter().filter(|p| p.vary()).count();
        if factors.len() != n_vary {
            return Err(LikeFitError::DimensionMismatch(format!(
                "expected {} factors for the free parameters, got {}",
                n_vary,
                factors.len()
            )));
        }

        for (param, &factor) in self
            .params
            .iter_mut()
            .filter(|p| p.vary())
            .zip(factors.iter())
        {
            param.set_factor(factor);
        }

        Ok(())
    }

    /// Get the externally supplied standard error of a parameter
    ///
    /// Returns 0.0 when the parameter has no stored error estimate (or does
    /// not exist); callers treat a vanishing error as "no usable estimate".
    pub fn error(&self, name: &str) -> f64 {
        self.get(name).and_then(|p| p.stderr()).unwrap_or(0.0)
    }

    /// Capture the current value and vary flag of every parameter
    pub fn snapshot(&self) -> ParameterState {
        ParameterState {
            values: self.params.iter().map(|p| (p.value(), p.vary())).collect(),
        }
    }

    /// Restore a previously captured state
    ///
    /// Values and vary flags are written back positionally; the collection
    /// must not have been resized since the snapshot was taken.
    pub fn restore(&mut self, state: &ParameterState) {
        for (param, &(value, vary)) in self.params.iter_mut().zip(state.values.iter()) {
            param.set_value(value);
            param.set_vary(vary);
        }
    }

    /// Run a closure with guaranteed state restoration
    ///
    /// Snapshots every parameter's value and vary flag, runs the body, and
    /// restores the snapshot before returning, on the error path as well as
    /// the success path. Code inside the body is free to freeze parameters
    /// and overwrite values without leaking those changes to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.add_param("amplitude", 10.0).unwrap();
    ///
    /// params.restore_values(|params| {
    ///     let param = params.get_mut("amplitude").unwrap();
    ///     param.set_value(-3.0);
    ///     param.set_vary(false);
    /// });
    ///
    /// assert_eq!(params.get("amplitude").unwrap().value(), 10.0);
    /// assert!(params.get("amplitude").unwrap().vary());
    /// ```
    pub fn restore_values<T, F>(&mut self, body: F) -> T
    where
        F: FnOnce(&mut Parameters) -> T,
    {
        let state = self.snapshot();
        let result = body(self);
        self.restore(&state);
        result
    }

    /// Save parameters to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Save parameters to a JSON string
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load parameters from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    /// Load parameters from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Parameters = serde_json::from_str(json)?;
        Ok(params)
    }
}
