//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, the fundamental building block
//! of the parameter system. A parameter carries a physical value together
//! with a scale factor; the optimizer only ever sees the dimensionless
//! `factor = value / scale`. Parameters can be frozen (excluded from
//! optimization) and can carry factor-space bounds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Parameter '{name}' already exists in the collection")]
    DuplicateName { name: String },

    #[error("Parameter '{name}' has invalid scale {scale}; scale must be finite and non-zero")]
    InvalidScale { name: String, scale: f64 },

    #[error("Parameter '{name}' has invalid factor bounds: min {min} > max {max}")]
    InvalidBounds { name: String, min: f64, max: f64 },
}

/// A named scalar parameter for likelihood fitting
///
/// The stored `value` is the physical value; `scale` is a normalization
/// factor chosen so that the optimizer works on `factor = value / scale`,
/// which keeps all free parameters at comparable magnitudes. Bounds are
/// expressed in factor space and are independently optional in each
/// direction (`None` meaning unbounded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    pub name: String,

    /// Current physical value of the parameter
    value: f64,

    /// Normalization factor; the optimizer sees `value / scale`
    scale: f64,

    /// Lower factor-space bound, `None` meaning unbounded below
    factor_min: Option<f64>,

    /// Upper factor-space bound, `None` meaning unbounded above
    factor_max: Option<f64>,

    /// Whether this parameter is varied during optimization
    vary: bool,

    /// Standard error of the parameter, supplied by an external
    /// covariance estimate (used as a search heuristic, never computed here)
    stderr: Option<f64>,
}

impl Parameter {
    /// Create a new free parameter with the given name and value
    ///
    /// The scale defaults to 1.0 and both factor bounds are unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::Parameter;
    ///
    /// let param = Parameter::new("amplitude", 10.0);
    /// assert_eq!(param.name(), "amplitude");
    /// assert_eq!(param.value(), 10.0);
    /// assert_eq!(param.factor(), 10.0);
    /// assert!(param.vary());
    /// ```
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            scale: 1.0,
            factor_min: None,
            factor_max: None,
            vary: true,
            stderr: None,
        }
    }

    /// Create a new parameter with an explicit scale
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `value` - Initial physical value
    /// * `scale` - Normalization factor; must be finite and non-zero
    ///
    /// # Examples
    ///
    /// ```
    /// use likefit::parameters::Parameter;
    ///
    /// let param = Parameter::with_scale("norm", 3e-12, 1e-12).unwrap();
    /// assert_eq!(param.factor(), 3.0);
    /// ```
    pub fn with_scale(name: &str, value: f64, scale: f64) -> Result<Self, ParameterError> {
        if !scale.is_finite() || scale == 0.0 {
            return Err(ParameterError::InvalidScale {
                name: name.to_string(),
                scale,
            });
        }

        let mut param = Self::new(name, value);
        param.scale = scale;
        Ok(param)
    }

    /// Create a new parameter with factor-space bounds
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `value` - Initial physical value
    /// * `factor_min` - Lower factor bound, or `None` for unbounded
    /// * `factor_max` - Upper factor bound, or `None` for unbounded
    ///
    /// # Returns
    ///
    /// A new free parameter, or an error if both bounds are set and
    /// `factor_min > factor_max`.
    pub fn with_factor_bounds(
        name: &str,
        value: f64,
        factor_min: Option<f64>,
        factor_max: Option<f64>,
    ) -> Result<Self, ParameterError> {
        let mut param = Self::new(name, value);
        param.set_factor_bounds(factor_min, factor_max)?;
        Ok(param)
    }

    /// Get the current physical value of the parameter
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the physical value of the parameter
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Get the normalization factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the normalization factor
    ///
    /// The physical value is kept fixed, so the factor changes accordingly.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the scale is finite and non-zero
    pub fn set_scale(&mut self, scale: f64) -> Result<(), ParameterError> {
        if !scale.is_finite() || scale == 0.0 {
            return Err(ParameterError::InvalidScale {
                name: self.name.clone(),
                scale,
            });
        }

        self.scale = scale;
        Ok(())
    }

    /// Get the factor, the value in optimizer-native units (`value / scale`)
    pub fn factor(&self) -> f64 {
        self.value / self.scale
    }

    /// Set the factor, updating the physical value (`value = factor * scale`)
    pub fn set_factor(&mut self, factor: f64) {
        self.value = factor * self.scale;
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the lower factor bound, `None` meaning unbounded below
    pub fn factor_min(&self) -> Option<f64> {
        self.factor_min
    }

    /// Get the upper factor bound, `None` meaning unbounded above
    pub fn factor_max(&self) -> Option<f64> {
        self.factor_max
    }

    /// Set the factor-space bounds
    ///
    /// Each bound is independently optional. Non-finite bound values are
    /// treated as unset.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the bounds were set, or an error if both are finite and
    /// `factor_min > factor_max`
    pub fn set_factor_bounds(
        &mut self,
        factor_min: Option<f64>,
        factor_max: Option<f64>,
    ) -> Result<(), ParameterError> {
        let factor_min = factor_min.filter(|v| v.is_finite());
        let factor_max = factor_max.filter(|v| v.is_finite());

        if let (Some(min), Some(max)) = (factor_min, factor_max) {
            if min > max {
                return Err(ParameterError::InvalidBounds {
                    name: self.name.clone(),
                    min,
                    max,
                });
            }
        }

        self.factor_min = factor_min;
        self.factor_max = factor_max;
        Ok(())
    }

    /// Check if the parameter is varied during optimization
    pub fn vary(&self) -> bool {
        self.vary
    }

    /// Set whether the parameter is varied during optimization
    ///
    /// A parameter with `vary = false` is frozen: it keeps its current value
    /// while the optimizer works on the remaining free parameters.
    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    /// Get the standard error of the parameter (if available)
    pub fn stderr(&self) -> Option<f64> {
        self.stderr
    }

    /// Set the standard error of the parameter
    ///
    /// The standard error is supplied by an external covariance estimate and
    /// is consumed here only to synthesize search intervals for unbounded
    /// parameters.
    pub fn set_stderr(&mut self, stderr: Option<f64>) {
        self.stderr = stderr;
    }
}
