//! # Parameter System
//!
//! This module provides the parameter system for likelihood fitting. It
//! allows named parameters with scale factors, optional factor-space bounds,
//! and frozen/free flags to be used in optimization problems.
//!
//! ## Key Features
//!
//! - **Named Parameters**: Work with descriptive parameter names rather than array indices
//! - **Scale Factors**: The optimizer sees `factor = value / scale`, keeping free parameters at comparable magnitudes
//! - **Optional Bounds**: Factor-space bounds, independently optional in each direction
//! - **Stable Ordering**: The free-parameter views preserve insertion order, fixing the optimizer vector layout
//! - **Scoped Restoration**: [`Parameters::restore_values`] guarantees that values and frozen flags are restored on every exit path
//! - **Serialization Support**: Save and load parameter collections with serde
//!
//! ## Example Usage
//!
//! ```rust
//! use likefit::parameters::{Parameter, Parameters};
//!
//! let mut params = Parameters::new();
//!
//! // Add simple parameters
//! params.add_param("index", 2.0).unwrap();
//!
//! // Add parameters with factor-space bounds
//! params.add_param_with_bounds("amplitude", 3.0, Some(0.0), Some(10.0)).unwrap();
//!
//! // Add a parameter with a scale factor
//! params.add(Parameter::with_scale("norm", 3e-12, 1e-12).unwrap()).unwrap();
//!
//! // Freeze a parameter (won't be varied during optimization)
//! params.get_mut("index").unwrap().set_vary(false);
//!
//! // The optimizer works on the free factors, in collection order
//! let factors = params.varying_factors();
//! assert_eq!(factors, vec![3.0, 3.0]);
//! ```

pub mod parameter;
pub mod parameters;

// Re-export key types
pub use parameter::{Parameter, ParameterError};
pub use parameters::{ParameterState, Parameters};
