use thiserror::Error;

/// Error types for the likefit library.
#[derive(Error, Debug)]
pub enum LikeFitError {
    /// Error indicating a mismatch between a factor vector and the free parameters.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error for invalid parameter values or bounds.
    #[error("Invalid parameter value: {0}")]
    InvalidParameter(String),

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Error indicating optimization could not be set up or run.
    #[error("Optimization failed: {0}")]
    OptimizationFailure(String),

    /// Not implemented functionality.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parameter not found.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

// Add From implementation for ParameterError
impl From<crate::parameters::parameter::ParameterError> for LikeFitError {
    fn from(err: crate::parameters::parameter::ParameterError) -> Self {
        LikeFitError::ParameterError(format!("{}", err))
    }
}

/// Result type alias for likefit operations.
pub type Result<T> = std::result::Result<T, LikeFitError>;

/// Extensions for converting from other error types.
impl From<String> for LikeFitError {
    fn from(s: String) -> Self {
        LikeFitError::Other(s)
    }
}

impl From<&str> for LikeFitError {
    fn from(s: &str) -> Self {
        LikeFitError::Other(s.to_string())
    }
}
