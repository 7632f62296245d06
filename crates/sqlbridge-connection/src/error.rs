use crate::types::Capability;
use arrow_schema::ArrowError;
use thiserror::Error;

/// Boxed error raised by a concrete backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for all connection operations
#[derive(Error, Debug)]
pub enum DataError {
    /// The backend does not implement this optional operation
    #[error("Connection does not support {}", .0.description())]
    UnsupportedOperation(Capability),

    /// A query result could not be reconciled with the expected schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Failure surfaced by the backend while executing a query or registering a dataset
    #[error("Backend execution failed: {0}")]
    BackendExecution(#[source] BoxError),

    /// Dataset or entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Arrow compute or conversion error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// DataFusion planning error
    #[cfg(feature = "datafusion")]
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),
}

impl DataError {
    /// Create an unsupported operation error for an optional capability
    pub fn unsupported(capability: Capability) -> Self {
        DataError::UnsupportedOperation(capability)
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        DataError::SchemaMismatch(msg.into())
    }

    /// Wrap a lower-level backend failure without interpreting it
    pub fn backend(err: impl Into<BoxError>) -> Self {
        DataError::BackendExecution(err.into())
    }

    /// Create a "not found" error with custom message
    pub fn not_found(msg: impl Into<String>) -> Self {
        DataError::NotFound(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        DataError::InvalidConfiguration(msg.into())
    }

    /// Whether this error means the backend lacks the requested capability.
    /// Callers branch on this to fall back to another registration path.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DataError::UnsupportedOperation(_))
    }

    /// The capability that was rejected, if this is an unsupported operation error
    pub fn unsupported_capability(&self) -> Option<Capability> {
        match self {
            DataError::UnsupportedOperation(capability) => Some(*capability),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
