//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use flix_core::DomainError;

/// Service layer error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Domain rule violation or collaborator failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request failed input validation
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The wrapped domain error, if any
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Validation(_) => None,
        }
    }

    /// Get the error code for callers
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn is_validation(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_validation(),
            Self::Validation(_) => true,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.domain().is_some_and(DomainError::is_retryable)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
