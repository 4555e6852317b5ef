//! Application-wide error types.
//!
//! Every user-visible failure carries a stable machine-readable code plus a
//! human-readable message. Module-level errors in the core crate convert
//! into this taxonomy at the boundary.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Kinds, not concrete failures: validation, authorization, state,
/// external-dependency (retryable) and integrity. Integrity errors are
/// surfaced, never masked.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation (line totals, currency mismatch, unbalanced journal).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Role lacks permission for the action or approval threshold.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Operation conflicts with current state (period not open, control-account
    /// posting, duplicate number).
    #[error("State error: {0}")]
    State(String),

    /// External dependency unreachable; always retryable.
    #[error("External dependency error: {0}")]
    ExternalDependency(String),

    /// Accounting invariant violated (trial balance out of balance,
    /// assets != liabilities + equity).
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate idempotency key with different payload).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authorization(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::State(_) | Self::Integrity(_) => 422,
            Self::ExternalDependency(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::State(_) => "STATE_ERROR",
            Self::ExternalDependency(_) => "EXTERNAL_DEPENDENCY_ERROR",
            Self::Integrity(_) => "INTEGRITY_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalDependency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Authorization(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::State(String::new()).status_code(), 422);
        assert_eq!(AppError::Integrity(String::new()).status_code(), 422);
        assert_eq!(AppError::ExternalDependency(String::new()).status_code(), 502);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Integrity(String::new()).error_code(),
            "INTEGRITY_ERROR"
        );
        assert_eq!(
            AppError::ExternalDependency(String::new()).error_code(),
            "EXTERNAL_DEPENDENCY_ERROR"
        );
    }

    #[test]
    fn test_only_external_dependency_is_retryable() {
        assert!(AppError::ExternalDependency(String::new()).is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
        assert!(!AppError::Integrity(String::new()).is_retryable());
        assert!(!AppError::State(String::new()).is_retryable());
    }
}
