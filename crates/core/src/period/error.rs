//! Period lifecycle error types.

use tallix_shared::types::PeriodId;
use thiserror::Error;

use crate::authz::UserRole;
use crate::reports::ReportError;
use crate::store::StoreError;

/// Errors raised by the period lifecycle manager.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Period does not exist in the scope.
    #[error("Period not found: {0}")]
    NotFound(PeriodId),

    /// Period is locked; locked is terminal.
    #[error("Period is locked; no changes allowed")]
    PeriodLocked,

    /// Period is already closed.
    #[error("Period is already closed")]
    AlreadyClosed,

    /// Re-open target must be a closed period.
    #[error("Only closed periods can be re-opened")]
    NotClosed,

    /// The caller's role does not permit the action.
    #[error("Role {role} is not authorized to {action}")]
    NotAuthorized {
        /// The action attempted.
        action: &'static str,
        /// The caller's role.
        role: UserRole,
    },

    /// Re-opening requires an explicit reason.
    #[error("Re-opening a period requires a reason")]
    ReopenRequiresReason,

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The close-readiness trial balance could not be computed.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl PeriodError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "PERIOD_NOT_FOUND",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::AlreadyClosed => "PERIOD_ALREADY_CLOSED",
            Self::NotClosed => "PERIOD_NOT_CLOSED",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::ReopenRequiresReason => "REOPEN_REQUIRES_REASON",
            Self::Store(inner) => inner.error_code(),
            Self::Report(inner) => inner.code(),
        }
    }
}

impl From<PeriodError> for tallix_shared::AppError {
    fn from(error: PeriodError) -> Self {
        let message = error.to_string();
        match error {
            PeriodError::NotFound(_) => Self::NotFound(message),
            PeriodError::NotAuthorized { .. } => Self::Authorization(message),
            PeriodError::ReopenRequiresReason => Self::Validation(message),
            PeriodError::PeriodLocked | PeriodError::AlreadyClosed | PeriodError::NotClosed => {
                Self::State(message)
            }
            PeriodError::Report(inner) => inner.into(),
            PeriodError::Store(StoreError::NotFound(_)) => Self::NotFound(message),
            PeriodError::Store(_) => Self::Internal(message),
        }
    }
}
