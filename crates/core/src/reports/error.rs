//! Report generation error types.
//!
//! Integrity findings (an out-of-balance trial balance, a broken accounting
//! equation) are NOT errors: they are surfaced inside report results so the
//! caller or auditor can investigate. Errors here are only the conditions
//! that prevent computing a report at all.

use chrono::NaiveDate;
use tallix_shared::types::AccountId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while generating a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested window is inverted.
    #[error("Invalid report window: {from} is after {to}")]
    InvalidWindow {
        /// Window start.
        from: NaiveDate,
        /// Window end.
        to: NaiveDate,
    },

    /// A posted journal line references an account missing from the chart.
    #[error("Posted line references unknown account {0}")]
    UnknownAccount(AccountId),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReportError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidWindow { .. } => "INVALID_REPORT_WINDOW",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::Store(inner) => inner.error_code(),
        }
    }
}

impl From<ReportError> for tallix_shared::AppError {
    fn from(error: ReportError) -> Self {
        let message = error.to_string();
        match error {
            ReportError::InvalidWindow { .. } => Self::Validation(message),
            ReportError::UnknownAccount(_) => Self::Integrity(message),
            ReportError::Store(StoreError::NotFound(_)) => Self::NotFound(message),
            ReportError::Store(_) => Self::Internal(message),
        }
    }
}
