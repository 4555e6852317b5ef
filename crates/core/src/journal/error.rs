//! Journal validation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating a journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Journal must have at least 2 lines.
    #[error("Journal must have at least 2 lines")]
    InsufficientLines,

    /// Journal is not balanced (debits != credits).
    #[error("Journal is not balanced. Debit: {debits}, Credit: {credits}")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Line amounts cannot be negative.
    #[error("Line {line} has a negative amount")]
    NegativeAmount {
        /// Zero-based line index.
        line: usize,
    },

    /// A line must carry either a debit or a credit, not both.
    #[error("Line {line} sets both debit and credit")]
    BothSidesSet {
        /// Zero-based line index.
        line: usize,
    },

    /// A line must carry a non-zero amount.
    #[error("Line {line} has neither a debit nor a credit")]
    EmptyLine {
        /// Zero-based line index.
        line: usize,
    },
}

impl JournalError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::BothSidesSet { .. } => "BOTH_SIDES_SET",
            Self::EmptyLine { .. } => "EMPTY_LINE",
        }
    }
}
