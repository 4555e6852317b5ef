//! FX ingestion error types.
//!
//! Every ingestion failure is an external-dependency error and therefore
//! retryable; the caller decides whether to proceed with a stale rate or
//! abort.

use std::fmt;

/// Errors raised while ingesting exchange rates from configured sources.
//
// NOTE: `Display`/`Error` are implemented by hand rather than via
// `#[derive(thiserror::Error)]`. These variants carry a field named `source`
// (the rate source's name), and thiserror reserves that field name for the
// error-source chain — it would try to treat the `String` as a
// `std::error::Error`, which does not compile. The hand-written impls below
// reproduce exactly what the derive would emit for the format strings.
#[derive(Debug)]
pub enum FxIngestError {
    /// A source exhausted its retries without a successful response.
    SourceUnavailable {
        /// The source name.
        source: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// A source attempt exceeded its configured timeout.
    Timeout {
        /// The source name.
        source: String,
        /// The configured timeout.
        timeout_secs: u64,
    },

    /// A source responded with an unusable rate.
    InvalidRate {
        /// The source name.
        source: String,
    },

    /// Every configured source (primary and fallback) exhausted its retries.
    AllSourcesExhausted {
        /// Number of sources attempted.
        sources_tried: usize,
    },
}

impl fmt::Display for FxIngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { source, attempts } => write!(
                f,
                "Rate source '{source}' unavailable after {attempts} attempts"
            ),
            Self::Timeout {
                source,
                timeout_secs,
            } => write!(f, "Rate source '{source}' timed out after {timeout_secs}s"),
            Self::InvalidRate { source } => {
                write!(f, "Rate source '{source}' returned an invalid rate")
            }
            Self::AllSourcesExhausted { sources_tried } => {
                write!(f, "All {sources_tried} configured rate sources exhausted")
            }
        }
    }
}

impl std::error::Error for FxIngestError {}

impl FxIngestError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "FX_SOURCE_UNAVAILABLE",
            Self::Timeout { .. } => "FX_SOURCE_TIMEOUT",
            Self::InvalidRate { .. } => "FX_INVALID_RATE",
            Self::AllSourcesExhausted { .. } => "FX_ALL_SOURCES_EXHAUSTED",
        }
    }

    /// FX ingestion failures are always retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        true
    }
}
