//! Posting engine error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallix_shared::types::Currency;
use thiserror::Error;

use crate::authz::UserRole;
use crate::coa::CoaError;
use crate::journal::JournalError;
use crate::period::PeriodStatus;
use crate::posting::documents::DocumentStatus;
use crate::store::StoreError;

/// Errors raised while posting a document.
///
/// Every variant carries a stable machine code via [`PostingError::code`];
/// no failure on the posting path is logged and swallowed.
#[derive(Debug, Error)]
pub enum PostingError {
    /// A caller-supplied header total disagrees with the line-derived value
    /// beyond rounding tolerance (1 minor unit).
    #[error("Header {field} {supplied} disagrees with line-derived value {computed}")]
    LineTotalMismatch {
        /// Which header field disagreed.
        field: &'static str,
        /// The caller-supplied value.
        supplied: Decimal,
        /// The value recomputed from lines.
        computed: Decimal,
    },

    /// Document status does not allow posting.
    #[error("Document cannot be posted from status {status:?}")]
    DocumentNotPostable {
        /// The document's current status.
        status: DocumentStatus,
    },

    /// Chart-of-accounts validation failed.
    #[error(transparent)]
    Coa(#[from] CoaError),

    /// The candidate journal violated a double-entry invariant.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// No fiscal period covers the posting date.
    #[error("No fiscal period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// The target period does not accept postings.
    #[error("Fiscal period is {status}, posting rejected")]
    PeriodNotOpen {
        /// The period's current status.
        status: PeriodStatus,
    },

    /// The caller's role does not permit the action.
    #[error("Role {role} is not authorized to {action}")]
    NotAuthorized {
        /// The action attempted.
        action: &'static str,
        /// The caller's role.
        role: UserRole,
    },

    /// No applicable exchange rate for a foreign-currency posting.
    #[error("No exchange rate found for {from} to {to} on {date}")]
    MissingExchangeRate {
        /// Document currency.
        from: Currency,
        /// Base currency.
        to: Currency,
        /// Posting date.
        date: NaiveDate,
    },

    /// Taxed lines exist but no tax account is configured on the document.
    #[error("Document carries tax but no tax account is configured")]
    MissingTaxAccount,

    /// A caller-supplied document number is already taken.
    #[error("Document number {0} already exists")]
    DuplicateDocumentNumber(String),

    /// A payment must allocate to at least one document.
    #[error("Payment has no allocations")]
    EmptyAllocations,

    /// An allocation amount must be positive.
    #[error("Allocation amount must be positive")]
    ZeroAllocation,

    /// Allocation target kind does not match the payment type.
    #[error("Allocation target does not match payment type (IN settles invoices, OUT settles bills)")]
    AllocationTargetMismatch,

    /// Allocation references a document that does not exist.
    #[error("Allocation target not found")]
    AllocationTargetNotFound,

    /// Allocation references a document that is not posted.
    #[error("Allocation target cannot accept payments from status {status:?}")]
    AllocationTargetNotPostable {
        /// The target document's status.
        status: DocumentStatus,
    },

    /// Allocation currency differs from the payment currency.
    #[error("Allocation target is denominated in {document}, payment in {payment}")]
    AllocationCurrencyMismatch {
        /// The target document's currency.
        document: Currency,
        /// The payment's currency.
        payment: Currency,
    },

    /// Allocation exceeds the target's outstanding balance.
    #[error("Allocation {allocated} exceeds outstanding balance {outstanding}")]
    AllocationExceedsOutstanding {
        /// The allocated amount.
        allocated: Decimal,
        /// The document's outstanding balance.
        outstanding: Decimal,
    },

    /// The persistence layer failed; nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PostingError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::LineTotalMismatch { .. } => "LINE_TOTAL_MISMATCH",
            Self::DocumentNotPostable { .. } => "DOCUMENT_NOT_POSTABLE",
            Self::Coa(inner) => inner.error_code(),
            Self::Journal(inner) => inner.error_code(),
            Self::NoPeriodForDate(_) => "NO_PERIOD_FOR_DATE",
            Self::PeriodNotOpen { .. } => "PERIOD_NOT_OPEN",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::MissingExchangeRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::MissingTaxAccount => "MISSING_TAX_ACCOUNT",
            Self::DuplicateDocumentNumber(_) => "DUPLICATE_DOCUMENT_NUMBER",
            Self::EmptyAllocations => "EMPTY_ALLOCATIONS",
            Self::ZeroAllocation => "ZERO_ALLOCATION",
            Self::AllocationTargetMismatch => "ALLOCATION_TARGET_MISMATCH",
            Self::AllocationTargetNotFound => "ALLOCATION_TARGET_NOT_FOUND",
            Self::AllocationTargetNotPostable { .. } => "ALLOCATION_TARGET_NOT_POSTABLE",
            Self::AllocationCurrencyMismatch { .. } => "ALLOCATION_CURRENCY_MISMATCH",
            Self::AllocationExceedsOutstanding { .. } => "ALLOCATION_EXCEEDS_OUTSTANDING",
            Self::Store(inner) => inner.error_code(),
        }
    }
}

impl From<PostingError> for tallix_shared::AppError {
    fn from(error: PostingError) -> Self {
        let message = error.to_string();
        match error {
            PostingError::LineTotalMismatch { .. }
            | PostingError::Journal(_)
            | PostingError::EmptyAllocations
            | PostingError::ZeroAllocation
            | PostingError::AllocationTargetMismatch
            | PostingError::AllocationCurrencyMismatch { .. }
            | PostingError::MissingTaxAccount => Self::Validation(message),
            PostingError::NotAuthorized { .. } => Self::Authorization(message),
            PostingError::Coa(_)
            | PostingError::DocumentNotPostable { .. }
            | PostingError::PeriodNotOpen { .. }
            | PostingError::NoPeriodForDate(_)
            | PostingError::DuplicateDocumentNumber(_)
            | PostingError::AllocationTargetNotPostable { .. }
            | PostingError::AllocationExceedsOutstanding { .. } => Self::State(message),
            PostingError::MissingExchangeRate { .. } => Self::ExternalDependency(message),
            PostingError::AllocationTargetNotFound => Self::NotFound(message),
            PostingError::Store(StoreError::NotFound(_)) => Self::NotFound(message),
            PostingError::Store(_) => Self::Internal(message),
        }
    }
}
