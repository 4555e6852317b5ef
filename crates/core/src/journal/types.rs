//! Journal domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallix_shared::types::{AccountId, Currency, JournalId, JournalLineId, Scope, UserId};

/// Journal status.
///
/// The serialized forms `draft`, `pending_approval` and `posted` are part of
/// the persisted-state contract and must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    /// Journal is being drafted and can be modified.
    Draft,
    /// Journal has been submitted for approval.
    PendingApproval,
    /// Journal has been posted to the ledger (immutable).
    Posted,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Posted => "posted",
        }
    }

    /// Returns true if the journal can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl std::fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of what produced a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    /// Manually entered journal.
    General,
    /// Produced by posting a sales invoice.
    Invoice,
    /// Produced by posting a vendor bill.
    Bill,
    /// Produced by posting a payment.
    Payment,
    /// Period-end adjustment entry.
    Adjustment,
    /// Reversal of a previous journal.
    Reversal,
    /// Opening balance entry.
    Opening,
}

/// A single debit or credit line within a journal.
///
/// Exactly one of `debit`/`credit` is non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique line identifier.
    pub id: JournalLineId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Line description.
    pub description: String,
    /// Optional reference (e.g., document number).
    pub reference: Option<String>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: JournalLineId::new(),
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: description.into(),
            reference: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: JournalLineId::new(),
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: description.into(),
            reference: None,
        }
    }

    /// Attaches a reference to the line.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// An atomic, balanced set of debit/credit lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Journal number, unique per scope.
    pub number: String,
    /// What produced this journal.
    pub kind: JournalKind,
    /// Posting date.
    pub date: NaiveDate,
    /// Document currency.
    pub currency: Currency,
    /// Current status.
    pub status: JournalStatus,
    /// Journal description.
    pub description: String,
    /// Idempotency key of the request that produced this journal, if any.
    pub idempotency_key: Option<String>,
    /// The debit/credit lines.
    pub lines: Vec<JournalLine>,
    /// Set when the posting used an exchange rate past the acceptable
    /// staleness bound; flags the journal for downstream audit review.
    pub fx_review_required: bool,
    /// User who created the journal.
    pub created_by: UserId,
    /// User who posted the journal, once posted.
    pub posted_by: Option<UserId>,
    /// When the journal was posted.
    pub posted_at: Option<DateTime<Utc>>,
}

impl Journal {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if debits equal credits exactly at minor-unit precision.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}
