//! The `LedgerStore` trait: everything the core asks of persistence.

use chrono::NaiveDate;
use tallix_shared::types::{BillId, Currency, InvoiceId, PeriodId, Scope};

use super::error::StoreError;
use crate::coa::Account;
use crate::fx::FxRate;
use crate::journal::{Journal, JournalKind, JournalStatus};
use crate::period::Period;
use crate::posting::documents::{Bill, DocumentKind, Invoice, Payment};

/// Filter for journal queries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Earliest journal date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest journal date (inclusive).
    pub to: Option<NaiveDate>,
    /// Restrict to one status.
    pub status: Option<JournalStatus>,
    /// Restrict to one kind.
    pub kind: Option<JournalKind>,
}

impl JournalFilter {
    /// All posted journals dated up to and including `to`.
    #[must_use]
    pub fn posted_through(to: NaiveDate) -> Self {
        Self {
            to: Some(to),
            status: Some(JournalStatus::Posted),
            ..Self::default()
        }
    }

    /// All posted journals within `[from, to]`.
    #[must_use]
    pub fn posted_between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            status: Some(JournalStatus::Posted),
            ..Self::default()
        }
    }

    /// Returns true if a journal matches this filter.
    #[must_use]
    pub fn matches(&self, journal: &Journal) -> bool {
        self.from.is_none_or(|from| journal.date >= from)
            && self.to.is_none_or(|to| journal.date <= to)
            && self.status.is_none_or(|status| journal.status == status)
            && self.kind.is_none_or(|kind| journal.kind == kind)
    }
}

/// The document state written alongside a posting journal.
#[derive(Debug, Clone)]
pub enum DocumentUpdate {
    /// An invoice transitioning to posted.
    Invoice(Invoice),
    /// A bill transitioning to posted.
    Bill(Bill),
    /// A payment, plus every settled document with its updated balance.
    Payment {
        /// The payment being posted.
        payment: Payment,
        /// Invoices whose `amount_paid`/status changed.
        invoices: Vec<Invoice>,
        /// Bills whose `amount_paid`/status changed.
        bills: Vec<Bill>,
    },
}

/// An atomic posting commit: one journal plus its document updates.
///
/// Implementations persist everything here in a single transaction; a
/// half-written posting must never be observable.
#[derive(Debug, Clone)]
pub struct PostingCommit {
    /// The balanced, validated journal.
    pub journal: Journal,
    /// The document state to write with it.
    pub document: DocumentUpdate,
}

/// Scoped persistence operations consumed by the core.
///
/// Reads return committed state only; no dirty reads of in-flight commits.
pub trait LedgerStore {
    /// Full chart of accounts for the scope.
    fn accounts(&self, scope: &Scope) -> Result<Vec<Account>, StoreError>;

    /// Creates or replaces an account.
    fn upsert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Looks up a period by ID.
    fn period(&self, scope: &Scope, id: PeriodId) -> Result<Option<Period>, StoreError>;

    /// Finds the period covering a date.
    fn period_for_date(&self, scope: &Scope, date: NaiveDate)
        -> Result<Option<Period>, StoreError>;

    /// All periods for the scope.
    fn periods(&self, scope: &Scope) -> Result<Vec<Period>, StoreError>;

    /// Creates or replaces a period.
    fn save_period(&self, period: &Period) -> Result<(), StoreError>;

    /// Journals matching a filter.
    fn journals(&self, scope: &Scope, filter: &JournalFilter) -> Result<Vec<Journal>, StoreError>;

    /// Finds the journal created under an idempotency key, if any.
    fn journal_by_idempotency_key(
        &self,
        scope: &Scope,
        key: &str,
    ) -> Result<Option<Journal>, StoreError>;

    /// Inserts a journal with all its lines, all-or-nothing.
    fn insert_journal(&self, journal: &Journal) -> Result<(), StoreError>;

    /// Next value of the scope's journal number sequence.
    ///
    /// This sequence is the only mutable counter behind posting.
    fn next_journal_number(&self, scope: &Scope) -> Result<u64, StoreError>;

    /// Next value of the scope's per-kind document number sequence.
    fn next_document_number(&self, scope: &Scope, kind: DocumentKind)
        -> Result<u64, StoreError>;

    /// Returns true if a document of this kind already carries the number.
    fn document_number_exists(
        &self,
        scope: &Scope,
        kind: DocumentKind,
        number: &str,
    ) -> Result<bool, StoreError>;

    /// Looks up an invoice by ID.
    fn invoice(&self, scope: &Scope, id: InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Creates or replaces an invoice.
    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError>;

    /// Looks up a bill by ID.
    fn bill(&self, scope: &Scope, id: BillId) -> Result<Option<Bill>, StoreError>;

    /// Creates or replaces a bill.
    fn save_bill(&self, bill: &Bill) -> Result<(), StoreError>;

    /// Persists a journal and its document updates in one transaction.
    fn commit_posting(&self, commit: PostingCommit) -> Result<(), StoreError>;

    /// All rates stored for a currency pair.
    fn fx_rates(
        &self,
        scope: &Scope,
        from: Currency,
        to: Currency,
    ) -> Result<Vec<FxRate>, StoreError>;

    /// Stores an ingested rate.
    fn insert_fx_rate(&self, scope: &Scope, rate: &FxRate) -> Result<(), StoreError>;

    /// Count of unreconciled bank transactions dated within `[from, to]`.
    fn unreconciled_bank_count(
        &self,
        scope: &Scope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<u32, StoreError>;
}
