//! Dashmap-backed in-memory store.
//!
//! Writes go through a single commit lock: every validation a commit needs
//! runs before the first mutation, so a failed commit leaves no trace and a
//! reader never observes a partially-written posting.

use std::sync::Mutex;

use chrono::NaiveDate;
use dashmap::DashMap;
use tallix_shared::types::{BillId, Currency, InvoiceId, PeriodId, Scope};
use tracing::debug;

use tallix_core::coa::Account;
use tallix_core::fx::FxRate;
use tallix_core::journal::Journal;
use tallix_core::period::Period;
use tallix_core::posting::{Bill, DocumentKind, Invoice, Payment};
use tallix_core::store::{DocumentUpdate, JournalFilter, LedgerStore, PostingCommit, StoreError};

/// In-memory [`LedgerStore`] with scoped tables.
#[derive(Default)]
pub struct MemoryStore {
    accounts: DashMap<Scope, Vec<Account>>,
    periods: DashMap<Scope, Vec<Period>>,
    journals: DashMap<Scope, Vec<Journal>>,
    invoices: DashMap<Scope, Vec<Invoice>>,
    bills: DashMap<Scope, Vec<Bill>>,
    payments: DashMap<Scope, Vec<Payment>>,
    fx_rates: DashMap<Scope, Vec<FxRate>>,
    journal_seq: DashMap<Scope, u64>,
    document_seq: DashMap<(Scope, DocumentKind), u64>,
    unreconciled: DashMap<Scope, u32>,
    commit_lock: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: sets the unreconciled bank transaction count for a scope.
    pub fn set_unreconciled_bank_count(&self, scope: Scope, count: u32) {
        self.unreconciled.insert(scope, count);
    }

    /// Number of journals stored for a scope.
    #[must_use]
    pub fn journal_count(&self, scope: &Scope) -> usize {
        self.journals.get(scope).map_or(0, |j| j.len())
    }

    /// Checks the invariants a journal must satisfy before it is written:
    /// balanced lines, a unique number, and a unique idempotency key.
    fn check_journal_insertable(&self, journal: &Journal) -> Result<(), StoreError> {
        if !journal.is_balanced() {
            return Err(StoreError::Conflict(format!(
                "journal {} is not balanced",
                journal.number
            )));
        }
        if let Some(existing) = self.journals.get(&journal.scope) {
            if existing.iter().any(|j| j.number == journal.number) {
                return Err(StoreError::DuplicateKey(format!(
                    "journal number {}",
                    journal.number
                )));
            }
            if let Some(key) = &journal.idempotency_key
                && existing.iter().any(|j| j.idempotency_key.as_deref() == Some(key))
            {
                return Err(StoreError::DuplicateKey(format!("idempotency key {key}")));
            }
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn accounts(&self, scope: &Scope) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.get(scope).map(|a| a.clone()).unwrap_or_default())
    }

    fn upsert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.entry(account.scope).or_default();
        accounts.retain(|a| a.id != account.id);
        accounts.push(account.clone());
        Ok(())
    }

    fn period(&self, scope: &Scope, id: PeriodId) -> Result<Option<Period>, StoreError> {
        Ok(self
            .periods
            .get(scope)
            .and_then(|periods| periods.iter().find(|p| p.id == id).cloned()))
    }

    fn period_for_date(
        &self,
        scope: &Scope,
        date: NaiveDate,
    ) -> Result<Option<Period>, StoreError> {
        Ok(self
            .periods
            .get(scope)
            .and_then(|periods| periods.iter().find(|p| p.contains_date(date)).cloned()))
    }

    fn periods(&self, scope: &Scope) -> Result<Vec<Period>, StoreError> {
        Ok(self.periods.get(scope).map(|p| p.clone()).unwrap_or_default())
    }

    fn save_period(&self, period: &Period) -> Result<(), StoreError> {
        let mut periods = self.periods.entry(period.scope).or_default();
        periods.retain(|p| p.id != period.id);
        periods.push(period.clone());
        Ok(())
    }

    fn journals(&self, scope: &Scope, filter: &JournalFilter) -> Result<Vec<Journal>, StoreError> {
        Ok(self
            .journals
            .get(scope)
            .map(|journals| {
                journals
                    .iter()
                    .filter(|j| filter.matches(j))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn journal_by_idempotency_key(
        &self,
        scope: &Scope,
        key: &str,
    ) -> Result<Option<Journal>, StoreError> {
        Ok(self.journals.get(scope).and_then(|journals| {
            journals
                .iter()
                .find(|j| j.idempotency_key.as_deref() == Some(key))
                .cloned()
        }))
    }

    fn insert_journal(&self, journal: &Journal) -> Result<(), StoreError> {
        let _guard = self.commit_lock.lock().map_err(poisoned)?;
        self.check_journal_insertable(journal)?;
        self.journals.entry(journal.scope).or_default().push(journal.clone());
        Ok(())
    }

    fn next_journal_number(&self, scope: &Scope) -> Result<u64, StoreError> {
        let mut seq = self.journal_seq.entry(*scope).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    fn next_document_number(
        &self,
        scope: &Scope,
        kind: DocumentKind,
    ) -> Result<u64, StoreError> {
        let mut seq = self.document_seq.entry((*scope, kind)).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    fn document_number_exists(
        &self,
        scope: &Scope,
        kind: DocumentKind,
        number: &str,
    ) -> Result<bool, StoreError> {
        let found = match kind {
            DocumentKind::Invoice => self.invoices.get(scope).is_some_and(|docs| {
                docs.iter().any(|d| d.number.as_deref() == Some(number))
            }),
            DocumentKind::Bill => self.bills.get(scope).is_some_and(|docs| {
                docs.iter().any(|d| d.number.as_deref() == Some(number))
            }),
            DocumentKind::Payment => self.payments.get(scope).is_some_and(|docs| {
                docs.iter().any(|d| d.number.as_deref() == Some(number))
            }),
        };
        Ok(found)
    }

    fn invoice(&self, scope: &Scope, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .invoices
            .get(scope)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let mut invoices = self.invoices.entry(invoice.scope).or_default();
        invoices.retain(|d| d.id != invoice.id);
        invoices.push(invoice.clone());
        Ok(())
    }

    fn bill(&self, scope: &Scope, id: BillId) -> Result<Option<Bill>, StoreError> {
        Ok(self
            .bills
            .get(scope)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    fn save_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        let mut bills = self.bills.entry(bill.scope).or_default();
        bills.retain(|d| d.id != bill.id);
        bills.push(bill.clone());
        Ok(())
    }

    fn commit_posting(&self, commit: PostingCommit) -> Result<(), StoreError> {
        let _guard = self.commit_lock.lock().map_err(poisoned)?;
        // Every check runs before the first mutation: the commit is
        // all-or-nothing and a half-written posting is never observable.
        self.check_journal_insertable(&commit.journal)?;

        let scope = commit.journal.scope;
        debug!(journal = %commit.journal.number, "committing posting");
        self.journals.entry(scope).or_default().push(commit.journal);
        match commit.document {
            DocumentUpdate::Invoice(invoice) => {
                let mut invoices = self.invoices.entry(scope).or_default();
                invoices.retain(|d| d.id != invoice.id);
                invoices.push(invoice);
            }
            DocumentUpdate::Bill(bill) => {
                let mut bills = self.bills.entry(scope).or_default();
                bills.retain(|d| d.id != bill.id);
                bills.push(bill);
            }
            DocumentUpdate::Payment {
                payment,
                invoices,
                bills,
            } => {
                {
                    let mut payments = self.payments.entry(scope).or_default();
                    payments.retain(|d| d.id != payment.id);
                    payments.push(payment);
                }
                {
                    let mut stored = self.invoices.entry(scope).or_default();
                    for invoice in invoices {
                        stored.retain(|d| d.id != invoice.id);
                        stored.push(invoice);
                    }
                }
                {
                    let mut stored = self.bills.entry(scope).or_default();
                    for bill in bills {
                        stored.retain(|d| d.id != bill.id);
                        stored.push(bill);
                    }
                }
            }
        }
        Ok(())
    }

    fn fx_rates(
        &self,
        scope: &Scope,
        from: Currency,
        to: Currency,
    ) -> Result<Vec<FxRate>, StoreError> {
        Ok(self
            .fx_rates
            .get(scope)
            .map(|rates| {
                rates
                    .iter()
                    .filter(|r| {
                        (r.from_currency == from && r.to_currency == to)
                            || (r.from_currency == to && r.to_currency == from)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert_fx_rate(&self, scope: &Scope, rate: &FxRate) -> Result<(), StoreError> {
        self.fx_rates.entry(*scope).or_default().push(rate.clone());
        Ok(())
    }

    fn unreconciled_bank_count(
        &self,
        scope: &Scope,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<u32, StoreError> {
        Ok(self.unreconciled.get(scope).map_or(0, |count| *count))
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("commit lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tallix_core::journal::{JournalKind, JournalLine, JournalStatus};
    use tallix_shared::types::{AccountId, CompanyId, JournalId, TenantId, UserId};

    fn scope() -> Scope {
        Scope::new(TenantId::new(), CompanyId::new())
    }

    fn make_journal(scope: Scope, number: &str, key: Option<&str>, balanced: bool) -> Journal {
        let credit = if balanced { dec!(100.00) } else { dec!(90.00) };
        Journal {
            id: JournalId::new(),
            scope,
            number: number.to_string(),
            kind: JournalKind::General,
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            currency: Currency::Myr,
            status: JournalStatus::Posted,
            description: "store test".to_string(),
            idempotency_key: key.map(str::to_string),
            lines: vec![
                JournalLine::debit(AccountId::new(), dec!(100.00), "d"),
                JournalLine::credit(AccountId::new(), credit, "c"),
            ],
            fx_review_required: false,
            created_by: UserId::new(),
            posted_by: None,
            posted_at: None,
        }
    }

    #[test]
    fn test_insert_and_query_journal() {
        let store = MemoryStore::new();
        let scope = scope();
        store
            .insert_journal(&make_journal(scope, "JRN-000001", None, true))
            .unwrap();
        assert_eq!(store.journal_count(&scope), 1);

        let journals = store.journals(&scope, &JournalFilter::default()).unwrap();
        assert_eq!(journals.len(), 1);
        // Another scope sees nothing.
        let other = self::scope();
        assert_eq!(store.journal_count(&other), 0);
    }

    #[test]
    fn test_unbalanced_journal_rejected() {
        let store = MemoryStore::new();
        let scope = scope();
        let error = store
            .insert_journal(&make_journal(scope, "JRN-000001", None, false))
            .unwrap_err();
        assert!(matches!(error, StoreError::Conflict(_)));
        assert_eq!(store.journal_count(&scope), 0);
    }

    #[test]
    fn test_duplicate_journal_number_rejected() {
        let store = MemoryStore::new();
        let scope = scope();
        store
            .insert_journal(&make_journal(scope, "JRN-000001", None, true))
            .unwrap();
        let error = store
            .insert_journal(&make_journal(scope, "JRN-000001", None, true))
            .unwrap_err();
        assert!(matches!(error, StoreError::DuplicateKey(_)));
        assert_eq!(store.journal_count(&scope), 1);
    }

    #[test]
    fn test_duplicate_idempotency_key_rejected() {
        let store = MemoryStore::new();
        let scope = scope();
        store
            .insert_journal(&make_journal(scope, "JRN-000001", Some("req-1"), true))
            .unwrap();
        let error = store
            .insert_journal(&make_journal(scope, "JRN-000002", Some("req-1"), true))
            .unwrap_err();
        assert!(matches!(error, StoreError::DuplicateKey(_)));

        let found = store.journal_by_idempotency_key(&scope, "req-1").unwrap();
        assert_eq!(found.unwrap().number, "JRN-000001");
    }

    #[test]
    fn test_sequences_are_monotonic_per_scope() {
        let store = MemoryStore::new();
        let scope_a = scope();
        let scope_b = scope();
        assert_eq!(store.next_journal_number(&scope_a).unwrap(), 1);
        assert_eq!(store.next_journal_number(&scope_a).unwrap(), 2);
        // Independent per scope.
        assert_eq!(store.next_journal_number(&scope_b).unwrap(), 1);
        // And per document kind.
        assert_eq!(
            store.next_document_number(&scope_a, DocumentKind::Invoice).unwrap(),
            1
        );
        assert_eq!(
            store.next_document_number(&scope_a, DocumentKind::Payment).unwrap(),
            1
        );
        assert_eq!(
            store.next_document_number(&scope_a, DocumentKind::Invoice).unwrap(),
            2
        );
    }

    #[test]
    fn test_failed_commit_writes_nothing() {
        let store = MemoryStore::new();
        let scope = scope();
        let invoice_scope = scope;
        // Unbalanced journal in the commit: the whole commit is rejected,
        // including the document update.
        let commit = PostingCommit {
            journal: make_journal(scope, "JRN-000001", None, false),
            document: DocumentUpdate::Invoice(Invoice {
                id: tallix_shared::types::InvoiceId::new(),
                scope: invoice_scope,
                customer: "Acme".to_string(),
                number: Some("INV-9".to_string()),
                issue_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
                currency: Currency::Myr,
                exchange_rate: None,
                status: tallix_core::posting::DocumentStatus::Posted,
                lines: vec![],
                receivable_account: AccountId::new(),
                tax_account: None,
                header_subtotal: None,
                header_tax_total: None,
                header_total: None,
                amount_paid: rust_decimal::Decimal::ZERO,
                journal_id: None,
            }),
        };
        assert!(store.commit_posting(commit).is_err());
        assert_eq!(store.journal_count(&scope), 0);
        assert!(!store
            .document_number_exists(&scope, DocumentKind::Invoice, "INV-9")
            .unwrap());
    }
}
