//! In-memory `LedgerStore` fixture for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use tallix_shared::types::{
    AccountId, BillId, CompanyId, Currency, InvoiceId, PeriodId, Scope, TenantId,
};

use crate::coa::{Account, AccountSubtype, AccountType};
use crate::fx::FxRate;
use crate::journal::Journal;
use crate::period::Period;
use crate::posting::documents::{Bill, DocumentKind, Invoice, Payment};
use crate::store::{DocumentUpdate, JournalFilter, LedgerStore, PostingCommit, StoreError};

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    periods: Vec<Period>,
    journals: Vec<Journal>,
    invoices: Vec<Invoice>,
    bills: Vec<Bill>,
    payments: Vec<Payment>,
    fx_rates: Vec<(Scope, FxRate)>,
    journal_seq: HashMap<Scope, u64>,
    document_seq: HashMap<(Scope, DocumentKind), u64>,
    unreconciled: HashMap<Scope, u32>,
}

/// Simple mutex-guarded store for unit tests.
pub struct TestStore {
    state: Mutex<State>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn add_account(&self, account: Account) {
        self.state.lock().unwrap().accounts.push(account);
    }

    pub fn add_period(&self, period: Period) {
        self.state.lock().unwrap().periods.push(period);
    }

    pub fn add_journal(&self, journal: Journal) {
        self.state.lock().unwrap().journals.push(journal);
    }

    pub fn add_invoice(&self, invoice: Invoice) {
        self.state.lock().unwrap().invoices.push(invoice);
    }

    pub fn add_bill(&self, bill: Bill) {
        self.state.lock().unwrap().bills.push(bill);
    }

    pub fn add_fx_rate(&self, scope: Scope, rate: FxRate) {
        self.state.lock().unwrap().fx_rates.push((scope, rate));
    }

    pub fn set_unreconciled(&self, scope: Scope, count: u32) {
        self.state.lock().unwrap().unreconciled.insert(scope, count);
    }

    pub fn journal_count(&self) -> usize {
        self.state.lock().unwrap().journals.len()
    }

    pub fn payment_count(&self) -> usize {
        self.state.lock().unwrap().payments.len()
    }
}

impl LedgerStore for TestStore {
    fn accounts(&self, scope: &Scope) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .filter(|a| a.scope == *scope)
            .cloned()
            .collect())
    }

    fn upsert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.accounts.retain(|a| a.id != account.id);
        state.accounts.push(account.clone());
        Ok(())
    }

    fn period(&self, scope: &Scope, id: PeriodId) -> Result<Option<Period>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .periods
            .iter()
            .find(|p| p.scope == *scope && p.id == id)
            .cloned())
    }

    fn period_for_date(
        &self,
        scope: &Scope,
        date: NaiveDate,
    ) -> Result<Option<Period>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .periods
            .iter()
            .find(|p| p.scope == *scope && p.contains_date(date))
            .cloned())
    }

    fn periods(&self, scope: &Scope) -> Result<Vec<Period>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .periods
            .iter()
            .filter(|p| p.scope == *scope)
            .cloned()
            .collect())
    }

    fn save_period(&self, period: &Period) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.periods.retain(|p| p.id != period.id);
        state.periods.push(period.clone());
        Ok(())
    }

    fn journals(&self, scope: &Scope, filter: &JournalFilter) -> Result<Vec<Journal>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .journals
            .iter()
            .filter(|j| j.scope == *scope && filter.matches(j))
            .cloned()
            .collect())
    }

    fn journal_by_idempotency_key(
        &self,
        scope: &Scope,
        key: &str,
    ) -> Result<Option<Journal>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .journals
            .iter()
            .find(|j| j.scope == *scope && j.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    fn insert_journal(&self, journal: &Journal) -> Result<(), StoreError> {
        self.state.lock().unwrap().journals.push(journal.clone());
        Ok(())
    }

    fn next_journal_number(&self, scope: &Scope) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let seq = state.journal_seq.entry(*scope).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    fn next_document_number(
        &self,
        scope: &Scope,
        kind: DocumentKind,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let seq = state.document_seq.entry((*scope, kind)).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    fn document_number_exists(
        &self,
        scope: &Scope,
        kind: DocumentKind,
        number: &str,
    ) -> Result<bool, StoreError> {
        let state = self.state.lock().unwrap();
        let found = match kind {
            DocumentKind::Invoice => state
                .invoices
                .iter()
                .any(|i| i.scope == *scope && i.number.as_deref() == Some(number)),
            DocumentKind::Bill => state
                .bills
                .iter()
                .any(|b| b.scope == *scope && b.number.as_deref() == Some(number)),
            DocumentKind::Payment => state
                .payments
                .iter()
                .any(|p| p.scope == *scope && p.number.as_deref() == Some(number)),
        };
        Ok(found)
    }

    fn invoice(&self, scope: &Scope, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.scope == *scope && i.id == id)
            .cloned())
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.invoices.retain(|i| i.id != invoice.id);
        state.invoices.push(invoice.clone());
        Ok(())
    }

    fn bill(&self, scope: &Scope, id: BillId) -> Result<Option<Bill>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .bills
            .iter()
            .find(|b| b.scope == *scope && b.id == id)
            .cloned())
    }

    fn save_bill(&self, bill: &Bill) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.bills.retain(|b| b.id != bill.id);
        state.bills.push(bill.clone());
        Ok(())
    }

    fn commit_posting(&self, commit: PostingCommit) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.journals.push(commit.journal);
        match commit.document {
            DocumentUpdate::Invoice(invoice) => {
                state.invoices.retain(|i| i.id != invoice.id);
                state.invoices.push(invoice);
            }
            DocumentUpdate::Bill(bill) => {
                state.bills.retain(|b| b.id != bill.id);
                state.bills.push(bill);
            }
            DocumentUpdate::Payment {
                payment,
                invoices,
                bills,
            } => {
                state.payments.retain(|p| p.id != payment.id);
                state.payments.push(payment);
                for invoice in invoices {
                    state.invoices.retain(|i| i.id != invoice.id);
                    state.invoices.push(invoice);
                }
                for bill in bills {
                    state.bills.retain(|b| b.id != bill.id);
                    state.bills.push(bill);
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
            .state
            .lock()
            .unwrap()
            .fx_rates
            .iter()
            .filter(|(s, r)| {
                s == scope
                    && ((r.from_currency == from && r.to_currency == to)
                        || (r.from_currency == to && r.to_currency == from))
            })
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn insert_fx_rate(&self, scope: &Scope, rate: &FxRate) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .fx_rates
            .push((*scope, rate.clone()));
        Ok(())
    }

    fn unreconciled_bank_count(
        &self,
        scope: &Scope,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<u32, StoreError> {
        Ok(*self
            .state
            .lock()
            .unwrap()
            .unreconciled
            .get(scope)
            .unwrap_or(&0))
    }
}

/// Leaf and control accounts of the standard test chart.
pub struct StandardAccounts {
    pub assets_root: AccountId,
    pub bank: AccountId,
    pub ar: AccountId,
    pub fixed_assets: AccountId,
    pub liabilities_root: AccountId,
    pub ap: AccountId,
    pub output_tax: AccountId,
    pub loan: AccountId,
    pub equity_root: AccountId,
    pub share_capital: AccountId,
    pub revenue_root: AccountId,
    pub sales: AccountId,
    pub expenses_root: AccountId,
    pub rent: AccountId,
}

/// Seeds a minimal but realistic chart of accounts into the store.
pub fn seed_standard_coa(store: &TestStore, scope: Scope, currency: Currency) -> StandardAccounts {
    let make = |code: &str,
                name: &str,
                account_type: AccountType,
                parent_id: Option<AccountId>,
                level: u8,
                subtype: Option<AccountSubtype>| {
        let account = Account {
            id: AccountId::new(),
            scope,
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            parent_id,
            level,
            is_active: true,
            currency,
            subtype,
        };
        let id = account.id;
        store.add_account(account);
        id
    };

    let assets_root = make("1000", "Assets", AccountType::Asset, None, 0, None);
    let bank = make(
        "1110",
        "Bank",
        AccountType::Asset,
        Some(assets_root),
        1,
        Some(AccountSubtype::Bank),
    );
    let ar = make(
        "1200",
        "Accounts Receivable",
        AccountType::Asset,
        Some(assets_root),
        1,
        Some(AccountSubtype::AccountsReceivable),
    );
    let fixed_assets = make(
        "1500",
        "Equipment",
        AccountType::Asset,
        Some(assets_root),
        1,
        Some(AccountSubtype::FixedAsset),
    );
    let liabilities_root = make("2000", "Liabilities", AccountType::Liability, None, 0, None);
    let ap = make(
        "2100",
        "Accounts Payable",
        AccountType::Liability,
        Some(liabilities_root),
        1,
        Some(AccountSubtype::AccountsPayable),
    );
    let output_tax = make(
        "2300",
        "Output Tax Payable",
        AccountType::Liability,
        Some(liabilities_root),
        1,
        Some(AccountSubtype::TaxPayable),
    );
    let loan = make(
        "2500",
        "Term Loan",
        AccountType::Liability,
        Some(liabilities_root),
        1,
        Some(AccountSubtype::LongTermLiability),
    );
    let equity_root = make("3000", "Equity", AccountType::Equity, None, 0, None);
    let share_capital = make(
        "3100",
        "Share Capital",
        AccountType::Equity,
        Some(equity_root),
        1,
        Some(AccountSubtype::ShareCapital),
    );
    let revenue_root = make("4000", "Revenue", AccountType::Revenue, None, 0, None);
    let sales = make(
        "4100",
        "Sales",
        AccountType::Revenue,
        Some(revenue_root),
        1,
        Some(AccountSubtype::OperatingRevenue),
    );
    let expenses_root = make("5000", "Expenses", AccountType::Expense, None, 0, None);
    let rent = make(
        "5100",
        "Rent Expense",
        AccountType::Expense,
        Some(expenses_root),
        1,
        Some(AccountSubtype::OperatingExpense),
    );

    StandardAccounts {
        assets_root,
        bank,
        ar,
        fixed_assets,
        liabilities_root,
        ap,
        output_tax,
        loan,
        equity_root,
        share_capital,
        revenue_root,
        sales,
        expenses_root,
        rent,
    }
}

/// A fresh scope for a test.
pub fn test_scope() -> Scope {
    Scope::new(TenantId::new(), CompanyId::new())
}
