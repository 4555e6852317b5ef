//! Report generation service.
//!
//! Every report is a pure, read-only projection of posted journal lines
//! plus the chart of accounts. The trial balance is the sole input to every
//! downstream statement; the income statement's net income is the exact
//! value the balance sheet rollforward and the indirect cash flow use.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ReportError;
use super::types::{
    BalanceCheck, BalanceSheetGroup, BalanceSheetInput, BalanceSheetReport, BalanceSheetRow,
    BalanceSheetSection, BalanceSheetSectionBody, CashFlowInput, CashFlowItem, CashFlowMethod,
    CashFlowReport, CashFlowSection, CashFlowSectionBody, IncomeStatementInput,
    IncomeStatementReport, PnlRow, PnlSection, TrialBalanceInput, TrialBalanceReport,
    TrialBalanceRow, TrialBalanceTotals,
};
use crate::coa::{Account, AccountIndex, AccountType, Classification, NormalBalance};
use crate::store::{JournalFilter, LedgerStore};
use tallix_shared::types::{AccountId, Scope};

/// Per-account debit/credit sums split at the window boundary.
#[derive(Debug, Clone, Copy, Default)]
struct Activity {
    opening_debits: Decimal,
    opening_credits: Decimal,
    period_debits: Decimal,
    period_credits: Decimal,
}

impl Activity {
    fn accumulate(&mut self, other: Activity) {
        self.opening_debits += other.opening_debits;
        self.opening_credits += other.opening_credits;
        self.period_debits += other.period_debits;
        self.period_credits += other.period_credits;
    }
}

/// Service for generating financial reports.
pub struct ReportService<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> ReportService<'a, S> {
    /// Creates a report service over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Generates a trial balance for the window.
    ///
    /// Per row: `opening + period debits - period credits = closing` for
    /// debit-normal accounts, with the credit-normal mirror. Header rows
    /// roll up their descendants.
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted window, a line referencing an
    /// unknown account, or a store failure. An out-of-balance ledger is NOT
    /// an error: it is reported via `totals.is_balanced` and
    /// `totals.difference`.
    pub fn trial_balance(
        &self,
        input: &TrialBalanceInput,
    ) -> Result<TrialBalanceReport, ReportError> {
        if input.from > input.to {
            return Err(ReportError::InvalidWindow {
                from: input.from,
                to: input.to,
            });
        }
        let index = AccountIndex::new(self.store.accounts(&input.scope)?);
        let activity = self.collect_activity(&input.scope, input.from, input.to, &index)?;

        let mut accounts: Vec<&Account> = index.accounts().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut rows = Vec::with_capacity(accounts.len());
        for account in accounts {
            let rolled = rolled_activity(&index, &activity, account.id);
            let normal_balance = account.normal_balance();
            let (opening_balance, closing_balance) = match normal_balance {
                NormalBalance::Debit => {
                    let opening = rolled.opening_debits - rolled.opening_credits;
                    (
                        opening,
                        opening + rolled.period_debits - rolled.period_credits,
                    )
                }
                NormalBalance::Credit => {
                    let opening = rolled.opening_credits - rolled.opening_debits;
                    (
                        opening,
                        opening + rolled.period_credits - rolled.period_debits,
                    )
                }
            };
            rows.push(TrialBalanceRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                level: account.level,
                is_header: index.is_control(account),
                opening_balance,
                period_debits: rolled.period_debits,
                period_credits: rolled.period_credits,
                closing_balance,
                normal_balance,
                currency: account.currency,
            });
        }

        // Totals over leaf rows only; headers are rollups and would double
        // count.
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;
        for row in rows.iter().filter(|r| !r.is_header) {
            match row.normal_balance {
                NormalBalance::Debit => total_debits += row.closing_balance,
                NormalBalance::Credit => total_credits += row.closing_balance,
            }
        }
        let difference = total_debits - total_credits;
        let is_balanced = difference.abs() <= input.currency.minor_unit();
        if !is_balanced {
            debug!(%difference, "trial balance out of balance");
        }

        Ok(TrialBalanceReport {
            from: input.from,
            to: input.to,
            rows,
            totals: TrialBalanceTotals {
                total_debits,
                total_credits,
                is_balanced,
                difference,
            },
            generated_at: Utc::now(),
        })
    }

    /// Generates a balance sheet as of a date.
    ///
    /// Sections come from the trial balance's closing balances; equity
    /// carries a retained-earnings rollforward row computed by the income
    /// statement, so the accounting equation holds exactly whenever the
    /// trial balance is balanced. The equation check is exposed with its
    /// exact difference, never silently rounded away.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`Self::trial_balance`].
    pub fn balance_sheet(
        &self,
        input: &BalanceSheetInput,
    ) -> Result<BalanceSheetReport, ReportError> {
        let trial_balance = self.trial_balance(&TrialBalanceInput {
            scope: input.scope,
            from: NaiveDate::MIN,
            to: input.as_of,
            currency: input.currency,
        })?;
        let income = self.income_statement(&IncomeStatementInput {
            scope: input.scope,
            from: NaiveDate::MIN,
            to: input.as_of,
            currency: input.currency,
        })?;
        let index = AccountIndex::new(self.store.accounts(&input.scope)?);

        let mut assets = section_builder(BalanceSheetSection::Assets);
        let mut liabilities = section_builder(BalanceSheetSection::Liabilities);
        let mut equity = section_builder(BalanceSheetSection::Equity);

        for row in trial_balance.rows.iter().filter(|r| !r.is_header) {
            let Some(account) = index.get(row.account_id) else {
                return Err(ReportError::UnknownAccount(row.account_id));
            };
            let target = match account.account_type {
                AccountType::Asset => &mut assets,
                AccountType::Liability => &mut liabilities,
                AccountType::Equity => &mut equity,
                AccountType::Revenue | AccountType::Expense => continue,
            };
            if row.closing_balance.is_zero() {
                continue;
            }
            push_row(
                target,
                BalanceSheetRow {
                    account_id: Some(row.account_id),
                    code: row.code.clone(),
                    name: row.name.clone(),
                    classification: account.classification(),
                    amount: row.closing_balance,
                },
            );
        }

        // Retained-earnings rollforward: the income statement's net income,
        // not an independently maintained balance.
        if !income.net_income.is_zero() {
            push_row(
                &mut equity,
                BalanceSheetRow {
                    account_id: None,
                    code: String::new(),
                    name: "Current and retained earnings".to_string(),
                    classification: Classification::NonCurrent,
                    amount: income.net_income,
                },
            );
        }

        let assets = finish_section(assets);
        let liabilities = finish_section(liabilities);
        let equity = finish_section(equity);
        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let difference = total_assets - (total_liabilities + total_equity);

        Ok(BalanceSheetReport {
            as_of: input.as_of,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            net_income: income.net_income,
            balance_check: BalanceCheck {
                assets_equals_liabilities_plus_equity: difference.is_zero(),
                difference,
            },
            generated_at: Utc::now(),
        })
    }

    /// Generates an income statement for the window.
    ///
    /// Net income is revenue minus expenses over the window; this value is
    /// the one the balance sheet rollforward and the indirect cash flow
    /// reconciliation consume.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`Self::trial_balance`].
    pub fn income_statement(
        &self,
        input: &IncomeStatementInput,
    ) -> Result<IncomeStatementReport, ReportError> {
        if input.from > input.to {
            return Err(ReportError::InvalidWindow {
                from: input.from,
                to: input.to,
            });
        }
        let index = AccountIndex::new(self.store.accounts(&input.scope)?);
        let activity = self.collect_activity(&input.scope, input.from, input.to, &index)?;

        let mut accounts: Vec<&Account> = index.accounts().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let mut revenue = PnlSection::default();
        let mut expenses = PnlSection::default();
        for account in accounts {
            if index.is_control(account) {
                continue;
            }
            let Some(act) = activity.get(&account.id) else {
                continue;
            };
            let (section, amount) = match account.account_type {
                AccountType::Revenue => (&mut revenue, act.period_credits - act.period_debits),
                AccountType::Expense => (&mut expenses, act.period_debits - act.period_credits),
                _ => continue,
            };
            if amount.is_zero() {
                continue;
            }
            section.total += amount;
            section.rows.push(PnlRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                amount,
            });
        }

        let net_income = revenue.total - expenses.total;
        Ok(IncomeStatementReport {
            from: input.from,
            to: input.to,
            revenue,
            expenses,
            net_income,
            generated_at: Utc::now(),
        })
    }

    /// Generates a cash flow statement for the window.
    ///
    /// `beginning + net change = ending` is computed exactly and exposed via
    /// `is_balanced`/`difference`; a violation indicates a reporting bug or
    /// ledger corruption and is surfaced, never masked.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`Self::trial_balance`].
    pub fn cash_flow(&self, input: &CashFlowInput) -> Result<CashFlowReport, ReportError> {
        if input.from > input.to {
            return Err(ReportError::InvalidWindow {
                from: input.from,
                to: input.to,
            });
        }
        let index = AccountIndex::new(self.store.accounts(&input.scope)?);
        let activity = self.collect_activity(&input.scope, input.from, input.to, &index)?;

        let mut beginning_cash_balance = Decimal::ZERO;
        let mut window_cash_delta = Decimal::ZERO;
        for (account_id, act) in &activity {
            let Some(account) = index.get(*account_id) else {
                return Err(ReportError::UnknownAccount(*account_id));
            };
            if account.is_cash() {
                beginning_cash_balance += act.opening_debits - act.opening_credits;
                window_cash_delta += act.period_debits - act.period_credits;
            }
        }
        let ending_cash_balance = beginning_cash_balance + window_cash_delta;

        let (operating, investing, financing) = match input.method {
            CashFlowMethod::Direct => self.direct_sections(input, &index)?,
            CashFlowMethod::Indirect => self.indirect_sections(input, &index, &activity)?,
        };

        let net_change_in_cash = operating.total + investing.total + financing.total;
        let difference = (beginning_cash_balance + net_change_in_cash) - ending_cash_balance;

        Ok(CashFlowReport {
            from: input.from,
            to: input.to,
            method: input.method,
            beginning_cash_balance,
            ending_cash_balance,
            net_change_in_cash,
            operating,
            investing,
            financing,
            is_balanced: difference.is_zero(),
            difference,
            generated_at: Utc::now(),
        })
    }

    /// Direct method: each posted journal touching cash contributes its net
    /// cash effect to the section of its dominant non-cash counterpart.
    fn direct_sections(
        &self,
        input: &CashFlowInput,
        index: &AccountIndex,
    ) -> Result<(CashFlowSectionBody, CashFlowSectionBody, CashFlowSectionBody), ReportError> {
        let journals = self
            .store
            .journals(&input.scope, &JournalFilter::posted_between(input.from, input.to))?;

        // (section, label) -> amount, insertion ordered.
        let mut items: Vec<(CashFlowSection, String, Decimal)> = Vec::new();
        for journal in &journals {
            let mut cash_delta = Decimal::ZERO;
            for line in &journal.lines {
                let account = index
                    .get(line.account_id)
                    .ok_or(ReportError::UnknownAccount(line.account_id))?;
                if account.is_cash() {
                    cash_delta += line.debit - line.credit;
                }
            }
            if cash_delta.is_zero() {
                continue;
            }
            let counterpart = journal
                .lines
                .iter()
                .filter(|line| index.get(line.account_id).is_some_and(|a| !a.is_cash()))
                .max_by_key(|line| line.debit + line.credit);
            let Some(counterpart) = counterpart else {
                continue;
            };
            let account = index
                .get(counterpart.account_id)
                .ok_or(ReportError::UnknownAccount(counterpart.account_id))?;
            let section = direct_section_for(account);
            if let Some(existing) = items
                .iter_mut()
                .find(|(s, label, _)| *s == section && *label == account.name)
            {
                existing.2 += cash_delta;
            } else {
                items.push((section, account.name.clone(), cash_delta));
            }
        }

        Ok(build_sections(items))
    }

    /// Indirect method: net income plus working-capital adjustments, with
    /// non-current movements classified as investing/financing.
    fn indirect_sections(
        &self,
        input: &CashFlowInput,
        index: &AccountIndex,
        activity: &HashMap<AccountId, Activity>,
    ) -> Result<(CashFlowSectionBody, CashFlowSectionBody, CashFlowSectionBody), ReportError> {
        let income = self.income_statement(&IncomeStatementInput {
            scope: input.scope,
            from: input.from,
            to: input.to,
            currency: input.currency,
        })?;

        let mut items: Vec<(CashFlowSection, String, Decimal)> = vec![(
            CashFlowSection::Operating,
            "Net income".to_string(),
            income.net_income,
        )];

        let mut accounts: Vec<&Account> = index.accounts().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        for account in accounts {
            if index.is_control(account) || account.is_cash() {
                continue;
            }
            let Some(act) = activity.get(&account.id) else {
                continue;
            };
            let (section, amount, label) = match account.account_type {
                // An increase in a non-cash asset consumes cash.
                AccountType::Asset => {
                    let movement = act.period_debits - act.period_credits;
                    let section = match account.classification() {
                        Classification::Current => CashFlowSection::Operating,
                        Classification::NonCurrent => CashFlowSection::Investing,
                    };
                    (section, -movement, format!("Change in {}", account.name))
                }
                // An increase in a liability releases cash.
                AccountType::Liability => {
                    let movement = act.period_credits - act.period_debits;
                    let section = match account.classification() {
                        Classification::Current => CashFlowSection::Operating,
                        Classification::NonCurrent => CashFlowSection::Financing,
                    };
                    (section, movement, format!("Change in {}", account.name))
                }
                AccountType::Equity => {
                    let movement = act.period_credits - act.period_debits;
                    (
                        CashFlowSection::Financing,
                        movement,
                        format!("Change in {}", account.name),
                    )
                }
                // Revenue and expense movements are inside net income.
                AccountType::Revenue | AccountType::Expense => continue,
            };
            if amount.is_zero() {
                continue;
            }
            items.push((section, label, amount));
        }

        Ok(build_sections(items))
    }

    /// Splits posted debit/credit sums per account at the window boundary.
    fn collect_activity(
        &self,
        scope: &Scope,
        from: NaiveDate,
        to: NaiveDate,
        index: &AccountIndex,
    ) -> Result<HashMap<AccountId, Activity>, ReportError> {
        let mut activity: HashMap<AccountId, Activity> = HashMap::new();

        if let Some(before_window) = from.pred_opt() {
            for journal in self
                .store
                .journals(scope, &JournalFilter::posted_through(before_window))?
            {
                for line in &journal.lines {
                    if index.get(line.account_id).is_none() {
                        return Err(ReportError::UnknownAccount(line.account_id));
                    }
                    let entry = activity.entry(line.account_id).or_default();
                    entry.opening_debits += line.debit;
                    entry.opening_credits += line.credit;
                }
            }
        }
        for journal in self
            .store
            .journals(scope, &JournalFilter::posted_between(from, to))?
        {
            for line in &journal.lines {
                if index.get(line.account_id).is_none() {
                    return Err(ReportError::UnknownAccount(line.account_id));
                }
                let entry = activity.entry(line.account_id).or_default();
                entry.period_debits += line.debit;
                entry.period_credits += line.credit;
            }
        }
        Ok(activity)
    }
}

/// Own activity plus every descendant's, for header rollups.
fn rolled_activity(
    index: &AccountIndex,
    activity: &HashMap<AccountId, Activity>,
    id: AccountId,
) -> Activity {
    let mut total = activity.get(&id).copied().unwrap_or_default();
    for child in index.children_of(id) {
        total.accumulate(rolled_activity(index, activity, *child));
    }
    total
}

fn direct_section_for(account: &Account) -> CashFlowSection {
    match account.account_type {
        AccountType::Revenue | AccountType::Expense => CashFlowSection::Operating,
        AccountType::Asset => match account.classification() {
            Classification::Current => CashFlowSection::Operating,
            Classification::NonCurrent => CashFlowSection::Investing,
        },
        AccountType::Liability => match account.classification() {
            Classification::Current => CashFlowSection::Operating,
            Classification::NonCurrent => CashFlowSection::Financing,
        },
        AccountType::Equity => CashFlowSection::Financing,
    }
}

fn build_sections(
    items: Vec<(CashFlowSection, String, Decimal)>,
) -> (CashFlowSectionBody, CashFlowSectionBody, CashFlowSectionBody) {
    let mut operating = CashFlowSectionBody::empty(CashFlowSection::Operating);
    let mut investing = CashFlowSectionBody::empty(CashFlowSection::Investing);
    let mut financing = CashFlowSectionBody::empty(CashFlowSection::Financing);
    for (section, label, amount) in items {
        let body = match section {
            CashFlowSection::Operating => &mut operating,
            CashFlowSection::Investing => &mut investing,
            CashFlowSection::Financing => &mut financing,
        };
        body.total += amount;
        body.items.push(CashFlowItem { label, amount });
    }
    (operating, investing, financing)
}

struct SectionBuilder {
    section: BalanceSheetSection,
    current: Vec<BalanceSheetRow>,
    non_current: Vec<BalanceSheetRow>,
}

fn section_builder(section: BalanceSheetSection) -> SectionBuilder {
    SectionBuilder {
        section,
        current: Vec::new(),
        non_current: Vec::new(),
    }
}

fn push_row(builder: &mut SectionBuilder, row: BalanceSheetRow) {
    match row.classification {
        Classification::Current => builder.current.push(row),
        Classification::NonCurrent => builder.non_current.push(row),
    }
}

fn finish_section(builder: SectionBuilder) -> BalanceSheetSectionBody {
    let current_total: Decimal = builder.current.iter().map(|r| r.amount).sum();
    let non_current_total: Decimal = builder.non_current.iter().map(|r| r.amount).sum();
    BalanceSheetSectionBody {
        section: builder.section,
        total: current_total + non_current_total,
        current: BalanceSheetGroup {
            classification: Classification::Current,
            total: current_total,
            rows: builder.current,
        },
        non_current: BalanceSheetGroup {
            classification: Classification::NonCurrent,
            total: non_current_total,
            rows: builder.non_current,
        },
    }
}
