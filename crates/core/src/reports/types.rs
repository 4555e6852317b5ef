//! Report data types.
//!
//! Report sections are tagged enums with exhaustive matching, never
//! open-ended key-value maps. No report stores independently maintained
//! totals; every number is a projection of posted journal lines.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tallix_shared::types::{AccountId, Currency, Scope};

use crate::coa::{Classification, NormalBalance};

/// Input for a trial balance.
#[derive(Debug, Clone)]
pub struct TrialBalanceInput {
    /// Tenant/company scope.
    pub scope: Scope,
    /// Window start (inclusive); lines before this date form the opening
    /// balances.
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Report currency, used for the rounding tolerance.
    pub currency: Currency,
}

/// One account row of a trial balance.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Depth in the account tree.
    pub level: u8,
    /// True for control/header rows, whose figures roll up descendants.
    pub is_header: bool,
    /// Balance before the window, signed by normal balance.
    pub opening_balance: Decimal,
    /// Debits within the window.
    pub period_debits: Decimal,
    /// Credits within the window.
    pub period_credits: Decimal,
    /// Balance at the window end, signed by normal balance.
    pub closing_balance: Decimal,
    /// The account's normal balance side.
    pub normal_balance: NormalBalance,
    /// Account currency.
    pub currency: Currency,
}

/// Trial balance totals over leaf rows.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceTotals {
    /// Sum of closing balances of debit-normal leaf accounts.
    pub total_debits: Decimal,
    /// Sum of closing balances of credit-normal leaf accounts.
    pub total_credits: Decimal,
    /// True when the two agree within rounding tolerance.
    pub is_balanced: bool,
    /// Exact difference, never rounded away.
    pub difference: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceReport {
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
    /// Account rows, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals over leaf rows.
    pub totals: TrialBalanceTotals,
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
}

impl TrialBalanceReport {
    /// Finds a row by account.
    #[must_use]
    pub fn row(&self, account_id: AccountId) -> Option<&TrialBalanceRow> {
        self.rows.iter().find(|r| r.account_id == account_id)
    }
}

/// Input for a balance sheet.
#[derive(Debug, Clone)]
pub struct BalanceSheetInput {
    /// Tenant/company scope.
    pub scope: Scope,
    /// Report date; balances include everything posted through this date.
    pub as_of: NaiveDate,
    /// Report currency.
    pub currency: Currency,
}

/// Balance sheet section tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetSection {
    /// Assets.
    Assets,
    /// Liabilities.
    Liabilities,
    /// Equity.
    Equity,
}

/// One account row of a balance sheet section.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetRow {
    /// The account; `None` for the computed retained-earnings row.
    pub account_id: Option<AccountId>,
    /// Account code, empty for computed rows.
    pub code: String,
    /// Row label.
    pub name: String,
    /// Current/non-current grouping.
    pub classification: Classification,
    /// Row amount, natural-positive for the section.
    pub amount: Decimal,
}

/// Rows of one classification within a section.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetGroup {
    /// The grouping.
    pub classification: Classification,
    /// Group total.
    pub total: Decimal,
    /// Rows in the group.
    pub rows: Vec<BalanceSheetRow>,
}

/// One balance sheet section with current/non-current groups.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetSectionBody {
    /// Which section this is.
    pub section: BalanceSheetSection,
    /// Section total.
    pub total: Decimal,
    /// Current rows.
    pub current: BalanceSheetGroup,
    /// Non-current rows.
    pub non_current: BalanceSheetGroup,
}

/// The accounting-equation check a balance sheet must expose.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceCheck {
    /// True when assets equal liabilities plus equity exactly.
    pub assets_equals_liabilities_plus_equity: bool,
    /// Exact imbalance; zero only when the equation holds.
    pub difference: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetReport {
    /// Report date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSectionBody,
    /// Liabilities section.
    pub liabilities: BalanceSheetSectionBody,
    /// Equity section, including the retained-earnings rollforward row.
    pub equity: BalanceSheetSectionBody,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// The net income folded into equity, from the income statement.
    pub net_income: Decimal,
    /// The accounting-equation check.
    pub balance_check: BalanceCheck,
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
}

/// Input for an income statement.
#[derive(Debug, Clone)]
pub struct IncomeStatementInput {
    /// Tenant/company scope.
    pub scope: Scope,
    /// Window start (inclusive).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Report currency.
    pub currency: Currency,
}

/// One account row of an income statement section.
#[derive(Debug, Clone, Serialize)]
pub struct PnlRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Period amount, natural-positive for the section.
    pub amount: Decimal,
}

/// Revenue or expense section of an income statement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PnlSection {
    /// Section total.
    pub total: Decimal,
    /// Rows with activity in the window.
    pub rows: Vec<PnlRow>,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementReport {
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
    /// Revenue section.
    pub revenue: PnlSection,
    /// Expense section.
    pub expenses: PnlSection,
    /// Net income: revenue minus expenses.
    pub net_income: Decimal,
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
}

/// Cash flow computation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowMethod {
    /// Classify cash-account movements directly.
    Direct,
    /// Net income plus working-capital reconciliation adjustments.
    Indirect,
}

/// Input for a cash flow report.
#[derive(Debug, Clone)]
pub struct CashFlowInput {
    /// Tenant/company scope.
    pub scope: Scope,
    /// Window start (inclusive).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Report currency.
    pub currency: Currency,
    /// Computation method.
    pub method: CashFlowMethod,
}

/// Cash flow section tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowSection {
    /// Day-to-day trading activity.
    Operating,
    /// Long-lived asset acquisition and disposal.
    Investing,
    /// Debt and equity funding.
    Financing,
}

/// One line of a cash flow section.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowItem {
    /// Line label.
    pub label: String,
    /// Cash effect (positive = inflow).
    pub amount: Decimal,
}

/// One cash flow section.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowSectionBody {
    /// Which section this is.
    pub section: CashFlowSection,
    /// Section total.
    pub total: Decimal,
    /// Section lines.
    pub items: Vec<CashFlowItem>,
}

impl CashFlowSectionBody {
    /// An empty section.
    #[must_use]
    pub fn empty(section: CashFlowSection) -> Self {
        Self {
            section,
            total: Decimal::ZERO,
            items: Vec::new(),
        }
    }
}

/// Cash flow report.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowReport {
    /// Window start.
    pub from: NaiveDate,
    /// Window end.
    pub to: NaiveDate,
    /// Computation method used.
    pub method: CashFlowMethod,
    /// Cash balance entering the window.
    pub beginning_cash_balance: Decimal,
    /// Cash balance leaving the window.
    pub ending_cash_balance: Decimal,
    /// Sum of the three section totals.
    pub net_change_in_cash: Decimal,
    /// Operating section.
    pub operating: CashFlowSectionBody,
    /// Investing section.
    pub investing: CashFlowSectionBody,
    /// Financing section.
    pub financing: CashFlowSectionBody,
    /// True when beginning + net change equals ending exactly.
    pub is_balanced: bool,
    /// Exact deviation from the invariant; zero when balanced.
    pub difference: Decimal,
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
}
