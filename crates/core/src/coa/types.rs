//! Chart of accounts domain types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tallix_shared::types::{AccountId, Currency, Scope};

/// The five fundamental account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owners' residual interest (credit-normal).
    Equity,
    /// Income earned (credit-normal).
    Revenue,
    /// Costs incurred (debit-normal).
    Expense,
}

impl AccountType {
    /// The side on which this account type ordinarily carries a balance.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The side (debit/credit) on which an account ordinarily carries a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (liabilities, equity, revenue).
    Credit,
}

/// Account subtype used for report grouping and posting type rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Cash on hand.
    Cash,
    /// Bank accounts.
    Bank,
    /// Trade receivables.
    AccountsReceivable,
    /// Other current assets.
    OtherCurrentAsset,
    /// Property, plant, and equipment.
    FixedAsset,
    /// Trade payables.
    AccountsPayable,
    /// Output tax payable.
    TaxPayable,
    /// Other current liabilities.
    OtherCurrentLiability,
    /// Long-term borrowings.
    LongTermLiability,
    /// Contributed capital.
    ShareCapital,
    /// Accumulated earnings.
    RetainedEarnings,
    /// Core trading revenue.
    OperatingRevenue,
    /// Non-trading revenue.
    OtherRevenue,
    /// Direct cost of sales.
    CostOfSales,
    /// Operating expenses.
    OperatingExpense,
    /// Non-operating expenses.
    OtherExpense,
}

impl AccountSubtype {
    /// Returns true if the subtype represents cash or cash equivalents.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::Cash | Self::Bank)
    }
}

/// Current vs non-current classification for balance sheet grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Expected to convert or settle within one year.
    Current,
    /// Held or owed beyond one year.
    NonCurrent,
}

/// A node in the chart of accounts tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Account code, unique per scope (e.g., "1100").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Fundamental type.
    pub account_type: AccountType,
    /// Parent account, forming a tree. `None` for top-level nodes.
    pub parent_id: Option<AccountId>,
    /// Depth in the tree; 0 is a top-level control node.
    pub level: u8,
    /// Whether the account may be used at all.
    pub is_active: bool,
    /// Account currency.
    pub currency: Currency,
    /// Subtype for report grouping.
    pub subtype: Option<AccountSubtype>,
}

impl Account {
    /// The side on which this account ordinarily carries a balance.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Returns true if this is a top-level (level 0) node.
    ///
    /// Top-level nodes are control accounts regardless of whether they
    /// currently have children.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.level == 0
    }

    /// Returns true if this account holds cash or cash equivalents.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.subtype.is_some_and(AccountSubtype::is_cash)
    }

    /// Current/non-current classification for balance sheet grouping.
    ///
    /// Falls back on type defaults when no subtype is set: assets and
    /// liabilities are current unless the subtype says otherwise.
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self.subtype {
            Some(AccountSubtype::FixedAsset | AccountSubtype::LongTermLiability) => {
                Classification::NonCurrent
            }
            Some(AccountSubtype::ShareCapital | AccountSubtype::RetainedEarnings) => {
                Classification::NonCurrent
            }
            None if matches!(self.account_type, AccountType::Equity) => Classification::NonCurrent,
            _ => Classification::Current,
        }
    }
}

/// An index over the full account list for a scope.
///
/// Control-account checks look up children against the full list, not just
/// the accounts referenced by a candidate journal.
#[derive(Debug, Clone)]
pub struct AccountIndex {
    by_id: HashMap<AccountId, Account>,
    children: HashMap<AccountId, Vec<AccountId>>,
}

impl AccountIndex {
    /// Builds an index from the full account list for a scope.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        let mut children: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
        for account in &accounts {
            if let Some(parent_id) = account.parent_id {
                children.entry(parent_id).or_default().push(account.id);
            }
        }
        let by_id = accounts.into_iter().map(|a| (a.id, a)).collect();
        Self { by_id, children }
    }

    /// Looks up an account by ID.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id)
    }

    /// Returns true if the account has child accounts.
    ///
    /// An account with children is a control account even when its level
    /// is non-zero; this predicate is independent of [`Account::is_top_level`].
    #[must_use]
    pub fn has_children(&self, id: AccountId) -> bool {
        self.children.get(&id).is_some_and(|c| !c.is_empty())
    }

    /// Direct children of an account.
    #[must_use]
    pub fn children_of(&self, id: AccountId) -> &[AccountId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the account is a control account: top-level or with
    /// children. Control accounts must never receive a direct posting.
    #[must_use]
    pub fn is_control(&self, account: &Account) -> bool {
        account.is_top_level() || self.has_children(account.id)
    }

    /// Iterates all accounts in the index.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.by_id.values()
    }

    /// Number of accounts in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the index holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
