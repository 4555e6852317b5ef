//! Chart of accounts validation errors.

use tallix_shared::types::{AccountId, Currency};
use thiserror::Error;

use super::types::AccountType;

/// Why an account was judged to be a control account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAccountReason {
    /// The account sits at level 0 of the tree.
    TopLevel,
    /// The account has child accounts.
    HasChildren,
}

impl std::fmt::Display for ControlAccountReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopLevel => write!(f, "top-level node"),
            Self::HasChildren => write!(f, "has child accounts"),
        }
    }
}

/// Errors raised by chart-of-accounts validation.
#[derive(Debug, Error)]
pub enum CoaError {
    /// Referenced account does not exist in the scope.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account currency differs from the journal currency.
    #[error("Account {account_id} is denominated in {account_currency}, journal is {journal_currency}")]
    CurrencyMismatch {
        /// The offending account.
        account_id: AccountId,
        /// The account's currency.
        account_currency: Currency,
        /// The journal's currency.
        journal_currency: Currency,
    },

    /// Direct posting to a control account.
    #[error("Account {account_id} is a control account ({reason}) and cannot receive direct postings")]
    ControlAccountPosting {
        /// The offending account.
        account_id: AccountId,
        /// Which control predicate matched.
        reason: ControlAccountReason,
    },

    /// Account is not of the type a posting rule requires.
    #[error("Account {account_id} must be of type {expected}, found {found}")]
    AccountTypeRule {
        /// The offending account.
        account_id: AccountId,
        /// The type the rule requires.
        expected: AccountType,
        /// The account's actual type.
        found: AccountType,
    },
}

impl CoaError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::ControlAccountPosting { .. } => "CONTROL_ACCOUNT_POSTING",
            Self::AccountTypeRule { .. } => "ACCOUNT_TYPE_RULE",
        }
    }
}
