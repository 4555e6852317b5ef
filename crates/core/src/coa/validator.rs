//! Journal-facing validation against the chart of accounts.

use serde::Serialize;
use tallix_shared::types::{AccountId, Currency};

use super::error::{CoaError, ControlAccountReason};
use super::types::{AccountIndex, AccountType, NormalBalance};
use crate::journal::JournalLine;

/// Advisory finding: a line posts against the account's normal balance.
///
/// Findings never block posting; they are surfaced for review alongside the
/// posting result.
#[derive(Debug, Clone, Serialize)]
pub struct NormalBalanceFinding {
    /// The account posted to.
    pub account_id: AccountId,
    /// Account code for display.
    pub account_code: String,
    /// The account's normal balance side.
    pub normal_balance: NormalBalance,
    /// The side the line actually posted.
    pub posted_side: NormalBalance,
}

/// Stateless validator for candidate journals against the account tree.
pub struct CoaValidator;

impl CoaValidator {
    /// Validates that every referenced account exists and is active.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `AccountInactive` for the first
    /// offending account.
    pub fn validate_accounts_exist(
        index: &AccountIndex,
        account_ids: &[AccountId],
    ) -> Result<(), CoaError> {
        for &id in account_ids {
            let account = index.get(id).ok_or(CoaError::AccountNotFound(id))?;
            if !account.is_active {
                return Err(CoaError::AccountInactive(id));
            }
        }
        Ok(())
    }

    /// Validates that every referenced account is denominated in the journal
    /// currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` for the first account whose currency
    /// differs from the journal currency.
    pub fn validate_currency_consistency(
        index: &AccountIndex,
        account_ids: &[AccountId],
        journal_currency: Currency,
    ) -> Result<(), CoaError> {
        for &id in account_ids {
            let account = index.get(id).ok_or(CoaError::AccountNotFound(id))?;
            if account.currency != journal_currency {
                return Err(CoaError::CurrencyMismatch {
                    account_id: id,
                    account_currency: account.currency,
                    journal_currency,
                });
            }
        }
        Ok(())
    }

    /// Validates that no referenced account is a control account.
    ///
    /// The control predicate is the disjunction of two independent checks,
    /// evaluated against the full account list: `level == 0`, or the account
    /// has children. Both stay explicit so a future tree reshape cannot
    /// silently decouple them.
    ///
    /// # Errors
    ///
    /// Returns `ControlAccountPosting` for the first control account found.
    pub fn validate_control_accounts(
        index: &AccountIndex,
        account_ids: &[AccountId],
    ) -> Result<(), CoaError> {
        for &id in account_ids {
            let account = index.get(id).ok_or(CoaError::AccountNotFound(id))?;
            if account.is_top_level() {
                return Err(CoaError::ControlAccountPosting {
                    account_id: id,
                    reason: ControlAccountReason::TopLevel,
                });
            }
            if index.has_children(id) {
                return Err(CoaError::ControlAccountPosting {
                    account_id: id,
                    reason: ControlAccountReason::HasChildren,
                });
            }
        }
        Ok(())
    }

    /// Flags lines whose debit/credit direction contradicts the account's
    /// normal balance (e.g., a credit to an asset account).
    ///
    /// Advisory only: findings are returned, never raised as errors. Lines
    /// referencing unknown accounts are skipped here; existence is a hard
    /// check elsewhere.
    #[must_use]
    pub fn validate_normal_balances(
        index: &AccountIndex,
        lines: &[JournalLine],
    ) -> Vec<NormalBalanceFinding> {
        let mut findings = Vec::new();
        for line in lines {
            let Some(account) = index.get(line.account_id) else {
                continue;
            };
            let posted_side = if line.debit > line.credit {
                NormalBalance::Debit
            } else {
                NormalBalance::Credit
            };
            if posted_side != account.normal_balance() {
                findings.push(NormalBalanceFinding {
                    account_id: account.id,
                    account_code: account.code.clone(),
                    normal_balance: account.normal_balance(),
                    posted_side,
                });
            }
        }
        findings
    }

    /// Validates that an account is of the type a posting rule requires
    /// (e.g., the AR control target must be an asset account, output tax
    /// must be a liability account).
    ///
    /// # Errors
    ///
    /// Returns `AccountTypeRule` when the type differs.
    pub fn require_account_type(
        index: &AccountIndex,
        account_id: AccountId,
        expected: AccountType,
    ) -> Result<(), CoaError> {
        let account = index
            .get(account_id)
            .ok_or(CoaError::AccountNotFound(account_id))?;
        if account.account_type != expected {
            return Err(CoaError::AccountTypeRule {
                account_id,
                expected,
                found: account.account_type,
            });
        }
        Ok(())
    }
}
