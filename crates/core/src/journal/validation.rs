//! Business rule validation for journals.

use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::Journal;

/// Validates that a journal satisfies the double-entry invariants.
///
/// Checks, in order:
/// 1. At least 2 lines
/// 2. Every line non-negative, single-sided, and non-zero
/// 3. Total debits equal total credits exactly at minor-unit precision
///
/// # Errors
///
/// Returns a [`JournalError`] describing the first violated rule.
pub fn validate_journal(journal: &Journal) -> Result<(), JournalError> {
    if journal.lines.len() < 2 {
        return Err(JournalError::InsufficientLines);
    }

    for (index, line) in journal.lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(JournalError::NegativeAmount { line: index });
        }
        if !line.debit.is_zero() && !line.credit.is_zero() {
            return Err(JournalError::BothSidesSet { line: index });
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(JournalError::EmptyLine { line: index });
        }
    }

    let debits = journal.total_debits();
    let credits = journal.total_credits();
    if debits != credits {
        return Err(JournalError::Unbalanced { debits, credits });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::{JournalKind, JournalLine, JournalStatus};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tallix_shared::types::{AccountId, CompanyId, Currency, JournalId, Scope, TenantId, UserId};

    fn make_journal(lines: Vec<JournalLine>) -> Journal {
        Journal {
            id: JournalId::new(),
            scope: Scope::new(TenantId::new(), CompanyId::new()),
            number: "JRN-000001".to_string(),
            kind: JournalKind::General,
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            currency: Currency::Myr,
            status: JournalStatus::Draft,
            description: "Test".to_string(),
            idempotency_key: None,
            lines,
            fx_review_required: false,
            created_by: UserId::new(),
            posted_by: None,
            posted_at: None,
        }
    }

    #[test]
    fn test_balanced_journal_passes() {
        let journal = make_journal(vec![
            JournalLine::debit(AccountId::new(), dec!(100.00), "Debit"),
            JournalLine::credit(AccountId::new(), dec!(100.00), "Credit"),
        ]);
        assert!(validate_journal(&journal).is_ok());
    }

    #[test]
    fn test_unbalanced_journal_fails() {
        let journal = make_journal(vec![
            JournalLine::debit(AccountId::new(), dec!(100.00), "Debit"),
            JournalLine::credit(AccountId::new(), dec!(50.00), "Credit"),
        ]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_single_line_fails() {
        let journal = make_journal(vec![JournalLine::debit(
            AccountId::new(),
            dec!(100.00),
            "Lonely",
        )]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::InsufficientLines)
        ));
    }

    #[test]
    fn test_negative_amount_fails() {
        let journal = make_journal(vec![
            JournalLine::debit(AccountId::new(), dec!(-100.00), "Negative"),
            JournalLine::credit(AccountId::new(), dec!(-100.00), "Negative"),
        ]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::NegativeAmount { line: 0 })
        ));
    }

    #[test]
    fn test_both_sides_fails() {
        let mut line = JournalLine::debit(AccountId::new(), dec!(100.00), "Both");
        line.credit = dec!(100.00);
        let journal = make_journal(vec![
            line,
            JournalLine::credit(AccountId::new(), dec!(100.00), "Credit"),
        ]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::BothSidesSet { line: 0 })
        ));
    }

    #[test]
    fn test_empty_line_fails() {
        let journal = make_journal(vec![
            JournalLine::debit(AccountId::new(), Decimal::ZERO, "Empty"),
            JournalLine::credit(AccountId::new(), Decimal::ZERO, "Empty"),
        ]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::EmptyLine { line: 0 })
        ));
    }

    #[test]
    fn test_rounding_boundary_is_exact_not_tolerant() {
        // One cent off must fail: the balance invariant is exact at
        // minor-unit precision.
        let journal = make_journal(vec![
            JournalLine::debit(AccountId::new(), dec!(100.00), "Debit"),
            JournalLine::credit(AccountId::new(), dec!(99.99), "Credit"),
        ]);
        assert!(matches!(
            validate_journal(&journal),
            Err(JournalError::Unbalanced { .. })
        ));
    }
}
