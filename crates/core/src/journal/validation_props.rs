//! Property tests for journal balance validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tallix_shared::types::{AccountId, CompanyId, Currency, JournalId, Scope, TenantId, UserId};

use super::types::{Journal, JournalKind, JournalLine, JournalStatus};
use super::validation::validate_journal;

fn make_journal(lines: Vec<JournalLine>) -> Journal {
    Journal {
        id: JournalId::new(),
        scope: Scope::new(TenantId::new(), CompanyId::new()),
        number: "JRN-000001".to_string(),
        kind: JournalKind::General,
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        currency: Currency::Myr,
        status: JournalStatus::Draft,
        description: "prop".to_string(),
        idempotency_key: None,
        lines,
        fx_review_required: false,
        created_by: UserId::new(),
        posted_by: None,
        posted_at: None,
    }
}

/// Strategy for positive amounts in minor units (cents).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A journal built by mirroring every debit with an equal credit always
    /// validates.
    #[test]
    fn prop_mirrored_lines_always_balance(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
        let mut lines = Vec::new();
        for amount in &amounts {
            lines.push(JournalLine::debit(AccountId::new(), *amount, "d"));
            lines.push(JournalLine::credit(AccountId::new(), *amount, "c"));
        }
        let journal = make_journal(lines);
        prop_assert!(validate_journal(&journal).is_ok());
        prop_assert!(journal.is_balanced());
    }

    /// Perturbing a single credit line by any non-zero delta breaks the
    /// balance invariant and validation must reject the journal.
    #[test]
    fn prop_perturbed_journal_never_validates(
        amounts in prop::collection::vec(amount_strategy(), 1..10),
        delta in 1i64..1_000i64,
    ) {
        let mut lines = Vec::new();
        for amount in &amounts {
            lines.push(JournalLine::debit(AccountId::new(), *amount, "d"));
            lines.push(JournalLine::credit(AccountId::new(), *amount, "c"));
        }
        // Push the final credit off balance by `delta` cents.
        let last = lines.len() - 1;
        lines[last].credit += Decimal::new(delta, 2);

        let journal = make_journal(lines);
        let is_unbalanced = matches!(
            validate_journal(&journal),
            Err(super::error::JournalError::Unbalanced { .. })
        );
        prop_assert!(is_unbalanced);
    }

    /// Total debits always equal the sum of per-line debits; validation never
    /// mutates the journal.
    #[test]
    fn prop_totals_are_pure_sums(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
        let mut lines = Vec::new();
        for amount in &amounts {
            lines.push(JournalLine::debit(AccountId::new(), *amount, "d"));
            lines.push(JournalLine::credit(AccountId::new(), *amount, "c"));
        }
        let journal = make_journal(lines);
        let expected: Decimal = amounts.iter().copied().sum();
        prop_assert_eq!(journal.total_debits(), expected);
        prop_assert_eq!(journal.total_credits(), expected);
    }
}
