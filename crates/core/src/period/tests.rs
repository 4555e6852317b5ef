//! Period manager tests against the in-memory test store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallix_shared::config::ClosePolicy;
use tallix_shared::types::{Currency, JournalId, PeriodId, Scope, UserId};

use super::close::CloseRequest;
use super::manager::PeriodManager;
use super::types::{Period, PeriodStatus};
use crate::authz::UserRole;
use crate::journal::{Journal, JournalKind, JournalLine, JournalStatus};
use crate::period::error::PeriodError;
use crate::store::LedgerStore;
use crate::testutil::{seed_standard_coa, test_scope, StandardAccounts, TestStore};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    store: TestStore,
    scope: Scope,
    accounts: StandardAccounts,
    period_id: PeriodId,
}

fn fixture() -> Fixture {
    let store = TestStore::new();
    let scope = test_scope();
    let accounts = seed_standard_coa(&store, scope, Currency::Myr);
    let period = Period::open(scope, "2026-03", ymd(2026, 3, 1), ymd(2026, 3, 31));
    let period_id = period.id;
    store.add_period(period);
    Fixture {
        store,
        scope,
        accounts,
        period_id,
    }
}

fn add_journal(
    fix: &Fixture,
    date: NaiveDate,
    status: JournalStatus,
    kind: JournalKind,
    created_by: UserId,
    lines: Vec<JournalLine>,
) {
    fix.store.add_journal(Journal {
        id: JournalId::new(),
        scope: fix.scope,
        number: format!("JRN-{date}-{status}"),
        kind,
        date,
        currency: Currency::Myr,
        status,
        description: "period test".to_string(),
        idempotency_key: None,
        lines,
        fx_review_required: false,
        created_by,
        posted_by: None,
        posted_at: None,
    });
}

fn balanced_lines(fix: &Fixture, amount: Decimal) -> Vec<JournalLine> {
    vec![
        JournalLine::debit(fix.accounts.ar, amount, "d"),
        JournalLine::credit(fix.accounts.sales, amount, "c"),
    ]
}

fn close_request(fix: &Fixture, user_role: UserRole) -> CloseRequest {
    CloseRequest {
        scope: fix.scope,
        fiscal_period_id: fix.period_id,
        close_date: ymd(2026, 3, 31),
        closed_by: UserId::new(),
        user_role,
        close_reason: Some("month-end".to_string()),
        force_close: false,
        generate_reversing_entries: false,
    }
}

fn manager<'a>(store: &'a TestStore, policy: ClosePolicy) -> PeriodManager<'a, TestStore> {
    PeriodManager::new(store, policy, Currency::Myr)
}

#[test]
fn test_close_succeeds_with_clean_period() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Posted,
        JournalKind::Invoice,
        UserId::new(),
        balanced_lines(&fix, dec!(1000.00)),
    );

    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    assert!(outcome.readiness.can_close);
    assert!(outcome.readiness.all_journals_posted);
    assert!(outcome.readiness.trial_balance_balanced);
    assert_eq!(outcome.period.status, PeriodStatus::Closed);
    assert!(outcome.closed_at.is_some());

    let stored = fix.store.period(&fix.scope, fix.period_id).unwrap().unwrap();
    assert_eq!(stored.status, PeriodStatus::Closed);
}

#[test]
fn test_draft_journal_blocks_close_and_period_stays_open() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Draft,
        JournalKind::General,
        UserId::new(),
        balanced_lines(&fix, dec!(100.00)),
    );

    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    assert!(!outcome.readiness.can_close);
    assert!(!outcome.readiness.all_journals_posted);
    assert!(outcome.closed_at.is_none());

    let stored = fix.store.period(&fix.scope, fix.period_id).unwrap().unwrap();
    assert_eq!(stored.status, PeriodStatus::Open);
}

#[test]
fn test_pending_approval_journal_blocks_close() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::PendingApproval,
        JournalKind::General,
        UserId::new(),
        balanced_lines(&fix, dec!(100.00)),
    );

    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(!outcome.readiness.all_journals_posted);
    assert!(!outcome.readiness.can_close);
}

#[test]
fn test_unbalanced_trial_balance_blocks_close() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Posted,
        JournalKind::General,
        UserId::new(),
        vec![
            JournalLine::debit(fix.accounts.ar, dec!(100.00), "d"),
            JournalLine::credit(fix.accounts.sales, dec!(60.00), "c"),
        ],
    );

    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(!outcome.readiness.trial_balance_balanced);
    assert!(!outcome.readiness.can_close);
}

#[test]
fn test_unreconciled_bank_transactions_block_close() {
    let fix = fixture();
    fix.store.set_unreconciled(fix.scope, 3);

    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(!outcome.readiness.no_unreconciled_bank_transactions);
    assert!(!outcome.readiness.can_close);
}

#[test]
fn test_adjustment_policy_blocks_until_recorded() {
    let fix = fixture();
    let policy = ClosePolicy {
        require_adjustments: true,
        ..ClosePolicy::default()
    };

    let outcome = manager(&fix.store, policy.clone())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(!outcome.readiness.adjustments_recorded);
    assert!(!outcome.readiness.can_close);

    add_journal(
        &fix,
        ymd(2026, 3, 31),
        JournalStatus::Posted,
        JournalKind::Adjustment,
        UserId::new(),
        balanced_lines(&fix, dec!(50.00)),
    );
    let outcome = manager(&fix.store, policy)
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(outcome.readiness.adjustments_recorded);
    assert!(outcome.readiness.can_close);
}

#[test]
fn test_sod_blocks_sole_preparer_under_dual_control() {
    let fix = fixture();
    let closer = UserId::new();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Posted,
        JournalKind::General,
        closer,
        balanced_lines(&fix, dec!(100.00)),
    );

    let policy = ClosePolicy {
        dual_control: true,
        ..ClosePolicy::default()
    };
    let mut request = close_request(&fix, UserRole::Controller);
    request.closed_by = closer;

    let outcome = manager(&fix.store, policy.clone())
        .close_period(&request)
        .unwrap();
    assert!(!outcome.readiness.sod_compliant);
    assert!(!outcome.readiness.can_close);

    // A different closer satisfies dual control.
    let request = close_request(&fix, UserRole::Controller);
    let outcome = manager(&fix.store, policy).close_period(&request).unwrap();
    assert!(outcome.readiness.sod_compliant);
}

#[test]
fn test_approval_threshold_requires_approving_role() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Posted,
        JournalKind::Invoice,
        UserId::new(),
        balanced_lines(&fix, dec!(250000.00)),
    );
    let policy = ClosePolicy {
        approval_threshold: Some(dec!(100000)),
        ..ClosePolicy::default()
    };

    // An accountant may close, but this close needs approval.
    let outcome = manager(&fix.store, policy.clone())
        .close_period(&close_request(&fix, UserRole::Accountant))
        .unwrap();
    assert!(outcome.readiness.approval_required);
    assert!(!outcome.readiness.approval_satisfied);
    assert!(!outcome.readiness.can_close);

    // A controller satisfies the approval requirement.
    let outcome = manager(&fix.store, policy)
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(outcome.readiness.approval_required);
    assert!(outcome.readiness.approval_satisfied);
    assert!(outcome.readiness.can_close);
}

#[test]
fn test_force_close_requires_authorized_role() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 15),
        JournalStatus::Draft,
        JournalKind::General,
        UserId::new(),
        balanced_lines(&fix, dec!(100.00)),
    );

    let mut request = close_request(&fix, UserRole::Accountant);
    request.force_close = true;
    let error = manager(&fix.store, ClosePolicy::default())
        .close_period(&request)
        .unwrap_err();
    assert!(matches!(error, PeriodError::NotAuthorized { .. }));

    let mut request = close_request(&fix, UserRole::Controller);
    request.force_close = true;
    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&request)
        .unwrap();
    assert!(outcome.readiness.can_close);
    assert_eq!(outcome.period.status, PeriodStatus::Closed);
    assert!(outcome
        .readiness
        .warnings
        .iter()
        .any(|w| w.contains("forced")));
}

#[test]
fn test_clerk_cannot_close() {
    let fix = fixture();
    let error = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Clerk))
        .unwrap_err();
    assert!(matches!(error, PeriodError::NotAuthorized { .. }));
}

#[test]
fn test_lock_on_close_policy() {
    let fix = fixture();
    let policy = ClosePolicy {
        lock_on_close: true,
        ..ClosePolicy::default()
    };
    let outcome = manager(&fix.store, policy)
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert_eq!(outcome.period.status, PeriodStatus::Locked);
    assert!(outcome.period.locked_at.is_some());
}

#[test]
fn test_close_auto_opens_next_period() {
    let fix = fixture();
    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    let next_id = outcome.next_period_opened.unwrap();
    let next = fix.store.period(&fix.scope, next_id).unwrap().unwrap();
    assert_eq!(next.status, PeriodStatus::Open);
    assert_eq!(next.start_date, ymd(2026, 4, 1));
    assert_eq!(next.end_date, ymd(2026, 4, 30));
    assert_eq!(next.code, "2026-04");
}

#[test]
fn test_close_does_not_duplicate_existing_next_period() {
    let fix = fixture();
    fix.store
        .add_period(Period::open(fix.scope, "2026-04", ymd(2026, 4, 1), ymd(2026, 4, 30)));
    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    assert!(outcome.next_period_opened.is_none());
}

#[test]
fn test_reversing_entries_generated_for_adjustments() {
    let fix = fixture();
    add_journal(
        &fix,
        ymd(2026, 3, 31),
        JournalStatus::Posted,
        JournalKind::Adjustment,
        UserId::new(),
        vec![
            JournalLine::debit(fix.accounts.rent, dec!(400.00), "Accrued rent"),
            JournalLine::credit(fix.accounts.ap, dec!(400.00), "Accrued rent"),
        ],
    );

    let mut request = close_request(&fix, UserRole::Controller);
    request.generate_reversing_entries = true;
    let outcome = manager(&fix.store, ClosePolicy::default())
        .close_period(&request)
        .unwrap();

    assert_eq!(outcome.reversing_journal_ids.len(), 1);
    let journals = fix
        .store
        .journals(
            &fix.scope,
            &crate::store::JournalFilter {
                kind: Some(JournalKind::Reversal),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(journals.len(), 1);
    let reversal = &journals[0];
    assert_eq!(reversal.status, JournalStatus::Draft);
    assert_eq!(reversal.date, ymd(2026, 4, 1));
    // Debits and credits swapped.
    assert_eq!(reversal.lines[0].account_id, fix.accounts.rent);
    assert_eq!(reversal.lines[0].credit, dec!(400.00));
    assert_eq!(reversal.lines[1].account_id, fix.accounts.ap);
    assert_eq!(reversal.lines[1].debit, dec!(400.00));
    assert!(reversal.lines[0].description.starts_with("Reversal: "));
    assert!(reversal.is_balanced());
}

#[test]
fn test_close_already_closed_period_rejected() {
    let fix = fixture();
    let manager = manager(&fix.store, ClosePolicy::default());
    manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();
    let error = manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap_err();
    assert!(matches!(error, PeriodError::AlreadyClosed));
}

#[test]
fn test_close_locked_period_rejected() {
    let fix = fixture();
    let mut locked = fix.store.period(&fix.scope, fix.period_id).unwrap().unwrap();
    locked.status = PeriodStatus::Locked;
    fix.store.save_period(&locked).unwrap();

    let error = manager(&fix.store, ClosePolicy::default())
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap_err();
    assert!(matches!(error, PeriodError::PeriodLocked));
}

#[test]
fn test_close_unknown_period_rejected() {
    let fix = fixture();
    let mut request = close_request(&fix, UserRole::Controller);
    request.fiscal_period_id = PeriodId::new();
    let error = manager(&fix.store, ClosePolicy::default())
        .close_period(&request)
        .unwrap_err();
    assert!(matches!(error, PeriodError::NotFound(_)));
}

#[test]
fn test_reopen_closed_period() {
    let fix = fixture();
    let manager = manager(&fix.store, ClosePolicy::default());
    manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    let reopened = manager
        .reopen_period(
            &fix.scope,
            fix.period_id,
            "late vendor bill",
            UserId::new(),
            UserRole::Controller,
        )
        .unwrap();
    assert_eq!(reopened.status, PeriodStatus::Open);
    assert_eq!(reopened.open_reason.as_deref(), Some("late vendor bill"));
    assert!(reopened.reopened_at.is_some());
}

#[test]
fn test_reopen_requires_reason() {
    let fix = fixture();
    let manager = manager(&fix.store, ClosePolicy::default());
    manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    let error = manager
        .reopen_period(&fix.scope, fix.period_id, "  ", UserId::new(), UserRole::Controller)
        .unwrap_err();
    assert!(matches!(error, PeriodError::ReopenRequiresReason));
}

#[test]
fn test_reopen_requires_authorized_role() {
    let fix = fixture();
    let manager = manager(&fix.store, ClosePolicy::default());
    manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    let error = manager
        .reopen_period(
            &fix.scope,
            fix.period_id,
            "late bill",
            UserId::new(),
            UserRole::Accountant,
        )
        .unwrap_err();
    assert!(matches!(error, PeriodError::NotAuthorized { .. }));
}

#[test]
fn test_reopen_locked_period_rejected() {
    let fix = fixture();
    let policy = ClosePolicy {
        lock_on_close: true,
        ..ClosePolicy::default()
    };
    let manager = manager(&fix.store, policy);
    manager
        .close_period(&close_request(&fix, UserRole::Controller))
        .unwrap();

    let error = manager
        .reopen_period(
            &fix.scope,
            fix.period_id,
            "attempt",
            UserId::new(),
            UserRole::Admin,
        )
        .unwrap_err();
    assert!(matches!(error, PeriodError::PeriodLocked));
}

#[test]
fn test_reopen_open_period_rejected() {
    let fix = fixture();
    let error = manager(&fix.store, ClosePolicy::default())
        .reopen_period(
            &fix.scope,
            fix.period_id,
            "not closed yet",
            UserId::new(),
            UserRole::Controller,
        )
        .unwrap_err();
    assert!(matches!(error, PeriodError::NotClosed));
}
