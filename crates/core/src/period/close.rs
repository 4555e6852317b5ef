//! Period close request and readiness types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tallix_shared::types::{JournalId, PeriodId, Scope, UserId};

use super::types::Period;
use crate::authz::UserRole;

/// Request to close a fiscal period.
#[derive(Debug, Clone)]
pub struct CloseRequest {
    /// Tenant/company scope.
    pub scope: Scope,
    /// The period to close.
    pub fiscal_period_id: PeriodId,
    /// Business date of the close.
    pub close_date: NaiveDate,
    /// Who is closing the period.
    pub closed_by: UserId,
    /// The closer's role.
    pub user_role: UserRole,
    /// Optional reason recorded on the period.
    pub close_reason: Option<String>,
    /// Close even when blocking checks fail; requires an authorized role.
    pub force_close: bool,
    /// Generate reversing entries for the period's adjustment journals.
    pub generate_reversing_entries: bool,
}

/// Outcome of the close-readiness check.
///
/// Blocking checks decide `can_close`; warnings never block but are always
/// surfaced.
#[derive(Debug, Clone, Serialize)]
pub struct CloseReadiness {
    /// No journal in the period is left in draft or pending approval.
    pub all_journals_posted: bool,
    /// The period's trial balance is balanced.
    pub trial_balance_balanced: bool,
    /// No unreconciled bank transactions dated within the period.
    pub no_unreconciled_bank_transactions: bool,
    /// Required period-end adjustments are recorded (always true when
    /// policy does not require them).
    pub adjustments_recorded: bool,
    /// Segregation of duties holds: the closer is not the sole preparer
    /// where policy requires dual control.
    pub sod_compliant: bool,
    /// Policy threshold requires an approving role for this close.
    pub approval_required: bool,
    /// The approval requirement is satisfied (vacuously true when no
    /// approval is required).
    pub approval_satisfied: bool,
    /// True when every blocking check passes, or the close was forced by an
    /// authorized role.
    pub can_close: bool,
    /// Non-blocking findings surfaced to the caller.
    pub warnings: Vec<String>,
}

impl CloseReadiness {
    /// Returns true when every blocking check passes.
    #[must_use]
    pub fn blocking_checks_pass(&self) -> bool {
        self.all_journals_posted
            && self.trial_balance_balanced
            && self.no_unreconciled_bank_transactions
            && self.adjustments_recorded
            && self.sod_compliant
            && self.approval_satisfied
    }
}

/// Result of a close request.
#[derive(Debug, Clone)]
pub struct CloseOutcome {
    /// The period after the request; unchanged when `can_close` was false.
    pub period: Period,
    /// The readiness assessment.
    pub readiness: CloseReadiness,
    /// Reversing journals generated, when requested.
    pub reversing_journal_ids: Vec<JournalId>,
    /// The next period opened automatically, when policy asks for it.
    pub next_period_opened: Option<PeriodId>,
    /// When the period transitioned; `None` when the close was blocked.
    pub closed_at: Option<DateTime<Utc>>,
}
