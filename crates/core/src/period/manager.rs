//! The period lifecycle manager.
//!
//! Drives the `open -> closed -> locked` state machine: close-readiness
//! assessment, the close transition itself, reversing-entry generation,
//! auto-opening the next period, and the separately-authorized re-open of a
//! closed period.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tallix_shared::config::ClosePolicy;
use tallix_shared::types::{Currency, JournalId, PeriodId, Scope, UserId};
use tracing::{info, warn};

use super::close::{CloseOutcome, CloseReadiness, CloseRequest};
use super::error::PeriodError;
use super::types::{Period, PeriodStatus};
use crate::authz::UserRole;
use crate::journal::{Journal, JournalKind, JournalLine, JournalStatus};
use crate::posting::format_journal_number;
use crate::reports::{ReportService, TrialBalanceInput};
use crate::store::{JournalFilter, LedgerStore};

/// Manages fiscal period transitions against a [`LedgerStore`].
pub struct PeriodManager<'a, S: LedgerStore> {
    store: &'a S,
    policy: ClosePolicy,
    base_currency: Currency,
}

impl<'a, S: LedgerStore> PeriodManager<'a, S> {
    /// Creates a period manager with the given close policy.
    #[must_use]
    pub const fn new(store: &'a S, policy: ClosePolicy, base_currency: Currency) -> Self {
        Self {
            store,
            policy,
            base_currency,
        }
    }

    /// Runs the close-readiness check and, when it passes (or the close is
    /// forced by an authorized role), transitions the period to `closed`
    /// (or straight to `locked` when policy mandates).
    ///
    /// A blocked close is NOT an error: the outcome carries
    /// `readiness.can_close = false` and the period remains open.
    ///
    /// # Errors
    ///
    /// Returns an error when the period is missing or locked, the caller's
    /// role may not close (or force-close) periods, or a store/report
    /// failure prevents the assessment.
    pub fn close_period(&self, request: &CloseRequest) -> Result<CloseOutcome, PeriodError> {
        let period = self
            .store
            .period(&request.scope, request.fiscal_period_id)?
            .ok_or(PeriodError::NotFound(request.fiscal_period_id))?;
        match period.status {
            PeriodStatus::Locked => return Err(PeriodError::PeriodLocked),
            PeriodStatus::Closed => return Err(PeriodError::AlreadyClosed),
            PeriodStatus::Open => {}
        }
        if !request.user_role.can_close_period() {
            return Err(PeriodError::NotAuthorized {
                action: "close periods",
                role: request.user_role,
            });
        }

        let mut readiness = self.assess_readiness(&period, request)?;

        if readiness.blocking_checks_pass() {
            readiness.can_close = true;
        } else if request.force_close {
            if !request.user_role.can_force_close() {
                return Err(PeriodError::NotAuthorized {
                    action: "force-close periods",
                    role: request.user_role,
                });
            }
            warn!(period = %period.code, closed_by = %request.closed_by, "force-closing period past failing checks");
            readiness
                .warnings
                .push("close forced past failing readiness checks".to_string());
            readiness.can_close = true;
        }

        if !readiness.can_close {
            info!(period = %period.code, "close blocked by readiness checks");
            return Ok(CloseOutcome {
                period,
                readiness,
                reversing_journal_ids: Vec::new(),
                next_period_opened: None,
                closed_at: None,
            });
        }

        // Transition: open -> closed, then closed -> locked when policy
        // mandates an immediate lock.
        let closed_at = Utc::now();
        let mut closed = period.clone();
        debug_assert!(closed.status.can_transition_to(PeriodStatus::Closed));
        closed.status = PeriodStatus::Closed;
        closed.closed_at = Some(closed_at);
        closed.closed_by = Some(request.closed_by);
        closed.close_reason = request.close_reason.clone();
        if self.policy.lock_on_close {
            debug_assert!(closed.status.can_transition_to(PeriodStatus::Locked));
            closed.status = PeriodStatus::Locked;
            closed.locked_at = Some(closed_at);
        }
        self.store.save_period(&closed)?;

        let reversing_journal_ids = if request.generate_reversing_entries {
            self.generate_reversing_entries(&period, request)?
        } else {
            Vec::new()
        };

        let next_period_opened = if self.policy.auto_open_next {
            self.open_next_period(&period)?
        } else {
            None
        };

        info!(
            period = %closed.code,
            status = %closed.status,
            reversing = reversing_journal_ids.len(),
            "period closed"
        );
        Ok(CloseOutcome {
            period: closed,
            readiness,
            reversing_journal_ids,
            next_period_opened,
            closed_at: Some(closed_at),
        })
    }

    /// Re-opens a closed (never locked) period. Requires an authorized role
    /// and an explicit reason.
    ///
    /// # Errors
    ///
    /// Returns an error when the period is missing, not closed, locked, the
    /// reason is empty, or the role is not authorized.
    pub fn reopen_period(
        &self,
        scope: &Scope,
        period_id: PeriodId,
        open_reason: &str,
        reopened_by: UserId,
        user_role: UserRole,
    ) -> Result<Period, PeriodError> {
        if !user_role.can_reopen_period() {
            return Err(PeriodError::NotAuthorized {
                action: "re-open periods",
                role: user_role,
            });
        }
        if open_reason.trim().is_empty() {
            return Err(PeriodError::ReopenRequiresReason);
        }
        let period = self
            .store
            .period(scope, period_id)?
            .ok_or(PeriodError::NotFound(period_id))?;
        match period.status {
            PeriodStatus::Locked => return Err(PeriodError::PeriodLocked),
            PeriodStatus::Open => return Err(PeriodError::NotClosed),
            PeriodStatus::Closed => {}
        }

        let mut reopened = period;
        reopened.status = PeriodStatus::Open;
        reopened.reopened_at = Some(Utc::now());
        reopened.reopened_by = Some(reopened_by);
        reopened.open_reason = Some(open_reason.to_string());
        self.store.save_period(&reopened)?;
        info!(period = %reopened.code, reason = open_reason, "period re-opened");
        Ok(reopened)
    }

    /// Computes the close-readiness checks for a period.
    fn assess_readiness(
        &self,
        period: &Period,
        request: &CloseRequest,
    ) -> Result<CloseReadiness, PeriodError> {
        let journals = self.store.journals(
            &request.scope,
            &JournalFilter {
                from: Some(period.start_date),
                to: Some(period.end_date),
                ..JournalFilter::default()
            },
        )?;

        let all_journals_posted = journals.iter().all(|j| j.status == JournalStatus::Posted);

        let trial_balance = ReportService::new(self.store).trial_balance(&TrialBalanceInput {
            scope: request.scope,
            from: period.start_date,
            to: period.end_date,
            currency: self.base_currency,
        })?;
        let trial_balance_balanced = trial_balance.totals.is_balanced;

        let unreconciled = self.store.unreconciled_bank_count(
            &request.scope,
            period.start_date,
            period.end_date,
        )?;

        let adjustments_recorded = !self.policy.require_adjustments
            || journals
                .iter()
                .any(|j| j.kind == JournalKind::Adjustment && j.status == JournalStatus::Posted);

        // SoD: under dual control the closer must not be the sole preparer
        // of the period's journals.
        let sole_preparer =
            !journals.is_empty() && journals.iter().all(|j| j.created_by == request.closed_by);
        let sod_compliant = !self.policy.dual_control || !sole_preparer;

        let period_activity: Decimal = journals
            .iter()
            .filter(|j| j.status == JournalStatus::Posted)
            .map(Journal::total_debits)
            .sum();
        let approval_required = self
            .policy
            .approval_threshold
            .is_some_and(|threshold| period_activity >= threshold);
        let approval_satisfied = !approval_required || request.user_role.can_approve_close();

        let mut warnings = Vec::new();
        if journals.is_empty() {
            warnings.push("period has no journals".to_string());
        }
        let fx_flagged = journals.iter().filter(|j| j.fx_review_required).count();
        if fx_flagged > 0 {
            warnings.push(format!("{fx_flagged} journal(s) flagged for FX review"));
        }
        if request.close_date < period.end_date {
            warnings.push(format!(
                "closing on {} before period end {}",
                request.close_date, period.end_date
            ));
        }

        Ok(CloseReadiness {
            all_journals_posted,
            trial_balance_balanced,
            no_unreconciled_bank_transactions: unreconciled == 0,
            adjustments_recorded,
            sod_compliant,
            approval_required,
            approval_satisfied,
            can_close: false,
            warnings,
        })
    }

    /// Builds draft reversing journals for the period's posted adjustment
    /// journals, dated the first day of the following period, with debits
    /// and credits swapped.
    fn generate_reversing_entries(
        &self,
        period: &Period,
        request: &CloseRequest,
    ) -> Result<Vec<JournalId>, PeriodError> {
        let adjustments = self.store.journals(
            &request.scope,
            &JournalFilter {
                from: Some(period.start_date),
                to: Some(period.end_date),
                status: Some(JournalStatus::Posted),
                kind: Some(JournalKind::Adjustment),
            },
        )?;
        let Some(reversal_date) = period.end_date.succ_opt() else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::with_capacity(adjustments.len());
        for original in &adjustments {
            let lines = original
                .lines
                .iter()
                .map(|line| {
                    if line.debit > Decimal::ZERO {
                        JournalLine::credit(
                            line.account_id,
                            line.debit,
                            format!("Reversal: {}", line.description),
                        )
                    } else {
                        JournalLine::debit(
                            line.account_id,
                            line.credit,
                            format!("Reversal: {}", line.description),
                        )
                    }
                })
                .collect();
            let reversal = Journal {
                id: JournalId::new(),
                scope: request.scope,
                number: format_journal_number(self.store.next_journal_number(&request.scope)?),
                kind: JournalKind::Reversal,
                date: reversal_date,
                currency: original.currency,
                status: JournalStatus::Draft,
                description: format!("Reversal of {}", original.number),
                idempotency_key: None,
                lines,
                fx_review_required: false,
                created_by: request.closed_by,
                posted_by: None,
                posted_at: None,
            };
            self.store.insert_journal(&reversal)?;
            ids.push(reversal.id);
        }
        Ok(ids)
    }

    /// Opens the period following the closed one unless one already covers
    /// the next day.
    fn open_next_period(&self, period: &Period) -> Result<Option<PeriodId>, PeriodError> {
        let Some(next_start) = period.end_date.succ_opt() else {
            return Ok(None);
        };
        if self.store.period_for_date(&period.scope, next_start)?.is_some() {
            return Ok(None);
        }
        let next_end = month_end(next_start);
        let code = format!("{:04}-{:02}", next_start.year(), next_start.month());
        let next = Period::open(period.scope, code, next_start, next_end);
        self.store.save_period(&next)?;
        info!(period = %next.code, "next period opened");
        Ok(Some(next.id))
    }
}

/// Last day of the month containing `date`.
fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}
