//! Fiscal period domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tallix_shared::types::{PeriodId, Scope, UserId};

/// Status of a fiscal period.
///
/// Transitions are strictly ordered `open -> closed -> locked`; `locked` is
/// terminal. The serialized forms `open`, `closed` and `locked` are part of
/// the persisted-state contract and must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts postings.
    Open,
    /// Period is closed; postings require an authorized override.
    Closed,
    /// Period is locked; no changes of any kind (terminal).
    Locked,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }

    /// Returns true if the transition to `next` follows the ordered state
    /// machine. Re-opening a closed period is handled separately and is not
    /// a forward transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Closed) | (Self::Closed, Self::Locked)
        )
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fiscal period.
///
/// Created administratively; mutated only by the period lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier.
    pub id: PeriodId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Period code (e.g., "2026-03").
    pub code: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Who closed the period.
    pub closed_by: Option<UserId>,
    /// Why the period was closed, when a reason was given.
    pub close_reason: Option<String>,
    /// When the period was locked.
    pub locked_at: Option<DateTime<Utc>>,
    /// When the period was last re-opened.
    pub reopened_at: Option<DateTime<Utc>>,
    /// Who re-opened the period.
    pub reopened_by: Option<UserId>,
    /// The mandatory reason given on re-open.
    pub open_reason: Option<String>,
}

impl Period {
    /// Creates an open period covering `[start_date, end_date]`.
    #[must_use]
    pub fn open(scope: Scope, code: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: PeriodId::new(),
            scope,
            code: code.into(),
            start_date,
            end_date,
            status: PeriodStatus::Open,
            closed_at: None,
            closed_by: None,
            close_reason: None,
            locked_at: None,
            reopened_at: None,
            reopened_by: None,
            open_reason: None,
        }
    }

    /// Returns true if postings are accepted without an override.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
