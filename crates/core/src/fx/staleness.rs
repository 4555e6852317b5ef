//! Staleness classification for exchange rates.
//!
//! Classification drives posting policy, not just display: a posting that
//! uses a rate past the acceptable bound is tagged for downstream audit
//! review. Thresholds come from injected configuration so tests can vary
//! them without global side effects.

use serde::Serialize;
use tallix_shared::config::StalenessThresholds;

/// Staleness band of an exchange rate, by age in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    /// Within the fresh bound (default <= 60 minutes).
    Fresh,
    /// Past the fresh bound but usable (default 60-240 minutes).
    Warning,
    /// Usable but flagged (default 240-1440 minutes).
    Acceptable,
    /// Past the acceptable bound; postings must be flagged for review.
    Stale,
}

impl Staleness {
    /// Classifies a rate age in minutes against the configured thresholds.
    #[must_use]
    pub fn classify(age_minutes: i64, thresholds: &StalenessThresholds) -> Self {
        if age_minutes <= thresholds.fresh_minutes {
            Self::Fresh
        } else if age_minutes <= thresholds.warning_minutes {
            Self::Warning
        } else if age_minutes <= thresholds.acceptable_minutes {
            Self::Acceptable
        } else {
            Self::Stale
        }
    }

    /// Returns true if a posting using a rate of this staleness must be
    /// tagged for downstream audit review.
    #[must_use]
    pub const fn requires_review(self) -> bool {
        matches!(self, Self::Stale)
    }
}
