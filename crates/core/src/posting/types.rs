//! Posting engine input/output types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tallix_shared::types::{JournalId, UserId};

use crate::authz::UserRole;
use crate::coa::NormalBalanceFinding;

/// Caller context for a posting request.
#[derive(Debug, Clone)]
pub struct PostingContext {
    /// The user performing the posting.
    pub user_id: UserId,
    /// The user's role.
    pub user_role: UserRole,
    /// The moment of posting, recorded on the journal and used for FX
    /// staleness classification. Supplied by the caller; the core takes no
    /// implicit "now".
    pub posted_at: DateTime<Utc>,
    /// Idempotency key over the normalized input, when the transport layer
    /// provides one. Re-invocation with the same key returns the original
    /// result and writes nothing.
    pub idempotency_key: Option<String>,
    /// Explicit request to post into a closed period; requires an
    /// authorized role.
    pub period_override: bool,
}

impl PostingContext {
    /// Creates a context with no idempotency key and no override.
    #[must_use]
    pub fn new(user_id: UserId, user_role: UserRole, posted_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            user_role,
            posted_at,
            idempotency_key: None,
            period_override: false,
        }
    }

    /// Attaches an idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Requests posting into a closed period.
    #[must_use]
    pub fn with_period_override(mut self) -> Self {
        self.period_override = true;
        self
    }
}

/// Result of a successful posting.
#[derive(Debug, Clone, Serialize)]
pub struct PostingResult {
    /// The journal produced (or found, on idempotent replay).
    pub journal_id: JournalId,
    /// The journal number.
    pub journal_number: String,
    /// The document number, generated or caller-supplied.
    pub document_number: String,
    /// The document total posted.
    pub total: Decimal,
    /// Set when the posting used an exchange rate past the acceptable
    /// staleness bound.
    pub fx_review_required: bool,
    /// Advisory normal-balance findings; never blocking.
    pub findings: Vec<NormalBalanceFinding>,
    /// True when an idempotency key matched an existing journal and the
    /// original result was returned without writing.
    pub idempotent_replay: bool,
}
