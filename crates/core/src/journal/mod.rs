//! Double-entry journals.
//!
//! A journal is an atomic, balanced set of debit/credit lines posted to the
//! ledger. Lines are owned exclusively by their journal and never mutated
//! after posting; corrections are reversing entries.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::JournalError;
pub use types::{Journal, JournalKind, JournalLine, JournalStatus};
pub use validation::validate_journal;
