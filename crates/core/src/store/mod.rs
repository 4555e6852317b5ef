//! Persistence adapter boundary.
//!
//! The core consumes storage through [`LedgerStore`]; the engine behind it
//! is out of scope. Implementations must guarantee that
//! [`LedgerStore::commit_posting`] is all-or-nothing and that reads observe
//! committed state only.

pub mod adapter;
pub mod error;

pub use adapter::{DocumentUpdate, JournalFilter, LedgerStore, PostingCommit};
pub use error::StoreError;
