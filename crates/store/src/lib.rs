//! In-memory reference implementation of the Tallix persistence boundary.
//!
//! The production deployment plugs a relational engine in behind
//! [`tallix_core::store::LedgerStore`]; this crate provides the reference
//! implementation used by the integration tests: scoped tables, monotonic
//! number sequences, and all-or-nothing posting commits behind a single
//! writer lock.

pub mod memory;

pub use memory::MemoryStore;
