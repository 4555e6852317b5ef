//! Document posting engine.
//!
//! Builds balanced journals from AR/AP documents (invoices, bills,
//! payments) through one validation pipeline, and persists them atomically
//! through the store boundary.

pub mod documents;
pub mod engine;
pub mod error;
pub mod numbering;
pub mod types;


pub use documents::{
    AllocationTarget, Bill, DocumentKind, DocumentLine, DocumentStatus, DocumentTotals, Invoice,
    Payment, PaymentAllocation, PaymentType,
};
pub use engine::PostingEngine;
pub use error::PostingError;
pub use numbering::{format_document_number, format_journal_number};
pub use types::{PostingContext, PostingResult};
