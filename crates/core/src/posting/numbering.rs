//! Document and journal number generation.
//!
//! Generated document numbers follow `{companyCode}-{TYPE}-{sequence}`.
//! Callers may supply their own number, in which case generation is skipped.

use super::documents::DocumentKind;

/// Formats a generated document number, e.g. `ACME-INV-000042`.
#[must_use]
pub fn format_document_number(company_code: &str, kind: DocumentKind, sequence: u64) -> String {
    format!("{company_code}-{}-{sequence:06}", kind.code())
}

/// Formats a journal number, e.g. `JRN-000007`.
#[must_use]
pub fn format_journal_number(sequence: u64) -> String {
    format!("JRN-{sequence:06}")
}
