//! Per-line and per-document tax computation.

pub mod calculator;

pub use calculator::{LineTax, TaxCalculator, TaxGroup};
