//! Multi-source exchange rate ingestion and staleness classification.

pub mod error;
pub mod ingest;
pub mod source;
pub mod staleness;
pub mod types;

pub use error::FxIngestError;
pub use ingest::{ConfiguredSource, FxIngestor};
pub use source::{HttpRateSource, RateSource};
pub use staleness::Staleness;
pub use types::{applicable_rate, FxRate, RateLookupMethod, ResolvedRate};
