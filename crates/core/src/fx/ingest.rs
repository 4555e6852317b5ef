//! Tiered exchange rate ingestion with retries and timeouts.
//!
//! Primary sources are tried in configuration order; only when every primary
//! has exhausted its retries are fallback sources consulted. Failures are
//! returned as retryable errors, never propagated as panics across tiers.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tallix_shared::config::{FxSettings, FxSourceTier};
use tallix_shared::types::{Currency, FxRateId};
use tracing::{info, warn};

use super::error::FxIngestError;
use super::source::{HttpRateSource, RateSource};
use super::types::FxRate;

/// A rate source with its ingestion policy.
pub struct ConfiguredSource {
    /// The source implementation.
    pub source: Box<dyn RateSource>,
    /// Priority tier.
    pub tier: FxSourceTier,
    /// Attempts before the source is considered exhausted.
    pub retries: u32,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

/// Walks configured sources by tier and ingests the first rate obtained.
pub struct FxIngestor {
    sources: Vec<ConfiguredSource>,
}

impl FxIngestor {
    /// Creates an ingestor over pre-built sources.
    #[must_use]
    pub fn new(sources: Vec<ConfiguredSource>) -> Self {
        Self { sources }
    }

    /// Builds an ingestor with HTTP sources from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_settings(settings: &FxSettings) -> Result<Self, reqwest::Error> {
        let mut sources = Vec::with_capacity(settings.sources.len());
        for source_settings in &settings.sources {
            sources.push(ConfiguredSource {
                source: Box::new(HttpRateSource::from_settings(source_settings)?),
                tier: source_settings.tier,
                retries: source_settings.retries,
                timeout: Duration::from_secs(source_settings.timeout_secs),
            });
        }
        Ok(Self::new(sources))
    }

    /// Ingests a rate for the currency pair.
    ///
    /// Tries every primary source in order, then every fallback source.
    /// Each source gets its configured number of attempts, each bounded by
    /// its timeout.
    ///
    /// # Errors
    ///
    /// Returns `AllSourcesExhausted` (retryable) when no source yields a
    /// usable rate; the caller decides whether to proceed with a stale rate
    /// or abort.
    pub async fn ingest(
        &self,
        from: Currency,
        to: Currency,
        valid_from: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<FxRate, FxIngestError> {
        for tier in [FxSourceTier::Primary, FxSourceTier::Fallback] {
            for configured in self.sources.iter().filter(|s| s.tier == tier) {
                match Self::try_source(configured, from, to).await {
                    Ok(rate) => {
                        info!(
                            source = configured.source.name(),
                            %from,
                            %to,
                            %rate,
                            "exchange rate ingested"
                        );
                        return Ok(FxRate {
                            id: FxRateId::new(),
                            from_currency: from,
                            to_currency: to,
                            rate,
                            source: configured.source.name().to_string(),
                            ingested_at: now,
                            valid_from,
                            valid_to: None,
                        });
                    }
                    Err(error) => {
                        warn!(
                            source = configured.source.name(),
                            %from,
                            %to,
                            %error,
                            "rate source exhausted, trying next"
                        );
                    }
                }
            }
        }
        Err(FxIngestError::AllSourcesExhausted {
            sources_tried: self.sources.len(),
        })
    }

    /// Runs one source through its retry budget.
    async fn try_source(
        configured: &ConfiguredSource,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, FxIngestError> {
        let attempts = configured.retries.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match tokio::time::timeout(configured.timeout, configured.source.fetch(from, to)).await
            {
                Ok(Ok(rate)) if rate > Decimal::ZERO => return Ok(rate),
                Ok(Ok(_)) => {
                    last_error = Some(FxIngestError::InvalidRate {
                        source: configured.source.name().to_string(),
                    });
                }
                Ok(Err(error)) => {
                    warn!(
                        source = configured.source.name(),
                        attempt,
                        %error,
                        "rate fetch attempt failed"
                    );
                    last_error = Some(error);
                }
                Err(_) => {
                    let timeout_secs = configured.timeout.as_secs();
                    warn!(
                        source = configured.source.name(),
                        attempt, timeout_secs, "rate fetch attempt timed out"
                    );
                    last_error = Some(FxIngestError::Timeout {
                        source: configured.source.name().to_string(),
                        timeout_secs,
                    });
                }
            }
        }
        Err(last_error.unwrap_or(FxIngestError::SourceUnavailable {
            source: configured.source.name().to_string(),
            attempts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::source::MockRateSource;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn configured(source: MockRateSource, tier: FxSourceTier, retries: u32) -> ConfiguredSource {
        ConfiguredSource {
            source: Box::new(source),
            tier,
            retries,
            timeout: Duration::from_secs(1),
        }
    }

    fn ok_source(name: &'static str, rate: Decimal) -> MockRateSource {
        let mut source = MockRateSource::new();
        source.expect_name().return_const(name.to_string());
        source
            .expect_fetch()
            .returning(move |_, _| Box::pin(async move { Ok(rate) }));
        source
    }

    fn failing_source(name: &'static str) -> MockRateSource {
        let mut source = MockRateSource::new();
        source.expect_name().return_const(name.to_string());
        source.expect_fetch().returning(move |_, _| {
            Box::pin(async move {
                Err(FxIngestError::SourceUnavailable {
                    source: name.to_string(),
                    attempts: 1,
                })
            })
        });
        source
    }

    #[tokio::test]
    async fn test_primary_source_wins() {
        let ingestor = FxIngestor::new(vec![
            configured(ok_source("primary", dec!(4.40)), FxSourceTier::Primary, 3),
            configured(ok_source("fallback", dec!(9.99)), FxSourceTier::Fallback, 3),
        ]);
        let rate = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap();
        assert_eq!(rate.rate, dec!(4.40));
        assert_eq!(rate.source, "primary");
        assert_eq!(rate.from_currency, Currency::Usd);
        assert_eq!(rate.to_currency, Currency::Myr);
        assert!(rate.valid_to.is_none());
    }

    #[tokio::test]
    async fn test_falls_back_after_primaries_exhausted() {
        let ingestor = FxIngestor::new(vec![
            configured(failing_source("primary-a"), FxSourceTier::Primary, 2),
            configured(failing_source("primary-b"), FxSourceTier::Primary, 2),
            configured(ok_source("fallback", dec!(4.45)), FxSourceTier::Fallback, 2),
        ]);
        let rate = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap();
        assert_eq!(rate.source, "fallback");
        assert_eq!(rate.rate, dec!(4.45));
    }

    #[tokio::test]
    async fn test_fallback_ordering_even_when_listed_first() {
        // Tier, not list position, decides the order.
        let ingestor = FxIngestor::new(vec![
            configured(ok_source("fallback", dec!(9.99)), FxSourceTier::Fallback, 1),
            configured(ok_source("primary", dec!(4.40)), FxSourceTier::Primary, 1),
        ]);
        let rate = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap();
        assert_eq!(rate.source, "primary");
    }

    #[tokio::test]
    async fn test_all_sources_exhausted_is_retryable() {
        let ingestor = FxIngestor::new(vec![
            configured(failing_source("primary"), FxSourceTier::Primary, 2),
            configured(failing_source("fallback"), FxSourceTier::Fallback, 2),
        ]);
        let error = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            FxIngestError::AllSourcesExhausted { sources_tried: 2 }
        ));
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_retries_before_moving_on() {
        // Fails twice, succeeds on the third attempt; with retries = 3 the
        // source still wins.
        let mut flaky = MockRateSource::new();
        flaky.expect_name().return_const("flaky".to_string());
        let mut calls = 0u32;
        flaky.expect_fetch().returning_st(move |_, _| {
            calls += 1;
            let succeed = calls >= 3;
            Box::pin(async move {
                if succeed {
                    Ok(dec!(4.41))
                } else {
                    Err(FxIngestError::SourceUnavailable {
                        source: "flaky".to_string(),
                        attempts: 1,
                    })
                }
            })
        });
        let ingestor = FxIngestor::new(vec![configured(flaky, FxSourceTier::Primary, 3)]);
        let rate = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap();
        assert_eq!(rate.rate, dec!(4.41));
    }

    #[tokio::test]
    async fn test_non_positive_rate_rejected() {
        let ingestor = FxIngestor::new(vec![configured(
            ok_source("bad", Decimal::ZERO),
            FxSourceTier::Primary,
            1,
        )]);
        let error = ingestor
            .ingest(Currency::Usd, Currency::Myr, ymd(2026, 3, 1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, FxIngestError::AllSourcesExhausted { .. }));
    }
}
