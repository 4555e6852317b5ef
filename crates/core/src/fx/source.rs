//! Exchange rate sources.

use futures::future::BoxFuture;
use rust_decimal::Decimal;
use serde::Deserialize;
use tallix_shared::config::FxSourceSettings;
use tallix_shared::types::Currency;

use super::error::FxIngestError;

/// A provider of exchange rates.
///
/// Implementations capture whatever they need into the returned future; the
/// ingestor owns retry and timeout policy around each call.
#[cfg_attr(test, mockall::automock)]
pub trait RateSource: Send + Sync {
    /// Source name, used in logs and rate provenance.
    fn name(&self) -> &str;

    /// Fetches the current rate for a currency pair.
    fn fetch(&self, from: Currency, to: Currency)
        -> BoxFuture<'static, Result<Decimal, FxIngestError>>;
}

/// Shape of a rate provider's JSON response.
#[derive(Debug, Deserialize)]
struct RateResponse {
    rate: Decimal,
}

/// HTTP-backed rate source.
pub struct HttpRateSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpRateSource {
    /// Builds an HTTP source from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_settings(settings: &FxSourceSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            name: settings.name.clone(),
            url: settings.url.clone(),
            client,
        })
    }
}

impl RateSource for HttpRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(
        &self,
        from: Currency,
        to: Currency,
    ) -> BoxFuture<'static, Result<Decimal, FxIngestError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        let name = self.name.clone();
        Box::pin(async move {
            let unavailable = |_| FxIngestError::SourceUnavailable {
                source: name.clone(),
                attempts: 1,
            };
            let response = client
                .get(&url)
                .query(&[("from", from.to_string()), ("to", to.to_string())])
                .send()
                .await
                .map_err(unavailable)?
                .error_for_status()
                .map_err(unavailable)?;
            let body: RateResponse = response
                .json()
                .await
                .map_err(|_| FxIngestError::InvalidRate {
                    source: name.clone(),
                })?;
            if body.rate <= Decimal::ZERO {
                return Err(FxIngestError::InvalidRate { source: name });
            }
            Ok(body.rate)
        })
    }
}
