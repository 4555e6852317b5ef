//! Application configuration management.
//!
//! All policy thresholds live here as injectable configuration, never as
//! process-wide mutable state, so tests can vary them freely.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Functional (base) currency for the company.
    pub base_currency: Currency,
    /// Exchange rate ingestion settings.
    #[serde(default)]
    pub fx: FxSettings,
    /// Period close policy.
    #[serde(default)]
    pub close: ClosePolicy,
}

/// Exchange rate ingestion settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FxSettings {
    /// Staleness classification thresholds.
    #[serde(default)]
    pub staleness: StalenessThresholds,
    /// Configured rate sources, tried in order within each tier.
    #[serde(default)]
    pub sources: Vec<FxSourceSettings>,
}

/// Staleness classification thresholds, in minutes of rate age.
///
/// Rates age from fresh through warning and acceptable to stale; a posting
/// that uses a stale rate is tagged for review, never blocked outright.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StalenessThresholds {
    /// Maximum age in minutes considered fresh.
    #[serde(default = "default_fresh_minutes")]
    pub fresh_minutes: i64,
    /// Maximum age in minutes before a warning becomes acceptable-but-flagged.
    #[serde(default = "default_warning_minutes")]
    pub warning_minutes: i64,
    /// Maximum age in minutes before a rate is stale and postings using it
    /// must be flagged for review.
    #[serde(default = "default_acceptable_minutes")]
    pub acceptable_minutes: i64,
}

fn default_fresh_minutes() -> i64 {
    60
}

fn default_warning_minutes() -> i64 {
    240
}

fn default_acceptable_minutes() -> i64 {
    1440
}

impl Default for StalenessThresholds {
    fn default() -> Self {
        Self {
            fresh_minutes: default_fresh_minutes(),
            warning_minutes: default_warning_minutes(),
            acceptable_minutes: default_acceptable_minutes(),
        }
    }
}

/// A configured exchange rate source.
#[derive(Debug, Clone, Deserialize)]
pub struct FxSourceSettings {
    /// Source name, used in logs and provenance fields.
    pub name: String,
    /// Endpoint URL.
    pub url: String,
    /// Priority tier.
    #[serde(default)]
    pub tier: FxSourceTier,
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_fx_timeout")]
    pub timeout_secs: u64,
    /// Number of attempts before the source is considered exhausted.
    #[serde(default = "default_fx_retries")]
    pub retries: u32,
}

fn default_fx_timeout() -> u64 {
    5
}

fn default_fx_retries() -> u32 {
    3
}

/// Priority tier of an exchange rate source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxSourceTier {
    /// Tried first, in configuration order.
    #[default]
    Primary,
    /// Tried only after every primary source has exhausted its retries.
    Fallback,
}

/// Period close policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosePolicy {
    /// Require at least one posted adjustment journal before close.
    #[serde(default)]
    pub require_adjustments: bool,
    /// Enforce segregation of duties: the closer must not be the sole
    /// preparer of the period's journals.
    #[serde(default)]
    pub dual_control: bool,
    /// Period activity (total posted debits) at or above this amount
    /// requires an approving role to close.
    #[serde(default)]
    pub approval_threshold: Option<Decimal>,
    /// Transition straight to locked on close.
    #[serde(default)]
    pub lock_on_close: bool,
    /// Open the following period automatically after a successful close.
    #[serde(default = "default_auto_open_next")]
    pub auto_open_next: bool,
}

fn default_auto_open_next() -> bool {
    true
}

impl Default for ClosePolicy {
    fn default() -> Self {
        Self {
            require_adjustments: false,
            dual_control: false,
            approval_threshold: None,
            lock_on_close: false,
            auto_open_next: default_auto_open_next(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLIX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
