//! Exchange rate domain types and applicable-rate selection.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallix_shared::types::{Currency, FxRateId};

/// An ingested exchange rate with its validity window.
///
/// Multiple rates per currency pair may coexist; [`applicable_rate`] selects
/// the one governing a given posting date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRate {
    /// Unique identifier.
    pub id: FxRateId,
    /// Source currency code.
    pub from_currency: Currency,
    /// Target currency code.
    pub to_currency: Currency,
    /// Exchange rate (1 `from_currency` = rate `to_currency`).
    pub rate: Decimal,
    /// Name of the source that supplied the rate.
    pub source: String,
    /// When the rate was ingested.
    pub ingested_at: DateTime<Utc>,
    /// First posting date this rate applies to (inclusive).
    pub valid_from: NaiveDate,
    /// Last posting date this rate applies to (inclusive); open-ended when
    /// `None`.
    pub valid_to: Option<NaiveDate>,
}

impl FxRate {
    /// Returns true if this rate's validity window covers `posting_date`.
    #[must_use]
    pub fn covers(&self, posting_date: NaiveDate) -> bool {
        self.valid_from <= posting_date && self.valid_to.is_none_or(|to| to >= posting_date)
    }

    /// Age of this rate in whole minutes at `now`.
    #[must_use]
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.ingested_at).num_minutes()
    }
}

/// How an applicable rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLookupMethod {
    /// Direct rate found for the requested pair.
    Direct,
    /// Reciprocal of the inverse pair's rate.
    Inverse,
}

/// The rate resolved for a posting, with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedRate {
    /// The rate to multiply by.
    pub rate: Decimal,
    /// How the rate was obtained.
    pub method: RateLookupMethod,
    /// When the underlying rate was ingested (drives staleness).
    pub ingested_at: DateTime<Utc>,
    /// The source that supplied the underlying rate.
    pub source: String,
}

/// Selects the applicable rate for a posting date: the most recent rate
/// (by `valid_from`) whose validity window covers the date.
///
/// When no direct rate exists, the inverse pair is consulted and its
/// reciprocal returned.
#[must_use]
pub fn applicable_rate(
    rates: &[FxRate],
    from: Currency,
    to: Currency,
    posting_date: NaiveDate,
) -> Option<ResolvedRate> {
    let best = |f: Currency, t: Currency| {
        rates
            .iter()
            .filter(|r| r.from_currency == f && r.to_currency == t && r.covers(posting_date))
            .max_by_key(|r| (r.valid_from, r.ingested_at))
    };

    if let Some(rate) = best(from, to) {
        return Some(ResolvedRate {
            rate: rate.rate,
            method: RateLookupMethod::Direct,
            ingested_at: rate.ingested_at,
            source: rate.source.clone(),
        });
    }

    best(to, from).and_then(|rate| {
        if rate.rate.is_zero() {
            return None;
        }
        Some(ResolvedRate {
            rate: Decimal::ONE / rate.rate,
            method: RateLookupMethod::Inverse,
            ingested_at: rate.ingested_at,
            source: rate.source.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_rate(
        from: Currency,
        to: Currency,
        rate: Decimal,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> FxRate {
        FxRate {
            id: FxRateId::new(),
            from_currency: from,
            to_currency: to,
            rate,
            source: "central-bank".to_string(),
            ingested_at: Utc::now(),
            valid_from,
            valid_to,
        }
    }

    #[test]
    fn test_covers_open_ended_window() {
        let rate = make_rate(Currency::Usd, Currency::Myr, dec!(4.40), ymd(2026, 3, 1), None);
        assert!(rate.covers(ymd(2026, 3, 1)));
        assert!(rate.covers(ymd(2027, 1, 1)));
        assert!(!rate.covers(ymd(2026, 2, 28)));
    }

    #[test]
    fn test_covers_bounded_window() {
        let rate = make_rate(
            Currency::Usd,
            Currency::Myr,
            dec!(4.40),
            ymd(2026, 3, 1),
            Some(ymd(2026, 3, 31)),
        );
        assert!(rate.covers(ymd(2026, 3, 15)));
        assert!(rate.covers(ymd(2026, 3, 31)));
        assert!(!rate.covers(ymd(2026, 4, 1)));
    }

    #[test]
    fn test_applicable_rate_picks_most_recent_valid_from() {
        let rates = vec![
            make_rate(Currency::Usd, Currency::Myr, dec!(4.30), ymd(2026, 2, 1), None),
            make_rate(Currency::Usd, Currency::Myr, dec!(4.40), ymd(2026, 3, 1), None),
            make_rate(Currency::Usd, Currency::Myr, dec!(4.50), ymd(2026, 4, 1), None),
        ];
        // Posting mid-March: the March rate governs, not February's nor
        // April's (which is not yet valid).
        let resolved = applicable_rate(&rates, Currency::Usd, Currency::Myr, ymd(2026, 3, 15))
            .unwrap();
        assert_eq!(resolved.rate, dec!(4.40));
        assert_eq!(resolved.method, RateLookupMethod::Direct);
    }

    #[test]
    fn test_applicable_rate_none_when_no_window_covers() {
        let rates = vec![make_rate(
            Currency::Usd,
            Currency::Myr,
            dec!(4.40),
            ymd(2026, 3, 1),
            Some(ymd(2026, 3, 31)),
        )];
        assert!(applicable_rate(&rates, Currency::Usd, Currency::Myr, ymd(2026, 4, 2)).is_none());
    }

    #[test]
    fn test_inverse_lookup() {
        let rates = vec![make_rate(Currency::Myr, Currency::Usd, dec!(0.25), ymd(2026, 3, 1), None)];
        let resolved = applicable_rate(&rates, Currency::Usd, Currency::Myr, ymd(2026, 3, 15))
            .unwrap();
        assert_eq!(resolved.method, RateLookupMethod::Inverse);
        assert_eq!(resolved.rate, dec!(4));
    }

    #[test]
    fn test_no_rate_for_unrelated_pair() {
        let rates = vec![make_rate(Currency::Usd, Currency::Myr, dec!(4.40), ymd(2026, 3, 1), None)];
        assert!(applicable_rate(&rates, Currency::Eur, Currency::Myr, ymd(2026, 3, 15)).is_none());
    }

    #[test]
    fn test_age_minutes() {
        let mut rate = make_rate(Currency::Usd, Currency::Myr, dec!(4.40), ymd(2026, 3, 1), None);
        let now = Utc::now();
        rate.ingested_at = now - chrono::Duration::minutes(90);
        assert_eq!(rate.age_minutes(now), 90);
    }
}
