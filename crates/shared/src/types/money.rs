//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`, rounded with Banker's Rounding
//! (`MidpointNearestEven`) at each currency's minor-unit scale.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Malaysian Ringgit
    Myr,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Indonesian Rupiah
    Idr,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Number of minor-unit decimal places for this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Idr | Self::Jpy => 0,
            Self::Myr | Self::Usd | Self::Eur | Self::Sgd => 2,
        }
    }

    /// The smallest representable amount in this currency (one minor unit).
    ///
    /// Used as the rounding tolerance when comparing derived totals.
    #[must_use]
    pub fn minor_unit(self) -> Decimal {
        Decimal::new(1, self.minor_units())
    }

    /// Rounds an amount to this currency's precision using Banker's Rounding.
    ///
    /// `MidpointNearestEven` rounds 2.5 → 2 and 3.5 → 4, eliminating the
    /// systematic drift of always-round-half-up over many postings.
    #[must_use]
    pub fn round(self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.minor_units(), RoundingStrategy::MidpointNearestEven)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Myr => write!(f, "MYR"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Sgd => write!(f, "SGD"),
            Self::Idr => write!(f, "IDR"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MYR" => Ok(Self::Myr),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "IDR" => Ok(Self::Idr),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Represents a monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount at the currency's minor-unit precision.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Creates a new Money instance, rounding to the currency's precision.
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: currency.round(amount),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative()
    }

    /// Returns true if two amounts agree within one minor unit.
    ///
    /// Derived totals (e.g. header totals recomputed from lines) are compared
    /// with this tolerance rather than exact equality.
    #[must_use]
    pub fn within_tolerance(&self, other: Decimal) -> bool {
        (self.amount - other).abs() <= self.currency.minor_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new_rounds_to_currency_precision() {
        let money = Money::new(dec!(100.005), Currency::Myr);
        // Banker's rounding: 100.005 → 100.00 (nearest even cent)
        assert_eq!(money.amount, dec!(100.00));
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Usd);
        assert!(money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_money_negative() {
        let money = Money::new(dec!(-5), Currency::Usd);
        assert!(money.is_negative());
    }

    #[rstest]
    #[case(Currency::Myr, 2)]
    #[case(Currency::Usd, 2)]
    #[case(Currency::Eur, 2)]
    #[case(Currency::Sgd, 2)]
    #[case(Currency::Idr, 0)]
    #[case(Currency::Jpy, 0)]
    fn test_minor_units(#[case] currency: Currency, #[case] expected: u32) {
        assert_eq!(currency.minor_units(), expected);
    }

    #[test]
    fn test_minor_unit_value() {
        assert_eq!(Currency::Myr.minor_unit(), dec!(0.01));
        assert_eq!(Currency::Jpy.minor_unit(), dec!(1));
    }

    #[test]
    fn test_bankers_rounding_midpoint_to_even() {
        // 2.125 → 2.12 (nearest even cent), 2.135 → 2.14
        assert_eq!(Currency::Usd.round(dec!(2.125)), dec!(2.12));
        assert_eq!(Currency::Usd.round(dec!(2.135)), dec!(2.14));
        // Zero-decimal currency rounds to whole units
        assert_eq!(Currency::Jpy.round(dec!(2.5)), dec!(2));
        assert_eq!(Currency::Jpy.round(dec!(3.5)), dec!(4));
    }

    #[test]
    fn test_within_tolerance() {
        let money = Money::new(dec!(100.00), Currency::Myr);
        assert!(money.within_tolerance(dec!(100.00)));
        assert!(money.within_tolerance(dec!(100.01)));
        assert!(money.within_tolerance(dec!(99.99)));
        assert!(!money.within_tolerance(dec!(100.02)));
    }

    #[test]
    fn test_currency_display_and_parse() {
        for currency in [
            Currency::Myr,
            Currency::Usd,
            Currency::Eur,
            Currency::Sgd,
            Currency::Idr,
            Currency::Jpy,
        ] {
            assert_eq!(Currency::from_str(&currency.to_string()).unwrap(), currency);
        }
        assert_eq!(Currency::from_str("myr").unwrap(), Currency::Myr);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
