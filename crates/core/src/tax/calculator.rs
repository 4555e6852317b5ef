//! Tax calculation service.
//!
//! Pure functions over line quantities, unit prices, and tax rates. All
//! results are rounded to the document currency's precision so the journal
//! built from them balances exactly.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tallix_shared::types::Currency;

/// Tax computed for a single document line.
#[derive(Debug, Clone, Serialize)]
pub struct LineTax {
    /// The resolved tax code.
    pub code: String,
    /// The tax rate applied (e.g., 0.10 for 10%).
    pub rate: Decimal,
    /// The tax amount, rounded to currency precision.
    pub amount: Decimal,
}

/// Tax aggregated per distinct code for GL posting.
///
/// A journal carries at most one tax line per distinct code, not one per
/// document line.
#[derive(Debug, Clone, Serialize)]
pub struct TaxGroup {
    /// The tax code.
    pub code: String,
    /// Sum of the amounts for this code.
    pub amount: Decimal,
}

/// Stateless tax calculation service.
pub struct TaxCalculator;

impl TaxCalculator {
    /// Computes the tax for a single line: quantity x unit price x rate,
    /// rounded to the currency's precision.
    ///
    /// Zero-rate (exempt) codes pass through with a zero amount.
    #[must_use]
    pub fn calculate_line_tax(
        quantity: Decimal,
        unit_price: Decimal,
        rate: Decimal,
        code: &str,
        currency: Currency,
    ) -> LineTax {
        let amount = currency.round(quantity * unit_price * rate);
        LineTax {
            code: code.to_string(),
            rate,
            amount,
        }
    }

    /// Sums all line tax amounts.
    #[must_use]
    pub fn calculate_total_tax(line_taxes: &[LineTax]) -> Decimal {
        line_taxes.iter().map(|t| t.amount).sum()
    }

    /// Aggregates line taxes by code into one group per distinct code,
    /// in code order.
    #[must_use]
    pub fn group_taxes_by_code(line_taxes: &[LineTax]) -> Vec<TaxGroup> {
        let mut grouped: BTreeMap<&str, Decimal> = BTreeMap::new();
        for tax in line_taxes {
            *grouped.entry(tax.code.as_str()).or_insert(Decimal::ZERO) += tax.amount;
        }
        grouped
            .into_iter()
            .map(|(code, amount)| TaxGroup {
                code: code.to_string(),
                amount,
            })
            .collect()
    }
}
