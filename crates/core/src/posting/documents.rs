//! AR/AP document types: invoices, bills, and payments.
//!
//! Header totals are always derived from lines; the optional `header_*`
//! fields exist only so caller-supplied totals can be cross-checked against
//! the line-derived values at posting time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallix_shared::types::{
    AccountId, BillId, Currency, InvoiceId, JournalId, PaymentId, Scope,
};

use crate::tax::{LineTax, TaxCalculator};

/// Kind of AR/AP document, used for numbering and journal classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice.
    Invoice,
    /// Vendor bill.
    Bill,
    /// Payment (incoming or outgoing).
    Payment,
}

impl DocumentKind {
    /// Short code used in generated document numbers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::Bill => "BILL",
            Self::Payment => "PAY",
        }
    }
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being drafted.
    Draft,
    /// Validated, ready to post.
    Validated,
    /// Posted; produced exactly one journal.
    Posted,
    /// Posted with partial payment allocated.
    PartiallyPaid,
    /// Fully paid.
    Paid,
    /// Closed.
    Closed,
}

impl DocumentStatus {
    /// Returns true if the document can still be posted.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        matches!(self, Self::Draft | Self::Validated)
    }

    /// Returns true if the document can receive payment allocations.
    #[must_use]
    pub fn accepts_allocations(&self) -> bool {
        matches!(self, Self::Posted | Self::PartiallyPaid)
    }
}

/// A revenue or expense line on an invoice or bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLine {
    /// The revenue (invoice) or expense (bill) account.
    pub account_id: AccountId,
    /// Line description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// Tax code, when the line is taxable.
    pub tax_code: Option<String>,
    /// Tax rate for the code (e.g., 0.10 for 10%).
    pub tax_rate: Decimal,
}

impl DocumentLine {
    /// Net line amount: quantity x unit price at currency precision.
    #[must_use]
    pub fn net_amount(&self, currency: Currency) -> Decimal {
        currency.round(self.quantity * self.unit_price)
    }

    /// Computes this line's tax, if it carries a tax code.
    #[must_use]
    pub fn line_tax(&self, currency: Currency) -> Option<LineTax> {
        self.tax_code.as_deref().map(|code| {
            TaxCalculator::calculate_line_tax(
                self.quantity,
                self.unit_price,
                self.tax_rate,
                code,
                currency,
            )
        })
    }
}

/// Line-derived totals for an invoice or bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentTotals {
    /// Sum of net line amounts.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax_total: Decimal,
    /// Subtotal plus tax.
    pub total: Decimal,
}

fn derive_totals(lines: &[DocumentLine], currency: Currency) -> DocumentTotals {
    let subtotal: Decimal = lines.iter().map(|l| l.net_amount(currency)).sum();
    let taxes: Vec<LineTax> = lines.iter().filter_map(|l| l.line_tax(currency)).collect();
    let tax_total = TaxCalculator::calculate_total_tax(&taxes);
    DocumentTotals {
        subtotal,
        tax_total,
        total: subtotal + tax_total,
    }
}

/// A sales invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Customer name.
    pub customer: String,
    /// Document number; generated at posting when not supplied.
    pub number: Option<String>,
    /// Issue date (also the posting date).
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Document currency.
    pub currency: Currency,
    /// Exchange rate to the base currency, when supplied by the caller.
    pub exchange_rate: Option<Decimal>,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Revenue lines.
    pub lines: Vec<DocumentLine>,
    /// Accounts receivable account debited at posting.
    pub receivable_account: AccountId,
    /// Output tax account credited at posting, when any line is taxed.
    pub tax_account: Option<AccountId>,
    /// Caller-supplied subtotal, cross-checked against lines.
    pub header_subtotal: Option<Decimal>,
    /// Caller-supplied tax total, cross-checked against lines.
    pub header_tax_total: Option<Decimal>,
    /// Caller-supplied grand total, cross-checked against lines.
    pub header_total: Option<Decimal>,
    /// Amount settled via payment allocations.
    pub amount_paid: Decimal,
    /// The journal produced by posting.
    pub journal_id: Option<JournalId>,
}

impl Invoice {
    /// Line-derived totals.
    #[must_use]
    pub fn totals(&self) -> DocumentTotals {
        derive_totals(&self.lines, self.currency)
    }

    /// Amount not yet settled by payments.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.totals().total - self.amount_paid
    }
}

/// A vendor bill. Symmetric to [`Invoice`] with AP instead of AR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier.
    pub id: BillId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Supplier name.
    pub supplier: String,
    /// Document number; generated at posting when not supplied.
    pub number: Option<String>,
    /// Issue date (also the posting date).
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Document currency.
    pub currency: Currency,
    /// Exchange rate to the base currency, when supplied by the caller.
    pub exchange_rate: Option<Decimal>,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Expense lines.
    pub lines: Vec<DocumentLine>,
    /// Accounts payable account credited at posting.
    pub payable_account: AccountId,
    /// Input tax account debited at posting, when any line is taxed.
    pub tax_account: Option<AccountId>,
    /// Caller-supplied subtotal, cross-checked against lines.
    pub header_subtotal: Option<Decimal>,
    /// Caller-supplied tax total, cross-checked against lines.
    pub header_tax_total: Option<Decimal>,
    /// Caller-supplied grand total, cross-checked against lines.
    pub header_total: Option<Decimal>,
    /// Amount settled via payment allocations.
    pub amount_paid: Decimal,
    /// The journal produced by posting.
    pub journal_id: Option<JournalId>,
}

impl Bill {
    /// Line-derived totals.
    #[must_use]
    pub fn totals(&self) -> DocumentTotals {
        derive_totals(&self.lines, self.currency)
    }

    /// Amount not yet settled by payments.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.totals().total - self.amount_paid
    }
}

/// Direction of a payment.
///
/// The serialized forms `OUT` and `IN` are part of the persisted-state
/// contract and must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    /// Bill payment: Dr Accounts Payable / Cr Bank.
    #[serde(rename = "OUT")]
    Out,
    /// Invoice receipt: Dr Bank / Cr Accounts Receivable.
    #[serde(rename = "IN")]
    In,
}

/// The invoice or bill a payment allocation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationTarget {
    /// An invoice (for `IN` payments).
    Invoice(InvoiceId),
    /// A bill (for `OUT` payments).
    Bill(BillId),
}

/// A portion of a payment applied to one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// The document being settled.
    pub target: AllocationTarget,
    /// Amount applied; must not exceed the document's outstanding balance.
    pub amount: Decimal,
}

/// A payment settling one or more invoices or bills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Tenant/company scope.
    pub scope: Scope,
    /// Document number; generated at posting when not supplied.
    pub number: Option<String>,
    /// Direction.
    pub payment_type: PaymentType,
    /// Payment date (also the posting date).
    pub date: NaiveDate,
    /// Payment currency.
    pub currency: Currency,
    /// Bank account moved by this payment.
    pub bank_account: AccountId,
    /// Document allocations.
    pub allocations: Vec<PaymentAllocation>,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// The journal produced by posting.
    pub journal_id: Option<JournalId>,
}

impl Payment {
    /// Total amount of the payment: the sum of its allocations.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}
