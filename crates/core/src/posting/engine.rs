//! The document posting engine.
//!
//! One pipeline turns an AR/AP document into a balanced journal:
//! recompute totals, validate against the chart of accounts, gate on the
//! fiscal period, build the journal, and persist everything in a single
//! atomic commit. Invoices and bills run the same pipeline with the sides
//! swapped; payments settle previously posted documents.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallix_shared::config::StalenessThresholds;
use tallix_shared::types::{AccountId, Currency, JournalId, Scope};
use tracing::{info, warn};

use super::documents::{
    AllocationTarget, Bill, DocumentKind, DocumentLine, DocumentStatus, Invoice, Payment,
    PaymentType,
};
use super::error::PostingError;
use super::numbering::{format_document_number, format_journal_number};
use super::types::{PostingContext, PostingResult};
use crate::coa::{AccountIndex, AccountType, CoaValidator};
use crate::fx::{applicable_rate, Staleness};
use crate::journal::{validate_journal, Journal, JournalKind, JournalLine, JournalStatus};
use crate::period::{Period, PeriodStatus};
use crate::store::{DocumentUpdate, LedgerStore, PostingCommit};
use crate::tax::{LineTax, TaxCalculator};

/// Invoice or bill flowing through the shared pipeline.
enum TradeDocument {
    Invoice(Invoice),
    Bill(Bill),
}

impl TradeDocument {
    fn kind(&self) -> DocumentKind {
        match self {
            Self::Invoice(_) => DocumentKind::Invoice,
            Self::Bill(_) => DocumentKind::Bill,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Invoice(_) => "Invoice",
            Self::Bill(_) => "Bill",
        }
    }

    fn journal_kind(&self) -> JournalKind {
        match self {
            Self::Invoice(_) => JournalKind::Invoice,
            Self::Bill(_) => JournalKind::Bill,
        }
    }

    fn scope(&self) -> Scope {
        match self {
            Self::Invoice(invoice) => invoice.scope,
            Self::Bill(bill) => bill.scope,
        }
    }

    fn status(&self) -> DocumentStatus {
        match self {
            Self::Invoice(invoice) => invoice.status,
            Self::Bill(bill) => bill.status,
        }
    }

    fn currency(&self) -> Currency {
        match self {
            Self::Invoice(invoice) => invoice.currency,
            Self::Bill(bill) => bill.currency,
        }
    }

    fn date(&self) -> NaiveDate {
        match self {
            Self::Invoice(invoice) => invoice.issue_date,
            Self::Bill(bill) => bill.issue_date,
        }
    }

    fn counterparty(&self) -> &str {
        match self {
            Self::Invoice(invoice) => &invoice.customer,
            Self::Bill(bill) => &bill.supplier,
        }
    }

    fn lines(&self) -> &[DocumentLine] {
        match self {
            Self::Invoice(invoice) => &invoice.lines,
            Self::Bill(bill) => &bill.lines,
        }
    }

    fn control_account(&self) -> AccountId {
        match self {
            Self::Invoice(invoice) => invoice.receivable_account,
            Self::Bill(bill) => bill.payable_account,
        }
    }

    fn tax_account(&self) -> Option<AccountId> {
        match self {
            Self::Invoice(invoice) => invoice.tax_account,
            Self::Bill(bill) => bill.tax_account,
        }
    }

    fn number(&self) -> Option<&str> {
        match self {
            Self::Invoice(invoice) => invoice.number.as_deref(),
            Self::Bill(bill) => bill.number.as_deref(),
        }
    }

    fn supplied_exchange_rate(&self) -> Option<Decimal> {
        match self {
            Self::Invoice(invoice) => invoice.exchange_rate,
            Self::Bill(bill) => bill.exchange_rate,
        }
    }

    fn header_totals(&self) -> (Option<Decimal>, Option<Decimal>, Option<Decimal>) {
        match self {
            Self::Invoice(invoice) => (
                invoice.header_subtotal,
                invoice.header_tax_total,
                invoice.header_total,
            ),
            Self::Bill(bill) => (bill.header_subtotal, bill.header_tax_total, bill.header_total),
        }
    }

    /// The AR line is a debit and revenue/tax are credits; bills mirror.
    fn control_is_debit(&self) -> bool {
        matches!(self, Self::Invoice(_))
    }

    /// The account type the control target must have.
    fn control_account_type(&self) -> AccountType {
        match self {
            Self::Invoice(_) => AccountType::Asset,
            Self::Bill(_) => AccountType::Liability,
        }
    }

    /// The account type every document line must post to.
    fn line_account_type(&self) -> AccountType {
        match self {
            Self::Invoice(_) => AccountType::Revenue,
            Self::Bill(_) => AccountType::Expense,
        }
    }

    /// Output tax must sit on a liability account. Input tax on bills is not
    /// type-constrained.
    fn tax_account_type(&self) -> Option<AccountType> {
        match self {
            Self::Invoice(_) => Some(AccountType::Liability),
            Self::Bill(_) => None,
        }
    }

    fn into_update(
        self,
        number: String,
        journal_id: JournalId,
        exchange_rate: Option<Decimal>,
    ) -> DocumentUpdate {
        match self {
            Self::Invoice(mut invoice) => {
                invoice.number = Some(number);
                invoice.status = DocumentStatus::Posted;
                invoice.journal_id = Some(journal_id);
                if invoice.exchange_rate.is_none() {
                    invoice.exchange_rate = exchange_rate;
                }
                DocumentUpdate::Invoice(invoice)
            }
            Self::Bill(mut bill) => {
                bill.number = Some(number);
                bill.status = DocumentStatus::Posted;
                bill.journal_id = Some(journal_id);
                if bill.exchange_rate.is_none() {
                    bill.exchange_rate = exchange_rate;
                }
                DocumentUpdate::Bill(bill)
            }
        }
    }
}

/// Posts documents against a [`LedgerStore`].
///
/// Posting is a pure function of (committed ledger state, input); the only
/// mutable state behind it is the persisted number sequences.
pub struct PostingEngine<'a, S: LedgerStore> {
    store: &'a S,
    company_code: String,
    base_currency: Currency,
    staleness: StalenessThresholds,
}

impl<'a, S: LedgerStore> PostingEngine<'a, S> {
    /// Creates a posting engine for one company scope.
    #[must_use]
    pub fn new(
        store: &'a S,
        company_code: impl Into<String>,
        base_currency: Currency,
        staleness: StalenessThresholds,
    ) -> Self {
        Self {
            store,
            company_code: company_code.into(),
            base_currency,
            staleness,
        }
    }

    /// Posts a sales invoice, producing exactly one journal:
    /// Dr AR total / Cr one line per distinct revenue account / Cr one
    /// grouped tax line per tax code.
    ///
    /// # Errors
    ///
    /// Returns a [`PostingError`] and writes nothing when any validation
    /// step fails.
    pub fn post_invoice(
        &self,
        invoice: Invoice,
        ctx: &PostingContext,
    ) -> Result<PostingResult, PostingError> {
        self.post_trade_document(TradeDocument::Invoice(invoice), ctx)
    }

    /// Posts a vendor bill; symmetric to invoice posting with AP credited
    /// and expense lines debited.
    ///
    /// # Errors
    ///
    /// Returns a [`PostingError`] and writes nothing when any validation
    /// step fails.
    pub fn post_bill(&self, bill: Bill, ctx: &PostingContext) -> Result<PostingResult, PostingError> {
        self.post_trade_document(TradeDocument::Bill(bill), ctx)
    }

    fn post_trade_document(
        &self,
        document: TradeDocument,
        ctx: &PostingContext,
    ) -> Result<PostingResult, PostingError> {
        let scope = document.scope();
        let currency = document.currency();
        let date = document.date();

        if !ctx.user_role.can_post() {
            return Err(PostingError::NotAuthorized {
                action: "post documents",
                role: ctx.user_role,
            });
        }

        // Idempotent replay: an unchanged request returns the original
        // result and writes nothing.
        if let Some(key) = &ctx.idempotency_key
            && let Some(existing) = self.store.journal_by_idempotency_key(&scope, key)?
        {
            info!(journal = %existing.number, key = %key, "idempotency key matched, replaying result");
            return Ok(Self::replay_result(&existing));
        }

        if !document.status().is_postable() {
            return Err(PostingError::DocumentNotPostable {
                status: document.status(),
            });
        }

        // 1. Recompute totals from lines and cross-check supplied headers.
        let line_amounts = group_line_amounts(document.lines(), currency);
        let subtotal: Decimal = line_amounts.iter().map(|(_, amount)| *amount).sum();
        let taxes: Vec<LineTax> = document
            .lines()
            .iter()
            .filter_map(|line| line.line_tax(currency))
            .collect();
        let tax_groups = TaxCalculator::group_taxes_by_code(&taxes);
        let tax_total = TaxCalculator::calculate_total_tax(&taxes);
        let total = subtotal + tax_total;
        check_header_totals(&document, currency, subtotal, tax_total, total)?;

        if tax_total > Decimal::ZERO && document.tax_account().is_none() {
            return Err(PostingError::MissingTaxAccount);
        }

        // 2. Chart-of-accounts validation over the full account list.
        let index = AccountIndex::new(self.store.accounts(&scope)?);
        let mut referenced = vec![document.control_account()];
        for (account_id, _) in &line_amounts {
            referenced.push(*account_id);
        }
        let tax_account = document.tax_account().filter(|_| tax_total > Decimal::ZERO);
        if let Some(account_id) = tax_account {
            referenced.push(account_id);
        }
        CoaValidator::validate_accounts_exist(&index, &referenced)?;
        CoaValidator::validate_currency_consistency(&index, &referenced, currency)?;
        CoaValidator::validate_control_accounts(&index, &referenced)?;

        // 3. Type rules: AR is an asset, AP a liability, document lines post
        // to revenue/expense, output tax to a liability.
        CoaValidator::require_account_type(
            &index,
            document.control_account(),
            document.control_account_type(),
        )?;
        for (account_id, _) in &line_amounts {
            CoaValidator::require_account_type(&index, *account_id, document.line_account_type())?;
        }
        if let (Some(account_id), Some(expected)) = (tax_account, document.tax_account_type()) {
            CoaValidator::require_account_type(&index, account_id, expected)?;
        }

        // 4. Period gate.
        self.check_period(&scope, date, ctx)?;

        // 5. Exchange rate and staleness tagging.
        let (exchange_rate, fx_review_required) =
            self.resolve_exchange(&scope, currency, date, document.supplied_exchange_rate(), ctx)?;

        // 6. Numbering.
        let number = self.assign_number(&scope, document.kind(), document.number())?;

        // 7. Build the journal.
        let journal_number = format_journal_number(self.store.next_journal_number(&scope)?);
        let mut lines = Vec::with_capacity(line_amounts.len() + tax_groups.len() + 1);
        let control_description =
            format!("{} {} - {}", document.label(), number, document.counterparty());
        let control_line = if document.control_is_debit() {
            JournalLine::debit(document.control_account(), total, control_description)
        } else {
            JournalLine::credit(document.control_account(), total, control_description)
        };
        lines.push(control_line.with_reference(number.clone()));
        for (account_id, amount) in &line_amounts {
            let description = index
                .get(*account_id)
                .map_or_else(|| "Document line".to_string(), |a| a.name.clone());
            let line = if document.control_is_debit() {
                JournalLine::credit(*account_id, *amount, description)
            } else {
                JournalLine::debit(*account_id, *amount, description)
            };
            lines.push(line.with_reference(number.clone()));
        }
        if let Some(tax_account_id) = tax_account {
            for group in &tax_groups {
                if group.amount.is_zero() {
                    continue;
                }
                let description = format!("Tax {}", group.code);
                let line = if document.control_is_debit() {
                    JournalLine::credit(tax_account_id, group.amount, description)
                } else {
                    JournalLine::debit(tax_account_id, group.amount, description)
                };
                lines.push(line.with_reference(group.code.clone()));
            }
        }

        let journal = Journal {
            id: JournalId::new(),
            scope,
            number: journal_number,
            kind: document.journal_kind(),
            date,
            currency,
            status: JournalStatus::Posted,
            description: format!("{} {} - {}", document.label(), number, document.counterparty()),
            idempotency_key: ctx.idempotency_key.clone(),
            lines,
            fx_review_required,
            created_by: ctx.user_id,
            posted_by: Some(ctx.user_id),
            posted_at: Some(ctx.posted_at),
        };

        // 8. The journal is persisted only if balanced and validated.
        validate_journal(&journal)?;
        let findings = CoaValidator::validate_normal_balances(&index, &journal.lines);

        // 9. Atomic commit: journal + document state in one transaction.
        let result = PostingResult {
            journal_id: journal.id,
            journal_number: journal.number.clone(),
            document_number: number.clone(),
            total,
            fx_review_required,
            findings,
            idempotent_replay: false,
        };
        let commit = PostingCommit {
            journal,
            document: document.into_update(number, result.journal_id, exchange_rate),
        };
        self.store.commit_posting(commit)?;

        info!(
            journal = %result.journal_number,
            document = %result.document_number,
            %total,
            fx_review_required,
            "document posted"
        );
        Ok(result)
    }

    /// Posts a payment: `IN` produces Dr Bank / Cr AR, `OUT` produces
    /// Dr AP / Cr Bank, and every allocation reduces its target's
    /// outstanding balance.
    ///
    /// # Errors
    ///
    /// Returns a [`PostingError`] and writes nothing when any validation
    /// step fails, including any allocation exceeding its target's
    /// outstanding balance.
    pub fn post_payment(
        &self,
        payment: Payment,
        ctx: &PostingContext,
    ) -> Result<PostingResult, PostingError> {
        let scope = payment.scope;

        if !ctx.user_role.can_post() {
            return Err(PostingError::NotAuthorized {
                action: "post payments",
                role: ctx.user_role,
            });
        }

        if let Some(key) = &ctx.idempotency_key
            && let Some(existing) = self.store.journal_by_idempotency_key(&scope, key)?
        {
            info!(journal = %existing.number, key = %key, "idempotency key matched, replaying result");
            return Ok(Self::replay_result(&existing));
        }

        if !payment.status.is_postable() {
            return Err(PostingError::DocumentNotPostable {
                status: payment.status,
            });
        }
        if payment.allocations.is_empty() {
            return Err(PostingError::EmptyAllocations);
        }

        // Resolve and validate every allocation target, applying amounts to
        // local copies so repeated allocations against one document are
        // checked cumulatively.
        let mut invoices: HashMap<tallix_shared::types::InvoiceId, Invoice> = HashMap::new();
        let mut bills: HashMap<tallix_shared::types::BillId, Bill> = HashMap::new();
        let mut settlement_lines: Vec<(AccountId, Decimal, String)> = Vec::new();
        for allocation in &payment.allocations {
            if allocation.amount <= Decimal::ZERO {
                return Err(PostingError::ZeroAllocation);
            }
            match (payment.payment_type, allocation.target) {
                (PaymentType::In, AllocationTarget::Invoice(invoice_id)) => {
                    let invoice = match invoices.entry(invoice_id) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => entry.insert(
                            self.store
                                .invoice(&scope, invoice_id)?
                                .ok_or(PostingError::AllocationTargetNotFound)?,
                        ),
                    };
                    check_allocation_target(
                        invoice.status,
                        invoice.currency,
                        payment.currency,
                        invoice.outstanding(),
                        allocation.amount,
                    )?;
                    invoice.amount_paid += allocation.amount;
                    invoice.status = if invoice.outstanding().is_zero() {
                        DocumentStatus::Paid
                    } else {
                        DocumentStatus::PartiallyPaid
                    };
                    settlement_lines.push((
                        invoice.receivable_account,
                        allocation.amount,
                        invoice.number.clone().unwrap_or_default(),
                    ));
                }
                (PaymentType::Out, AllocationTarget::Bill(bill_id)) => {
                    let bill = match bills.entry(bill_id) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => entry.insert(
                            self.store
                                .bill(&scope, bill_id)?
                                .ok_or(PostingError::AllocationTargetNotFound)?,
                        ),
                    };
                    check_allocation_target(
                        bill.status,
                        bill.currency,
                        payment.currency,
                        bill.outstanding(),
                        allocation.amount,
                    )?;
                    bill.amount_paid += allocation.amount;
                    bill.status = if bill.outstanding().is_zero() {
                        DocumentStatus::Paid
                    } else {
                        DocumentStatus::PartiallyPaid
                    };
                    settlement_lines.push((
                        bill.payable_account,
                        allocation.amount,
                        bill.number.clone().unwrap_or_default(),
                    ));
                }
                _ => return Err(PostingError::AllocationTargetMismatch),
            }
        }

        let total = payment.total();

        // Chart-of-accounts validation over bank and settlement accounts.
        let index = AccountIndex::new(self.store.accounts(&scope)?);
        let mut referenced = vec![payment.bank_account];
        referenced.extend(settlement_lines.iter().map(|(account_id, _, _)| *account_id));
        CoaValidator::validate_accounts_exist(&index, &referenced)?;
        CoaValidator::validate_currency_consistency(&index, &referenced, payment.currency)?;
        CoaValidator::validate_control_accounts(&index, &referenced)?;
        CoaValidator::require_account_type(&index, payment.bank_account, AccountType::Asset)?;

        self.check_period(&scope, payment.date, ctx)?;

        let (_, fx_review_required) =
            self.resolve_exchange(&scope, payment.currency, payment.date, None, ctx)?;

        let number = self.assign_number(&scope, DocumentKind::Payment, payment.number.as_deref())?;
        let journal_number = format_journal_number(self.store.next_journal_number(&scope)?);

        // Group settlement lines by account so a payment settling several
        // documents against one AR/AP account produces a single line.
        let mut grouped: Vec<(AccountId, Decimal, String)> = Vec::new();
        for (account_id, amount, reference) in settlement_lines {
            if let Some(existing) = grouped.iter_mut().find(|(id, _, _)| *id == account_id) {
                existing.1 += amount;
            } else {
                grouped.push((account_id, amount, reference));
            }
        }

        let mut lines = Vec::with_capacity(grouped.len() + 1);
        let bank_description = match payment.payment_type {
            PaymentType::In => format!("Receipt {number}"),
            PaymentType::Out => format!("Payment {number}"),
        };
        let bank_line = match payment.payment_type {
            PaymentType::In => JournalLine::debit(payment.bank_account, total, bank_description),
            PaymentType::Out => JournalLine::credit(payment.bank_account, total, bank_description),
        };
        lines.push(bank_line.with_reference(number.clone()));
        for (account_id, amount, reference) in grouped {
            let description = index
                .get(account_id)
                .map_or_else(|| "Settlement".to_string(), |a| a.name.clone());
            let line = match payment.payment_type {
                PaymentType::In => JournalLine::credit(account_id, amount, description),
                PaymentType::Out => JournalLine::debit(account_id, amount, description),
            };
            lines.push(line.with_reference(reference));
        }

        let journal = Journal {
            id: JournalId::new(),
            scope,
            number: journal_number,
            kind: JournalKind::Payment,
            date: payment.date,
            currency: payment.currency,
            status: JournalStatus::Posted,
            description: bank_journal_description(payment.payment_type, &number),
            idempotency_key: ctx.idempotency_key.clone(),
            lines,
            fx_review_required,
            created_by: ctx.user_id,
            posted_by: Some(ctx.user_id),
            posted_at: Some(ctx.posted_at),
        };
        validate_journal(&journal)?;
        let findings = CoaValidator::validate_normal_balances(&index, &journal.lines);

        let mut updated_payment = payment;
        updated_payment.number = Some(number.clone());
        updated_payment.status = DocumentStatus::Posted;
        updated_payment.journal_id = Some(journal.id);

        let result = PostingResult {
            journal_id: journal.id,
            journal_number: journal.number.clone(),
            document_number: number,
            total,
            fx_review_required,
            findings,
            idempotent_replay: false,
        };
        self.store.commit_posting(PostingCommit {
            journal,
            document: DocumentUpdate::Payment {
                payment: updated_payment,
                invoices: invoices.into_values().collect(),
                bills: bills.into_values().collect(),
            },
        })?;

        info!(
            journal = %result.journal_number,
            document = %result.document_number,
            %total,
            "payment posted"
        );
        Ok(result)
    }

    /// Gate on the fiscal period covering the posting date.
    fn check_period(
        &self,
        scope: &Scope,
        date: NaiveDate,
        ctx: &PostingContext,
    ) -> Result<Period, PostingError> {
        let period = self
            .store
            .period_for_date(scope, date)?
            .ok_or(PostingError::NoPeriodForDate(date))?;
        match period.status {
            PeriodStatus::Open => Ok(period),
            PeriodStatus::Closed if ctx.period_override => {
                if ctx.user_role.can_override_period() {
                    warn!(period = %period.code, role = %ctx.user_role, "posting into closed period via override");
                    Ok(period)
                } else {
                    Err(PostingError::NotAuthorized {
                        action: "post into a closed period",
                        role: ctx.user_role,
                    })
                }
            }
            status => Err(PostingError::PeriodNotOpen { status }),
        }
    }

    /// Resolves the exchange rate for foreign-currency documents and tags
    /// stale rates for review.
    fn resolve_exchange(
        &self,
        scope: &Scope,
        currency: Currency,
        date: NaiveDate,
        supplied: Option<Decimal>,
        ctx: &PostingContext,
    ) -> Result<(Option<Decimal>, bool), PostingError> {
        if currency == self.base_currency {
            return Ok((None, false));
        }
        if let Some(rate) = supplied {
            return Ok((Some(rate), false));
        }
        let rates = self.store.fx_rates(scope, currency, self.base_currency)?;
        let resolved = applicable_rate(&rates, currency, self.base_currency, date).ok_or(
            PostingError::MissingExchangeRate {
                from: currency,
                to: self.base_currency,
                date,
            },
        )?;
        let age_minutes = (ctx.posted_at - resolved.ingested_at).num_minutes();
        let staleness = Staleness::classify(age_minutes, &self.staleness);
        let review = staleness.requires_review();
        if review {
            warn!(
                %currency,
                source = %resolved.source,
                age_minutes,
                "posting uses a stale exchange rate, tagged for review"
            );
        }
        Ok((Some(resolved.rate), review))
    }

    /// Keeps a caller-supplied number (after a uniqueness check) or
    /// generates the next one.
    fn assign_number(
        &self,
        scope: &Scope,
        kind: DocumentKind,
        existing: Option<&str>,
    ) -> Result<String, PostingError> {
        match existing {
            Some(number) => {
                if self.store.document_number_exists(scope, kind, number)? {
                    return Err(PostingError::DuplicateDocumentNumber(number.to_string()));
                }
                Ok(number.to_string())
            }
            None => {
                let sequence = self.store.next_document_number(scope, kind)?;
                Ok(format_document_number(&self.company_code, kind, sequence))
            }
        }
    }

    /// Rebuilds the original posting result from the journal an idempotency
    /// key matched.
    fn replay_result(journal: &Journal) -> PostingResult {
        PostingResult {
            journal_id: journal.id,
            journal_number: journal.number.clone(),
            document_number: journal
                .lines
                .first()
                .and_then(|line| line.reference.clone())
                .unwrap_or_default(),
            total: journal.total_debits(),
            fx_review_required: journal.fx_review_required,
            findings: Vec::new(),
            idempotent_replay: true,
        }
    }
}

/// Aggregates document lines per account, preserving first-seen order.
fn group_line_amounts(lines: &[DocumentLine], currency: Currency) -> Vec<(AccountId, Decimal)> {
    let mut grouped: Vec<(AccountId, Decimal)> = Vec::new();
    for line in lines {
        let amount = line.net_amount(currency);
        if let Some(existing) = grouped.iter_mut().find(|(id, _)| *id == line.account_id) {
            existing.1 += amount;
        } else {
            grouped.push((line.account_id, amount));
        }
    }
    grouped
}

/// Cross-checks caller-supplied header totals against line-derived values
/// with a tolerance of one minor unit.
fn check_header_totals(
    document: &TradeDocument,
    currency: Currency,
    subtotal: Decimal,
    tax_total: Decimal,
    total: Decimal,
) -> Result<(), PostingError> {
    let tolerance = currency.minor_unit();
    let (header_subtotal, header_tax_total, header_total) = document.header_totals();
    let checks = [
        ("subtotal", header_subtotal, subtotal),
        ("tax_total", header_tax_total, tax_total),
        ("total", header_total, total),
    ];
    for (field, supplied, computed) in checks {
        if let Some(supplied) = supplied
            && (supplied - computed).abs() > tolerance
        {
            return Err(PostingError::LineTotalMismatch {
                field,
                supplied,
                computed,
            });
        }
    }
    Ok(())
}

fn check_allocation_target(
    status: DocumentStatus,
    document_currency: Currency,
    payment_currency: Currency,
    outstanding: Decimal,
    allocated: Decimal,
) -> Result<(), PostingError> {
    if !status.accepts_allocations() {
        return Err(PostingError::AllocationTargetNotPostable { status });
    }
    if document_currency != payment_currency {
        return Err(PostingError::AllocationCurrencyMismatch {
            document: document_currency,
            payment: payment_currency,
        });
    }
    if allocated > outstanding {
        return Err(PostingError::AllocationExceedsOutstanding {
            allocated,
            outstanding,
        });
    }
    Ok(())
}

fn bank_journal_description(payment_type: PaymentType, number: &str) -> String {
    match payment_type {
        PaymentType::In => format!("Customer receipt {number}"),
        PaymentType::Out => format!("Supplier payment {number}"),
    }
}
