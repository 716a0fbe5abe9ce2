use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{validate_rate_percent, LoanPolicy};
use crate::error::LoanFinanceError;
use crate::money::{format_money, is_whole_cents, percent_to_rate, MAX_AMOUNT};
use crate::types::*;
use crate::LoanFinanceResult;

use super::{flat, reducing_balance};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of a repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentLine {
    /// 1-based position in the schedule
    pub month_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub payment: Money,
    pub closing_balance: Money,
}

/// A priced financing offer for one product at one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub interest_policy: InterestPolicy,
    /// False for flat quotes: their schedule split is notional only.
    pub amortizing: bool,
    pub principal: Money,
    pub term_months: u32,
    pub monthly_rate_percent: Percent,
    pub monthly_payment: Money,
    /// Last installment, which absorbs cent rounding.
    pub final_payment: Money,
    pub total_interest: Money,
    pub total_repayable: Money,
    pub currency: Currency,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<InstallmentLine>>,
}

impl LoanQuote {
    /// Assemble a quote from a finished schedule. Totals are derived from the
    /// lines so they always agree with them.
    pub(crate) fn from_schedule(
        interest_policy: InterestPolicy,
        principal: Money,
        monthly_rate_percent: Percent,
        monthly_payment: Money,
        currency: &Currency,
        schedule: Vec<InstallmentLine>,
    ) -> Self {
        let total_interest: Money = schedule.iter().map(|l| l.interest_portion).sum();
        let final_payment = schedule
            .last()
            .map(|l| l.payment)
            .unwrap_or(monthly_payment);
        let term_months = schedule.len() as u32;

        let mut quote = LoanQuote {
            interest_policy,
            amortizing: interest_policy == InterestPolicy::ReducingBalance,
            principal,
            term_months,
            monthly_rate_percent,
            monthly_payment,
            final_payment,
            total_interest,
            total_repayable: principal + total_interest,
            currency: currency.clone(),
            summary: String::new(),
            schedule: Some(schedule),
        };
        quote.summary = quote.describe();
        quote
    }

    pub fn without_schedule(mut self) -> Self {
        self.schedule = None;
        self
    }

    pub fn schedule_lines(&self) -> &[InstallmentLine] {
        self.schedule.as_deref().unwrap_or(&[])
    }

    /// Date each installment, the first falling due on `first_payment_date`
    /// and each later one a calendar month after the previous.
    pub fn assign_due_dates(&mut self, first_payment_date: NaiveDate) -> LoanFinanceResult<()> {
        if let Some(lines) = self.schedule.as_mut() {
            for line in lines.iter_mut() {
                let offset = Months::new(line.month_index - 1);
                let due = first_payment_date.checked_add_months(offset).ok_or_else(|| {
                    LoanFinanceError::DateError(format!(
                        "Installment {} falls outside the supported date range",
                        line.month_index
                    ))
                })?;
                line.due_date = Some(due);
            }
        }
        Ok(())
    }

    /// Human readable one-liner for a product page, e.g.
    /// `6 x US$65.00 per month (US$390.00 in total)`.
    pub fn describe(&self) -> String {
        let payment = format_money(self.monthly_payment, &self.currency);
        let total = format_money(self.total_repayable, &self.currency);
        if self.term_months > 1 && self.final_payment != self.monthly_payment {
            format!(
                "{} x {payment} per month, then {} ({total} in total)",
                self.term_months - 1,
                format_money(self.final_payment, &self.currency),
            )
        } else {
            format!("{} x {payment} per month ({total} in total)", self.term_months)
        }
    }
}

/// Input for a quote at one term under one interest policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInput {
    pub principal: Money,
    pub term_months: u32,
    pub interest_policy: InterestPolicy,
    /// Overrides the policy's configured monthly rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    #[serde(default)]
    pub include_schedule: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub config: LoanPolicy,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote under whichever interest policy the caller picked.
pub fn compute_quote(
    interest_policy: InterestPolicy,
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<LoanQuote> {
    let (quote, _warnings) =
        build_quote(interest_policy, principal, term_months, monthly_rate_percent, policy)?;
    Ok(quote)
}

/// Price a loan and wrap it in the standard computation envelope.
pub fn quote_loan(input: &QuoteInput) -> LoanFinanceResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    input.config.validate()?;

    let rate_percent = input
        .monthly_rate_percent
        .unwrap_or_else(|| input.config.rate_percent_for(input.interest_policy));

    let (mut quote, mut warnings) = build_quote(
        input.interest_policy,
        input.principal,
        input.term_months,
        rate_percent,
        &input.config,
    )?;

    if input.include_schedule {
        if let Some(first) = input.first_payment_date {
            quote.assign_due_dates(first)?;
        }
        if !quote.amortizing {
            warnings.push(
                "Flat-rate schedule is non-amortizing: the interest/principal split is notional"
                    .into(),
            );
        }
    } else {
        if input.first_payment_date.is_some() {
            warnings.push("first_payment_date ignored because include_schedule is false".into());
        }
        quote = quote.without_schedule();
    }

    let rate_source = if input.monthly_rate_percent.is_some() {
        "input"
    } else {
        "policy"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(input.interest_policy),
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "term_months": input.term_months,
            "monthly_rate_percent": rate_percent.to_string(),
            "rate_source": rate_source,
        }),
        warnings,
        elapsed,
        quote,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn methodology(interest_policy: InterestPolicy) -> &'static str {
    match interest_policy {
        InterestPolicy::Flat => "Flat-rate installment plan (interest on original principal)",
        InterestPolicy::ReducingBalance => "Reducing-balance amortization (annuity payment)",
    }
}

pub(crate) fn build_quote(
    interest_policy: InterestPolicy,
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<(LoanQuote, Vec<String>)> {
    match interest_policy {
        InterestPolicy::Flat => {
            flat::build_flat_quote(principal, term_months, monthly_rate_percent, policy)
        }
        InterestPolicy::ReducingBalance => reducing_balance::build_reducing_balance_quote(
            principal,
            term_months,
            monthly_rate_percent,
            policy,
        ),
    }
}

/// Shared validation for every quote: principal, then term, then rate.
/// Returns the monthly rate as a fraction.
pub(crate) fn validate_quote_inputs(
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<Rate> {
    validate_principal(principal)?;
    policy.validate_term(term_months)?;
    validate_rate_percent(monthly_rate_percent)?;
    Ok(percent_to_rate(monthly_rate_percent))
}

/// A price is positive, whole cents and at most `MAX_AMOUNT`.
fn validate_principal(principal: Money) -> LoanFinanceResult<()> {
    let reason = if principal <= Decimal::ZERO {
        "principal must be greater than zero".to_string()
    } else if principal > MAX_AMOUNT {
        format!("principal cannot exceed {MAX_AMOUNT}")
    } else if !is_whole_cents(principal) {
        "principal must be a whole number of cents".to_string()
    } else {
        return Ok(());
    };
    Err(LoanFinanceError::InvalidPrincipal {
        value: principal,
        reason,
    })
}
