use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

use crate::config::LoanPolicy;
use crate::types::*;
use crate::LoanFinanceResult;

use super::quote::{build_quote, LoanQuote};

// ---------------------------------------------------------------------------
// Side-by-side policy comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub principal: Money,
    pub term_months: u32,
    #[serde(default)]
    pub include_schedule: bool,
    #[serde(default)]
    pub config: LoanPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyComparison {
    pub flat: LoanQuote,
    pub reducing_balance: LoanQuote,
    /// Flat payment minus reducing-balance payment.
    pub monthly_payment_difference: Money,
    /// Flat interest minus reducing-balance interest.
    pub total_interest_difference: Money,
    /// Policy with the lower total repayable; `None` on a tie.
    pub cheaper_policy: Option<InterestPolicy>,
}

/// Quote the same product and term under both interest policies, each at its
/// configured rate.
pub fn compare_policies(
    input: &ComparisonInput,
) -> LoanFinanceResult<ComputationOutput<PolicyComparison>> {
    let start = Instant::now();
    input.config.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let mut quote_under = |policy: InterestPolicy| -> LoanFinanceResult<LoanQuote> {
        let (quote, quote_warnings) = build_quote(
            policy,
            input.principal,
            input.term_months,
            input.config.rate_percent_for(policy),
            &input.config,
        )?;
        warnings.extend(quote_warnings.into_iter().map(|w| format!("{policy}: {w}")));
        Ok(if input.include_schedule {
            quote
        } else {
            quote.without_schedule()
        })
    };
    let flat = quote_under(InterestPolicy::Flat)?;
    let reducing_balance = quote_under(InterestPolicy::ReducingBalance)?;

    let cheaper_policy = match flat.total_repayable.cmp(&reducing_balance.total_repayable) {
        Ordering::Less => Some(InterestPolicy::Flat),
        Ordering::Greater => Some(InterestPolicy::ReducingBalance),
        Ordering::Equal => None,
    };

    let output = PolicyComparison {
        monthly_payment_difference: flat.monthly_payment - reducing_balance.monthly_payment,
        total_interest_difference: flat.total_interest - reducing_balance.total_interest,
        cheaper_policy,
        flat,
        reducing_balance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Flat vs reducing-balance comparison",
        &serde_json::json!({
            "flat_monthly_rate_percent": input.config.flat_monthly_rate_percent.to_string(),
            "reducing_balance_monthly_rate_percent":
                input.config.reducing_balance_monthly_rate_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Installment options across every allowed term
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsInput {
    pub principal: Money,
    pub interest_policy: InterestPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    #[serde(default)]
    pub config: LoanPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentOption {
    pub term_months: u32,
    pub monthly_payment: Money,
    pub final_payment: Money,
    pub total_interest: Money,
    pub total_repayable: Money,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentOptions {
    pub principal: Money,
    pub interest_policy: InterestPolicy,
    pub monthly_rate_percent: Percent,
    pub options: Vec<InstallmentOption>,
}

/// One row per allowed term, shortest first.
pub fn installment_options(
    input: &OptionsInput,
) -> LoanFinanceResult<ComputationOutput<InstallmentOptions>> {
    let start = Instant::now();
    input.config.validate()?;

    let rate_percent = input
        .monthly_rate_percent
        .unwrap_or_else(|| input.config.rate_percent_for(input.interest_policy));

    let mut warnings: Vec<String> = Vec::new();
    let mut options = Vec::with_capacity(input.config.allowed_terms().len());
    for &term in input.config.allowed_terms() {
        let (quote, quote_warnings) = build_quote(
            input.interest_policy,
            input.principal,
            term,
            rate_percent,
            &input.config,
        )?;
        warnings.extend(quote_warnings.into_iter().map(|w| format!("{term} months: {w}")));
        options.push(InstallmentOption {
            term_months: term,
            monthly_payment: quote.monthly_payment,
            final_payment: quote.final_payment,
            total_interest: quote.total_interest,
            total_repayable: quote.total_repayable,
            summary: quote.summary,
        });
    }

    let output = InstallmentOptions {
        principal: input.principal,
        interest_policy: input.interest_policy,
        monthly_rate_percent: rate_percent,
        options,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Installment options across allowed terms",
        &serde_json::json!({
            "terms": input.config.allowed_terms(),
            "monthly_rate_percent": rate_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

impl InstallmentOptions {
    /// Cheapest monthly installment on offer, i.e. the longest term.
    pub fn lowest_payment(&self) -> Option<&InstallmentOption> {
        self.options.iter().min_by_key(|o| o.monthly_payment)
    }

    /// Options whose installment does not exceed `ceiling`.
    pub fn within(&self, ceiling: Money) -> impl Iterator<Item = &InstallmentOption> {
        self.options
            .iter()
            .filter(move |o| o.monthly_payment <= ceiling.max(Decimal::ZERO))
    }
}
