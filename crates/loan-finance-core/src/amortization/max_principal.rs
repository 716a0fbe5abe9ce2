//! Reverse calculations: the most expensive product a customer can finance
//! when a single installment may not exceed `net_salary x ratio`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::{validate_net_salary, validate_rate_percent, validate_ratio, LoanPolicy};
use crate::error::LoanFinanceError;
use crate::money::{floor_money, format_money, percent_to_rate, CENT, MAX_AMOUNT};
use crate::time_value;
use crate::types::*;
use crate::LoanFinanceResult;

use super::quote::build_quote;

/// Upper bound on one-cent corrections after flooring the closed form.
const MAX_CENT_ADJUSTMENTS: u32 = 100;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxPrincipalInput {
    pub net_salary: Money,
    pub term_months: u32,
    pub interest_policy: InterestPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordability_ratio: Option<Rate>,
    #[serde(default)]
    pub config: LoanPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxPrincipalOutput {
    pub interest_policy: InterestPolicy,
    pub term_months: u32,
    pub monthly_rate_percent: Percent,
    /// `net_salary x ratio`, floored to the cent.
    pub payment_ceiling: Money,
    pub max_principal: Money,
    /// Largest installment of the schedule at `max_principal`.
    pub monthly_payment_at_max: Money,
    pub formatted_max_principal: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest flat-rate principal whose installments all stay within the ceiling:
/// `P = C x n / (1 + r x n)`, floored to the cent.
pub fn max_principal_flat(
    net_salary: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    ratio: Rate,
    policy: &LoanPolicy,
) -> LoanFinanceResult<Money> {
    let (rate, ceiling) =
        validate_reverse_inputs(net_salary, term_months, monthly_rate_percent, ratio, policy)?;
    let n = Decimal::from(term_months);

    let closed_form = ceiling * n / (Decimal::ONE + rate * n);

    settle_below_ceiling(
        InterestPolicy::Flat,
        floor_money(closed_form),
        ceiling,
        |p| largest_installment(InterestPolicy::Flat, p, term_months, monthly_rate_percent, policy),
    )
}

/// Largest reducing-balance principal whose installments all stay within the
/// ceiling: `P = C x ((1+r)^n - 1) / (r x (1+r)^n)`, or `C x n` at a zero rate.
pub fn max_principal_reducing_balance(
    net_salary: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    ratio: Rate,
    policy: &LoanPolicy,
) -> LoanFinanceResult<Money> {
    let (rate, ceiling) =
        validate_reverse_inputs(net_salary, term_months, monthly_rate_percent, ratio, policy)?;

    let closed_form = time_value::pv(rate, term_months, -ceiling, Decimal::ZERO)?;

    settle_below_ceiling(
        InterestPolicy::ReducingBalance,
        floor_money(closed_form),
        ceiling,
        |p| {
            largest_installment(
                InterestPolicy::ReducingBalance,
                p,
                term_months,
                monthly_rate_percent,
                policy,
            )
        },
    )
}

/// Dispatch on interest policy.
pub fn max_principal_for(
    interest_policy: InterestPolicy,
    net_salary: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    ratio: Rate,
    policy: &LoanPolicy,
) -> LoanFinanceResult<Money> {
    match interest_policy {
        InterestPolicy::Flat => {
            max_principal_flat(net_salary, term_months, monthly_rate_percent, ratio, policy)
        }
        InterestPolicy::ReducingBalance => max_principal_reducing_balance(
            net_salary,
            term_months,
            monthly_rate_percent,
            ratio,
            policy,
        ),
    }
}

/// Maximum affordable price wrapped in the standard computation envelope.
pub fn max_principal(
    input: &MaxPrincipalInput,
) -> LoanFinanceResult<ComputationOutput<MaxPrincipalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    input.config.validate()?;

    let rate_percent = input
        .monthly_rate_percent
        .unwrap_or_else(|| input.config.rate_percent_for(input.interest_policy));
    let ratio = input
        .affordability_ratio
        .unwrap_or(input.config.affordability_ratio);

    let max = max_principal_for(
        input.interest_policy,
        input.net_salary,
        input.term_months,
        rate_percent,
        ratio,
        &input.config,
    )?;

    let monthly_payment_at_max = if max.is_zero() {
        warnings.push("Installment ceiling is too low to finance any amount".into());
        Decimal::ZERO
    } else {
        largest_installment(
            input.interest_policy,
            max,
            input.term_months,
            rate_percent,
            &input.config,
        )?
    };

    let output = MaxPrincipalOutput {
        interest_policy: input.interest_policy,
        term_months: input.term_months,
        monthly_rate_percent: rate_percent,
        payment_ceiling: floor_money(input.net_salary * ratio),
        max_principal: max,
        monthly_payment_at_max,
        formatted_max_principal: format_money(max, &input.config.currency),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Maximum affordable principal (inverted installment formula, floored)",
        &serde_json::json!({
            "net_salary": input.net_salary.to_string(),
            "affordability_ratio": ratio.to_string(),
            "monthly_rate_percent": rate_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Returns the monthly rate as a fraction and the installment ceiling.
fn validate_reverse_inputs(
    net_salary: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    ratio: Rate,
    policy: &LoanPolicy,
) -> LoanFinanceResult<(Rate, Money)> {
    validate_net_salary(net_salary)?;
    policy.validate_term(term_months)?;
    validate_rate_percent(monthly_rate_percent)?;
    validate_ratio(ratio)?;

    // Flooring the ceiling onto the cent grid keeps rounded installments under it
    Ok((percent_to_rate(monthly_rate_percent), floor_money(net_salary * ratio)))
}

/// Highest installment anywhere in the schedule, including a final one that
/// absorbs rounding.
fn largest_installment(
    interest_policy: InterestPolicy,
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<Money> {
    let (quote, _) = build_quote(interest_policy, principal, term_months, monthly_rate_percent, policy)?;
    Ok(quote.monthly_payment.max(quote.final_payment))
}

/// Walk a floored candidate down one cent at a time until every installment
/// of its schedule fits under the ceiling.
fn settle_below_ceiling<F>(
    interest_policy: InterestPolicy,
    candidate: Money,
    ceiling: Money,
    payment_at: F,
) -> LoanFinanceResult<Money>
where
    F: Fn(Money) -> LoanFinanceResult<Money>,
{
    let mut principal = candidate.min(MAX_AMOUNT);
    for step in 0..MAX_CENT_ADJUSTMENTS {
        if principal <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        if payment_at(principal)? <= ceiling {
            if step > 0 {
                debug!(%interest_policy, steps = step, "max principal stepped down for rounding");
            }
            return Ok(principal);
        }
        principal -= CENT;
    }

    warn!(%interest_policy, %candidate, %ceiling, "max principal did not settle under ceiling");
    Err(LoanFinanceError::InvalidInput {
        field: "net_salary".into(),
        reason: format!(
            "Could not find a principal whose installment stays within {ceiling} after {MAX_CENT_ADJUSTMENTS} adjustments"
        ),
    })
}
