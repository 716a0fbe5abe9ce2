//! Installment affordability against net salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::{validate_net_salary, validate_ratio, LoanPolicy};
use crate::error::LoanFinanceError;
use crate::money::{floor_money, is_whole_cents, MAX_AMOUNT};
use crate::types::*;
use crate::LoanFinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_payment: Money,
    pub net_salary: Money,
    /// Overrides the policy's configured ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordability_ratio: Option<Rate>,
    #[serde(default)]
    pub config: LoanPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityCheck {
    pub monthly_payment: Money,
    pub net_salary: Money,
    pub affordability_ratio: Rate,
    /// `net_salary x ratio` rounded down to the cent. Installments are whole
    /// cents, so comparing against the floored ceiling gives the same verdict
    /// as the exact product while never displaying a limit the customer
    /// cannot actually pay up to.
    pub max_affordable_payment: Money,
    pub is_affordable: bool,
    /// Ceiling minus payment; negative when the payment is over the limit.
    pub headroom: Money,
    /// Share of net salary the installment takes, to 4 dp.
    pub payment_to_income: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decide whether `monthly_payment` is within `ratio` of `net_salary`.
pub fn check_affordability(
    monthly_payment: Money,
    net_salary: Money,
    ratio: Rate,
) -> LoanFinanceResult<AffordabilityCheck> {
    validate_net_salary(net_salary)?;
    validate_monthly_payment(monthly_payment)?;
    validate_ratio(ratio)?;

    let max_affordable_payment = floor_money(net_salary * ratio);
    let is_affordable = monthly_payment <= max_affordable_payment;

    debug!(
        payment = %monthly_payment,
        ceiling = %max_affordable_payment,
        is_affordable,
        "affordability check"
    );

    Ok(AffordabilityCheck {
        monthly_payment,
        net_salary,
        affordability_ratio: ratio,
        max_affordable_payment,
        is_affordable,
        headroom: max_affordable_payment - monthly_payment,
        payment_to_income: (monthly_payment / net_salary).round_dp(4),
    })
}

fn validate_monthly_payment(monthly_payment: Money) -> LoanFinanceResult<()> {
    let reason = if monthly_payment < Decimal::ZERO {
        "Monthly payment cannot be negative".to_string()
    } else if monthly_payment > MAX_AMOUNT {
        format!("Monthly payment cannot exceed {MAX_AMOUNT}")
    } else if !is_whole_cents(monthly_payment) {
        "Monthly payment must be a whole number of cents".to_string()
    } else {
        return Ok(());
    };
    Err(LoanFinanceError::InvalidInput {
        field: "monthly_payment".into(),
        reason,
    })
}

/// Affordability check wrapped in the standard computation envelope.
pub fn affordability(
    input: &AffordabilityInput,
) -> LoanFinanceResult<ComputationOutput<AffordabilityCheck>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    input.config.validate()?;

    let ratio = input
        .affordability_ratio
        .unwrap_or(input.config.affordability_ratio);
    if ratio > input.config.affordability_ratio {
        warnings.push(format!(
            "Ratio {ratio} is above the configured policy limit of {}",
            input.config.affordability_ratio
        ));
    }

    let check = check_affordability(input.monthly_payment, input.net_salary, ratio)?;
    let ratio_source = if input.affordability_ratio.is_some() {
        "input"
    } else {
        "policy"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Installment-to-net-salary affordability test",
        &serde_json::json!({
            "affordability_ratio": ratio.to_string(),
            "ratio_source": ratio_source,
        }),
        warnings,
        elapsed,
        check,
    ))
}
