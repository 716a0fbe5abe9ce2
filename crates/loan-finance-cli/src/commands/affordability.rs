use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_finance_core::affordability::{self, AffordabilityInput};
use loan_finance_core::amortization::max_principal::{self, MaxPrincipalInput};
use loan_finance_core::{InterestPolicy, LoanPolicy};

use crate::input;

/// Arguments for an affordability check
#[derive(Args)]
pub struct AffordArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly installment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Net monthly salary
    #[arg(long)]
    pub salary: Option<Decimal>,

    /// Fraction of salary an installment may take (defaults to the policy's ratio)
    #[arg(long)]
    pub ratio: Option<Decimal>,
}

/// Arguments for the maximum affordable price
#[derive(Args)]
pub struct MaxPrincipalArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly salary
    #[arg(long)]
    pub salary: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Interest policy: flat or reducing_balance
    #[arg(long)]
    pub policy: Option<InterestPolicy>,

    /// Monthly rate in percent (defaults to the policy's configured rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Fraction of salary an installment may take (defaults to the policy's ratio)
    #[arg(long)]
    pub ratio: Option<Decimal>,
}

pub fn run_afford(
    args: AffordArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input = match input::read_input::<AffordabilityInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => AffordabilityInput {
            monthly_payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            net_salary: args.salary.ok_or("--salary is required (or provide --input)")?,
            affordability_ratio: args.ratio,
            config: policy.unwrap_or_default(),
        },
    };

    let result = affordability::affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_max_principal(
    args: MaxPrincipalArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let max_input = match input::read_input::<MaxPrincipalInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => MaxPrincipalInput {
            net_salary: args.salary.ok_or("--salary is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            interest_policy: args
                .policy
                .ok_or("--policy is required: flat or reducing_balance (or provide --input)")?,
            monthly_rate_percent: args.rate,
            affordability_ratio: args.ratio,
            config: policy.unwrap_or_default(),
        },
    };

    let result = max_principal::max_principal(&max_input)?;
    Ok(serde_json::to_value(result)?)
}
