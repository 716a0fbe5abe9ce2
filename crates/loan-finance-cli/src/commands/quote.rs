use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_finance_core::amortization::comparison::{self, ComparisonInput, OptionsInput};
use loan_finance_core::amortization::quote::{self, QuoteInput};
use loan_finance_core::{InterestPolicy, LoanPolicy};

use crate::input;

/// Arguments for a single quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Product price being financed
    #[arg(long, alias = "price")]
    pub principal: Option<Decimal>,

    /// Term in months (must be an allowed term)
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Interest policy: flat or reducing_balance
    #[arg(long)]
    pub policy: Option<InterestPolicy>,

    /// Monthly rate in percent (defaults to the policy's configured rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,
}

/// Arguments for a flat vs reducing-balance comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Product price being financed
    #[arg(long, alias = "price")]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Include both schedules
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for the installment options table
#[derive(Args)]
pub struct OptionsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Product price being financed
    #[arg(long, alias = "price")]
    pub principal: Option<Decimal>,

    /// Interest policy: flat or reducing_balance
    #[arg(long)]
    pub policy: Option<InterestPolicy>,

    /// Monthly rate in percent (defaults to the policy's configured rate)
    #[arg(long)]
    pub rate: Option<Decimal>,
}

pub fn run_quote(
    args: QuoteArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let quote_input = match input::read_input::<QuoteInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => QuoteInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            interest_policy: args
                .policy
                .ok_or("--policy is required: flat or reducing_balance (or provide --input)")?,
            monthly_rate_percent: args.rate,
            include_schedule: args.schedule,
            first_payment_date: args.first_payment,
            config: policy.unwrap_or_default(),
        },
    };

    let result = quote::quote_loan(&quote_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(
    args: CompareArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input = match input::read_input::<ComparisonInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => ComparisonInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            include_schedule: args.schedule,
            config: policy.unwrap_or_default(),
        },
    };

    let result = comparison::compare_policies(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_options(
    args: OptionsArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let options_input = match input::read_input::<OptionsInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => OptionsInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_policy: args
                .policy
                .ok_or("--policy is required: flat or reducing_balance (or provide --input)")?,
            monthly_rate_percent: args.rate,
            config: policy.unwrap_or_default(),
        },
    };

    let result = comparison::installment_options(&options_input)?;
    Ok(serde_json::to_value(result)?)
}
