use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_finance_core::assessment::{self, ApplicationInput};
use loan_finance_core::{InterestPolicy, LoanPolicy};

use crate::input;

/// Arguments for a device loan application
#[derive(Args)]
pub struct AssessArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Price of the product applied for
    #[arg(long, alias = "principal")]
    pub price: Option<Decimal>,

    /// Requested term in months
    #[arg(long, alias = "months")]
    pub term: Option<u32>,

    /// Applicant's net monthly salary
    #[arg(long)]
    pub salary: Option<Decimal>,

    /// Interest policy: flat or reducing_balance
    #[arg(long)]
    pub policy: Option<InterestPolicy>,

    /// Monthly rate in percent (defaults to the policy's configured rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Fraction of salary an installment may take (defaults to the policy's ratio)
    #[arg(long)]
    pub ratio: Option<Decimal>,

    /// Include the month-by-month schedule for the requested term
    #[arg(long)]
    pub schedule: bool,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment: Option<NaiveDate>,
}

pub fn run_assess(
    args: AssessArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let application = match input::read_input::<ApplicationInput>(args.input.as_deref())? {
        Some(mut from_json) => {
            if let Some(p) = policy {
                from_json.config = p;
            }
            from_json
        }
        None => ApplicationInput {
            product_price: args.price.ok_or("--price is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            net_salary: args.salary.ok_or("--salary is required (or provide --input)")?,
            interest_policy: args
                .policy
                .ok_or("--policy is required: flat or reducing_balance (or provide --input)")?,
            monthly_rate_percent: args.rate,
            affordability_ratio: args.ratio,
            include_schedule: args.schedule,
            first_payment_date: args.first_payment,
            config: policy.unwrap_or_default(),
        },
    };

    let result = assessment::assess_application(&application)?;
    Ok(serde_json::to_value(result)?)
}
