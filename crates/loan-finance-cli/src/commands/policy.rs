use clap::Args;
use serde_json::{json, Value};

use loan_finance_core::money::{format_rate, percent_to_rate};
use loan_finance_core::{InterestPolicy, LoanPolicy};

/// Arguments for showing the financing policy
#[derive(Args)]
pub struct TermsArgs {
    /// Only list the allowed terms
    #[arg(long)]
    pub terms_only: bool,
}

pub fn run_terms(
    args: TermsArgs,
    policy: Option<LoanPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let source = if policy.is_some() { "config" } else { "defaults" };
    let policy = policy.unwrap_or_default();

    if args.terms_only {
        return Ok(json!({ "result": { "allowed_terms": policy.allowed_terms() } }));
    }

    let mut rates = serde_json::Map::new();
    for interest_policy in InterestPolicy::ALL {
        let percent = policy.rate_percent_for(interest_policy);
        rates.insert(
            interest_policy.to_string(),
            Value::String(format_rate(percent_to_rate(percent))),
        );
    }

    Ok(json!({
        "result": {
            "allowed_terms": policy.allowed_terms(),
            "monthly_rates": rates,
            "affordability_ratio": format_rate(policy.affordability_ratio),
            "currency": policy.currency,
        },
        "methodology": format!("Financing policy ({source})"),
    }))
}
