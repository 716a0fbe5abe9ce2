//! Civil-servant device financing: price a product at the requested term,
//! test it against the applicant's net salary, and when it does not fit,
//! work out what would.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::affordability::{check_affordability, AffordabilityCheck};
use crate::amortization::max_principal::max_principal_for;
use crate::amortization::quote::{build_quote, methodology, LoanQuote};
use crate::config::LoanPolicy;
use crate::money::{format_money, format_rate};
use crate::types::*;
use crate::LoanFinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationInput {
    pub product_price: Money,
    pub term_months: u32,
    pub net_salary: Money,
    pub interest_policy: InterestPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate_percent: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordability_ratio: Option<Rate>,
    #[serde(default)]
    pub include_schedule: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub config: LoanPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Requested term is affordable as is.
    Approved,
    /// Not affordable at the requested term, but a longer allowed term is.
    CounterOffer,
    /// No allowed term brings the installment within the limit.
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationAssessment {
    pub status: ApplicationStatus,
    pub quote: LoanQuote,
    pub affordability: AffordabilityCheck,
    /// Dearest product affordable at the requested term (unless approved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_affordable_price: Option<Money>,
    /// Shortest allowed term at which the product becomes affordable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_quote: Option<LoanQuote>,
    pub reasons: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn assess_application(
    input: &ApplicationInput,
) -> LoanFinanceResult<ComputationOutput<ApplicationAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let config = &input.config;
    config.validate()?;

    let rate_percent = input
        .monthly_rate_percent
        .unwrap_or_else(|| config.rate_percent_for(input.interest_policy));
    let ratio = input.affordability_ratio.unwrap_or(config.affordability_ratio);

    let (mut quote, quote_warnings) = build_quote(
        input.interest_policy,
        input.product_price,
        input.term_months,
        rate_percent,
        config,
    )?;
    warnings.extend(quote_warnings);

    let check = check_affordability(quote.monthly_payment, input.net_salary, ratio)?;
    let ceiling = check.max_affordable_payment;
    let mut reasons: Vec<String> = Vec::new();

    let (status, max_affordable_price, suggested_term, suggested_quote) = if check.is_affordable {
        reasons.push(format!(
            "Installment of {} is within {} of net salary ({})",
            format_money(quote.monthly_payment, &config.currency),
            format_rate(ratio),
            format_money(ceiling, &config.currency),
        ));
        if quote.final_payment > ceiling {
            warnings.push(format!(
                "Final installment of {} exceeds the limit by rounding",
                format_money(quote.final_payment, &config.currency)
            ));
        }
        (ApplicationStatus::Approved, None, None, None)
    } else {
        reasons.push(format!(
            "Installment of {} exceeds {} of net salary ({})",
            format_money(quote.monthly_payment, &config.currency),
            format_rate(ratio),
            format_money(ceiling, &config.currency),
        ));

        let max_price = max_principal_for(
            input.interest_policy,
            input.net_salary,
            input.term_months,
            rate_percent,
            ratio,
            config,
        )?;
        reasons.push(format!(
            "Maximum affordable price over {} months is {}",
            input.term_months,
            format_money(max_price, &config.currency),
        ));

        let mut alternative: Option<LoanQuote> = None;
        for &term in config.allowed_terms() {
            if term <= input.term_months {
                continue;
            }
            let (candidate, _) =
                build_quote(input.interest_policy, input.product_price, term, rate_percent, config)?;
            if candidate.monthly_payment.max(candidate.final_payment) <= ceiling {
                alternative = Some(candidate.without_schedule());
                break;
            }
        }

        match alternative {
            Some(alt) => {
                reasons.push(format!(
                    "Affordable over {} months at {} per month",
                    alt.term_months,
                    format_money(alt.monthly_payment, &config.currency),
                ));
                (
                    ApplicationStatus::CounterOffer,
                    Some(max_price),
                    Some(alt.term_months),
                    Some(alt),
                )
            }
            None => {
                reasons.push("No allowed term brings the installment within the limit".into());
                (ApplicationStatus::Declined, Some(max_price), None, None)
            }
        }
    };

    if input.include_schedule {
        if let Some(first) = input.first_payment_date {
            quote.assign_due_dates(first)?;
        }
    } else {
        quote = quote.without_schedule();
    }

    info!(
        status = ?status,
        price = %input.product_price,
        term_months = input.term_months,
        interest_policy = %input.interest_policy,
        "loan application assessed"
    );

    let output = ApplicationAssessment {
        status,
        quote,
        affordability: check,
        max_affordable_price,
        suggested_term,
        suggested_quote,
        reasons,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Loan application assessment: {}", methodology(input.interest_policy)),
        &serde_json::json!({
            "monthly_rate_percent": rate_percent.to_string(),
            "affordability_ratio": ratio.to_string(),
            "allowed_terms": config.allowed_terms(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn application(price: Money, term: u32, salary: Money) -> ApplicationInput {
        ApplicationInput {
            product_price: price,
            term_months: term,
            net_salary: salary,
            interest_policy: InterestPolicy::Flat,
            monthly_rate_percent: None,
            affordability_ratio: None,
            include_schedule: false,
            first_payment_date: None,
            config: LoanPolicy::default(),
        }
    }

    #[test]
    fn test_approved() {
        let out = assess_application(&application(dec!(300), 6, dec!(400))).unwrap();
        let a = &out.result;
        assert_eq!(a.status, ApplicationStatus::Approved);
        assert_eq!(a.quote.monthly_payment, dec!(65));
        assert!(a.max_affordable_price.is_none());
        assert!(a.quote.schedule.is_none());
    }

    #[test]
    fn test_counter_offer_finds_shortest_longer_term() {
        // 65 > 60 at 6 months; 7 months costs 57.86
        let out = assess_application(&application(dec!(300), 6, dec!(200))).unwrap();
        let a = &out.result;
        assert_eq!(a.status, ApplicationStatus::CounterOffer);
        assert_eq!(a.suggested_term, Some(7));
        assert_eq!(a.suggested_quote.as_ref().unwrap().monthly_payment, dec!(57.86));
        assert_eq!(a.max_affordable_price, Some(dec!(276.92)));
        assert!(!a.affordability.is_affordable);
    }

    #[test]
    fn test_declined_when_no_term_fits() {
        // Flat 5% never drops below 5% of the price per month: 2000 x 0.05 = 100 > 60
        let out = assess_application(&application(dec!(2000), 6, dec!(200))).unwrap();
        let a = &out.result;
        assert_eq!(a.status, ApplicationStatus::Declined);
        assert!(a.suggested_term.is_none());
        assert!(a.max_affordable_price.unwrap() < dec!(2000));
        assert!(a.reasons.iter().any(|r| r.contains("No allowed term")));
    }

    #[test]
    fn test_schedule_with_due_dates() {
        let mut input = application(dec!(300), 6, dec!(400));
        input.include_schedule = true;
        input.first_payment_date = NaiveDate::from_ymd_opt(2025, 3, 25);
        let out = assess_application(&input).unwrap();
        let lines = out.result.quote.schedule_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[5].due_date, NaiveDate::from_ymd_opt(2025, 8, 25));
    }

    #[test]
    fn test_invalid_salary_propagates() {
        assert!(assess_application(&application(dec!(300), 6, dec!(0))).is_err());
    }
}
