use rust_decimal::Decimal;
use tracing::debug;

use crate::config::LoanPolicy;
use crate::money::round_money;
use crate::time_value;
use crate::types::{InterestPolicy, Money, Percent, Rate};
use crate::LoanFinanceResult;

use super::quote::{validate_quote_inputs, InstallmentLine, LoanQuote};

/// Reducing-balance quote: a level annuity payment
/// `P x r x (1+r)^n / ((1+r)^n - 1)`, with each month's interest charged on
/// the balance still outstanding. A zero rate degenerates to `P / n`.
pub fn compute_reducing_balance_quote(
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<LoanQuote> {
    let (quote, warnings) =
        build_reducing_balance_quote(principal, term_months, monthly_rate_percent, policy)?;
    for w in &warnings {
        debug!(warning = %w, "reducing-balance quote");
    }
    Ok(quote)
}

/// Level monthly payment rounded to the cent.
fn annuity_payment(principal: Money, term_months: u32, rate: Rate) -> LoanFinanceResult<Money> {
    let exact = time_value::pmt(rate, term_months, -principal, Decimal::ZERO)?;
    Ok(round_money(exact))
}

pub(crate) fn build_reducing_balance_quote(
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<(LoanQuote, Vec<String>)> {
    let rate = validate_quote_inputs(principal, term_months, monthly_rate_percent, policy)?;
    let mut warnings: Vec<String> = Vec::new();

    let monthly_payment = annuity_payment(principal, term_months, rate)?;

    let mut schedule = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let opening = balance;
        let interest = round_money(opening * rate);

        // The final installment clears whatever rounding drift is left
        let principal_portion = if month == term_months {
            opening
        } else {
            let scheduled = monthly_payment - interest;
            if scheduled > opening {
                warnings.push(format!(
                    "Month {month}: balance cleared early by rounding; installment capped at the outstanding balance"
                ));
            }
            scheduled.min(opening).max(Decimal::ZERO)
        };

        balance = (opening - principal_portion).max(Decimal::ZERO);

        schedule.push(InstallmentLine {
            month_index: month,
            due_date: None,
            opening_balance: opening,
            interest_portion: interest,
            principal_portion,
            payment: interest + principal_portion,
            closing_balance: balance,
        });
    }

    let quote = LoanQuote::from_schedule(
        InterestPolicy::ReducingBalance,
        principal,
        monthly_rate_percent,
        monthly_payment,
        &policy.currency,
        schedule,
    );

    if quote.final_payment != quote.monthly_payment {
        debug!(
            regular = %quote.monthly_payment,
            last = %quote.final_payment,
            "final installment adjusted for rounding"
        );
    }
    debug!(
        principal = %principal,
        term_months,
        rate = %rate,
        monthly_payment = %quote.monthly_payment,
        total_interest = %quote.total_interest,
        "computed reducing-balance quote"
    );

    Ok((quote, warnings))
}
