//! Flat-rate policy: interest is charged on the original price for every
//! month of the term, so it never declines as the balance is paid down.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::LoanPolicy;
use crate::money::{floor_money, round_money};
use crate::types::{InterestPolicy, Money, Percent, Rate};
use crate::LoanFinanceResult;

use super::quote::{validate_quote_inputs, InstallmentLine, LoanQuote};

/// Flat quote: `principal x rate x term` interest spread evenly over the term.
///
/// The schedule repeats the constant payment against a notional balance that
/// falls linearly; the last line absorbs any cent rounding.
pub fn compute_flat_quote(
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<LoanQuote> {
    let (quote, warnings) = build_flat_quote(principal, term_months, monthly_rate_percent, policy)?;
    for w in &warnings {
        debug!(warning = %w, "flat quote");
    }
    Ok(quote)
}

/// (total interest, regular monthly payment), both rounded to the cent.
fn flat_totals(principal: Money, term_months: u32, rate: Rate) -> (Money, Money) {
    let n = Decimal::from(term_months);
    let total_interest = round_money(principal * rate * n);
    let monthly_payment = round_money((principal + total_interest) / n);
    (total_interest, monthly_payment)
}

pub(crate) fn build_flat_quote(
    principal: Money,
    term_months: u32,
    monthly_rate_percent: Percent,
    policy: &LoanPolicy,
) -> LoanFinanceResult<(LoanQuote, Vec<String>)> {
    let rate = validate_quote_inputs(principal, term_months, monthly_rate_percent, policy)?;
    let mut warnings: Vec<String> = Vec::new();

    let (total_interest, monthly_payment) = flat_totals(principal, term_months, rate);
    // Floored so the nominal interest lines never add up to more than the total
    let interest_each = floor_money(total_interest / Decimal::from(term_months));

    let mut schedule = Vec::with_capacity(term_months as usize);
    let mut balance = principal;
    let mut interest_charged = Decimal::ZERO;
    let mut clamped = false;

    for month in 1..=term_months {
        let opening = balance;

        let (interest, principal_portion) = if month == term_months {
            (total_interest - interest_charged, opening)
        } else {
            let interest = interest_each.min(monthly_payment);
            let wanted = monthly_payment - interest;
            if wanted > opening {
                clamped = true;
            }
            (interest, wanted.min(opening))
        };

        interest_charged += interest;
        balance = opening - principal_portion;

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

    if clamped {
        warnings.push(format!(
            "Principal of {principal} is too small to spread over {term_months} months at a constant payment; early installments were capped"
        ));
    }

    let quote = LoanQuote::from_schedule(
        InterestPolicy::Flat,
        principal,
        monthly_rate_percent,
        monthly_payment,
        &policy.currency,
        schedule,
    );

    debug!(
        principal = %principal,
        term_months,
        rate = %rate,
        monthly_payment = %quote.monthly_payment,
        total_interest = %quote.total_interest,
        "computed flat quote"
    );

    Ok((quote, warnings))
}
