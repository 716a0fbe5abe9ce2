//! Cent-level rounding and display helpers.
//!
//! Every amount that leaves the calculator is rounded to the cent. Display
//! values round half away from zero; anything that bounds what a customer
//! can afford rounds towards negative infinity.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Currency, Money, Percent, Rate};

/// Smallest currency unit the storefront charges in.
pub const CENT: Money = dec!(0.01);

const MONEY_DP: u32 = 2;

/// Largest price, salary or installment the calculator accepts (one trillion).
/// Keeps every product and sum the schedules form well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Round to the cent, half away from zero.
pub fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round down to the cent.
pub fn floor_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::ToNegativeInfinity)
}

/// True when `amount` has nothing below the cent.
pub fn is_whole_cents(amount: Decimal) -> bool {
    amount == amount.round_dp(MONEY_DP)
}

/// 5 -> 0.05
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / dec!(100)
}

/// 0.05 -> 5
pub fn rate_to_percent(rate: Rate) -> Percent {
    rate * dec!(100)
}

/// Price-tag rendering, e.g. `US$1,234.50` or `-US$12.00`.
pub fn format_money(amount: Money, currency: &Currency) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{}{grouped}.{cents}", currency.symbol())
}

/// Fractional rate as a percentage string, e.g. `0.05` -> `5.00%`.
pub fn format_rate(rate: Rate) -> String {
    format!("{:.2}%", rate_to_percent(rate).round_dp(2))
}
