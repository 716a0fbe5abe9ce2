use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanFinanceError;
use crate::types::{Money, Rate};
use crate::LoanFinanceResult;

/// Growth of one unit over `nper` periods: (1 + r)^n
pub fn compound_factor(rate: Rate, nper: u32) -> LoanFinanceResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(LoanFinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }

    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| LoanFinanceError::InvalidInput {
            field: "rate".into(),
            reason: format!("Compounding {rate} over {nper} periods overflows"),
        })
}

fn overflow(context: &str) -> LoanFinanceError {
    LoanFinanceError::InvalidInput {
        field: context.into(),
        reason: "Amount is too large to compute".into(),
    }
}

/// Present Value (spreadsheet sign convention: money paid out is negative)
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> LoanFinanceResult<Money> {
    if rate.is_zero() {
        let paid = pmt
            .checked_mul(Decimal::from(nper))
            .and_then(|p| p.checked_add(fv))
            .ok_or_else(|| overflow("pv"))?;
        return Ok(-paid);
    }

    let factor = compound_factor(rate, nper)?;
    if factor.is_zero() {
        return Err(LoanFinanceError::DivisionByZero {
            context: "PV factor".into(),
        });
    }

    let annuity_factor = (Decimal::ONE - Decimal::ONE / factor) / rate;
    let value = pmt
        .checked_mul(annuity_factor)
        .and_then(|p| p.checked_add(fv / factor))
        .ok_or_else(|| overflow("pv"))?;
    Ok(-value)
}

/// Payment (PMT) that amortises `present_value` down to `future_value` over `nper` periods
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> LoanFinanceResult<Money> {
    if nper == 0 {
        return Err(LoanFinanceError::InvalidTerm {
            term_months: nper,
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(LoanFinanceError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let grown = present_value
        .checked_mul(factor)
        .and_then(|g| g.checked_add(future_value))
        .ok_or_else(|| overflow("pmt"))?;
    Ok(-grown / annuity_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor() {
        assert_eq!(compound_factor(dec!(0.07), 1).unwrap(), dec!(1.07));
        assert_eq!(compound_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_is_an_error() {
        assert!(compound_factor(dec!(10000), 24).is_err());
    }

    #[test]
    fn test_pmt_standard_loan() {
        // 1000 at 7% per month over 12 months ≈ 125.90
        let payment = pmt(dec!(0.07), 12, dec!(-1000), Decimal::ZERO).unwrap();
        assert!((payment - dec!(125.9020)).abs() < dec!(0.001));
    }

    #[test]
    fn test_pmt_zero_rate() {
        let payment = pmt(Decimal::ZERO, 4, dec!(-1000), Decimal::ZERO).unwrap();
        assert_eq!(payment, dec!(250));
    }

    #[test]
    fn test_pmt_zero_periods() {
        assert!(matches!(
            pmt(dec!(0.05), 0, dec!(-1000), Decimal::ZERO),
            Err(LoanFinanceError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_pv_inverts_pmt() {
        let payment = pmt(dec!(0.07), 12, dec!(-1000), Decimal::ZERO).unwrap();
        let principal = pv(dec!(0.07), 12, -payment, Decimal::ZERO).unwrap();
        assert!((principal - dec!(1000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_pv_zero_rate() {
        let result = pv(Decimal::ZERO, 6, dec!(-60), Decimal::ZERO).unwrap();
        assert_eq!(result, dec!(360));
    }

    #[test]
    fn test_pmt_overflow_is_an_error() {
        let result = pmt(dec!(0.5), 12, -Decimal::MAX, Decimal::ZERO);
        assert!(matches!(result, Err(LoanFinanceError::InvalidInput { .. })));
    }

    #[test]
    fn test_pv_overflow_is_an_error() {
        assert!(pv(Decimal::ZERO, 24, -Decimal::MAX, Decimal::ZERO).is_err());
        assert!(pv(dec!(0.01), 24, -Decimal::MAX, Decimal::ZERO).is_err());
    }
}
