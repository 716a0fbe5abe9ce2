use loan_finance_core::affordability::{affordability, check_affordability, AffordabilityInput};
use loan_finance_core::amortization::max_principal::{max_principal, MaxPrincipalInput};
use loan_finance_core::amortization::{
    compute_flat_quote, compute_reducing_balance_quote, max_principal_flat,
    max_principal_reducing_balance,
};
use loan_finance_core::money::floor_money;
use loan_finance_core::{InterestPolicy, LoanFinanceError, LoanPolicy, Money, Percent};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SALARIES: [Money; 6] = [dec!(50), dec!(180), dec!(200), dec!(333.33), dec!(725.50), dec!(2400)];
const RATES: [Percent; 4] = [dec!(0), dec!(3.5), dec!(5), dec!(7)];

// ===========================================================================
// Affordability check
// ===========================================================================

#[test]
fn test_payment_65_against_salary_200() {
    let check = check_affordability(dec!(65), dec!(200), dec!(0.30)).unwrap();
    assert_eq!(check.max_affordable_payment, dec!(60));
    assert!(!check.is_affordable);
    assert_eq!(check.affordability_ratio, dec!(0.30));
}

#[test]
fn test_policy_ratio_used_by_default() {
    let mut config = LoanPolicy::default();
    config.affordability_ratio = dec!(0.40);
    let input = AffordabilityInput {
        monthly_payment: dec!(65),
        net_salary: dec!(200),
        affordability_ratio: None,
        config,
    };
    let out = affordability(&input).unwrap();
    assert_eq!(out.result.max_affordable_payment, dec!(80));
    assert!(out.result.is_affordable);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_non_positive_salary_rejected() {
    let err = check_affordability(dec!(65), dec!(0), dec!(0.30)).unwrap_err();
    assert!(matches!(err, LoanFinanceError::InvalidSalary { .. }));
}

// ===========================================================================
// Max principal round trips
// ===========================================================================

#[test]
fn test_reducing_balance_round_trip_is_affordable() {
    let policy = LoanPolicy::default();
    for salary in SALARIES {
        for &term in policy.allowed_terms() {
            for rate in RATES {
                let max =
                    max_principal_reducing_balance(salary, term, rate, dec!(0.30), &policy).unwrap();
                if max.is_zero() {
                    continue;
                }
                let quote = compute_reducing_balance_quote(max, term, rate, &policy).unwrap();
                assert!(
                    quote.monthly_payment <= salary * dec!(0.30),
                    "{salary} over {term} at {rate}%: {} > ceiling",
                    quote.monthly_payment
                );
                assert!(
                    quote.final_payment <= salary * dec!(0.30),
                    "{salary} over {term} at {rate}%: final {} > ceiling",
                    quote.final_payment
                );
                assert_eq!(max, max.round_dp(2));
            }
        }
    }
}

#[test]
fn test_flat_round_trip_is_affordable() {
    let policy = LoanPolicy::default();
    for salary in SALARIES {
        for &term in policy.allowed_terms() {
            for rate in RATES {
                let max = max_principal_flat(salary, term, rate, dec!(0.30), &policy).unwrap();
                if max.is_zero() {
                    continue;
                }
                let quote = compute_flat_quote(max, term, rate, &policy).unwrap();
                assert!(quote.monthly_payment <= salary * dec!(0.30));
                assert!(quote.final_payment <= salary * dec!(0.30));
            }
        }
    }
}

#[test]
fn test_final_installment_within_ceiling_after_rounding() {
    // Salary 101 over 8 months at 7%: the closed form gives 180.93, whose last
    // installment rounds up to 30.31 against a 30.30 ceiling
    let policy = LoanPolicy::default();
    let max = max_principal_reducing_balance(dec!(101), 8, dec!(7), dec!(0.30), &policy).unwrap();
    let quote = compute_reducing_balance_quote(max, 8, dec!(7), &policy).unwrap();
    assert!(max < dec!(180.93));
    assert!(quote.monthly_payment <= dec!(30.30));
    assert!(quote.final_payment <= dec!(30.30));
}

#[test]
fn test_every_installment_within_ceiling_across_salaries() {
    let policy = LoanPolicy::default();
    for cents in (10_000..=300_000).step_by(997) {
        let salary = Decimal::new(cents, 2);
        let ceiling = floor_money(salary * dec!(0.30));
        for term in [6, 8, 12, 24] {
            let max = max_principal_reducing_balance(salary, term, dec!(7), dec!(0.30), &policy).unwrap();
            let quote = compute_reducing_balance_quote(max, term, dec!(7), &policy).unwrap();
            assert!(
                quote.schedule_lines().iter().all(|line| line.payment <= ceiling),
                "{salary} over {term}: an installment exceeds {ceiling}"
            );
        }
    }
}

#[test]
fn test_reverse_calculations_reject_oversized_inputs() {
    let policy = LoanPolicy::default();
    assert!(matches!(
        max_principal_flat(Decimal::MAX, 24, dec!(5), dec!(1), &policy),
        Err(LoanFinanceError::InvalidSalary { .. })
    ));
    assert!(matches!(
        max_principal_reducing_balance(Decimal::MAX, 24, dec!(5), dec!(1), &policy),
        Err(LoanFinanceError::InvalidSalary { .. })
    ));
    assert!(matches!(
        max_principal_reducing_balance(dec!(1000), 24, dec!(1000000), dec!(0.30), &policy),
        Err(LoanFinanceError::InvalidRate { .. })
    ));
}

#[test]
fn test_reverse_calculations_at_largest_salary() {
    let policy = LoanPolicy::default();
    let salary = Decimal::from(1_000_000_000_000u64);
    let flat = max_principal_flat(salary, 24, dec!(5), dec!(1), &policy).unwrap();
    let reducing = max_principal_reducing_balance(salary, 24, dec!(100), dec!(1), &policy).unwrap();
    assert!(flat > Decimal::ZERO);
    assert!(reducing > Decimal::ZERO);
}

#[test]
fn test_inverse_is_tight() {
    // A few dollars above the maximum must no longer be affordable
    let policy = LoanPolicy::default();
    let max = max_principal_reducing_balance(dec!(400), 12, dec!(7), dec!(0.30), &policy).unwrap();
    let over = compute_reducing_balance_quote(max + dec!(5), 12, dec!(7), &policy).unwrap();
    assert!(over.monthly_payment > dec!(120));

    let max = max_principal_flat(dec!(400), 12, dec!(5), dec!(0.30), &policy).unwrap();
    let over = compute_flat_quote(max + dec!(5), 12, dec!(5), &policy).unwrap();
    assert!(over.monthly_payment > dec!(120));
}

#[test]
fn test_max_principal_envelope_uses_policy_defaults() {
    let input = MaxPrincipalInput {
        net_salary: dec!(400),
        term_months: 12,
        interest_policy: InterestPolicy::ReducingBalance,
        monthly_rate_percent: None,
        affordability_ratio: None,
        config: LoanPolicy::default(),
    };
    let out = max_principal(&input).unwrap();
    assert_eq!(out.result.monthly_rate_percent, dec!(7));
    assert_eq!(out.result.payment_ceiling, dec!(120));
    assert!(out.result.monthly_payment_at_max <= dec!(120));
    assert!(out.result.max_principal > Decimal::ZERO);
}

#[test]
fn test_max_principal_rejects_disallowed_term() {
    let err = max_principal_flat(dec!(400), 13, dec!(5), dec!(0.30), &LoanPolicy::default())
        .unwrap_err();
    assert!(matches!(err, LoanFinanceError::InvalidTerm { term_months: 13, .. }));
}
