use loan_finance_core::amortization::quote::{quote_loan, QuoteInput};
use loan_finance_core::amortization::{
    compute_flat_quote, compute_quote, compute_reducing_balance_quote,
};
use loan_finance_core::{InterestPolicy, LoanFinanceError, LoanPolicy, Money, Percent};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn policy() -> LoanPolicy {
    LoanPolicy::default()
}

/// A policy that also offers single-month financing.
fn policy_with_one_month() -> LoanPolicy {
    let mut p = LoanPolicy::default();
    p.allowed_terms.insert(0, 1);
    p
}

// ===========================================================================
// Concrete scenarios
// ===========================================================================

#[test]
fn test_flat_scenario_300_over_6_at_5pct() {
    let quote = compute_flat_quote(dec!(300), 6, dec!(5), &policy()).unwrap();
    assert_eq!(quote.total_interest, dec!(90));
    assert_eq!(quote.total_repayable, dec!(390));
    assert_eq!(quote.monthly_payment, dec!(65));
    assert_eq!(quote.summary, "6 x US$65.00 per month (US$390.00 in total)");
}

#[test]
fn test_reducing_scenario_1000_over_12_at_7pct() {
    let quote = compute_reducing_balance_quote(dec!(1000), 12, dec!(7), &policy()).unwrap();
    // 1000 x 0.07 x 1.07^12 / (1.07^12 - 1) = 125.9019...
    assert_eq!(quote.monthly_payment, dec!(125.90));
    assert_eq!(quote.total_interest, dec!(510.85));
    assert_eq!(quote.total_repayable, dec!(1510.85));
}

#[test]
fn test_single_month_reducing_balance() {
    let quote =
        compute_reducing_balance_quote(dec!(1000), 1, dec!(7), &policy_with_one_month()).unwrap();
    assert_eq!(quote.monthly_payment, dec!(1070));
    let lines = quote.schedule_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].interest_portion, dec!(70));
    assert_eq!(lines[0].principal_portion, dec!(1000));
    assert_eq!(lines[0].closing_balance, Decimal::ZERO);
}

// ===========================================================================
// Properties
// ===========================================================================

const PRINCIPALS: [Money; 5] = [dec!(49.99), dec!(300), dec!(1000), dec!(1234.56), dec!(8999)];
const RATES: [Percent; 5] = [dec!(0), dec!(1.5), dec!(5), dec!(7), dec!(12.25)];

#[test]
fn test_total_repayable_is_principal_plus_interest() {
    for policy_kind in InterestPolicy::ALL {
        for principal in PRINCIPALS {
            for &term in policy().allowed_terms() {
                for rate in RATES {
                    let q = compute_quote(policy_kind, principal, term, rate, &policy()).unwrap();
                    assert_eq!(q.total_repayable, q.principal + q.total_interest);
                    let interest: Money = q.schedule_lines().iter().map(|l| l.interest_portion).sum();
                    assert_eq!(interest, q.total_interest);
                }
            }
        }
    }
}

#[test]
fn test_reducing_schedule_repays_principal_exactly() {
    for principal in PRINCIPALS {
        for &term in policy().allowed_terms() {
            for rate in RATES {
                let q = compute_reducing_balance_quote(principal, term, rate, &policy()).unwrap();
                let lines = q.schedule_lines();
                let repaid: Money = lines.iter().map(|l| l.principal_portion).sum();
                assert!((repaid - principal).abs() <= dec!(0.01));
                assert_eq!(lines.last().unwrap().closing_balance, Decimal::ZERO);
                for line in lines {
                    assert!(line.closing_balance >= Decimal::ZERO);
                    assert_eq!(line.closing_balance, line.opening_balance - line.principal_portion);
                }
            }
        }
    }
}

#[test]
fn test_payment_non_decreasing_in_rate() {
    for policy_kind in InterestPolicy::ALL {
        for principal in PRINCIPALS {
            for &term in policy().allowed_terms() {
                let payments: Vec<Money> = RATES
                    .iter()
                    .map(|&r| {
                        compute_quote(policy_kind, principal, term, r, &policy())
                            .unwrap()
                            .monthly_payment
                    })
                    .collect();
                for pair in payments.windows(2) {
                    assert!(pair[1] >= pair[0], "{policy_kind} {principal} {term}: {pair:?}");
                }
            }
        }
    }
}

#[test]
fn test_reducing_payment_decreasing_in_term() {
    for principal in PRINCIPALS {
        for rate in RATES {
            let payments: Vec<Money> = policy()
                .allowed_terms()
                .iter()
                .map(|&t| {
                    compute_reducing_balance_quote(principal, t, rate, &policy())
                        .unwrap()
                        .monthly_payment
                })
                .collect();
            for pair in payments.windows(2) {
                assert!(pair[1] < pair[0], "{principal} at {rate}%: {pair:?}");
            }
        }
    }
}

// ===========================================================================
// Invalid input
// ===========================================================================

#[test]
fn test_zero_principal_rejected_not_divided() {
    for policy_kind in InterestPolicy::ALL {
        let err = compute_quote(policy_kind, Decimal::ZERO, 6, dec!(5), &policy()).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidPrincipal { .. }));
    }
}

#[test]
fn test_zero_term_rejected_not_divided() {
    for policy_kind in InterestPolicy::ALL {
        let err = compute_quote(policy_kind, dec!(300), 0, dec!(5), &policy()).unwrap_err();
        assert!(matches!(err, LoanFinanceError::InvalidTerm { term_months: 0, .. }));
    }
}

#[test]
fn test_negative_rate_rejected() {
    let err = compute_reducing_balance_quote(dec!(300), 6, dec!(-1), &policy()).unwrap_err();
    assert!(matches!(err, LoanFinanceError::InvalidRate { .. }));
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_quote_envelope_from_json() {
    let input: QuoteInput = serde_json::from_str(
        r#"{
            "principal": "1000",
            "term_months": 12,
            "interest_policy": "reducing_balance",
            "include_schedule": true
        }"#,
    )
    .unwrap();
    let out = quote_loan(&input).unwrap();
    assert_eq!(out.result.monthly_payment, dec!(125.90));
    assert_eq!(out.result.schedule_lines().len(), 12);
    assert_eq!(out.metadata.precision, "rust_decimal_128bit_cents");

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["interest_policy"], "reducing_balance");
    assert_eq!(json["result"]["schedule"][0]["month_index"], 1);
}
