//! Financing policy: the rates, affordability ratio and allowed terms the
//! storefront offers. Every calculation takes a `LoanPolicy` explicitly so
//! callers can vary policy without touching the algorithms.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanFinanceError;
use crate::money::MAX_AMOUNT;
use crate::types::{Currency, InterestPolicy, Money, Percent, Rate};
use crate::LoanFinanceResult;

/// Flat policy: 5% of the original price per month.
pub const DEFAULT_FLAT_MONTHLY_RATE_PERCENT: Percent = dec!(5);

/// Reducing-balance policy: 7% per month on the outstanding balance.
pub const DEFAULT_REDUCING_BALANCE_MONTHLY_RATE_PERCENT: Percent = dec!(7);

/// At most 30% of net salary may go to a single installment.
pub const DEFAULT_AFFORDABILITY_RATIO: Rate = dec!(0.30);

/// 2 through 12 months, then 18 and 24.
pub const DEFAULT_ALLOWED_TERMS: [u32; 13] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 18, 24];

/// Monthly rates above 100% are refused.
pub const MAX_MONTHLY_RATE_PERCENT: Percent = dec!(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    /// Monthly rate charged under the flat policy, as a percentage.
    pub flat_monthly_rate_percent: Percent,
    /// Monthly rate charged under the reducing-balance policy, as a percentage.
    pub reducing_balance_monthly_rate_percent: Percent,
    /// Fraction of net salary a single installment may consume.
    pub affordability_ratio: Rate,
    /// Terms (in months) a customer may choose from, ascending.
    pub allowed_terms: Vec<u32>,
    pub currency: Currency,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            flat_monthly_rate_percent: DEFAULT_FLAT_MONTHLY_RATE_PERCENT,
            reducing_balance_monthly_rate_percent: DEFAULT_REDUCING_BALANCE_MONTHLY_RATE_PERCENT,
            affordability_ratio: DEFAULT_AFFORDABILITY_RATIO,
            allowed_terms: DEFAULT_ALLOWED_TERMS.to_vec(),
            currency: Currency::default(),
        }
    }
}

impl LoanPolicy {
    /// Parse a policy from JSON and validate it.
    pub fn from_json_str(json: &str) -> LoanFinanceResult<Self> {
        let policy: LoanPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn allowed_terms(&self) -> &[u32] {
        &self.allowed_terms
    }

    pub fn is_allowed_term(&self, term_months: u32) -> bool {
        self.allowed_terms.contains(&term_months)
    }

    /// Configured monthly rate (percentage) for an interest policy.
    pub fn rate_percent_for(&self, policy: InterestPolicy) -> Percent {
        match policy {
            InterestPolicy::Flat => self.flat_monthly_rate_percent,
            InterestPolicy::ReducingBalance => self.reducing_balance_monthly_rate_percent,
        }
    }

    pub fn validate(&self) -> LoanFinanceResult<()> {
        let rates = [
            ("flat_monthly_rate_percent", self.flat_monthly_rate_percent),
            (
                "reducing_balance_monthly_rate_percent",
                self.reducing_balance_monthly_rate_percent,
            ),
        ];
        for (field, rate) in rates {
            validate_rate_percent(rate).map_err(|e| LoanFinanceError::InvalidInput {
                field: field.into(),
                reason: e.to_string(),
            })?;
        }
        validate_ratio(self.affordability_ratio)?;

        if self.allowed_terms.is_empty() {
            return Err(LoanFinanceError::InvalidInput {
                field: "allowed_terms".into(),
                reason: "At least one term must be offered".into(),
            });
        }
        if self.allowed_terms.contains(&0) {
            return Err(LoanFinanceError::InvalidInput {
                field: "allowed_terms".into(),
                reason: "Terms must be at least 1 month".into(),
            });
        }
        if self.allowed_terms.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LoanFinanceError::InvalidInput {
                field: "allowed_terms".into(),
                reason: "Terms must be strictly ascending with no duplicates".into(),
            });
        }
        Ok(())
    }

    /// Reject a term of zero or one the storefront does not offer.
    pub fn validate_term(&self, term_months: u32) -> LoanFinanceResult<()> {
        if term_months == 0 {
            return Err(LoanFinanceError::InvalidTerm {
                term_months,
                reason: "Term must be at least 1 month".into(),
            });
        }
        if !self.is_allowed_term(term_months) {
            let offered: Vec<String> = self.allowed_terms.iter().map(u32::to_string).collect();
            return Err(LoanFinanceError::InvalidTerm {
                term_months,
                reason: format!("Term must be one of: {}", offered.join(", ")),
            });
        }
        Ok(())
    }
}

/// Monthly rates live in [0, 100%].
pub fn validate_rate_percent(monthly_rate_percent: Percent) -> LoanFinanceResult<()> {
    if monthly_rate_percent < Decimal::ZERO {
        return Err(LoanFinanceError::InvalidRate {
            value: monthly_rate_percent,
            reason: "monthly rate cannot be negative".into(),
        });
    }
    if monthly_rate_percent > MAX_MONTHLY_RATE_PERCENT {
        return Err(LoanFinanceError::InvalidRate {
            value: monthly_rate_percent,
            reason: format!("monthly rate cannot exceed {MAX_MONTHLY_RATE_PERCENT}%"),
        });
    }
    Ok(())
}

/// Net salary must be positive and no larger than `MAX_AMOUNT`.
pub fn validate_net_salary(net_salary: Money) -> LoanFinanceResult<()> {
    if net_salary <= Decimal::ZERO {
        return Err(LoanFinanceError::InvalidSalary {
            value: net_salary,
            reason: "net salary must be greater than zero".into(),
        });
    }
    if net_salary > MAX_AMOUNT {
        return Err(LoanFinanceError::InvalidSalary {
            value: net_salary,
            reason: format!("net salary cannot exceed {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

/// Affordability ratios live in (0, 1].
pub fn validate_ratio(ratio: Rate) -> LoanFinanceResult<()> {
    if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
        return Err(LoanFinanceError::InvalidInput {
            field: "affordability_ratio".into(),
            reason: "Ratio must be greater than 0 and at most 1".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = LoanPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(
            policy.allowed_terms(),
            &[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 18, 24]
        );
        assert_eq!(policy.rate_percent_for(InterestPolicy::Flat), dec!(5));
        assert_eq!(
            policy.rate_percent_for(InterestPolicy::ReducingBalance),
            dec!(7)
        );
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let policy = LoanPolicy::from_json_str(r#"{"affordability_ratio": "0.25"}"#).unwrap();
        assert_eq!(policy.affordability_ratio, dec!(0.25));
        assert_eq!(policy.flat_monthly_rate_percent, dec!(5));
        assert_eq!(policy.allowed_terms.len(), 13);
    }

    #[test]
    fn test_unsorted_terms_rejected() {
        let policy = LoanPolicy {
            allowed_terms: vec![6, 3, 12],
            ..LoanPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_zero_term_in_config_rejected() {
        let policy = LoanPolicy {
            allowed_terms: vec![0, 3],
            ..LoanPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_ratio_bounds() {
        assert!(validate_ratio(dec!(0.30)).is_ok());
        assert!(validate_ratio(dec!(1)).is_ok());
        assert!(validate_ratio(dec!(0)).is_err());
        assert!(validate_ratio(dec!(1.01)).is_err());
    }

    #[test]
    fn test_validate_term() {
        let policy = LoanPolicy::default();
        assert!(policy.validate_term(6).is_ok());
        assert!(matches!(
            policy.validate_term(0),
            Err(LoanFinanceError::InvalidTerm { term_months: 0, .. })
        ));
        assert!(matches!(
            policy.validate_term(13),
            Err(LoanFinanceError::InvalidTerm { term_months: 13, .. })
        ));
    }

    #[test]
    fn test_rate_bounds() {
        assert!(validate_rate_percent(dec!(0)).is_ok());
        assert!(validate_rate_percent(dec!(100)).is_ok());
        assert!(matches!(
            validate_rate_percent(dec!(-0.5)),
            Err(LoanFinanceError::InvalidRate { .. })
        ));
        assert!(matches!(
            validate_rate_percent(dec!(1000000)),
            Err(LoanFinanceError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_policy_rate_above_ceiling_rejected() {
        let policy = LoanPolicy {
            reducing_balance_monthly_rate_percent: dec!(150),
            ..LoanPolicy::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(matches!(
            err,
            LoanFinanceError::InvalidInput { ref field, .. } if field == "reducing_balance_monthly_rate_percent"
        ));
    }

    #[test]
    fn test_salary_bounds() {
        assert!(validate_net_salary(dec!(200)).is_ok());
        assert!(validate_net_salary(MAX_AMOUNT).is_ok());
        assert!(validate_net_salary(dec!(0)).is_err());
        assert!(matches!(
            validate_net_salary(MAX_AMOUNT + dec!(0.01)),
            Err(LoanFinanceError::InvalidSalary { .. })
        ));
    }
}
