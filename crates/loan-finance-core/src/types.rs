use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Rates as entered on the storefront (5 = 5% per month).
pub type Percent = Decimal;

/// Currency the storefront prices in
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
    ZWG,
    ZAR,
    Other(String),
}

impl Currency {
    /// Display prefix used on price tags
    pub fn symbol(&self) -> &str {
        match self {
            Currency::USD => "US$",
            Currency::ZWG => "ZiG",
            Currency::ZAR => "R",
            Currency::Other(code) => code.as_str(),
        }
    }
}

/// How interest is charged over the life of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestPolicy {
    /// Interest charged once on the original principal for every month of the term
    Flat,
    /// Interest charged each month on the outstanding balance only
    ReducingBalance,
}

impl InterestPolicy {
    pub const ALL: [InterestPolicy; 2] = [InterestPolicy::Flat, InterestPolicy::ReducingBalance];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterestPolicy::Flat => "flat",
            InterestPolicy::ReducingBalance => "reducing_balance",
        }
    }
}

impl fmt::Display for InterestPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "flat" | "flat_rate" => Ok(InterestPolicy::Flat),
            "reducing" | "reducing_balance" | "amortizing" => Ok(InterestPolicy::ReducingBalance),
            other => Err(format!(
                "unknown interest policy '{other}' (expected 'flat' or 'reducing_balance')"
            )),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_cents".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::USD.symbol(), "US$");
        assert_eq!(Currency::Other("BWP".into()).symbol(), "BWP");
    }

    #[test]
    fn test_interest_policy_parsing() {
        assert_eq!("flat".parse::<InterestPolicy>(), Ok(InterestPolicy::Flat));
        assert_eq!(
            "Reducing-Balance".parse::<InterestPolicy>(),
            Ok(InterestPolicy::ReducingBalance)
        );
        assert!("balloon".parse::<InterestPolicy>().is_err());
    }

    #[test]
    fn test_interest_policy_serde_names() {
        let json = serde_json::to_string(&InterestPolicy::ReducingBalance).unwrap();
        assert_eq!(json, "\"reducing_balance\"");
        assert_eq!(InterestPolicy::Flat.to_string(), "flat");
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "Test",
            &serde_json::json!({ "k": "v" }),
            vec!["w".into()],
            12,
            42u32,
        );
        assert_eq!(out.result, 42);
        assert_eq!(out.methodology, "Test");
        assert_eq!(out.assumptions["k"], "v");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.metadata.computation_time_us, 12);
    }
}
