//! Node bindings for the storefront. Every function takes and returns JSON
//! strings so the Next.js handlers can pass form data straight through.

use napi::Result as NapiResult;
use napi_derive::napi;

use loan_finance_core::LoanPolicy;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_loan(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::amortization::quote::QuoteInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_finance_core::amortization::quote::quote_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_policies(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::amortization::comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_finance_core::amortization::comparison::compare_policies(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn installment_options(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::amortization::comparison::OptionsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_finance_core::amortization::comparison::installment_options(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn check_affordability(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_finance_core::affordability::affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn max_principal(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::amortization::max_principal::MaxPrincipalInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_finance_core::amortization::max_principal::max_principal(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan applications
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_application(input_json: String) -> NapiResult<String> {
    let input: loan_finance_core::assessment::ApplicationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_finance_core::assessment::assess_application(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Terms offered on the product page. Pass a policy JSON to override the
/// defaults, or nothing.
#[napi]
pub fn allowed_terms(config_json: Option<String>) -> NapiResult<Vec<u32>> {
    let policy = match config_json {
        Some(json) => LoanPolicy::from_json_str(&json).map_err(to_napi_error)?,
        None => LoanPolicy::default(),
    };
    Ok(policy.allowed_terms().to_vec())
}

#[napi]
pub fn default_policy() -> NapiResult<String> {
    serde_json::to_string(&LoanPolicy::default()).map_err(to_napi_error)
}
