use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanFinanceError {
    #[error("Invalid principal: {value} — {reason}")]
    InvalidPrincipal { value: Decimal, reason: String },

    #[error("Invalid term: {term_months} months — {reason}")]
    InvalidTerm { term_months: u32, reason: String },

    #[error("Invalid rate: {value}% — {reason}")]
    InvalidRate { value: Decimal, reason: String },

    #[error("Invalid salary: {value} — {reason}")]
    InvalidSalary { value: Decimal, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanFinanceError {
    fn from(e: serde_json::Error) -> Self {
        LoanFinanceError::SerializationError(e.to_string())
    }
}
