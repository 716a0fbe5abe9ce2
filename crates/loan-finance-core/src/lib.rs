pub mod config;
pub mod error;
pub mod money;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "assessment")]
pub mod assessment;

pub use config::LoanPolicy;
pub use error::LoanFinanceError;
pub use types::*;

/// Standard result type for all loan-finance operations
pub type LoanFinanceResult<T> = Result<T, LoanFinanceError>;
