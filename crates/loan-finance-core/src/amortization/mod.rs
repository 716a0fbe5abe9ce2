pub mod comparison;
pub mod flat;
pub mod max_principal;
pub mod quote;
pub mod reducing_balance;

pub use flat::compute_flat_quote;
pub use max_principal::{max_principal_flat, max_principal_reducing_balance};
pub use quote::{compute_quote, InstallmentLine, LoanQuote};
pub use reducing_balance::compute_reducing_balance_quote;
