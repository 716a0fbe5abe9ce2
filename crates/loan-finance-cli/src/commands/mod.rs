pub mod affordability;
pub mod assess;
pub mod policy;
pub mod quote;
