//! Data model for loan applications and underwriting decisions

pub mod application;
pub mod decision;

pub use application::{EmploymentType, LoanApplication, LoanPurpose};
pub use decision::{Decision, DecisionResult};
