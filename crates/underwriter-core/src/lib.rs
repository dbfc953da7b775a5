//! Underwriter Core - Core types and definitions for the loan underwriting service
//!
//! This crate provides the types shared by every decisioning backend:
//! - Loan application and decision result data model
//! - Application input limits
//! - Candidate decision payloads and their normalization
//! - The response validator that guards every backend result
//! - Error types

pub mod error;
pub mod limits;
pub mod payload;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use limits::ApplicationLimits;
pub use payload::DecisionPayload;
pub use types::{Decision, DecisionResult, EmploymentType, LoanApplication, LoanPurpose};
pub use validator::{FieldIssue, ResponseValidator, ValidationReport};
