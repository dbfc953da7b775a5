//! Loan application submitted for underwriting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Applicant employment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    #[serde(rename = "Unemployed")]
    Unemployed,
    #[serde(rename = "Retired")]
    Retired,
}

impl EmploymentType {
    /// Wire name, as shown on the application form
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::SelfEmployed => "Self-employed",
            EmploymentType::Unemployed => "Unemployed",
            EmploymentType::Retired => "Retired",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purpose of the requested loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanPurpose {
    #[serde(rename = "Home Purchase")]
    HomePurchase,
    #[serde(rename = "Refinance")]
    Refinance,
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
    #[serde(rename = "Auto")]
    Auto,
    #[serde(rename = "Personal")]
    Personal,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    #[serde(rename = "Other")]
    Other,
}

impl LoanPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanPurpose::HomePurchase => "Home Purchase",
            LoanPurpose::Refinance => "Refinance",
            LoanPurpose::HomeImprovement => "Home Improvement",
            LoanPurpose::Auto => "Auto",
            LoanPurpose::Personal => "Personal",
            LoanPurpose::Business => "Business",
            LoanPurpose::Education => "Education",
            LoanPurpose::DebtConsolidation => "Debt Consolidation",
            LoanPurpose::Other => "Other",
        }
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted loan application
///
/// Serializes to the request body sent to external decisioning services.
/// Currency fields are plain amounts in the application's currency;
/// `debt_to_income_ratio` is a percentage in the range 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant_name: String,
    pub age: u32,
    pub annual_income: f64,
    pub employment_type: EmploymentType,
    /// Credit score, 300-850
    pub credit_score: u32,
    pub loan_amount: f64,
    pub loan_purpose: LoanPurpose,
    /// Loan term in months
    pub loan_term: u32,
    pub down_payment: f64,
    /// Debt-to-income ratio as a percentage, 0-100
    pub debt_to_income_ratio: f64,
}
