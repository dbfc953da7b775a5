//! Input limits applied to loan applications before they are routed

use crate::error::{CoreError, Result};
use crate::types::LoanApplication;
use crate::validator::FieldIssue;
use serde::{Deserialize, Serialize};

/// Acceptance limits for submitted applications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLimits {
    #[serde(default = "default_min_credit_score")]
    pub min_credit_score: u32,

    #[serde(default = "default_max_credit_score")]
    pub max_credit_score: u32,

    #[serde(default = "default_max_loan_amount")]
    pub max_loan_amount: f64,

    #[serde(default = "default_min_age")]
    pub min_age: u32,
}

fn default_min_credit_score() -> u32 {
    300
}

fn default_max_credit_score() -> u32 {
    850
}

fn default_max_loan_amount() -> f64 {
    1_000_000.0
}

fn default_min_age() -> u32 {
    18
}

impl Default for ApplicationLimits {
    fn default() -> Self {
        Self {
            min_credit_score: default_min_credit_score(),
            max_credit_score: default_max_credit_score(),
            max_loan_amount: default_max_loan_amount(),
            min_age: default_min_age(),
        }
    }
}

impl ApplicationLimits {
    /// Check an application, reporting every violated limit
    pub fn check(&self, application: &LoanApplication) -> Result<()> {
        let mut issues = Vec::new();

        if application.applicant_name.trim().is_empty() {
            issues.push(FieldIssue::invalid("applicant_name", "must not be empty"));
        }
        if application.age < self.min_age {
            issues.push(FieldIssue::invalid(
                "age",
                format!("must be at least {}", self.min_age),
            ));
        }
        if !(application.annual_income >= 0.0) {
            issues.push(FieldIssue::invalid("annual_income", "must be >= 0"));
        }
        if application.credit_score < self.min_credit_score
            || application.credit_score > self.max_credit_score
        {
            issues.push(FieldIssue::invalid(
                "credit_score",
                format!(
                    "must be between {} and {}",
                    self.min_credit_score, self.max_credit_score
                ),
            ));
        }
        if !(application.loan_amount > 0.0 && application.loan_amount <= self.max_loan_amount) {
            issues.push(FieldIssue::invalid(
                "loan_amount",
                format!("must be greater than 0 and at most {}", self.max_loan_amount),
            ));
        }
        if application.loan_term == 0 {
            issues.push(FieldIssue::invalid("loan_term", "must be at least one month"));
        }
        if !(application.down_payment >= 0.0) {
            issues.push(FieldIssue::invalid("down_payment", "must be >= 0"));
        }
        if !(0.0..=100.0).contains(&application.debt_to_income_ratio) {
            issues.push(FieldIssue::invalid(
                "debt_to_income_ratio",
                "must be between 0 and 100",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidApplication(issues))
        }
    }
}
