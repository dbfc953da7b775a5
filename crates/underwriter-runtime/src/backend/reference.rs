//! Reference in-process underwriter
//!
//! A simple rule set standing in for real integrator logic when the router
//! runs in direct mode without a custom underwriter.

use super::direct::{Underwriter, UnderwriterError};
use super::scoring::{risk_score, round2};
use underwriter_core::{DecisionPayload, LoanApplication};

/// Threshold-based underwriter
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceUnderwriter {
    pub min_credit_score: u32,

    /// Minimum annual income as a fraction of the loan amount
    pub min_income_ratio: f64,

    /// Maximum debt-to-income percentage
    pub max_debt_to_income: f64,
}

impl Default for ReferenceUnderwriter {
    fn default() -> Self {
        Self {
            min_credit_score: 650,
            min_income_ratio: 0.2,
            max_debt_to_income: 40.0,
        }
    }
}

impl ReferenceUnderwriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate falls 1% for every 50 points above 600, floored at 3.5%
    fn interest_rate(credit_score: u32) -> f64 {
        round2((8.0 - (f64::from(credit_score) - 600.0) / 50.0).max(3.5))
    }
}

impl Underwriter for ReferenceUnderwriter {
    fn underwrite(&self, application: &LoanApplication) -> Result<DecisionPayload, UnderwriterError> {
        let credit = application.credit_score;
        let dti = application.debt_to_income_ratio;
        let income_ok =
            application.annual_income >= application.loan_amount * self.min_income_ratio;

        let mut reasons = Vec::new();
        if credit < self.min_credit_score {
            reasons.push(format!(
                "Credit score too low ({} < {})",
                credit, self.min_credit_score
            ));
        }
        if !income_ok {
            reasons.push("Insufficient income relative to loan amount".to_string());
        }
        if dti > self.max_debt_to_income {
            reasons.push(format!("High debt-to-income ratio ({}%)", dti));
        }

        let payload = DecisionPayload::new().with("risk_score", risk_score(application));
        let payload = if reasons.is_empty() {
            payload
                .with("decision", "approved")
                .with("approved_amount", application.loan_amount)
                .with("interest_rate", Self::interest_rate(credit))
                .with(
                    "reasoning",
                    format!(
                        "Approved: Good credit score ({}), sufficient income, manageable debt ratio ({}%)",
                        credit, dti
                    ),
                )
        } else {
            payload
                .with("decision", "rejected")
                .with("approved_amount", 0.0)
                .with("interest_rate", 0.0)
                .with("reasoning", format!("Rejected: {}", reasons.join("; ")))
        };

        Ok(payload)
    }

    fn name(&self) -> &str {
        "reference"
    }
}
