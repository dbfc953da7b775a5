//! Mock decision generator
//!
//! Derives a plausible decision from credit score and debt-to-income ratio
//! alone. Output is deterministic and always passes the response validator;
//! the router ends every fallback chain here.

use super::scoring::{risk_score, round2};
use super::DecisionBackend;
use crate::error::BackendResult;
use async_trait::async_trait;
use underwriter_core::{Decision, DecisionPayload, DecisionResult, LoanApplication};

/// Threshold rules used when no real backend is available
#[derive(Debug, Clone, PartialEq)]
pub struct MockDecisionGenerator {
    /// Lowest credit score that can be approved
    pub min_credit_score: u32,

    /// Highest debt-to-income percentage that can be approved
    pub max_debt_to_income: f64,
}

impl Default for MockDecisionGenerator {
    fn default() -> Self {
        Self {
            min_credit_score: 680,
            max_debt_to_income: 36.0,
        }
    }
}

impl MockDecisionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a decision; never fails
    pub fn generate(&self, application: &LoanApplication) -> DecisionResult {
        let credit = application.credit_score;
        let dti = application.debt_to_income_ratio;
        let risk_score = risk_score(application);

        let credit_ok = credit >= self.min_credit_score;
        let dti_ok = dti <= self.max_debt_to_income;

        if credit_ok && dti_ok {
            return DecisionResult {
                decision: Decision::Approved,
                approved_amount: application.loan_amount.max(0.0),
                interest_rate: Self::interest_rate(credit),
                risk_score,
                reasoning: format!(
                    "Approved: credit score {} meets the {} minimum and debt-to-income ratio {}% is within the {}% limit",
                    credit, self.min_credit_score, dti, self.max_debt_to_income
                ),
                processing_time: 0.0,
            };
        }

        let mut reasons = Vec::new();
        if !credit_ok {
            reasons.push(format!(
                "credit score {} is below the {} minimum",
                credit, self.min_credit_score
            ));
        }
        if !dti_ok {
            reasons.push(format!(
                "debt-to-income ratio {}% exceeds the {}% limit",
                dti, self.max_debt_to_income
            ));
        }

        DecisionResult {
            decision: Decision::Rejected,
            approved_amount: 0.0,
            interest_rate: 0.0,
            risk_score,
            reasoning: format!("Rejected: {}", reasons.join("; ")),
            processing_time: 0.0,
        }
    }

    /// 6.5% at a 750 score, moving 0.01% per point, bounded to 3-15%
    fn interest_rate(credit_score: u32) -> f64 {
        round2((6.5 + (750.0 - f64::from(credit_score)) * 0.01).clamp(3.0, 15.0))
    }
}

#[async_trait]
impl DecisionBackend for MockDecisionGenerator {
    async fn evaluate(&self, application: &LoanApplication) -> BackendResult<DecisionPayload> {
        Ok(self.generate(application).to_payload())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use underwriter_core::{EmploymentType, LoanPurpose, ResponseValidator};

    fn application(credit_score: u32, dti: f64, loan: f64) -> LoanApplication {
        LoanApplication {
            applicant_name: "Mock Applicant".to_string(),
            age: 29,
            annual_income: 95_000.0,
            employment_type: EmploymentType::FullTime,
            credit_score,
            loan_amount: loan,
            loan_purpose: LoanPurpose::HomePurchase,
            loan_term: 360,
            down_payment: 40_000.0,
            debt_to_income_ratio: dti,
        }
    }

    #[test]
    fn test_strong_applicant_approved_at_full_amount() {
        let result = MockDecisionGenerator::new().generate(&application(750, 25.0, 200_000.0));

        assert_eq!(result.decision, Decision::Approved);
        assert_eq!(result.approved_amount, 200_000.0);
        assert_eq!(result.interest_rate, 6.5);
    }

    #[test]
    fn test_weak_applicant_rejected() {
        let result = MockDecisionGenerator::new().generate(&application(580, 55.0, 50_000.0));

        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.approved_amount, 0.0);
        assert!(result.reasoning.contains("credit score 580"));
        assert!(result.reasoning.contains("debt-to-income ratio 55%"));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let generator = MockDecisionGenerator::new();
        assert!(generator.generate(&application(680, 36.0, 10_000.0)).is_approved());
        assert!(!generator.generate(&application(679, 36.0, 10_000.0)).is_approved());
        assert!(!generator.generate(&application(680, 36.1, 10_000.0)).is_approved());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = MockDecisionGenerator::new();
        let app = application(702, 31.5, 123_456.0);

        assert_eq!(generator.generate(&app), generator.generate(&app));
    }

    #[test]
    fn test_interest_rate_bounds() {
        assert_eq!(MockDecisionGenerator::interest_rate(850), 5.5);
        assert_eq!(MockDecisionGenerator::interest_rate(300), 11.0);
    }

    #[test]
    fn test_output_passes_validator() {
        let generator = MockDecisionGenerator::new();
        for credit in [300, 550, 680, 720, 850] {
            for dti in [0.0, 20.0, 36.0, 50.0, 100.0] {
                let payload = generator.generate(&application(credit, dti, 75_000.0)).to_payload();
                assert!(ResponseValidator::new().validate(&payload).is_valid());
            }
        }
    }

    #[tokio::test]
    async fn test_backend_impl_matches_generate() {
        let generator = MockDecisionGenerator::new();
        let app = application(720, 30.0, 90_000.0);

        let payload = generator.evaluate(&app).await.unwrap();
        assert_eq!(
            DecisionResult::from_payload(&payload).unwrap(),
            generator.generate(&app)
        );
    }
}
