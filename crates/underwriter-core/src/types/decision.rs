//! Underwriting decision results

use crate::error::{CoreError, Result};
use crate::payload::DecisionPayload;
use crate::validator::ResponseValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Final underwriting decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    /// Parse the exact wire value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Decision::Approved),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated underwriting decision
///
/// Only built from a payload that passed [`ResponseValidator`], or by a
/// generator that satisfies it by construction. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision: Decision,

    /// Approved amount; zero when the application was rejected
    pub approved_amount: f64,

    /// Annual interest rate in percent
    pub interest_rate: f64,

    pub risk_score: i32,

    pub reasoning: String,

    /// Seconds spent producing the decision
    #[serde(default)]
    pub processing_time: f64,
}

impl DecisionResult {
    /// Build a result from a candidate payload, validating it first
    pub fn from_payload(payload: &DecisionPayload) -> Result<Self> {
        let report = ResponseValidator::new().validate(payload);
        if !report.is_valid() {
            return Err(CoreError::InvalidPayload(report.into_issues()));
        }

        let decision = payload
            .get_str("decision")
            .and_then(Decision::parse)
            .unwrap_or(Decision::Rejected);
        Ok(Self {
            decision,
            approved_amount: payload.get_f64("approved_amount").unwrap_or(0.0).max(0.0),
            interest_rate: payload.get_f64("interest_rate").unwrap_or(0.0),
            risk_score: payload.get_f64("risk_score").unwrap_or(0.0).round() as i32,
            reasoning: payload.get_str("reasoning").unwrap_or_default().to_string(),
            processing_time: payload.get_f64("processing_time").unwrap_or(0.0),
        })
    }

    /// Convert back into a payload, e.g. when an in-process underwriter
    /// produced a typed result
    pub fn to_payload(&self) -> DecisionPayload {
        let mut fields = Map::new();
        fields.insert(
            "decision".to_string(),
            Value::String(self.decision.as_str().to_string()),
        );
        fields.insert("approved_amount".to_string(), Value::from(self.approved_amount));
        fields.insert("interest_rate".to_string(), Value::from(self.interest_rate));
        fields.insert("risk_score".to_string(), Value::from(self.risk_score));
        fields.insert("reasoning".to_string(), Value::String(self.reasoning.clone()));
        fields.insert("processing_time".to_string(), Value::from(self.processing_time));
        DecisionPayload::from(fields)
    }

    pub fn is_approved(&self) -> bool {
        self.decision == Decision::Approved
    }

    /// Copy of this result with a different processing time
    pub fn with_processing_time(mut self, seconds: f64) -> Self {
        self.processing_time = seconds.max(0.0);
        self
    }
}
