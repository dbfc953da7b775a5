//! Response validation for candidate decision payloads
//!
//! Every payload a backend produces passes through [`ResponseValidator`]
//! before it may become a [`DecisionResult`](crate::DecisionResult). A payload
//! is well-formed iff `decision`, `approved_amount`, `interest_rate`,
//! `risk_score` and `reasoning` are all present and `decision` is exactly
//! `"approved"` or `"rejected"`. Approved payloads additionally need a
//! non-negative amount and rate.

use crate::payload::{json_type_name, DecisionPayload};
use crate::types::Decision;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fields every decision payload must carry
pub const REQUIRED_FIELDS: [&str; 5] = [
    "decision",
    "approved_amount",
    "interest_rate",
    "risk_score",
    "reasoning",
];

/// A single problem found with a field
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldIssue {
    /// Required field missing
    #[error("missing required field '{field}'")]
    Missing { field: String },

    /// Field present with the wrong JSON type
    #[error("field '{field}' must be {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: String,
        actual: String,
    },

    /// Field present with a value outside its allowed set or range
    #[error("field '{field}' {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FieldIssue {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldIssue::Missing { field }
            | FieldIssue::WrongType { field, .. }
            | FieldIssue::InvalidValue { field, .. } => field,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FieldIssue::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn wrong_type(field: &str, expected: &str, actual: &Value) -> Self {
        FieldIssue::WrongType {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: json_type_name(actual).to_string(),
        }
    }
}

/// Outcome of validating one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Names of missing or invalid fields, in the order found, without repeats
    pub fn invalid_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for issue in &self.issues {
            if !fields.iter().any(|f| f == issue.field()) {
                fields.push(issue.field().to_string());
            }
        }
        fields
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}

/// Stateless validator for decision payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a payload, collecting every issue rather than stopping at the first
    pub fn validate(&self, payload: &DecisionPayload) -> ValidationReport {
        let mut issues = Vec::new();

        for field in REQUIRED_FIELDS {
            if !payload.contains(field) {
                issues.push(FieldIssue::Missing {
                    field: field.to_string(),
                });
            }
        }

        let decision = match payload.get("decision") {
            Some(Value::String(s)) => match Decision::parse(s) {
                Some(decision) => Some(decision),
                None => {
                    issues.push(FieldIssue::invalid(
                        "decision",
                        format!("must be \"approved\" or \"rejected\", got \"{}\"", s),
                    ));
                    None
                }
            },
            Some(other) => {
                issues.push(FieldIssue::wrong_type("decision", "a string", other));
                None
            }
            None => None,
        };
        let approved = decision == Some(Decision::Approved);

        match payload.get("approved_amount") {
            Some(Value::Number(n)) => {
                if approved && n.as_f64().map_or(true, |v| v < 0.0) {
                    issues.push(FieldIssue::invalid(
                        "approved_amount",
                        "must be >= 0 for an approved decision",
                    ));
                }
            }
            // An amount is only meaningful once approved
            Some(Value::Null) if !approved => {}
            Some(other) => issues.push(FieldIssue::wrong_type("approved_amount", "a number", other)),
            None => {}
        }

        match payload.get("interest_rate") {
            Some(Value::Number(n)) => {
                if approved && n.as_f64().map_or(true, |v| v < 0.0) {
                    issues.push(FieldIssue::invalid(
                        "interest_rate",
                        "must be >= 0 for an approved decision",
                    ));
                }
            }
            Some(other) => issues.push(FieldIssue::wrong_type("interest_rate", "a number", other)),
            None => {}
        }

        match payload.get("risk_score") {
            Some(Value::Number(_)) | None => {}
            Some(other) => issues.push(FieldIssue::wrong_type("risk_score", "a number", other)),
        }

        match payload.get("reasoning") {
            Some(Value::String(_)) | None => {}
            Some(other) => issues.push(FieldIssue::wrong_type("reasoning", "a string", other)),
        }

        match payload.get("processing_time") {
            Some(Value::Number(n)) => {
                if n.as_f64().map_or(true, |v| v < 0.0) {
                    issues.push(FieldIssue::invalid("processing_time", "must be >= 0"));
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                issues.push(FieldIssue::wrong_type("processing_time", "a number", other))
            }
        }

        ValidationReport { issues }
    }
}
