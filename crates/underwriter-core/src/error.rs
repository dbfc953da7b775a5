//! Error types for Underwriter Core

use crate::validator::FieldIssue;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The loan application failed input limits
    #[error("Invalid application: {}", describe_issues(.0))]
    InvalidApplication(Vec<FieldIssue>),

    /// A decision payload failed response validation
    #[error("Invalid decision payload: {}", describe_issues(.0))]
    InvalidPayload(Vec<FieldIssue>),

    /// A decision payload was not a JSON object
    #[error("Decision payload must be a JSON object, got {0}")]
    NotAnObject(String),
}

impl CoreError {
    /// Issues carried by this error, if any
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            CoreError::InvalidApplication(issues) | CoreError::InvalidPayload(issues) => issues,
            CoreError::NotAnObject(_) => &[],
        }
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_payload_display_lists_every_issue() {
        let err = CoreError::InvalidPayload(vec![
            FieldIssue::Missing {
                field: "reasoning".to_string(),
            },
            FieldIssue::InvalidValue {
                field: "decision".to_string(),
                reason: "expected \"approved\" or \"rejected\", got \"maybe\"".to_string(),
            },
        ]);

        let message = err.to_string();
        assert!(message.starts_with("Invalid decision payload"));
        assert!(message.contains("reasoning"));
        assert!(message.contains("maybe"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_not_an_object_has_no_issues() {
        let err = CoreError::NotAnObject("array".to_string());
        assert!(err.issues().is_empty());
        assert!(err.to_string().contains("array"));
    }
}
