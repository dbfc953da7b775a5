//! Decision router
//!
//! Picks the configured decisioning backend, bounds it with a timeout,
//! validates what it returns, and falls back to the mock generator whenever
//! the backend is missing, fails, or produces a malformed payload.
//!
//! The router is an ordered list of candidates tried in sequence. The mock
//! generator is not part of that list; it is the terminal step and cannot
//! fail, so [`DecisionRouter::route`] always returns a [`RoutedDecision`].

use crate::backend::{DecisionBackend, DirectBackend, HttpDecisionClient, MockDecisionGenerator, Underwriter};
use crate::config::{BackendMode, RouterConfig};
use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use underwriter_core::{DecisionResult, LoanApplication, ResponseValidator};

/// Backend that produced a routed decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Direct,
    Http,
    Mock,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Direct => "direct",
            DecisionSource::Http => "http",
            DecisionSource::Mock => "mock",
        }
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a candidate backend was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Backend selected but not usable (no endpoint, no underwriter)
    ConfigurationMissing { backend: DecisionSource, detail: String },

    /// Network failure, timeout, error status, undecodable body or fault
    TransportFailure { backend: DecisionSource, error: String },

    /// Backend answered but the payload failed validation
    SchemaViolation {
        backend: DecisionSource,
        fields: Vec<String>,
    },
}

impl FallbackReason {
    pub fn backend(&self) -> DecisionSource {
        match self {
            FallbackReason::ConfigurationMissing { backend, .. }
            | FallbackReason::TransportFailure { backend, .. }
            | FallbackReason::SchemaViolation { backend, .. } => *backend,
        }
    }

    fn from_backend_error(backend: DecisionSource, err: BackendError) -> Self {
        match err {
            BackendError::NotConfigured(detail) => {
                FallbackReason::ConfigurationMissing { backend, detail }
            }
            other => FallbackReason::TransportFailure {
                backend,
                error: other.to_string(),
            },
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ConfigurationMissing { backend, detail } => {
                write!(f, "{} backend not configured: {}", backend, detail)
            }
            FallbackReason::TransportFailure { backend, error } => {
                write!(f, "{} backend failed: {}", backend, error)
            }
            FallbackReason::SchemaViolation { backend, fields } => {
                write!(
                    f,
                    "{} backend returned invalid fields: {}",
                    backend,
                    fields.join(", ")
                )
            }
        }
    }
}

/// A validated decision plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedDecision {
    pub result: DecisionResult,

    pub source: DecisionSource,

    /// True when the mock stood in for a configured backend
    pub degraded: bool,

    /// Every candidate skipped on the way, in order
    pub fallback_reasons: Vec<FallbackReason>,

    /// Wall time spent routing
    pub elapsed: Duration,
}

/// A backend tried before the mock
struct Candidate {
    source: DecisionSource,
    backend: Arc<dyn DecisionBackend>,
    timeout: Duration,
}

/// Routes applications to the configured decisioning backend
pub struct DecisionRouter {
    mode: BackendMode,

    candidates: Vec<Candidate>,

    /// Set when the configured backend could not be constructed
    unavailable: Option<FallbackReason>,

    direct_timeout: Duration,

    mock: MockDecisionGenerator,

    validator: ResponseValidator,
}

impl DecisionRouter {
    /// Build a router from configuration
    ///
    /// In `direct` mode no underwriter is known yet; supply one with
    /// [`with_underwriter`](Self::with_underwriter). Until then the router
    /// answers from the mock and reports the configuration as missing.
    pub fn new(config: &RouterConfig) -> Self {
        let mut router = Self {
            mode: config.mode,
            candidates: Vec::new(),
            unavailable: None,
            direct_timeout: config.direct_timeout(),
            mock: MockDecisionGenerator::new(),
            validator: ResponseValidator::new(),
        };

        match config.mode {
            BackendMode::Direct => {
                router.unavailable = Some(FallbackReason::ConfigurationMissing {
                    backend: DecisionSource::Direct,
                    detail: "no underwriter supplied".to_string(),
                });
            }
            BackendMode::Http => match HttpDecisionClient::from_config(&config.http) {
                Ok(client) => {
                    tracing::info!(
                        "Decision router using HTTP endpoint {} (timeout {:?})",
                        client.endpoint(),
                        client.timeout()
                    );
                    router.candidates.push(Candidate {
                        source: DecisionSource::Http,
                        timeout: client.timeout(),
                        backend: Arc::new(client),
                    });
                }
                Err(e) => {
                    tracing::warn!("HTTP backend unavailable, decisions will use the mock: {}", e);
                    router.unavailable = Some(FallbackReason::from_backend_error(DecisionSource::Http, e));
                }
            },
            BackendMode::Mock => {
                tracing::info!("Decision router using the mock generator");
            }
        }

        router
    }

    /// Supply the in-process underwriter used in `direct` mode
    ///
    /// Ignored in other modes.
    pub fn with_underwriter(mut self, underwriter: Arc<dyn Underwriter>) -> Self {
        if self.mode != BackendMode::Direct {
            tracing::debug!(
                "Ignoring underwriter '{}' in {:?} mode",
                underwriter.name(),
                self.mode
            );
            return self;
        }

        tracing::info!(
            "Decision router using in-process underwriter '{}' (timeout {:?})",
            underwriter.name(),
            self.direct_timeout
        );
        self.unavailable = None;
        self.candidates.push(Candidate {
            source: DecisionSource::Direct,
            backend: Arc::new(DirectBackend::from_arc(underwriter)),
            timeout: self.direct_timeout,
        });
        self
    }

    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    /// Produce a validated decision; never fails
    pub async fn route(&self, application: &LoanApplication) -> RoutedDecision {
        let started = Instant::now();
        let mut fallback_reasons = Vec::new();

        if let Some(ref reason) = self.unavailable {
            tracing::warn!("Falling back to mock: {}", reason);
            fallback_reasons.push(reason.clone());
        }

        for candidate in &self.candidates {
            match self.try_candidate(candidate, application).await {
                Ok(result) => {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        "Decision '{}' from {} backend in {:?}",
                        result.decision,
                        candidate.source,
                        elapsed
                    );
                    return RoutedDecision {
                        result,
                        source: candidate.source,
                        degraded: false,
                        fallback_reasons,
                        elapsed,
                    };
                }
                Err(reason) => {
                    tracing::warn!("Falling back to mock: {}", reason);
                    fallback_reasons.push(reason);
                }
            }
        }

        let result = self.mock.generate(application);
        let elapsed = started.elapsed();
        let degraded = !fallback_reasons.is_empty();
        tracing::info!(
            "Decision '{}' from mock generator in {:?}{}",
            result.decision,
            elapsed,
            if degraded { " (degraded)" } else { "" }
        );

        RoutedDecision {
            result,
            source: DecisionSource::Mock,
            degraded,
            fallback_reasons,
            elapsed,
        }
    }

    /// Run one candidate and turn its output into a validated result
    async fn try_candidate(
        &self,
        candidate: &Candidate,
        application: &LoanApplication,
    ) -> Result<DecisionResult, FallbackReason> {
        let started = Instant::now();

        let payload = match tokio::time::timeout(candidate.timeout, candidate.backend.evaluate(application)).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => return Err(FallbackReason::from_backend_error(candidate.source, e)),
            Err(_) => {
                return Err(FallbackReason::from_backend_error(
                    candidate.source,
                    BackendError::Timeout(candidate.timeout),
                ))
            }
        };

        let payload = payload.normalize();
        let report = self.validator.validate(&payload);
        if !report.is_valid() {
            for issue in report.issues() {
                tracing::debug!("{} backend payload: {}", candidate.source, issue);
            }
            return Err(FallbackReason::SchemaViolation {
                backend: candidate.source,
                fields: report.invalid_fields(),
            });
        }

        let result = DecisionResult::from_payload(&payload).map_err(|e| {
            FallbackReason::SchemaViolation {
                backend: candidate.source,
                fields: e.issues().iter().map(|i| i.field().to_string()).collect(),
            }
        })?;

        let reported = payload.get("processing_time").map_or(false, |v| !v.is_null());
        Ok(if reported {
            result
        } else {
            result.with_processing_time(started.elapsed().as_secs_f64())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnderwriterError;
    use underwriter_core::{Decision, DecisionPayload, EmploymentType, LoanPurpose};

    fn application(credit_score: u32, dti: f64) -> LoanApplication {
        LoanApplication {
            applicant_name: "Router".to_string(),
            age: 38,
            annual_income: 110_000.0,
            employment_type: EmploymentType::FullTime,
            credit_score,
            loan_amount: 200_000.0,
            loan_purpose: LoanPurpose::HomePurchase,
            loan_term: 360,
            down_payment: 40_000.0,
            debt_to_income_ratio: dti,
        }
    }

    struct Fixed(DecisionPayload);

    impl Underwriter for Fixed {
        fn underwrite(&self, _: &LoanApplication) -> Result<DecisionPayload, UnderwriterError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_mock_mode_is_not_degraded() {
        let routed = DecisionRouter::new(&RouterConfig::mock())
            .route(&application(750, 25.0))
            .await;

        assert_eq!(routed.source, DecisionSource::Mock);
        assert!(!routed.degraded);
        assert!(routed.fallback_reasons.is_empty());
        assert_eq!(routed.result.decision, Decision::Approved);
    }

    #[tokio::test]
    async fn test_direct_without_underwriter_degrades() {
        let routed = DecisionRouter::new(&RouterConfig::direct())
            .route(&application(750, 25.0))
            .await;

        assert_eq!(routed.source, DecisionSource::Mock);
        assert!(routed.degraded);
        assert!(matches!(
            routed.fallback_reasons[0],
            FallbackReason::ConfigurationMissing {
                backend: DecisionSource::Direct,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_http_without_endpoint_degrades() {
        let mut config = RouterConfig::http("");
        config.http.endpoint = None;

        let routed = DecisionRouter::new(&config).route(&application(580, 55.0)).await;

        assert!(routed.degraded);
        assert_eq!(routed.result.decision, Decision::Rejected);
        assert_eq!(routed.fallback_reasons[0].backend(), DecisionSource::Http);
    }

    #[tokio::test]
    async fn test_invalid_key_header_is_configuration_missing() {
        let mut config = RouterConfig::http("http://localhost:9/decide").with_api_key("secret");
        config.http.api_key_header = Some("X Api Key".to_string());

        let routed = DecisionRouter::new(&config).route(&application(580, 55.0)).await;

        assert!(routed.degraded);
        assert!(matches!(
            routed.fallback_reasons[0],
            FallbackReason::ConfigurationMissing {
                backend: DecisionSource::Http,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_normalizes_legacy_payload() {
        let payload = DecisionPayload::new()
            .with("status", " APPROVED ")
            .with("amount", 150_000)
            .with("rate", 4.75)
            .with("risk_score", 410)
            .with("reason", "Legacy shape");
        let router = DecisionRouter::new(&RouterConfig::direct()).with_underwriter(Arc::new(Fixed(payload)));

        let routed = router.route(&application(700, 20.0)).await;

        assert_eq!(routed.source, DecisionSource::Direct);
        assert!(!routed.degraded);
        assert_eq!(routed.result.decision, Decision::Approved);
        assert_eq!(routed.result.approved_amount, 150_000.0);
        assert_eq!(routed.result.reasoning, "Legacy shape");
    }

    #[tokio::test]
    async fn test_missing_processing_time_is_measured() {
        let payload = DecisionPayload::new()
            .with("decision", "rejected")
            .with("approved_amount", 0)
            .with("interest_rate", 0)
            .with("risk_score", 700)
            .with("reasoning", "No");
        let router = DecisionRouter::new(&RouterConfig::direct()).with_underwriter(Arc::new(Fixed(payload)));

        let routed = router.route(&application(700, 20.0)).await;

        assert_eq!(routed.source, DecisionSource::Direct);
        assert!(routed.result.processing_time >= 0.0);
    }

    #[tokio::test]
    async fn test_schema_violation_lists_fields() {
        let payload = DecisionPayload::new()
            .with("decision", "maybe")
            .with("approved_amount", 1)
            .with("interest_rate", 1)
            .with("risk_score", 1);
        let router = DecisionRouter::new(&RouterConfig::direct()).with_underwriter(Arc::new(Fixed(payload)));

        let routed = router.route(&application(750, 25.0)).await;

        assert_eq!(routed.source, DecisionSource::Mock);
        assert!(routed.degraded);
        assert_eq!(
            routed.fallback_reasons,
            vec![FallbackReason::SchemaViolation {
                backend: DecisionSource::Direct,
                fields: vec!["reasoning".to_string(), "decision".to_string()],
            }]
        );
    }

    #[test]
    fn test_underwriter_ignored_outside_direct_mode() {
        let payload = DecisionPayload::new();
        let router = DecisionRouter::new(&RouterConfig::mock()).with_underwriter(Arc::new(Fixed(payload)));

        assert!(router.candidates.is_empty());
        assert_eq!(router.mode(), BackendMode::Mock);
    }

    #[test]
    fn test_fallback_reason_serialization() {
        let reason = FallbackReason::TransportFailure {
            backend: DecisionSource::Http,
            error: "Connection failed: refused".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();

        assert_eq!(json["kind"], "transport_failure");
        assert_eq!(json["backend"], "http");
    }
}
