//! Direct-call adapter for in-process underwriters
//!
//! Integrators plug their own decision logic in by implementing
//! [`Underwriter`]. The adapter runs it on the blocking pool; an error or a
//! panic comes back as [`BackendError::Fault`].

use super::DecisionBackend;
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use underwriter_core::{DecisionPayload, LoanApplication};

/// Error reported by an in-process underwriter
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct UnderwriterError(pub String);

impl UnderwriterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Integrator-supplied decision logic
pub trait Underwriter: Send + Sync + 'static {
    /// Produce a candidate decision; called on a blocking thread
    fn underwrite(&self, application: &LoanApplication) -> Result<DecisionPayload, UnderwriterError>;

    fn name(&self) -> &str {
        "underwriter"
    }
}

/// Adapter turning a plain function into an [`Underwriter`]
struct FnUnderwriter<F> {
    name: String,
    func: F,
}

impl<F> Underwriter for FnUnderwriter<F>
where
    F: Fn(&LoanApplication) -> Result<DecisionPayload, UnderwriterError> + Send + Sync + 'static,
{
    fn underwrite(&self, application: &LoanApplication) -> Result<DecisionPayload, UnderwriterError> {
        (self.func)(application)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Backend invoking an in-process underwriter
pub struct DirectBackend {
    underwriter: Arc<dyn Underwriter>,
}

impl DirectBackend {
    pub fn new(underwriter: impl Underwriter) -> Self {
        Self {
            underwriter: Arc::new(underwriter),
        }
    }

    pub fn from_arc(underwriter: Arc<dyn Underwriter>) -> Self {
        Self { underwriter }
    }

    /// Wrap a function as the underwriter
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&LoanApplication) -> Result<DecisionPayload, UnderwriterError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(FnUnderwriter {
            name: name.into(),
            func,
        })
    }
}

#[async_trait]
impl DecisionBackend for DirectBackend {
    async fn evaluate(&self, application: &LoanApplication) -> BackendResult<DecisionPayload> {
        let underwriter = Arc::clone(&self.underwriter);
        let application = application.clone();

        tokio::task::spawn_blocking(move || underwriter.underwrite(&application))
            .await
            .map_err(|err| BackendError::Fault(format!("underwriter task failed: {}", err)))?
            .map_err(|err| BackendError::Fault(err.to_string()))
    }

    fn name(&self) -> &str {
        self.underwriter.name()
    }
}
