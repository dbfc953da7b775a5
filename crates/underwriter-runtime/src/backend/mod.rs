//! Decisioning backends
//!
//! Every backend implements [`DecisionBackend`]; the router depends only on
//! that trait. The mock generator also implements it, but the router holds
//! it separately as the terminal, infallible fallback.

pub mod direct;
pub mod http;
pub mod mock;
pub mod reference;
mod scoring;

use crate::error::BackendResult;
use async_trait::async_trait;
use underwriter_core::{DecisionPayload, LoanApplication};

pub use direct::{DirectBackend, Underwriter, UnderwriterError};
pub use http::HttpDecisionClient;
pub use mock::MockDecisionGenerator;
pub use reference::ReferenceUnderwriter;

/// A component able to produce a candidate decision for an application
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    /// Evaluate an application, returning an unvalidated payload
    async fn evaluate(&self, application: &LoanApplication) -> BackendResult<DecisionPayload>;

    /// Get the name of this backend
    fn name(&self) -> &str;
}
