//! Underwriter Runtime - Decision routing for the loan underwriting service
//!
//! This crate provides the decisioning backends (in-process underwriter,
//! HTTP decision client, mock generator), the router that chooses among them
//! and falls back to the mock, and the application store.

pub mod backend;
pub mod config;
pub mod error;
pub mod router;
pub mod store;

// Re-export main types
pub use backend::{
    DecisionBackend, DirectBackend, HttpDecisionClient, MockDecisionGenerator, ReferenceUnderwriter,
    Underwriter, UnderwriterError,
};
pub use config::{BackendMode, HttpBackendConfig, RouterConfig, WireFormat};
pub use error::{BackendError, BackendResult, StoreError, StoreResult};
pub use router::{DecisionRouter, DecisionSource, FallbackReason, RoutedDecision};
#[cfg(feature = "sqlx")]
pub use store::SqlStore;
pub use store::{AnalyticsSummary, ApplicationStore, DailyTrend, MemoryStore, StoredApplication};
