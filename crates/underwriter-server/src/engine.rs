//! Underwriting engine initialization
//!
//! Wires the decision router, the application store and the input limits
//! together from server configuration.

use crate::config::{ServerConfig, StoreConfig};
use crate::error::ServerError;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use underwriter_core::{ApplicationLimits, LoanApplication};
use underwriter_runtime::{
    ApplicationStore, BackendMode, DecisionRouter, MemoryStore, ReferenceUnderwriter, RoutedDecision,
    Underwriter,
};

/// Outcome of one submitted application
#[derive(Debug, Clone)]
pub struct Submission {
    pub application_id: String,
    pub routed: RoutedDecision,
}

/// Everything a request needs to underwrite and record an application
pub struct UnderwritingEngine {
    router: DecisionRouter,
    store: Arc<dyn ApplicationStore>,
    limits: ApplicationLimits,
}

impl UnderwritingEngine {
    pub fn new(router: DecisionRouter, store: Arc<dyn ApplicationStore>, limits: ApplicationLimits) -> Self {
        Self { router, store, limits }
    }

    pub fn router(&self) -> &DecisionRouter {
        &self.router
    }

    pub fn store(&self) -> &Arc<dyn ApplicationStore> {
        &self.store
    }

    /// Check limits, route the application and store the outcome
    pub async fn submit(&self, application: &LoanApplication) -> Result<Submission, ServerError> {
        self.limits.check(application)?;

        let routed = self.router.route(application).await;
        let application_id = self.store.save(application, &routed).await?;

        Ok(Submission { application_id, routed })
    }
}

/// Initialize the underwriting engine
///
/// In `direct` mode the built-in reference underwriter is plugged in; use
/// [`init_engine_with_underwriter`] to supply another one.
pub async fn init_engine(config: &ServerConfig) -> Result<UnderwritingEngine> {
    init_engine_with_underwriter(config, Arc::new(ReferenceUnderwriter::new())).await
}

/// Initialize the underwriting engine with a custom in-process underwriter
pub async fn init_engine_with_underwriter(
    config: &ServerConfig,
    underwriter: Arc<dyn Underwriter>,
) -> Result<UnderwritingEngine> {
    let mut router = DecisionRouter::new(&config.router);
    if config.router.mode == BackendMode::Direct {
        router = router.with_underwriter(underwriter);
    }

    let store = init_store(&config.store).await?;
    info!("Underwriting engine ready ({:?} mode)", config.router.mode);

    Ok(UnderwritingEngine::new(router, store, config.limits.clone()))
}

async fn init_store(config: &StoreConfig) -> Result<Arc<dyn ApplicationStore>> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory application store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "sqlx")]
        StoreConfig::Sql { url } => {
            let store = underwriter_runtime::SqlStore::connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open application store at {}: {}", url, e))?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlx"))]
        StoreConfig::Sql { .. } => Err(anyhow::anyhow!(
            "SQL application store requires the 'sqlx' feature"
        )),
    }
}
