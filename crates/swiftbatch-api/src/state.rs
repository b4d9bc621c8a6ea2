//! Application state shared by all handlers.

use std::sync::Arc;

use anyhow::Result;
use swiftbatch_core::Config;
use swiftbatch_registry_client::{RegistryClient, RegistryConfig};
use swiftbatch_store::JobStore;
use swiftbatch_worker::{IngestionConfig, IngestionWorker};

/// Everything a handler needs: configuration, the job store, the registry
/// client, and the worker factory. Cheap to clone behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: Arc<JobStore>,
    pub registry: Arc<RegistryClient>,
    pub worker: Arc<IngestionWorker>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(JobStore::new());
        let registry = Arc::new(RegistryClient::new(RegistryConfig::from_core(&config))?);
        let worker = Arc::new(IngestionWorker::new(
            store.clone(),
            registry.clone(),
            IngestionConfig {
                outage_threshold: config.registry_outage_threshold,
                error_detail_cap: config.error_detail_cap,
            },
        ));

        Ok(Self {
            config,
            store,
            registry,
            worker,
        })
    }
}
