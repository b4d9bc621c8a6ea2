//! Application setup and initialization
//!
//! Initialization logic kept out of main.rs for organization and so tests can
//! assemble the same router against their own state.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use swiftbatch_core::Config;

use crate::state::AppState;

/// Initialize the application: build state and routes from configuration.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config.clone())?);
    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
