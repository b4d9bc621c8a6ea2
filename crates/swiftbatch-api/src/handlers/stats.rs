use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::error::HttpAppError;
use crate::state::AppState;
use swiftbatch_core::models::UploadStats;

/// Aggregate statistics across all known upload jobs, as a snapshot at call
/// time.
#[tracing::instrument(skip(state))]
pub async fn get_upload_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UploadStats>, HttpAppError> {
    tracing::debug!("Getting upload statistics");
    Ok(Json(state.store.stats().await))
}
