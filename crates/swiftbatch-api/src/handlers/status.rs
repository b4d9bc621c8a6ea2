use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;
use swiftbatch_core::models::{UploadListQuery, UploadResponse};
use swiftbatch_core::AppError;

/// Get the status of one upload job, including its error details.
#[tracing::instrument(skip(state))]
pub async fn get_upload_status(
    State(state): State<Arc<AppState>>,
    Path(upload_id): Path<Uuid>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    tracing::debug!(upload_id = %upload_id, "Getting upload status");

    match state.store.get(upload_id).await {
        Some(job) => Ok(Json(UploadResponse::from(job))),
        None => {
            tracing::warn!(upload_id = %upload_id, "Upload not found");
            Err(AppError::NotFound(format!("Upload with ID {} not found", upload_id)).into())
        }
    }
}

/// List upload jobs, optionally filtered by status, most recent first.
#[tracing::instrument(skip(state))]
pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadListQuery>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    tracing::debug!("Listing uploads with filters: {:?}", query);

    let jobs = state.store.list(&query).await;
    let responses: Vec<UploadResponse> = jobs.into_iter().map(UploadResponse::from).collect();

    Ok(Json(serde_json::json!({
        "uploads": responses,
        "count": responses.len()
    })))
}
