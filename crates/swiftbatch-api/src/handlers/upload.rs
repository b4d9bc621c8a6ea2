use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;

use crate::error::HttpAppError;
use crate::state::AppState;
use swiftbatch_core::models::UploadResponse;
use swiftbatch_core::AppError;

/// Accept a bulk upload file and start background ingestion.
///
/// Returns 202 Accepted with the new job's projection as soon as the job
/// record exists and the worker has been scheduled - before any row is
/// processed. Only malformed requests fail synchronously: a missing `file`
/// part, a missing filename, or a disallowed extension. Everything that goes
/// wrong after acceptance is reported through the job record.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let (filename, bytes) = extract_file(&mut multipart).await?;
    validate_extension(&filename, &state.config.allowed_extensions)?;

    let job = state.store.create(&filename).await;
    tracing::info!(job_id = %job.id, filename = %filename, size_bytes = bytes.len(), "Upload accepted");

    state.worker.clone().spawn(job.id, bytes);

    Ok((StatusCode::ACCEPTED, Json(UploadResponse::from(job))))
}

/// Pull the `file` part out of the multipart body.
async fn extract_file(multipart: &mut Multipart) -> Result<(String, Bytes), HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

        return Ok((filename, bytes));
    }

    Err(AppError::BadRequest("No file provided".to_string()).into())
}

fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), HttpAppError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !allowed.contains(&extension) {
        return Err(AppError::BadRequest(format!(
            "Only {} files are allowed",
            allowed.join("/")
        ))
        .into());
    }
    Ok(())
}
