use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Liveness probe. Reports service health independent of job state or the
/// registry's availability.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "swiftbatch-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
