use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of one bulk upload. Transitions:
/// `Pending -> Processing -> {Completed, Failed}`. Completed and Failed are
/// terminal; once a job reaches either, it is never mutated again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Processing => write!(f, "processing"),
            UploadStatus::Completed => write!(f, "completed"),
            UploadStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for UploadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "processing" => Ok(UploadStatus::Processing),
            "completed" => Ok(UploadStatus::Completed),
            "failed" => Ok(UploadStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid upload status: {}", s)),
        }
    }
}

/// One per-record failure captured during processing. Appended in row order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordError {
    pub swift_code: String,
    pub reason: String,
}

/// One tracked bulk-upload attempt.
///
/// Counters are monotonically non-decreasing and, once `total_records` is
/// known, `processed + skipped + failed <= total_records` always holds.
/// Mutated exclusively by the job's ingestion worker while non-terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadJob {
    pub id: Uuid,
    pub filename: String,
    pub status: UploadStatus,
    pub message: String,
    pub total_records: u64,
    pub processed: u64,
    pub skipped: u64,
    pub failed: u64,
    pub error_details: Vec<RecordError>,
    pub created_at: DateTime<Utc>,
}

impl UploadJob {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            status: UploadStatus::Pending,
            message: "Upload received. Processing will begin shortly.".to_string(),
            total_records: 0,
            processed: 0,
            skipped: 0,
            failed: 0,
            error_details: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Sum of all classified rows so far.
    pub fn accounted_records(&self) -> u64 {
        self.processed + self.skipped + self.failed
    }
}

/// API projection of an upload job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub status: UploadStatus,
    pub message: String,
    pub total_records: u64,
    pub processed: u64,
    pub skipped: u64,
    pub failed: u64,
    pub error_details: Vec<RecordError>,
    pub created_at: DateTime<Utc>,
}

impl From<UploadJob> for UploadResponse {
    fn from(job: UploadJob) -> Self {
        Self {
            id: job.id,
            filename: job.filename,
            status: job.status,
            message: job.message,
            total_records: job.total_records,
            processed: job.processed,
            skipped: job.skipped,
            failed: job.failed,
            error_details: job.error_details,
            created_at: job.created_at,
        }
    }
}

/// Query parameters for listing uploads.
#[derive(Debug, Deserialize)]
pub struct UploadListQuery {
    pub status: Option<UploadStatus>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl Default for UploadListQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: Some(10),
            skip: Some(0),
        }
    }
}

/// Aggregate statistics over all known jobs at call time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadStats {
    pub total_uploads: u64,
    pub successful_uploads: u64,
    pub failed_uploads: u64,
    pub processing_uploads: u64,
    pub total_records_processed: u64,
    pub most_recent_upload: Option<DateTime<Utc>>,
}
