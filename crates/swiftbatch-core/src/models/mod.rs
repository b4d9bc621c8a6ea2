//! Domain models

pub mod job;
pub mod record;

pub use job::{
    RecordError, UploadJob, UploadListQuery, UploadResponse, UploadStats, UploadStatus,
};
pub use record::{NormalizedRecord, RawRow, RejectReason, ValidationOutcome};
