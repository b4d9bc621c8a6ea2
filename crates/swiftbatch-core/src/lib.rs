//! Swiftbatch Core Library
//!
//! This crate provides the domain models, record validation, CSV parsing,
//! configuration, and error types shared across all swiftbatch components.

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    NormalizedRecord, RawRow, RecordError, RejectReason, UploadJob, UploadListQuery,
    UploadResponse, UploadStats, UploadStatus, ValidationOutcome,
};
pub use parser::{parse_csv, CsvError};
pub use validation::validate_row;
