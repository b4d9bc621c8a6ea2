//! HTTP handlers

pub mod health;
pub mod stats;
pub mod status;
pub mod upload;

pub use health::health_check;
pub use stats::get_upload_stats;
pub use status::{get_upload_status, list_uploads};
pub use upload::upload_file;
