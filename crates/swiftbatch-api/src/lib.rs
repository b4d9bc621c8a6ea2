//! HTTP facade for the swiftbatch upload service.
//!
//! Exposes the ingestion endpoint, per-job status polling, listing, aggregate
//! statistics, and liveness. Submission returns as soon as the job record
//! exists and the background worker has been scheduled; everything else is
//! learned by polling.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
