//! In-memory repository of upload jobs.
//!
//! The job store is the only shared mutable resource in the service: each
//! ingestion worker writes to its own job while API handlers read snapshots
//! concurrently. Jobs live in an arena keyed by id; every job sits behind its
//! own lock, so updates to one job never block readers of unrelated jobs.

mod store;

pub use store::{JobStore, JobStoreError};
