//! Background ingestion worker.
//!
//! One worker instance is spawned per accepted upload and runs to a terminal
//! job status without being awaited by the submitting request. The job store
//! is the only channel of communication back to readers.

mod ingest;

pub use ingest::{IngestionConfig, IngestionWorker};
