use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use swiftbatch_core::models::{RecordError, UploadStatus, ValidationOutcome};
use swiftbatch_core::parser::parse_csv;
use swiftbatch_core::validation::validate_row;
use swiftbatch_registry_client::{RegistryClient, SubmitOutcome};
use swiftbatch_store::JobStore;

/// Worker tuning knobs.
#[derive(Clone, Debug)]
pub struct IngestionConfig {
    /// Consecutive unresolved transient failures before the whole job is
    /// declared failed and remaining rows are abandoned.
    pub outage_threshold: u32,
    /// Maximum entries kept in a job's error_details list; counters remain
    /// exact past the cap.
    pub error_detail_cap: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            outage_threshold: 5,
            error_detail_cap: 100,
        }
    }
}

/// Drains one uploaded file through validation and the registry client,
/// updating the job store incrementally so pollers see live progress.
///
/// Updates to the job are serialized through [`JobStore::update`]; each row's
/// counter bump and error append happen in a single update, so a concurrent
/// reader never observes a torn counter set.
pub struct IngestionWorker {
    store: Arc<JobStore>,
    registry: Arc<RegistryClient>,
    config: IngestionConfig,
}

impl IngestionWorker {
    pub fn new(store: Arc<JobStore>, registry: Arc<RegistryClient>, config: IngestionConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Fire-and-forget entry point: spawns the ingestion run on the runtime
    /// and returns immediately. The submitting request only needs the job id;
    /// all further communication happens through the job store.
    pub fn spawn(self: Arc<Self>, job_id: Uuid, bytes: Bytes) {
        tokio::spawn(async move {
            self.run(job_id, bytes).await;
        });
    }

    /// Process one upload to a terminal status. Row-level problems are
    /// captured as data on the job; only file-level and dependency-outage
    /// conditions fail the whole job.
    #[tracing::instrument(skip(self, bytes), fields(job_id = %job_id))]
    pub async fn run(&self, job_id: Uuid, bytes: Bytes) {
        tracing::info!(size_bytes = bytes.len(), "Starting ingestion");

        if !self
            .transition(job_id, UploadStatus::Processing, "parsing file")
            .await
        {
            return;
        }

        if !self.registry.check_health().await {
            tracing::error!("Registry health check failed, aborting job");
            self.transition(job_id, UploadStatus::Failed, "registry unavailable")
                .await;
            return;
        }

        let rows = match parse_csv(&bytes) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "File-level parsing failure");
                self.transition(job_id, UploadStatus::Failed, format!("Error parsing file: {}", e))
                    .await;
                return;
            }
        };

        let total = rows.len() as u64;
        let updated = self
            .store
            .update(job_id, |job| {
                job.total_records = total;
                job.message = format!("Parsed {} records. Submitting to registry...", total);
            })
            .await;
        if updated.is_err() {
            tracing::warn!("Job disappeared from store, abandoning ingestion");
            return;
        }

        let mut consecutive_transient: u32 = 0;
        for (index, row) in rows.iter().enumerate() {
            let record = match validate_row(row) {
                ValidationOutcome::Accepted(record) => record,
                ValidationOutcome::Rejected(reason) => {
                    tracing::debug!(row = index, reason = %reason, "Row rejected by validation");
                    self.record_failure(job_id, error_label(&row.swift_code), reason.to_string())
                        .await;
                    continue;
                }
            };

            match self.registry.submit_with_retry(&record).await {
                SubmitOutcome::Created => {
                    consecutive_transient = 0;
                    let _ = self.store.update(job_id, |job| job.processed += 1).await;
                }
                SubmitOutcome::DuplicateRejected => {
                    consecutive_transient = 0;
                    let _ = self.store.update(job_id, |job| job.skipped += 1).await;
                }
                SubmitOutcome::PermanentFailure(detail) => {
                    consecutive_transient = 0;
                    self.record_failure(job_id, record.swift_code.clone(), detail)
                        .await;
                }
                SubmitOutcome::TransientFailure(detail) => {
                    consecutive_transient += 1;
                    self.record_failure(job_id, record.swift_code.clone(), detail)
                        .await;
                    if consecutive_transient >= self.config.outage_threshold {
                        let remaining = total - (index as u64 + 1);
                        tracing::error!(
                            consecutive = consecutive_transient,
                            remaining,
                            "Registry unreachable past threshold, abandoning remaining rows"
                        );
                        self.transition(
                            job_id,
                            UploadStatus::Failed,
                            format!(
                                "registry unavailable: {} consecutive failures, {} records not attempted",
                                consecutive_transient, remaining
                            ),
                        )
                        .await;
                        return;
                    }
                }
            }
        }

        let summary = self
            .store
            .update(job_id, |job| {
                job.status = UploadStatus::Completed;
                job.message = format!(
                    "Upload complete. {} records created, {} skipped, {} failed.",
                    job.processed, job.skipped, job.failed
                );
            })
            .await;

        match summary {
            Ok(job) => tracing::info!(
                processed = job.processed,
                skipped = job.skipped,
                failed = job.failed,
                "Ingestion complete"
            ),
            Err(_) => tracing::warn!("Job disappeared from store before completion"),
        }
    }

    /// Set status and message. Returns false if the job is gone.
    async fn transition(
        &self,
        job_id: Uuid,
        status: UploadStatus,
        message: impl Into<String>,
    ) -> bool {
        let message = message.into();
        let result = self
            .store
            .update(job_id, |job| {
                job.status = status;
                job.message = message;
            })
            .await;
        if result.is_err() {
            tracing::warn!(status = %status, "Job disappeared from store during transition");
            return false;
        }
        true
    }

    /// Count one failed row and append its error detail, in a single store
    /// update. The detail list is capped; the counter is always bumped.
    async fn record_failure(&self, job_id: Uuid, swift_code: String, reason: String) {
        let cap = self.config.error_detail_cap;
        let _ = self
            .store
            .update(job_id, |job| {
                job.failed += 1;
                if job.error_details.len() < cap {
                    job.error_details.push(RecordError { swift_code, reason });
                }
            })
            .await;
    }
}

fn error_label(raw_code: &str) -> String {
    let trimmed = raw_code.trim();
    if trimmed.is_empty() {
        "(missing)".to_string()
    } else {
        trimmed.to_string()
    }
}
