use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use swiftbatch_core::models::{UploadJob, UploadListQuery, UploadStats, UploadStatus};

/// Failure modes of the job store. An unknown id is a normal, non-fatal
/// condition (a caller-supplied bad id, or a poll racing an external
/// retention policy), so callers should map it to a 404-style outcome.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobStoreError {
    #[error("upload job {0} not found")]
    NotFound(Uuid),
}

/// Concurrency-safe repository of [`UploadJob`] records.
///
/// The outer lock guards the arena map and is held only long enough to
/// resolve an id to its entry; each entry has its own `RwLock`, which
/// serializes the single writer (the job's worker) against concurrent
/// readers. A reader always sees counters and `error_details` from the same
/// update, never a torn pair.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Arc<RwLock<UploadJob>>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new pending job for the given filename and return a snapshot.
    pub async fn create(&self, filename: impl Into<String>) -> UploadJob {
        let job = UploadJob::new(filename);
        let snapshot = job.clone();
        self.jobs
            .write()
            .await
            .insert(job.id, Arc::new(RwLock::new(job)));
        snapshot
    }

    /// Point lookup. Returns a snapshot clone of the job.
    pub async fn get(&self, id: Uuid) -> Option<UploadJob> {
        let entry = self.jobs.read().await.get(&id).cloned()?;
        let job = entry.read().await;
        Some(job.clone())
    }

    /// Atomic read-modify-write of one job. The mutation runs under the
    /// job's write lock; the post-mutation snapshot is returned.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> Result<UploadJob, JobStoreError>
    where
        F: FnOnce(&mut UploadJob),
    {
        let entry = self
            .jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(JobStoreError::NotFound(id))?;
        let mut job = entry.write().await;
        mutate(&mut job);
        Ok(job.clone())
    }

    /// Filtered, paginated listing.
    ///
    /// Order is deterministic: `created_at` descending (most recent first),
    /// ties broken by id, so pagination is stable across calls.
    pub async fn list(&self, query: &UploadListQuery) -> Vec<UploadJob> {
        let entries: Vec<Arc<RwLock<UploadJob>>> =
            self.jobs.read().await.values().cloned().collect();

        let mut jobs = Vec::with_capacity(entries.len());
        for entry in entries {
            let job = entry.read().await;
            if let Some(status) = query.status {
                if job.status != status {
                    continue;
                }
            }
            jobs.push(job.clone());
        }

        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = query.skip.unwrap_or(0);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        jobs.into_iter().skip(skip).take(limit).collect()
    }

    /// Aggregate statistics over all known jobs, computed as a snapshot at
    /// call time.
    pub async fn stats(&self) -> UploadStats {
        let entries: Vec<Arc<RwLock<UploadJob>>> =
            self.jobs.read().await.values().cloned().collect();

        let mut stats = UploadStats {
            total_uploads: 0,
            successful_uploads: 0,
            failed_uploads: 0,
            processing_uploads: 0,
            total_records_processed: 0,
            most_recent_upload: None,
        };

        for entry in entries {
            let job = entry.read().await;
            stats.total_uploads += 1;
            match job.status {
                UploadStatus::Completed => stats.successful_uploads += 1,
                UploadStatus::Failed => stats.failed_uploads += 1,
                UploadStatus::Pending | UploadStatus::Processing => {
                    stats.processing_uploads += 1
                }
            }
            stats.total_records_processed += job.processed;
            stats.most_recent_upload = match stats.most_recent_upload {
                Some(latest) if latest >= job.created_at => Some(latest),
                _ => Some(job.created_at),
            };
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftbatch_core::models::RecordError;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = JobStore::new();
        let created = store.create("codes.csv").await;

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.filename, "codes.csv");
        assert_eq!(fetched.status, UploadStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_unknown_id_returns_none() {
        let store = JobStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_mutates_and_returns_snapshot() {
        let store = JobStore::new();
        let job = store.create("codes.csv").await;

        let updated = store
            .update(job.id, |j| {
                j.status = UploadStatus::Processing;
                j.message = "parsing file".to_string();
            })
            .await
            .unwrap();
        assert_eq!(updated.status, UploadStatus::Processing);
        assert_eq!(updated.message, "parsing file");

        let fetched = store.get(job.id).await.unwrap();
        assert_eq!(fetched.status, UploadStatus::Processing);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = JobStore::new();
        let id = Uuid::new_v4();
        let err = store.update(id, |_| {}).await.unwrap_err();
        assert_eq!(err, JobStoreError::NotFound(id));
    }

    #[tokio::test]
    async fn test_counters_and_errors_update_together() {
        let store = JobStore::new();
        let job = store.create("codes.csv").await;

        let updated = store
            .update(job.id, |j| {
                j.failed += 1;
                j.error_details.push(RecordError {
                    swift_code: "BADCODE".to_string(),
                    reason: "invalid length".to_string(),
                });
            })
            .await
            .unwrap();
        assert_eq!(updated.failed, 1);
        assert_eq!(updated.error_details.len(), 1);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = JobStore::new();
        let first = store.create("a.csv").await;
        let second = store.create("b.csv").await;
        // Force distinct timestamps regardless of clock resolution.
        store
            .update(second.id, |j| {
                j.created_at = first.created_at + chrono::Duration::milliseconds(5);
            })
            .await
            .unwrap();

        let jobs = store.list(&UploadListQuery::default()).await;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, second.id);
        assert_eq!(jobs[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let store = JobStore::new();
        let completed = store.create("a.csv").await;
        store.create("b.csv").await;
        store
            .update(completed.id, |j| j.status = UploadStatus::Completed)
            .await
            .unwrap();

        let query = UploadListQuery {
            status: Some(UploadStatus::Completed),
            limit: None,
            skip: None,
        };
        let jobs = store.list(&query).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, completed.id);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = JobStore::new();
        let base = chrono::Utc::now();
        for i in 0..5 {
            let job = store.create(format!("{}.csv", i)).await;
            store
                .update(job.id, |j| {
                    j.created_at = base + chrono::Duration::milliseconds(i);
                })
                .await
                .unwrap();
        }

        let query = UploadListQuery {
            status: None,
            limit: Some(2),
            skip: Some(1),
        };
        let page = store.list(&query).await;
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].filename, "3.csv");
        assert_eq!(page[1].filename, "2.csv");
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let store = JobStore::new();
        let a = store.create("a.csv").await;
        let b = store.create("b.csv").await;
        store.create("c.csv").await;

        store
            .update(a.id, |j| {
                j.status = UploadStatus::Completed;
                j.processed = 10;
            })
            .await
            .unwrap();
        store
            .update(b.id, |j| {
                j.status = UploadStatus::Failed;
                j.processed = 3;
            })
            .await
            .unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.total_uploads, 3);
        assert_eq!(stats.successful_uploads, 1);
        assert_eq!(stats.failed_uploads, 1);
        assert_eq!(stats.processing_uploads, 1);
        assert_eq!(stats.total_records_processed, 13);
        assert!(stats.most_recent_upload.is_some());
    }

    #[tokio::test]
    async fn test_stats_empty_store() {
        let store = JobStore::new();
        let stats = store.stats().await;
        assert_eq!(stats.total_uploads, 0);
        assert_eq!(stats.most_recent_upload, None);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let store = Arc::new(JobStore::new());
        let job = store.create("codes.csv").await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            let id = job.id;
            handles.push(tokio::spawn(async move {
                store.update(id, |j| j.processed += 1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let job = store.get(job.id).await.unwrap();
        assert_eq!(job.processed, 20);
    }
}
