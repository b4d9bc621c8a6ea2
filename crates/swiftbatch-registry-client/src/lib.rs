//! HTTP client for the authoritative SWIFT code registry.
//!
//! Wraps the registry's single-record create API and classifies every
//! submission into an explicit outcome. Duplicate detection is a registry
//! response (HTTP 409), never an estimate. The client is stateless and can
//! be shared across all ingestion workers; reqwest's connection pool bounds
//! the aggregate in-flight requests.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};

use swiftbatch_core::models::NormalizedRecord;

/// Maximum backoff between retry attempts.
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// Health-check timeout, deliberately shorter than the submit timeout.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Classification of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registry created the record.
    Created,
    /// Registry reports the identifier already exists. Expected during
    /// re-uploads; the batch records this as skipped, not failed.
    DuplicateRejected,
    /// Registry rejected the record for a reason other than duplication.
    /// Not retried.
    PermanentFailure(String),
    /// Network error, timeout, or 5xx. Retryable.
    TransientFailure(String),
}

impl SubmitOutcome {
    pub fn is_transient(&self) -> bool {
        matches!(self, SubmitOutcome::TransientFailure(_))
    }
}

/// Retry and timeout settings for the client.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Additional attempts after the first for transient failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff (`base * 2^attempt`).
    pub retry_base_delay: Duration,
}

impl RegistryConfig {
    pub fn from_core(config: &swiftbatch_core::Config) -> Self {
        Self {
            base_url: config.registry_api_url.clone(),
            timeout: Duration::from_secs(config.registry_timeout_secs),
            max_retries: config.registry_max_retries,
            retry_base_delay: Duration::from_millis(config.registry_retry_base_delay_ms),
        }
    }
}

/// Computes backoff for a given attempt number (exponential with cap).
#[inline]
fn compute_retry_backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt))
        .min(MAX_RETRY_BACKOFF)
}

/// Client for the registry's single-record API.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    client: Client,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config: RegistryConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn create_url(&self) -> String {
        format!("{}/api/v1/swift-code/", self.config.base_url)
    }

    /// Submit one record, without retrying. Classifies the response:
    /// 2xx -> Created, 409 -> DuplicateRejected, other 4xx -> permanent,
    /// 5xx or transport failure -> transient.
    pub async fn submit(&self, record: &NormalizedRecord) -> SubmitOutcome {
        let response = match self
            .client
            .post(self.create_url())
            .json(record)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(swift_code = %record.swift_code, error = %e, "Registry request failed");
                return SubmitOutcome::TransientFailure(e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return SubmitOutcome::Created;
        }
        if status == StatusCode::CONFLICT {
            tracing::debug!(swift_code = %record.swift_code, "Registry reports duplicate");
            return SubmitOutcome::DuplicateRejected;
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status.is_server_error() {
            tracing::warn!(swift_code = %record.swift_code, status = %status, "Registry server error");
            SubmitOutcome::TransientFailure(format!("registry returned {}: {}", status, detail))
        } else {
            tracing::debug!(swift_code = %record.swift_code, status = %status, "Registry rejected record");
            SubmitOutcome::PermanentFailure(format!("registry returned {}: {}", status, detail))
        }
    }

    /// Submit one record, retrying transient failures up to the configured
    /// bound with exponential backoff. Created, duplicate, and permanent
    /// outcomes return immediately; the final transient failure is returned
    /// after retries are exhausted.
    pub async fn submit_with_retry(&self, record: &NormalizedRecord) -> SubmitOutcome {
        let mut outcome = self.submit(record).await;
        for attempt in 0..self.config.max_retries {
            if !outcome.is_transient() {
                return outcome;
            }
            let delay = compute_retry_backoff(self.config.retry_base_delay, attempt);
            tracing::debug!(
                swift_code = %record.swift_code,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "Retrying registry submission"
            );
            tokio::time::sleep(delay).await;
            outcome = self.submit(record).await;
        }
        outcome
    }

    /// Check whether the registry answers at all. Used by workers as a
    /// cheap gate before parsing a file.
    pub async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(self.create_url())
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Registry health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_record() -> NormalizedRecord {
        NormalizedRecord {
            swift_code: "DEUTDEFFXXX".to_string(),
            bank_name: "DEUTSCHE BANK AG".to_string(),
            address: "TAUNUSANLAGE 12".to_string(),
            country_iso2: "DE".to_string(),
            country_name: "GERMANY".to_string(),
            is_headquarter: true,
        }
    }

    fn test_client(base_url: &str) -> RegistryClient {
        RegistryClient::new(RegistryConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(2),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(1),
        })
        .unwrap()
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let base = Duration::from_millis(200);
        assert_eq!(compute_retry_backoff(base, 0), Duration::from_millis(200));
        assert_eq!(compute_retry_backoff(base, 1), Duration::from_millis(400));
        assert_eq!(compute_retry_backoff(base, 2), Duration::from_millis(800));
        assert_eq!(compute_retry_backoff(base, 20), MAX_RETRY_BACKOFF);
    }

    #[tokio::test]
    async fn test_submit_created_on_201() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/swift-code/"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(client.submit(&test_record()).await, SubmitOutcome::Created);
    }

    #[tokio::test]
    async fn test_submit_sends_camel_case_payload() {
        let server = MockServer::start().await;
        let expected = serde_json::json!({
            "swiftCode": "DEUTDEFFXXX",
            "bankName": "DEUTSCHE BANK AG",
            "address": "TAUNUSANLAGE 12",
            "countryISO2": "DE",
            "countryName": "GERMANY",
            "isHeadquarter": true,
        });
        Mock::given(method("POST"))
            .and(path("/api/v1/swift-code/"))
            .and(body_json_string(expected.to_string()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(client.submit(&test_record()).await, SubmitOutcome::Created);
    }

    #[tokio::test]
    async fn test_submit_duplicate_on_409() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(
            client.submit(&test_record()).await,
            SubmitOutcome::DuplicateRejected
        );
    }

    #[tokio::test]
    async fn test_submit_permanent_on_422() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad field"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        match client.submit(&test_record()).await {
            SubmitOutcome::PermanentFailure(detail) => assert!(detail.contains("bad field")),
            other => panic!("expected permanent failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_transient_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.submit(&test_record()).await.is_transient());
    }

    #[tokio::test]
    async fn test_submit_transient_on_connection_refused() {
        // Nothing is listening at this address.
        let client = test_client("http://127.0.0.1:1");
        assert!(client.submit(&test_record()).await.is_transient());
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(
            client.submit_with_retry(&test_record()).await,
            SubmitOutcome::Created
        );
    }

    #[tokio::test]
    async fn test_retry_exhaustion_returns_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            // 1 initial attempt + max_retries (2) = 3 calls.
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.submit_with_retry(&test_record()).await.is_transient());
    }

    #[tokio::test]
    async fn test_duplicate_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(
            client.submit_with_retry(&test_record()).await,
            SubmitOutcome::DuplicateRejected
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/swift-code/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.check_health().await);

        let down = test_client("http://127.0.0.1:1");
        assert!(!down.check_health().await);
    }
}
