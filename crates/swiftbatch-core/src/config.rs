//! Configuration module
//!
//! Environment-driven configuration for the upload service. `from_env` fails
//! fast on missing required values and on unsafe production settings.

use std::env;

// Defaults
const SERVER_PORT: u16 = 4000;
const REGISTRY_TIMEOUT_SECS: u64 = 30;
const REGISTRY_MAX_RETRIES: u32 = 3;
const REGISTRY_RETRY_BASE_DELAY_MS: u64 = 200;
const REGISTRY_OUTAGE_THRESHOLD: u32 = 5;
const MAX_FILE_SIZE_MB: usize = 10;
const ERROR_DETAIL_CAP: usize = 100;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Base URL of the authoritative SWIFT code registry API.
    pub registry_api_url: String,
    /// Per-call timeout for registry requests.
    pub registry_timeout_secs: u64,
    /// Retry bound for transient registry failures on a single record.
    pub registry_max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub registry_retry_base_delay_ms: u64,
    /// Consecutive unresolved transient failures before a job is declared
    /// failed due to dependency outage.
    pub registry_outage_threshold: u32,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    /// Maximum number of entries kept in a job's error_details list.
    /// Counters remain exact past the cap.
    pub error_detail_cap: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "csv".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            registry_api_url: env::var("REGISTRY_API_URL")
                .or_else(|_| env::var("SWIFT_API_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("REGISTRY_API_URL or SWIFT_API_URL must be set")
                })?,
            registry_timeout_secs: env::var("REGISTRY_TIMEOUT_SECS")
                .unwrap_or_else(|_| REGISTRY_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REGISTRY_TIMEOUT_SECS),
            registry_max_retries: env::var("REGISTRY_MAX_RETRIES")
                .unwrap_or_else(|_| REGISTRY_MAX_RETRIES.to_string())
                .parse()
                .unwrap_or(REGISTRY_MAX_RETRIES),
            registry_retry_base_delay_ms: env::var("REGISTRY_RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| REGISTRY_RETRY_BASE_DELAY_MS.to_string())
                .parse()
                .unwrap_or(REGISTRY_RETRY_BASE_DELAY_MS),
            registry_outage_threshold: env::var("REGISTRY_OUTAGE_THRESHOLD")
                .unwrap_or_else(|_| REGISTRY_OUTAGE_THRESHOLD.to_string())
                .parse()
                .unwrap_or(REGISTRY_OUTAGE_THRESHOLD),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            error_detail_cap: env::var("ERROR_DETAIL_CAP")
                .unwrap_or_else(|_| ERROR_DETAIL_CAP.to_string())
                .parse()
                .unwrap_or(ERROR_DETAIL_CAP),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for Config {
    /// Development defaults, used by tests. `from_env` is authoritative for
    /// deployments.
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            registry_api_url: "http://localhost:8000".to_string(),
            registry_timeout_secs: REGISTRY_TIMEOUT_SECS,
            registry_max_retries: REGISTRY_MAX_RETRIES,
            registry_retry_base_delay_ms: REGISTRY_RETRY_BASE_DELAY_MS,
            registry_outage_threshold: REGISTRY_OUTAGE_THRESHOLD,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: vec!["csv".to_string()],
            error_detail_cap: ERROR_DETAIL_CAP,
        }
    }
}
