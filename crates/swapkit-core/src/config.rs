//! Configuration module
//!
//! All endpoint addresses, relay parameters, authentication header values,
//! and timing budgets live here as plain data. They are injected into the
//! transport and client layers at construction time so tests can substitute
//! their own; nothing reads these values as ambient globals.
//!
//! The signature tokens and device identifier are opaque values fixed by the
//! remote service contract. They select per-endpoint-family and are not
//! derived from the request.

use std::env;

/// Per-endpoint-family signature tokens required by the processing service.
#[derive(Clone, Debug)]
pub struct SignatureSet {
    pub upload: String,
    pub complete: String,
    pub add: String,
    pub query: String,
    /// Used for any endpoint outside the four known families.
    pub fallback: String,
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self {
            upload: "GKU0Gu3G6ucTwQQnrz6wt3EHrkSa/OKwDmTFAGvTUK4=".to_string(),
            complete: "INFCvbuyXmXERAUYnN08zr5kWlHKeLlfSbZ5P5CFVu4=".to_string(),
            add: "rhGWUZ1WSropMdsFr2hmYHf5Y7P5LQt9SSc4C5h98Mc=".to_string(),
            query: "KJH95ap/txoZhMnsmSgbdXtKywXNXB/CxmvSHCyIq0A=".to_string(),
            fallback: "AdhvRRffLGifye6/WoMxLOj13KuYmvUt1kjyUxBZkqU=".to_string(),
        }
    }
}

/// Processing service configuration: base URL plus the fixed header values
/// the service expects on every call.
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    pub base_url: String,
    pub origin: String,
    pub referer: String,
    pub device_id: String,
    pub version_tag: String,
    pub signatures: SignatureSet,
}

/// Transport routing configuration.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// API key for the premium relay. Empty disables that route.
    pub premium_relay_key: String,
    /// Per-route attempt budget in seconds.
    pub attempt_timeout_secs: u64,
}

/// Job polling configuration.
#[derive(Clone, Debug)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub max_attempts: usize,
}

/// Auxiliary worker endpoints (single-POST services, no fallback routing).
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub watermark_url: String,
    pub transcript_url: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub transport: TransportConfig,
    pub polling: PollingConfig,
    pub workers: WorkerConfig,
}

const ATTEMPT_TIMEOUT_SECS: u64 = 45;
const POLL_INTERVAL_SECS: u64 = 3;
const MAX_POLL_ATTEMPTS: usize = 120;

const PROCESSOR_BASE_URL: &str = "https://deepswapface.ai/processor/v1";
const PROCESSOR_ORIGIN: &str = "https://www.deepswap.ai";
const PROCESSOR_REFERER: &str = "https://www.deepswap.ai/";
const PROCESSOR_DEVICE_ID: &str =
    "SKk4HSXv6fDflaGnOO/U1UUy0KnswyCobrIpUKxyY0+MiRBUd4aSm6RUHSSKU6IR";
const PROCESSOR_VERSION_TAG: &str = "1.0";

const PREMIUM_RELAY_KEY: &str = "1e7e10f0eec85fc47f03c05389c13eb7";

const WATERMARK_WORKER_URL: &str = "https://sora2-remover-watermark.raxnetglobal.workers.dev/";
const TRANSCRIPT_WORKER_URL: &str = "https://beckend-trankrip-youtube.raxnetglobal.workers.dev/";

impl Default for Config {
    fn default() -> Self {
        Self {
            processor: ProcessorConfig {
                base_url: PROCESSOR_BASE_URL.to_string(),
                origin: PROCESSOR_ORIGIN.to_string(),
                referer: PROCESSOR_REFERER.to_string(),
                device_id: PROCESSOR_DEVICE_ID.to_string(),
                version_tag: PROCESSOR_VERSION_TAG.to_string(),
                signatures: SignatureSet::default(),
            },
            transport: TransportConfig {
                premium_relay_key: PREMIUM_RELAY_KEY.to_string(),
                attempt_timeout_secs: ATTEMPT_TIMEOUT_SECS,
            },
            polling: PollingConfig {
                interval_secs: POLL_INTERVAL_SECS,
                max_attempts: MAX_POLL_ATTEMPTS,
            },
            workers: WorkerConfig {
                watermark_url: WATERMARK_WORKER_URL.to_string(),
                transcript_url: TRANSCRIPT_WORKER_URL.to_string(),
            },
        }
    }
}

impl Config {
    /// Build configuration from the environment, falling back to the service
    /// contract defaults for anything unset.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            processor: ProcessorConfig {
                base_url: env::var("SWAPKIT_PROCESSOR_URL")
                    .unwrap_or(defaults.processor.base_url),
                origin: env::var("SWAPKIT_PROCESSOR_ORIGIN").unwrap_or(defaults.processor.origin),
                referer: env::var("SWAPKIT_PROCESSOR_REFERER")
                    .unwrap_or(defaults.processor.referer),
                device_id: env::var("SWAPKIT_DEVICE_ID").unwrap_or(defaults.processor.device_id),
                version_tag: defaults.processor.version_tag,
                signatures: defaults.processor.signatures,
            },
            transport: TransportConfig {
                premium_relay_key: env::var("SWAPKIT_PREMIUM_RELAY_KEY")
                    .unwrap_or(defaults.transport.premium_relay_key),
                attempt_timeout_secs: env::var("SWAPKIT_ATTEMPT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| ATTEMPT_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(ATTEMPT_TIMEOUT_SECS),
            },
            polling: PollingConfig {
                interval_secs: env::var("SWAPKIT_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| POLL_INTERVAL_SECS.to_string())
                    .parse()
                    .unwrap_or(POLL_INTERVAL_SECS),
                max_attempts: env::var("SWAPKIT_MAX_POLL_ATTEMPTS")
                    .unwrap_or_else(|_| MAX_POLL_ATTEMPTS.to_string())
                    .parse()
                    .unwrap_or(MAX_POLL_ATTEMPTS),
            },
            workers: WorkerConfig {
                watermark_url: env::var("SWAPKIT_WATERMARK_URL")
                    .unwrap_or(defaults.workers.watermark_url),
                transcript_url: env::var("SWAPKIT_TRANSCRIPT_URL")
                    .unwrap_or(defaults.workers.transcript_url),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.processor.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("Processor base URL cannot be empty"));
        }
        if !self.processor.base_url.starts_with("http") {
            return Err(anyhow::anyhow!(
                "Processor base URL must be an http(s) URL: {}",
                self.processor.base_url
            ));
        }
        if self.transport.attempt_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Attempt timeout must be at least 1 second"));
        }
        if self.polling.max_attempts == 0 {
            return Err(anyhow::anyhow!("Poll attempt ceiling must be at least 1"));
        }
        Ok(())
    }
}
