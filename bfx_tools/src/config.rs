use std::time::Duration;

use bpg_common::{parse_boolean_flag, Secret};
use log::*;

pub const DEFAULT_BASE_URL: &str = "https://api.bitfinex.com/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct BfxConfig {
    /// Base URL for the payment processor API. Trailing slash required.
    pub base_url: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// Per-call timeout. A stalled remote call is a transient transport error, never a hang.
    pub timeout: Duration,
    /// When true, raw API response bodies are written to the log.
    pub log_responses: bool,
}

impl Default for BfxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::default(),
            api_secret: Secret::default(),
            timeout: DEFAULT_TIMEOUT,
            log_responses: false,
        }
    }
}

impl BfxConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BFX_API_URL").unwrap_or_else(|_| {
            info!("🔧️ BFX_API_URL not set, using {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        });
        let api_key = std::env::var("BFX_API_KEY").unwrap_or_else(|_| {
            error!("🔧️ BFX_API_KEY is not set. Signed API calls will be rejected by the processor.");
            String::default()
        });
        let api_secret = Secret::new(std::env::var("BFX_API_SECRET").unwrap_or_else(|_| {
            error!("🔧️ BFX_API_SECRET is not set. Signed API calls will be rejected by the processor.");
            String::default()
        }));
        let timeout = std::env::var("BFX_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🔧️ Invalid BFX_API_TIMEOUT_SECS value ({s}). {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let log_responses = parse_boolean_flag(std::env::var("BPG_DEBUG").ok(), false);
        Self { base_url, api_key, api_secret, timeout, log_responses }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.reveal().is_empty()
    }
}
