use serde::{Deserialize, Serialize};

/// Default API server used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default SOS countdown before an armed alert fires.
pub const DEFAULT_SOS_COUNTDOWN_SECS: u32 = 10;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration stored in config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_sos_countdown_secs")]
    pub sos_countdown_secs: u32,
    /// Filter directive used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_sos_countdown_secs() -> u32 {
    DEFAULT_SOS_COUNTDOWN_SECS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            sos_countdown_secs: default_sos_countdown_secs(),
            log_level: default_log_level(),
        }
    }
}
