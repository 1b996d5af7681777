//! Client configuration: where the backend lives and how long to wait.
//!
//! # Environment variables
//!
//! | Variable              | Default                        | Description                 |
//! |-----------------------|--------------------------------|-----------------------------|
//! | `CARE_API_URL`        | `http://localhost:8000/api/v1` | Base URL incl. API prefix   |
//! | `CARE_API_TIMEOUT_MS` | `5000`                         | Per-request timeout         |

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("CARE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::info!(default = DEFAULT_BASE_URL, "CARE_API_URL not set, using default");
                DEFAULT_BASE_URL.to_string()
            });

        let timeout = match lookup("CARE_API_TIMEOUT_MS") {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(value = %raw, "Invalid CARE_API_TIMEOUT_MS, using 5000");
                    DEFAULT_TIMEOUT
                }
            },
        };

        Self { base_url, timeout }
    }
}
