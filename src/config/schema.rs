//! Configuration schema definitions.
//!
//! All types derive Serde traits so a config can come from a TOML file, and
//! every field has a default so a minimal (or empty) file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Host used when neither the config nor the environment names one.
pub const DEFAULT_HOST: &str = "https://cloud.langfuse.com";

/// Default interval between timed drains.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 500;

pub const ENV_HOST: &str = "LANGFUSE_HOST";
pub const ENV_PUBLIC_KEY: &str = "LANGFUSE_PUBLIC_KEY";
pub const ENV_SECRET_KEY: &str = "LANGFUSE_SECRET_KEY";

/// Root configuration for the SDK.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LangfuseConfig {
    /// Ingestion API connection settings.
    pub api: ApiConfig,

    /// Interval between automatic drains in milliseconds (0 = flush only).
    pub flush_interval_ms: u64,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl Default for LangfuseConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LangfuseConfig {
    /// Tick interval for the dispatcher; `None` disables timed drains.
    pub fn flush_interval(&self) -> Option<Duration> {
        match self.flush_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

/// Connection settings for the ingestion API.
///
/// Empty strings mean "not set" and are filled by [`ApiConfig::resolve`].
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL (e.g., "https://cloud.langfuse.com").
    pub host: String,

    /// Project public key, used as the basic-auth user.
    pub public_key: String,

    /// Project secret key, used as the basic-auth password.
    pub secret_key: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            public_key: String::new(),
            secret_key: String::new(),
            timeout_secs: 30,
        }
    }
}

// Never print the secret key.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("public_key", &self.public_key)
            .field("secret_key", &if self.secret_key.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    /// Fill unset fields from the process environment, then defaults.
    pub fn resolve(self) -> Self {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Fill unset fields using `lookup` for environment values.
    ///
    /// Precedence: explicit value, then `LANGFUSE_*` variable, then default.
    pub fn resolve_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if self.host.is_empty() {
            self.host = from_env(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        }
        if self.public_key.is_empty() {
            self.public_key = from_env(ENV_PUBLIC_KEY).unwrap_or_default();
        }
        if self.secret_key.is_empty() {
            self.secret_key = from_env(ENV_SECRET_KEY).unwrap_or_default();
        }
        self
    }

    /// Whether both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.public_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
