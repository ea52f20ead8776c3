//! Gateway configuration loaded from `M360_*` environment variables.

use std::fmt;
use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvSource};
use serde::Deserialize;

use crate::client::RetryPolicy;
use crate::domain::Environment;

/// Prefix of every environment variable read by [`GatewayConfig::from_env`].
pub const ENV_PREFIX: &str = "M360";
/// Environment variable holding the default app key.
pub const APP_KEY_VAR: &str = "M360_APP_KEY";
/// Environment variable holding the default app secret.
pub const APP_SECRET_VAR: &str = "M360_APP_SECRET";

pub const DEFAULT_BASE_URL: &str = "https://api.m360.com.ph/v3/api/broadcast";
pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read-only settings shared by every call made through one client.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Endpoint receiving the send payload (`M360_BASE_URL`).
    pub base_url: String,
    /// Environment label, e.g. `sandbox` or `production` (`M360_ENVIRONMENT`).
    pub environment: String,
    /// Default app key used when the request carries none (`M360_APP_KEY`).
    pub app_key: Option<String>,
    /// Default app secret used when the request carries none (`M360_APP_SECRET`).
    pub app_secret: Option<String>,
    /// TCP connect timeout in seconds (`M360_CONNECT_TIMEOUT_SECS`).
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds (`M360_READ_TIMEOUT_SECS`).
    pub read_timeout_secs: u64,
    /// `User-Agent` header value (`M360_USER_AGENT`).
    pub user_agent: String,
    /// Retry policy for server-class failures (`M360_RETRY__MAX_ATTEMPTS`, ...).
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            app_key: None,
            app_secret: None,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            retry: RetryPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Load from `M360_*` environment variables, falling back to defaults.
    ///
    /// Nested keys use `__`, e.g. `M360_RETRY__MAX_ATTEMPTS=5`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_source(env_source())
    }

    fn from_env_source(env: EnvSource) -> Result<Self, ConfigError> {
        Self::from_config(Config::builder().add_source(env).build()?)
    }

    /// Deserialize from an already-built [`Config`]; absent keys keep their defaults.
    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        source.try_deserialize()
    }

    /// Sandbox or production, from the environment label and base URL.
    pub fn environment_tag(&self) -> Environment {
        Environment::detect(&self.environment, &self.base_url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field("app_key", &redact(&self.app_key))
            .field("app_secret", &redact(&self.app_secret))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish()
    }
}

// Values stay strings until deserialization so digit-only credentials keep leading zeros.
fn env_source() -> EnvSource {
    EnvSource::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
