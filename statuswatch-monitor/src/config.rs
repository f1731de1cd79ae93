//! Monitor configuration.
//!
//! Settings are layered: built-in defaults, then an optional file (TOML, YAML
//! or JSON, picked by extension), then `STATUSWATCH_*` environment variables.
//! Nested keys use a double underscore, e.g. `STATUSWATCH_CHANNEL__NAME`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use statuswatch_client::DEFAULT_ENDPOINT;
use statuswatch_types::UnknownStatusPolicy;

use crate::notify::{ChannelConfig, DeliveryOptions};
use crate::platform::HostPlatform;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STATUSWATCH";

/// Everything needed to compose a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// URL polled with `GET`.
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// How status strings outside ok/inspect/warning are classified.
    pub unknown_status: UnknownStatusPolicy,
    pub platform: HostPlatform,
    /// Only used on platforms with notification channels.
    pub channel: ChannelConfig,
    pub delivery: DeliveryOptions,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_ms: 5000,
            request_timeout_ms: 10_000,
            unknown_status: UnknownStatusPolicy::default(),
            platform: HostPlatform::default(),
            channel: ChannelConfig::default(),
            delivery: DeliveryOptions::default(),
        }
    }
}

impl MonitorConfig {
    /// Load from an optional file plus the process environment.
    ///
    /// A missing or malformed file is an error when a path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(path, None)
    }

    /// Same as [`MonitorConfig::load`], but reads environment variables from
    /// `env` instead of the process environment when given.
    fn from_sources(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
