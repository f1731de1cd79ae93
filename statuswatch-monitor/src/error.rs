//! Error types for host capabilities and monitor construction.

use thiserror::Error;

use statuswatch_client::FetchError;

/// Errors reported by host platform capabilities.
#[derive(Debug, Error)]
pub enum HostError {
    /// The user (or platform) refused notification permission.
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The requested capability does not exist on this platform.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The host capability failed for another reason.
    #[error("Host capability failed: {0}")]
    Failed(String),
}

/// Errors that can occur while building a monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Configuration could not be loaded or deserialized.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The status client could not be built.
    #[error("Status client: {0}")]
    Client(#[from] FetchError),
}
