//! # statuswatch-client
//!
//! Status sources for statuswatch.
//!
//! A [`StatusSource`] performs exactly one round-trip per call and returns a
//! normalized [`StatusSnapshot`]. Sources never retry; the monitor's tick
//! interval owns the retry cadence.
//!
//! ## Supported Sources
//!
//! - **HTTP** ([`HttpStatusClient`]) - `GET` against a JSON endpoint returning
//!   `{ "status": string, "description": string }`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statuswatch_client::{HttpStatusClient, StatusSource};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpStatusClient::builder()
//!         .endpoint("http://localhost:8080/status")
//!         .timeout(Duration::from_secs(3))
//!         .build()?;
//!
//!     let snapshot = client.fetch().await?;
//!     println!("{}: {}", snapshot.status(), snapshot.description());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

use std::fmt::Debug;

use async_trait::async_trait;

pub use error::FetchError;
pub use http::{HttpStatusClient, HttpStatusClientBuilder, DEFAULT_ENDPOINT};

// Re-export types for convenience
pub use statuswatch_types::{Level, StatusSnapshot, UnknownStatusPolicy};

/// Trait for fetching the current status from a remote endpoint.
///
/// Implementations perform a single attempt per call and report every
/// failure through [`FetchError`]; they must not panic on bad input.
#[async_trait]
pub trait StatusSource: Send + Sync + Debug {
    /// Fetch the current status.
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in log lines and status displays.
    fn description(&self) -> &str;
}
