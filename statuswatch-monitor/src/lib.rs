//! # statuswatch-monitor
//!
//! Polls a status endpoint on a fixed interval, records level transitions in
//! a bounded history and raises a local notification for each transition.
//!
//! ## Architecture
//!
//! ```text
//!   Ticker ──tick──▶ PollLoop ──fetch──▶ StatusSource (HTTP)
//!                       │
//!                       ├─ MonitorState::observe ─▶ HistoryLog
//!                       ├─ NotificationGateway::notify (on transition)
//!                       └─ watch::Sender<MonitorView> ─▶ presentation
//! ```
//!
//! One task owns all monitor state. Presentation code reads published
//! [`MonitorView`]s and never writes back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use statuswatch_monitor::{ChannelHost, Monitor, MonitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::load(None)?;
//!     let (host, mut notifications) = ChannelHost::create(16);
//!
//!     let handle = Monitor::from_config(&config, Some(Arc::new(host)))?.start();
//!
//!     while let Some(n) = notifications.recv().await {
//!         println!("{}: {}", n.title, n.body);
//!     }
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Transition detection**: history and notifications only on level changes
//! - **Bounded history**: the last ten transitions, most recent first
//! - **Injectable schedule**: fixed interval, or [`ManualTicker`] for tests
//! - **Platform gateways**: notification and exit behaviour chosen at startup

pub mod config;
pub mod error;
pub mod history;
pub mod notify;
pub mod platform;
pub mod state;
pub mod ticker;

mod handle;
mod monitor;

pub use config::MonitorConfig;
pub use error::{HostError, MonitorError};
pub use handle::{MonitorHandle, MonitorView};
pub use history::{HistoryLog, HISTORY_CAPACITY};
pub use monitor::{Monitor, MonitorBuilder, DEFAULT_POLL_INTERVAL};
pub use notify::{
    gateway_for, ChannelConfig, ChannelHost, DeliveryOptions, DisabledNotifier, HostNotifier,
    Importance, Notification, NotificationGateway, NotificationHost, Permission,
};
pub use platform::{close_app, HostPlatform, ProcessHost};
pub use state::{MonitorState, Phase};
pub use ticker::{IntervalTicker, ManualTicker, TickTrigger, Ticker};

// Re-export types for convenience
pub use statuswatch_client::{FetchError, HttpStatusClient, StatusSource};
pub use statuswatch_types::{HistoryEntry, Level, StatusSnapshot, UnknownStatusPolicy};
