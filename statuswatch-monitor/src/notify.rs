//! Local notifications for level transitions.
//!
//! The platform's permission and delivery subsystem is reached through the
//! [`NotificationHost`] trait. The monitor only talks to a
//! [`NotificationGateway`], which hides permission handling and platform
//! setup and never fails outward: a notification that cannot be delivered is
//! logged and dropped.
//!
//! ## Gateways
//!
//! - [`HostNotifier`]: delivers through a host, configuring the notification
//!   channel once on platforms that need one
//! - [`DisabledNotifier`]: used when no host capability exists (emulators,
//!   headless runs); only logs
//!
//! [`gateway_for`] picks one at composition time.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use statuswatch_monitor::{gateway_for, ChannelHost, HostPlatform, Level};
//!
//! # tokio_test::block_on(async {
//! let (host, mut rx) = ChannelHost::create(16);
//! let gateway = gateway_for(HostPlatform::Desktop, Some(Arc::new(host)));
//!
//! gateway.notify(&Level::Warning, "disk almost full").await;
//!
//! let notification = rx.recv().await.unwrap();
//! assert_eq!(notification.title, "Status Update: WARNING");
//! assert_eq!(notification.body, "disk almost full");
//! # });
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, OnceCell};
use tracing::{debug, info, warn};

use statuswatch_types::Level;

use crate::error::HostError;
use crate::platform::HostPlatform;

/// Notification permission as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

/// Importance of a notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
    #[default]
    Max,
}

/// Settings for the channel notifications are posted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub name: String,
    pub importance: Importance,
    /// Alternating off/on durations in milliseconds.
    pub vibration_pattern: Vec<u64>,
    /// ARGB hex colour for the notification light.
    pub light_color: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}

/// How a delivered notification is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryOptions {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: false,
            set_badge: false,
        }
    }
}

/// A local notification, delivered immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub level: Level,
    pub options: DeliveryOptions,
}

impl Notification {
    /// Build the notification announcing a move to `level`.
    pub fn for_transition(level: &Level, description: &str, options: DeliveryOptions) -> Self {
        Self {
            title: format!("Status Update: {}", level),
            body: description.to_string(),
            level: level.clone(),
            options,
        }
    }
}

/// The host platform's notification capability.
///
/// Implemented by the embedding application.
#[async_trait]
pub trait NotificationHost: Send + Sync + Debug {
    /// Current permission, without prompting.
    async fn check_permission(&self) -> Result<Permission, HostError>;

    /// Prompt the user for permission.
    async fn request_permission(&self) -> Result<Permission, HostError>;

    /// Create or update a notification channel.
    async fn configure_channel(&self, channel: &ChannelConfig) -> Result<(), HostError>;

    /// Deliver a notification now.
    async fn schedule(&self, notification: &Notification) -> Result<(), HostError>;
}

/// What the monitor uses to announce transitions.
#[async_trait]
pub trait NotificationGateway: Send + Sync + Debug {
    /// Make sure notifications may be shown, prompting if the user was never asked.
    ///
    /// The user is prompted at most once and concurrent first calls share
    /// that resolution. A refusal is re-checked, without a prompt, on later
    /// calls.
    async fn ensure_permission(&self) -> bool;

    /// Whether transitions will currently be announced.
    ///
    /// `None` until the first [`ensure_permission`](Self::ensure_permission)
    /// has finished, e.g. while a permission prompt is unanswered.
    fn notifications_enabled(&self) -> Option<bool>;

    /// Announce a move to `level`. Never fails; problems are logged.
    async fn notify(&self, level: &Level, description: &str);
}

/// Pick the gateway for a platform.
///
/// Without a host capability the result only logs.
pub fn gateway_for(
    platform: HostPlatform,
    host: Option<Arc<dyn NotificationHost>>,
) -> Arc<dyn NotificationGateway> {
    match host {
        Some(host) => Arc::new(HostNotifier::for_platform(host, platform)),
        None => Arc::new(DisabledNotifier::new(format!(
            "no notification capability on this {} host",
            platform
        ))),
    }
}

/// Gateway that delivers through a [`NotificationHost`].
///
/// Channel setup and the permission prompt happen once. A grant is
/// remembered; a refusal is not, so every later call re-checks the host
/// (without prompting again) and picks up permission granted in the
/// system settings.
#[derive(Debug)]
pub struct HostNotifier {
    host: Arc<dyn NotificationHost>,
    channel: Option<ChannelConfig>,
    options: DeliveryOptions,
    setup: OnceCell<()>,
    granted: AtomicBool,
}

impl HostNotifier {
    /// Notifier that never configures a channel.
    pub fn new(host: Arc<dyn NotificationHost>) -> Self {
        Self {
            host,
            channel: None,
            options: DeliveryOptions::default(),
            setup: OnceCell::new(),
            granted: AtomicBool::new(false),
        }
    }

    /// Notifier with the setup `platform` requires.
    pub fn for_platform(host: Arc<dyn NotificationHost>, platform: HostPlatform) -> Self {
        let mut notifier = Self::new(host);
        if platform.needs_notification_channel() {
            notifier.channel = Some(ChannelConfig::default());
        }
        notifier
    }

    /// Replace the channel settings. No effect on platforms without channels.
    pub fn with_channel_config(mut self, channel: ChannelConfig) -> Self {
        if self.channel.is_some() {
            self.channel = Some(channel);
        }
        self
    }

    /// Set how notifications are presented.
    pub fn with_delivery(mut self, options: DeliveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Configure the channel, then check permission and prompt if the user
    /// was never asked.
    async fn first_resolution(&self) {
        if let Some(channel) = &self.channel {
            match self.host.configure_channel(channel).await {
                Ok(()) => debug!(channel = %channel.name, "notification channel configured"),
                Err(e) => warn!(
                    channel = %channel.name,
                    error = %e,
                    "failed to configure notification channel"
                ),
            }
        }

        let existing = match self.host.check_permission().await {
            Ok(permission) => permission,
            Err(e) => {
                warn!(error = %e, "could not check notification permission");
                return;
            }
        };

        let permission = match existing {
            Permission::Undetermined => {
                self.host.request_permission().await.unwrap_or_else(|e| {
                    warn!(error = %e, "notification permission request failed");
                    Permission::Denied
                })
            }
            other => other,
        };

        if permission == Permission::Granted {
            info!("notification permission granted");
            self.granted.store(true, Ordering::Release);
        } else {
            warn!("notification permission not granted; transitions will only be recorded");
        }
    }

    /// Ask the host again without prompting.
    async fn recheck(&self) -> bool {
        match self.host.check_permission().await {
            Ok(Permission::Granted) => {
                info!("notification permission granted");
                self.granted.store(true, Ordering::Release);
                true
            }
            Ok(permission) => {
                debug!(?permission, "notification permission still not granted");
                false
            }
            Err(e) => {
                warn!(error = %e, "could not check notification permission");
                false
            }
        }
    }
}

#[async_trait]
impl NotificationGateway for HostNotifier {
    async fn ensure_permission(&self) -> bool {
        if self.granted.load(Ordering::Acquire) {
            return true;
        }
        if !self.setup.initialized() {
            self.setup.get_or_init(|| self.first_resolution()).await;
            return self.granted.load(Ordering::Acquire);
        }
        self.recheck().await
    }

    fn notifications_enabled(&self) -> Option<bool> {
        if self.granted.load(Ordering::Acquire) {
            Some(true)
        } else if self.setup.initialized() {
            Some(false)
        } else {
            None
        }
    }

    async fn notify(&self, level: &Level, description: &str) {
        if !self.ensure_permission().await {
            warn!(%level, "notification dropped: permission not granted");
            return;
        }

        let notification = Notification::for_transition(level, description, self.options);
        match self.host.schedule(&notification).await {
            Ok(()) => debug!(title = %notification.title, "notification scheduled"),
            Err(e) => warn!(%level, error = %e, "failed to schedule notification"),
        }
    }
}

/// Gateway for hosts without a notification capability.
#[derive(Debug)]
pub struct DisabledNotifier {
    reason: String,
    reported: AtomicBool,
}

impl DisabledNotifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            reported: AtomicBool::new(false),
        }
    }

    /// Why notifications are unavailable.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl NotificationGateway for DisabledNotifier {
    async fn ensure_permission(&self) -> bool {
        if !self.reported.swap(true, Ordering::Relaxed) {
            warn!(reason = %self.reason, "notifications unavailable");
        }
        false
    }

    fn notifications_enabled(&self) -> Option<bool> {
        Some(false)
    }

    async fn notify(&self, level: &Level, description: &str) {
        debug!(%level, description, "notifications disabled; transition not announced");
    }
}

/// A [`NotificationHost`] that forwards notifications into a channel.
///
/// Useful when the embedding application renders notifications itself.
/// Permission starts out granted and can be changed with
/// [`ChannelHost::set_permission`].
#[derive(Debug)]
pub struct ChannelHost {
    sender: mpsc::Sender<Notification>,
    permission: RwLock<Permission>,
}

impl ChannelHost {
    /// Create a host and the receiver its notifications arrive on.
    pub fn create(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(buffer);
        let host = Self {
            sender,
            permission: RwLock::new(Permission::Granted),
        };
        (host, receiver)
    }

    /// Builder-style variant of [`ChannelHost::set_permission`].
    pub fn with_permission(self, permission: Permission) -> Self {
        self.set_permission(permission);
        self
    }

    /// Change the permission the host reports.
    pub fn set_permission(&self, permission: Permission) {
        *self.permission.write() = permission;
    }
}

#[async_trait]
impl NotificationHost for ChannelHost {
    async fn check_permission(&self) -> Result<Permission, HostError> {
        Ok(*self.permission.read())
    }

    async fn request_permission(&self) -> Result<Permission, HostError> {
        let mut permission = self.permission.write();
        if *permission == Permission::Undetermined {
            *permission = Permission::Granted;
        }
        Ok(*permission)
    }

    async fn configure_channel(&self, _channel: &ChannelConfig) -> Result<(), HostError> {
        Ok(())
    }

    async fn schedule(&self, notification: &Notification) -> Result<(), HostError> {
        if *self.permission.read() != Permission::Granted {
            return Err(HostError::PermissionDenied);
        }

        // Best effort: don't block the monitor if the consumer falls behind
        self.sender
            .try_send(notification.clone())
            .map_err(|e| HostError::Failed(e.to_string()))
    }
}
