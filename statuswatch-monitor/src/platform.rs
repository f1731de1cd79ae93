//! Host platform selection and process control.
//!
//! Platform differences are resolved here, at composition time, so the
//! monitor loop itself never branches on the platform.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::HostError;

/// The platform the monitor is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Android,
    Ios,
    #[default]
    Desktop,
}

impl HostPlatform {
    /// Whether notifications must be posted to a pre-configured channel.
    pub fn needs_notification_channel(self) -> bool {
        matches!(self, HostPlatform::Android)
    }

    /// Whether the application may terminate itself.
    pub fn supports_exit(self) -> bool {
        matches!(self, HostPlatform::Android)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostPlatform::Android => "Android",
            HostPlatform::Ios => "iOS",
            HostPlatform::Desktop => "desktop",
        })
    }
}

/// Application lifecycle capabilities provided by the host.
pub trait ProcessHost: Send + Sync {
    /// Terminate the application.
    fn exit_app(&self);

    /// Show a blocking message to the user.
    fn alert(&self, title: &str, message: &str);
}

/// Handle the user's "close app" action.
///
/// On platforms that allow it the host exits the application. Elsewhere the
/// user is told the action is unsupported and
/// [`HostError::UnsupportedPlatform`] is returned. Polling is not affected.
pub fn close_app(platform: HostPlatform, host: &dyn ProcessHost) -> Result<(), HostError> {
    if platform.supports_exit() {
        info!(%platform, "exiting application");
        host.exit_app();
        return Ok(());
    }

    let message = format!("This action is not supported on {}.", platform);
    warn!(%platform, "close requested on a platform without exit support");
    host.alert("Close App", &message);
    Err(HostError::UnsupportedPlatform(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeProcess {
        exits: Mutex<u32>,
        alerts: Mutex<Vec<(String, String)>>,
    }

    impl ProcessHost for FakeProcess {
        fn exit_app(&self) {
            *self.exits.lock() += 1;
        }

        fn alert(&self, title: &str, message: &str) {
            self.alerts
                .lock()
                .push((title.to_string(), message.to_string()));
        }
    }

    #[test]
    fn android_exits() {
        let host = FakeProcess::default();
        close_app(HostPlatform::Android, &host).unwrap();

        assert_eq!(*host.exits.lock(), 1);
        assert!(host.alerts.lock().is_empty());
    }

    #[test]
    fn ios_shows_rejection() {
        let host = FakeProcess::default();
        let err = close_app(HostPlatform::Ios, &host).unwrap_err();

        assert!(matches!(err, HostError::UnsupportedPlatform(_)));
        assert_eq!(*host.exits.lock(), 0);
        assert_eq!(
            host.alerts.lock().as_slice(),
            &[(
                "Close App".to_string(),
                "This action is not supported on iOS.".to_string()
            )]
        );
    }

    #[test]
    fn desktop_shows_rejection() {
        let host = FakeProcess::default();
        assert!(close_app(HostPlatform::Desktop, &host).is_err());
        assert_eq!(host.alerts.lock().len(), 1);
    }

    #[test]
    fn channel_requirement() {
        assert!(HostPlatform::Android.needs_notification_channel());
        assert!(!HostPlatform::Ios.needs_notification_channel());
        assert!(!HostPlatform::Desktop.needs_notification_channel());
    }
}
