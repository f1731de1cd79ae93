//! Handle to a running monitor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use statuswatch_types::{HistoryEntry, Level};

/// What the presentation layer renders.
///
/// A fresh view is published after every poll; presentation code only reads
/// it and never mutates monitor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorView {
    /// The last recorded level, `None` until the first successful poll.
    pub level: Option<Level>,
    /// Transitions, most recent first.
    pub history: Vec<HistoryEntry>,
    /// Completed polls, successful or not.
    pub polls: u64,
    /// Polls that ended in a transport or decode error.
    pub failures: u64,
    /// Error from the most recent failed poll, cleared by the next success.
    pub last_error: Option<String>,
    /// Whether transitions are announced to the user. `None` while
    /// notification permission is still being resolved; `Some(false)` when it
    /// was refused or the host cannot notify.
    pub notifications_enabled: Option<bool>,
    /// `false` once the loop has exited.
    pub running: bool,
}

impl MonitorView {
    /// Status line for the current level: "OK", "Inspect", "Warning!", or a
    /// placeholder before the first poll.
    pub fn status_line(&self) -> &str {
        self.level.as_ref().map_or("Waiting for status", Level::label)
    }

    /// Message to show when notifications are off, if they are.
    pub fn notification_notice(&self) -> Option<&'static str> {
        match self.notifications_enabled {
            Some(false) => {
                Some("Notifications are off; status changes are only recorded here.")
            }
            _ => None,
        }
    }
}

/// Controls a monitor started with [`Monitor::start`](crate::Monitor::start).
///
/// Dropping the handle stops the monitor. A poll that is still in flight at
/// that point is abandoned and its result discarded.
#[derive(Debug)]
pub struct MonitorHandle {
    pub(crate) stop_tx: watch::Sender<bool>,
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) view_rx: watch::Receiver<MonitorView>,
    pub(crate) task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the loop to stop. Returns immediately.
    pub fn stop(&self) {
        self.alive.store(false, Ordering::SeqCst);
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// The most recently published view.
    pub fn view(&self) -> MonitorView {
        self.view_rx.borrow().clone()
    }

    /// A receiver that is notified whenever a new view is published.
    pub fn subscribe(&self) -> watch::Receiver<MonitorView> {
        self.view_rx.clone()
    }

    /// Whether the monitor has not been told to stop.
    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
