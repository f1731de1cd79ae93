//! The poll-compare-react loop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use statuswatch_client::{HttpStatusClient, StatusSource};
use statuswatch_types::{HistoryEntry, UnknownStatusPolicy};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::handle::{MonitorHandle, MonitorView};
use crate::notify::{
    gateway_for, DisabledNotifier, HostNotifier, NotificationGateway, NotificationHost,
};
use crate::state::MonitorState;
use crate::ticker::{IntervalTicker, Ticker};

/// Time between polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// A status monitor, ready to be started.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use statuswatch_client::HttpStatusClient;
/// use statuswatch_monitor::Monitor;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpStatusClient::builder()
///         .endpoint("http://localhost:8080/status")
///         .build()?;
///
///     let handle = Monitor::builder(client)
///         .interval(Duration::from_secs(5))
///         .build()
///         .start();
///
///     let mut views = handle.subscribe();
///     while views.changed().await.is_ok() {
///         println!("{}", views.borrow().status_line());
///     }
///     Ok(())
/// }
/// ```
pub struct Monitor {
    source: Box<dyn StatusSource>,
    gateway: Arc<dyn NotificationGateway>,
    ticker: Option<Box<dyn Ticker>>,
    interval: Duration,
    policy: UnknownStatusPolicy,
}

impl Monitor {
    pub fn builder(source: impl StatusSource + 'static) -> MonitorBuilder {
        MonitorBuilder {
            source: Box::new(source),
            gateway: None,
            ticker: None,
            interval: None,
            policy: UnknownStatusPolicy::default(),
        }
    }

    /// Compose an HTTP monitor from configuration.
    ///
    /// `host` is the platform's notification capability; without one,
    /// transitions are recorded but never announced.
    pub fn from_config(
        config: &MonitorConfig,
        host: Option<Arc<dyn NotificationHost>>,
    ) -> Result<Self, MonitorError> {
        let client = HttpStatusClient::builder()
            .endpoint(config.endpoint.clone())
            .timeout(config.request_timeout())
            .build()?;

        let gateway: Arc<dyn NotificationGateway> = match host {
            Some(host) => Arc::new(
                HostNotifier::for_platform(host, config.platform)
                    .with_channel_config(config.channel.clone())
                    .with_delivery(config.delivery),
            ),
            None => gateway_for(config.platform, None),
        };

        Ok(Self::builder(client)
            .gateway(gateway)
            .interval(config.poll_interval())
            .unknown_status(config.unknown_status)
            .build())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the loop on the current tokio runtime.
    ///
    /// Notifications go out from a separate task, in transition order. That
    /// task resolves notification permission first, so neither the first poll
    /// nor later ones wait on a permission prompt.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (view_tx, view_rx) = watch::channel(MonitorView {
            running: true,
            ..MonitorView::default()
        });
        let alive = Arc::new(AtomicBool::new(true));

        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        tokio::spawn(announce(self.gateway.clone(), notify_rx, view_tx.clone()));

        let ticker: Box<dyn Ticker> = match self.ticker {
            Some(ticker) => ticker,
            None => Box::new(IntervalTicker::new(self.interval)),
        };

        info!(
            source = self.source.description(),
            interval_ms = self.interval.as_millis() as u64,
            "starting status monitor"
        );

        let poll_loop = PollLoop {
            source: self.source,
            notify_tx,
            ticker,
            state: MonitorState::new(self.policy),
            view: MonitorView {
                running: true,
                ..MonitorView::default()
            },
            view_tx,
            stop_rx,
            alive: alive.clone(),
        };
        let task = tokio::spawn(poll_loop.run());

        MonitorHandle {
            stop_tx,
            alive,
            view_rx,
            task: Some(task),
        }
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("source", &self.source.description())
            .field("gateway", &self.gateway)
            .field("custom_ticker", &self.ticker.is_some())
            .field("interval", &self.interval)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder for [`Monitor`].
pub struct MonitorBuilder {
    source: Box<dyn StatusSource>,
    gateway: Option<Arc<dyn NotificationGateway>>,
    ticker: Option<Box<dyn Ticker>>,
    interval: Option<Duration>,
    policy: UnknownStatusPolicy,
}

impl MonitorBuilder {
    /// Where transitions are announced. Defaults to a gateway that only logs.
    pub fn gateway(mut self, gateway: Arc<dyn NotificationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the polling interval.
    ///
    /// Defaults to 5 seconds. Ignored when a custom ticker is set.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Drive polling from a custom schedule instead of a fixed interval.
    pub fn ticker(mut self, ticker: impl Ticker + 'static) -> Self {
        self.ticker = Some(Box::new(ticker));
        self
    }

    pub fn unknown_status(mut self, policy: UnknownStatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Monitor {
        Monitor {
            source: self.source,
            gateway: self.gateway.unwrap_or_else(|| {
                Arc::new(DisabledNotifier::new("no notification gateway configured"))
            }),
            ticker: self.ticker,
            interval: self.interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            policy: self.policy,
        }
    }
}

impl fmt::Debug for MonitorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorBuilder")
            .field("source", &self.source.description())
            .field("interval", &self.interval)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// State owned by the spawned loop task. Nothing else writes to it.
struct PollLoop {
    source: Box<dyn StatusSource>,
    notify_tx: mpsc::UnboundedSender<HistoryEntry>,
    ticker: Box<dyn Ticker>,
    state: MonitorState,
    view: MonitorView,
    view_tx: watch::Sender<MonitorView>,
    stop_rx: watch::Receiver<bool>,
    alive: Arc<AtomicBool>,
}

impl PollLoop {
    async fn run(mut self) {
        loop {
            let ticked = tokio::select! {
                biased;
                _ = self.stop_rx.changed() => false,
                ticked = self.ticker.tick() => ticked,
            };
            if !ticked || !self.is_alive() {
                break;
            }

            // Teardown abandons an in-flight fetch; its result is never seen.
            let result = tokio::select! {
                biased;
                _ = self.stop_rx.changed() => break,
                result = self.source.fetch() => result,
            };
            if !self.is_alive() {
                debug!("monitor stopped during fetch, discarding result");
                break;
            }

            self.view.polls += 1;
            match result {
                Ok(snapshot) => {
                    self.view.last_error = None;
                    if let Some(entry) = self.state.observe(&snapshot) {
                        info!(
                            level = %entry.level,
                            description = %entry.description,
                            "status transition"
                        );
                        if self.notify_tx.send(entry).is_err() {
                            warn!("notification task is gone, transition not announced");
                        }
                    }
                }
                Err(e) => {
                    self.view.failures += 1;
                    warn!(
                        source = self.source.description(),
                        error = %e,
                        "status poll failed"
                    );
                    self.view.last_error = Some(e.to_string());
                }
            }

            self.view.level = self.state.current_level().cloned();
            self.view.history = self.state.history().entries();
            self.publish();
        }

        self.view_tx.send_modify(|view| view.running = false);
        debug!(polls = self.view.polls, "status monitor stopped");
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Publish the poll fields. `notifications_enabled` belongs to the
    /// announce task and is left alone.
    fn publish(&self) {
        let view = &self.view;
        self.view_tx.send_modify(|published| {
            published.level = view.level.clone();
            published.history = view.history.clone();
            published.polls = view.polls;
            published.failures = view.failures;
            published.last_error = view.last_error.clone();
        });
    }
}

/// Deliver transitions one at a time until the loop hangs up.
///
/// Keeps the view's `notifications_enabled` in step with the gateway.
async fn announce(
    gateway: Arc<dyn NotificationGateway>,
    mut transitions: mpsc::UnboundedReceiver<HistoryEntry>,
    view_tx: watch::Sender<MonitorView>,
) {
    gateway.ensure_permission().await;
    publish_enabled(&view_tx, gateway.notifications_enabled());

    while let Some(entry) = transitions.recv().await {
        gateway.notify(&entry.level, &entry.description).await;
        publish_enabled(&view_tx, gateway.notifications_enabled());
    }
}

fn publish_enabled(view_tx: &watch::Sender<MonitorView>, enabled: Option<bool>) {
    view_tx.send_if_modified(|view| {
        if view.notifications_enabled == enabled {
            return false;
        }
        view.notifications_enabled = enabled;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use statuswatch_client::FetchError;
    use statuswatch_types::StatusSnapshot;

    use crate::notify::ChannelHost;
    use crate::platform::HostPlatform;

    #[derive(Debug)]
    struct Fixed;

    #[async_trait]
    impl StatusSource for Fixed {
        async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
            Ok(StatusSnapshot::with_timestamp("ok", "fine", 0))
        }

        fn description(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_builder_defaults() {
        let monitor = Monitor::builder(Fixed).build();

        assert_eq!(monitor.interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(monitor.policy, UnknownStatusPolicy::TreatAsOk);
        assert!(monitor.ticker.is_none());
    }

    #[test]
    fn test_debug_names_source() {
        let monitor = Monitor::builder(Fixed)
            .interval(Duration::from_secs(1))
            .build();
        let debug = format!("{:?}", monitor);

        assert!(debug.contains("fixed"));
        assert!(debug.contains("DisabledNotifier"));
    }

    #[test]
    fn test_from_config() {
        let config = MonitorConfig {
            poll_interval_ms: 750,
            unknown_status: UnknownStatusPolicy::Distinct,
            platform: HostPlatform::Android,
            ..MonitorConfig::default()
        };
        let (host, _rx) = ChannelHost::create(4);

        let monitor = Monitor::from_config(&config, Some(Arc::new(host))).unwrap();

        assert_eq!(monitor.interval(), Duration::from_millis(750));
        assert_eq!(monitor.policy, UnknownStatusPolicy::Distinct);
        assert!(format!("{:?}", monitor.gateway).contains("HostNotifier"));
    }

    #[test]
    fn test_from_config_rejects_bad_endpoint() {
        let config = MonitorConfig {
            endpoint: "ftp://example.com/status".to_string(),
            ..MonitorConfig::default()
        };

        let err = Monitor::from_config(&config, None).unwrap_err();
        assert!(matches!(err, MonitorError::Client(FetchError::InvalidEndpoint(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ticker_polls_on_interval() {
        let handle = Monitor::builder(Fixed)
            .interval(Duration::from_secs(5))
            .build()
            .start();
        let mut views = handle.subscribe();

        views.wait_for(|v| v.polls == 1).await.unwrap();

        let before = tokio::time::Instant::now();
        views.wait_for(|v| v.polls == 2).await.unwrap();
        assert_eq!(before.elapsed(), Duration::from_secs(5));
        assert_eq!(handle.view().notifications_enabled, Some(false));

        handle.shutdown().await;
    }
}
