//! Example: Watching a status endpoint from the terminal
//!
//! Polls the configured endpoint, prints every published view, and prints
//! notifications as they would be shown to the user.
//!
//! Type `close` and press enter to try the platform's "close app" action;
//! Ctrl-C stops the monitor.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: http://localhost:8080/status every 5s
//! cargo run --example console_monitor
//!
//! # With a config file and an override
//! STATUSWATCH_POLL_INTERVAL_MS=1000 cargo run --example console_monitor -- statuswatch.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use statuswatch_monitor::{close_app, ChannelHost, Monitor, MonitorConfig, ProcessHost};

/// Prints alerts instead of showing dialogs.
struct ConsoleProcess;

impl ProcessHost for ConsoleProcess {
    fn exit_app(&self) {
        println!("Exiting.");
        std::process::exit(0);
    }

    fn alert(&self, title: &str, message: &str) {
        println!("[{}] {}", title, message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = MonitorConfig::load(path.as_deref()).context("Failed to load configuration")?;
    println!(
        "Watching {} every {}ms on {}",
        config.endpoint, config.poll_interval_ms, config.platform
    );

    let (host, mut notifications) = ChannelHost::create(16);
    let handle = Monitor::from_config(&config, Some(Arc::new(host)))?.start();
    let mut views = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                println!("Status: {}", view.status_line());
                if let Some(error) = &view.last_error {
                    println!("  last poll failed: {}", error);
                }
                if let Some(notice) = view.notification_notice() {
                    println!("  {}", notice);
                }
                for entry in &view.history {
                    println!("  {}", entry);
                }
            }
            Some(notification) = notifications.recv() => {
                println!(">> {}: {}", notification.title, notification.body);
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim() == "close" => {
                        if let Err(e) = close_app(config.platform, &ConsoleProcess) {
                            println!("Close failed: {}", e);
                        }
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}
