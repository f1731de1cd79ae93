//! Tick schedules that drive the monitor loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// A source of ticks.
///
/// The monitor awaits one tick, runs a full poll, then awaits the next, so a
/// slow poll delays later ticks instead of overlapping with them.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick. Returns `false` once the schedule has ended.
    async fn tick(&mut self) -> bool;
}

/// Fixed-period ticker backed by the tokio timer.
///
/// The first tick fires immediately. Ticks missed while a poll was running
/// are skipped, not replayed.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Create a ticker with the given period.
    ///
    /// Must be called from within a tokio runtime. A zero period is raised to
    /// one millisecond.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// Ticker driven by explicit [`TickTrigger::fire`] calls.
///
/// Lets a host drive polling from its own scheduler, and lets tests step the
/// monitor deterministically. Ticks fired while the previous poll was still
/// running collapse into one, as with [`IntervalTicker`]. The schedule ends
/// when every trigger is dropped and any pending tick is consumed.
#[derive(Debug)]
pub struct ManualTicker {
    receiver: mpsc::UnboundedReceiver<()>,
}

impl ManualTicker {
    /// Create a ticker and the trigger that fires it.
    pub fn create() -> (TickTrigger, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (TickTrigger { sender }, Self { receiver })
    }
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        if self.receiver.recv().await.is_none() {
            return false;
        }
        // Skip the rest of the backlog.
        while self.receiver.try_recv().is_ok() {}
        true
    }
}

/// Fires ticks on a [`ManualTicker`].
#[derive(Debug, Clone)]
pub struct TickTrigger {
    sender: mpsc::UnboundedSender<()>,
}

impl TickTrigger {
    /// Queue one tick. Returns `false` if the ticker is gone.
    pub fn fire(&self) -> bool {
        self.sender.send(()).is_ok()
    }
}
