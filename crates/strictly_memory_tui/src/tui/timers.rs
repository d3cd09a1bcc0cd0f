//! Tokio timer host for the game's deferred tasks.
//!
//! Each scheduled effect becomes a spawned task that sleeps and then sends
//! its [`Task`] back over a channel. The event loop owns the game, so the
//! spawned tasks never touch game state themselves.

use super::app::TimerCommand;
use std::collections::HashMap;
use strictly_memory::{Effect, Task};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at, sleep};
use tracing::{debug, instrument};

/// Spawned timers, keyed by the task they deliver.
#[derive(Debug)]
pub struct Timers {
    tx: mpsc::UnboundedSender<Task>,
    handles: HashMap<Task, JoinHandle<()>>,
}

impl Timers {
    /// Creates a host delivering fired tasks to `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Task>) -> Self {
        Self {
            tx,
            handles: HashMap::new(),
        }
    }

    /// Applies a command from the app.
    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Schedule(effect) => self.schedule(effect),
            TimerCommand::Stop(task) => self.stop(task),
            TimerCommand::CancelAll => self.cancel_all(),
        }
    }

    /// Spawns the timer for `effect`.
    #[instrument(skip(self))]
    pub fn schedule(&mut self, effect: Effect) {
        let tx = self.tx.clone();
        let task = effect.task();
        let handle = match effect.period() {
            Some(period) => tokio::spawn(async move {
                let start = tokio::time::Instant::now() + period;
                let mut ticker = interval_at(start, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    if tx.send(task).is_err() {
                        break;
                    }
                }
            }),
            None => {
                let delay = effect.delay();
                tokio::spawn(async move {
                    sleep(delay).await;
                    // The receiver is gone only while shutting down.
                    let _ = tx.send(task);
                })
            }
        };
        if let Some(previous) = self.handles.insert(task, handle) {
            previous.abort();
        }
    }

    /// Stops the timer delivering `task`.
    pub fn stop(&mut self, task: Task) {
        if let Some(handle) = self.handles.remove(&task) {
            debug!(?task, "Stopping timer");
            handle.abort();
        }
    }

    /// Aborts every timer.
    pub fn cancel_all(&mut self) {
        if self.is_empty() {
            return;
        }
        debug!(count = self.handles.len(), "Cancelling all timers");
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    /// Forgets timers whose task has already finished.
    pub fn reap(&mut self) {
        self.handles.retain(|_, handle| !handle.is_finished());
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no timer is live.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
