//! Deterministic timer queue for hosts without an async runtime.
//!
//! The queue never reads the system clock: callers pass `now` in, which
//! makes it the natural driver for tests.

use crate::task::{Effect, RoundId, Task};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct Entry {
    due: Instant,
    task: Task,
    period: Option<Duration>,
}

/// Pending deferred tasks ordered by deadline.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `effect`, measured from `now`.
    #[instrument(skip(self, now))]
    pub fn schedule(&mut self, effect: Effect, now: Instant) {
        self.entries.push(Entry {
            due: now + effect.delay(),
            task: effect.task(),
            period: effect.period(),
        });
        debug!(pending = self.entries.len(), "Task scheduled");
    }

    /// Removes and returns every task due at `now`, earliest first.
    ///
    /// Periodic tasks are re-armed one period after `now`, so a late call
    /// fires each of them once rather than catching up.
    pub fn due(&mut self, now: Instant) -> Vec<Task> {
        let (mut fired, pending): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;
        fired.sort_by_key(|entry| entry.due);

        for entry in &fired {
            if let Some(period) = entry.period {
                self.entries.push(Entry {
                    due: now + period,
                    task: entry.task,
                    period: Some(period),
                });
            }
        }

        fired.into_iter().map(|entry| entry.task).collect()
    }

    /// Drops every pending task of `round`.
    #[instrument(skip(self))]
    pub fn cancel_round(&mut self, round: RoundId) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.task.round != round);
        debug!(dropped = before - self.entries.len(), "Cancelled round tasks");
    }

    /// Drops every pending task not belonging to `current`.
    ///
    /// Call after dealing a new round. Periodic tasks re-arm forever
    /// otherwise, even though the game reports them stale.
    #[instrument(skip(self))]
    pub fn retain_round(&mut self, current: RoundId) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.task.round == current);
        debug!(dropped = before - self.entries.len(), "Pruned superseded rounds");
    }

    /// Drops every pending copy of `task`.
    pub fn cancel(&mut self, task: Task) {
        self.entries.retain(|entry| entry.task != task);
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{MISMATCH_DELAY, TICK_PERIOD, TaskKind};

    fn hide(round: RoundId) -> Effect {
        Effect::HideLater {
            task: Task::new(round, TaskKind::HideMismatch),
            delay: MISMATCH_DELAY,
        }
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        scheduler.schedule(hide(RoundId::FIRST), t0);

        assert!(scheduler.due(t0 + Duration::from_millis(649)).is_empty());
        let fired = scheduler.due(t0 + MISMATCH_DELAY);
        assert_eq!(fired, vec![Task::new(RoundId::FIRST, TaskKind::HideMismatch)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_periodic_rearms() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        scheduler.schedule(
            Effect::StartTicking {
                task: Task::new(RoundId::FIRST, TaskKind::Tick),
                period: TICK_PERIOD,
            },
            t0,
        );

        let t1 = t0 + TICK_PERIOD;
        assert_eq!(scheduler.due(t1).len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t1 + TICK_PERIOD));
        assert_eq!(scheduler.due(t1 + TICK_PERIOD * 5).len(), 1);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_round_keeps_others() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        scheduler.schedule(hide(RoundId::FIRST), t0);
        scheduler.schedule(hide(RoundId::FIRST.next()), t0);

        scheduler.cancel_round(RoundId::FIRST);
        let fired = scheduler.due(t0 + MISMATCH_DELAY);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].round, RoundId::FIRST.next());
    }

    #[test]
    fn test_retain_round_drops_older_ticks() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        let mut round = RoundId::FIRST;
        for _ in 0..10 {
            scheduler.schedule(
                Effect::StartTicking {
                    task: Task::new(round, TaskKind::Tick),
                    period: TICK_PERIOD,
                },
                t0,
            );
            round = round.next();
            scheduler.retain_round(round);
        }
        assert!(scheduler.is_empty());

        scheduler.schedule(hide(round), t0);
        scheduler.retain_round(round);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_due_orders_by_deadline() {
        let mut scheduler = Scheduler::new();
        let t0 = Instant::now();
        scheduler.schedule(hide(RoundId::FIRST.next()), t0 + Duration::from_millis(10));
        scheduler.schedule(hide(RoundId::FIRST), t0);

        let fired = scheduler.due(t0 + Duration::from_secs(1));
        assert_eq!(fired[0].round, RoundId::FIRST);
        assert_eq!(fired[1].round, RoundId::FIRST.next());
    }
}
