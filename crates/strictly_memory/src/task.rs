//! Deferred work tagged with the round that requested it.
//!
//! A round never owns a timer. Instead, [`MatchGame`](crate::MatchGame)
//! hands the host an [`Effect`] describing what to run later and the host
//! hands the resulting [`Task`] back when it fires. The task carries the
//! [`RoundId`] of the round that asked for it, so a task that outlives its
//! round is recognised and dropped.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a mismatched pair stays face up.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(650);

/// Refresh period of the elapsed-time display.
pub const TICK_PERIOD: Duration = Duration::from_millis(400);

/// Identity of a dealt round. Increases with every deal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("round#{}", _0)]
pub struct RoundId(u64);

impl RoundId {
    /// The id given to the first round.
    pub const FIRST: RoundId = RoundId(1);

    /// The id of the round dealt after this one.
    pub fn next(self) -> Self {
        RoundId(self.0.wrapping_add(1))
    }

    /// Raw generation number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Kind of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TaskKind {
    /// Turn a showing mismatch face down.
    HideMismatch,
    /// Refresh the elapsed-time display.
    Tick,
}

/// A unit of deferred work, bound to the round that scheduled it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new,
)]
pub struct Task {
    /// Round that scheduled the task.
    pub round: RoundId,
    /// What to do when it fires.
    pub kind: TaskKind,
}

/// Deferred work requested by a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Fire `task` every `period` until the game reports it finished.
    StartTicking {
        /// The tick task.
        task: Task,
        /// Time between ticks.
        period: Duration,
    },
    /// Fire `task` once after `delay`.
    HideLater {
        /// The hide task.
        task: Task,
        /// Time until it fires.
        delay: Duration,
    },
}

impl Effect {
    /// The task to run.
    pub fn task(&self) -> Task {
        match self {
            Effect::StartTicking { task, .. } | Effect::HideLater { task, .. } => *task,
        }
    }

    /// Time until the first firing.
    pub fn delay(&self) -> Duration {
        match self {
            Effect::StartTicking { period, .. } => *period,
            Effect::HideLater { delay, .. } => *delay,
        }
    }

    /// Repeat period, for periodic effects.
    pub fn period(&self) -> Option<Duration> {
        match self {
            Effect::StartTicking { period, .. } => Some(*period),
            Effect::HideLater { .. } => None,
        }
    }
}

/// What running a task did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// A mismatched pair was turned face down.
    Hidden {
        /// The pair that was hidden.
        pair: [usize; 2],
    },
    /// The clock is running; redraw and keep ticking.
    Ticked,
    /// The task belongs to the live round but has nothing left to do.
    /// Periodic tasks should stop.
    Finished,
    /// The task belongs to a superseded round and was dropped.
    Stale,
}

impl TaskOutcome {
    /// Whether a periodic task should keep firing.
    pub fn keep_going(&self) -> bool {
        matches!(self, TaskOutcome::Ticked)
    }
}
