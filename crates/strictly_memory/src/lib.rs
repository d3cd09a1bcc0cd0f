//! Strictly Memory - type-safe memory-match game logic
//!
//! Pure game logic with no I/O: a shuffled deck of paired symbols, a round
//! state machine driven by card selections, and cancellable deferred
//! effects for hiding mismatches and ticking the clock.
//!
//! # Architecture
//!
//! - **Deck**: paired symbols dealt with an injectable random source
//! - **Round**: `idle → running → complete`, per card `hidden → revealed → matched`
//! - **Game**: owns the live round and the round generation counter
//! - **Tasks**: deferred work tagged with the round that scheduled it
//! - **Snapshot**: read-only view for rendering collaborators
//!
//! # Example
//!
//! ```
//! use strictly_memory::{GridConfig, MatchGame, Scheduler};
//! use std::time::{Duration, Instant};
//!
//! # fn example() -> Result<(), strictly_memory::GameError> {
//! let mut game = MatchGame::seeded(7, GridConfig::with_rows(4))?;
//! let mut scheduler = Scheduler::new();
//!
//! let now = Instant::now();
//! for index in [0, 1] {
//!     let turn = game.select_at(index, now);
//!     if let Some(effect) = turn.effect {
//!         scheduler.schedule(effect, now);
//!     }
//! }
//!
//! for task in scheduler.due(now + Duration::from_secs(1)) {
//!     game.run_task(task);
//! }
//! assert!(game.round().revealed().is_empty());
//!
//! // A new deal makes earlier tasks stale; drop them from the queue too.
//! game.restart();
//! scheduler.retain_round(game.round_id());
//! assert!(scheduler.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod deck;
mod error;
mod game;
mod grid;
mod invariants;
mod round;
mod scheduler;
mod snapshot;
mod symbol;
mod task;

pub use deck::Deck;
pub use error::GameError;
pub use game::{MatchGame, Turn};
pub use grid::{COLUMNS, GridConfig, GridSize};
pub use invariants::{
    Invariant, InvariantSet, InvariantViolation, MatchCountConsistent, MatchedIsEven,
    RevealedAtMostTwo, RevealedDisjointFromMatched, RoundInvariants,
};
pub use round::{Ignored, RoundPhase, RoundState, Selection};
pub use scheduler::Scheduler;
pub use snapshot::{CardView, Snapshot};
pub use symbol::{PALETTE, Symbol};
pub use task::{Effect, MISMATCH_DELAY, RoundId, TICK_PERIOD, Task, TaskKind, TaskOutcome};
