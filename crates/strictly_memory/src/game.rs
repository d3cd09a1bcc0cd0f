//! The game controller: one live round at a time.
//!
//! [`MatchGame`] owns the random source, the current [`RoundState`] and
//! the [`RoundId`] generation counter. Dealing a new round bumps the
//! generation, which turns every task handed out for earlier rounds into a
//! no-op.

use crate::deck::Deck;
use crate::error::GameError;
use crate::grid::GridConfig;
use crate::round::{RoundState, Selection};
use crate::snapshot::Snapshot;
use crate::task::{Effect, MISMATCH_DELAY, RoundId, TICK_PERIOD, Task, TaskKind, TaskOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of a player's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// What happened to the round.
    pub selection: Selection,
    /// Deferred work the host must schedule, if any.
    pub effect: Option<Effect>,
}

/// A memory-match game.
#[derive(Debug)]
pub struct MatchGame<R = StdRng> {
    rng: R,
    grid: GridConfig,
    round_id: RoundId,
    round: RoundState,
}

impl MatchGame<StdRng> {
    /// Creates a game whose decks are determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `grid` cannot be dealt.
    pub fn seeded(seed: u64, grid: GridConfig) -> Result<Self, GameError> {
        Self::with_rng(StdRng::seed_from_u64(seed), grid)
    }

    /// Creates a game seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `grid` cannot be dealt.
    pub fn from_entropy(grid: GridConfig) -> Result<Self, GameError> {
        Self::with_rng(StdRng::from_os_rng(), grid)
    }
}

impl<R: Rng> MatchGame<R> {
    /// Creates a game drawing shuffles from `rng` and deals the first round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `grid` cannot be dealt.
    #[instrument(skip(rng))]
    pub fn with_rng(mut rng: R, grid: GridConfig) -> Result<Self, GameError> {
        let deck = Deck::deal(grid, &mut rng)?;
        info!(round = %RoundId::FIRST, cards = deck.len(), "Dealt first round");
        Ok(Self {
            rng,
            grid,
            round_id: RoundId::FIRST,
            round: RoundState::new(deck),
        })
    }

    /// Deals a fresh round on `grid`, replacing the current one.
    ///
    /// Every task handed out for earlier rounds becomes stale. On error
    /// the current round is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `grid` cannot be dealt.
    #[instrument(skip(self), fields(previous = %self.round_id))]
    pub fn new_round(&mut self, grid: GridConfig) -> Result<&RoundState, GameError> {
        let deck = Deck::deal(grid, &mut self.rng).inspect_err(|e| {
            warn!(error = %e, "Rejected grid, keeping current round");
        })?;

        self.round_id = self.round_id.next();
        self.grid = grid;
        self.round = RoundState::new(deck);
        info!(round = %self.round_id, rows = grid.rows(), "Dealt new round");
        Ok(&self.round)
    }

    /// Deals a fresh round on the current grid.
    pub fn restart(&mut self) -> &RoundState {
        let grid = self.grid;
        match self.new_round(grid) {
            Ok(_) => {}
            // The current grid was dealt once already.
            Err(e) => warn!(error = %e, "Current grid failed to re-deal"),
        }
        &self.round
    }
}

impl<R> MatchGame<R> {
    /// The live round.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Identity of the live round.
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// Grid of the live round.
    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    /// Selects the card at `index` now.
    pub fn select(&mut self, index: usize) -> Turn {
        self.select_at(index, Instant::now())
    }

    /// Selects the card at `index` at time `now`.
    ///
    /// Returns the [`Effect`] the host must schedule: the display tick
    /// when this selection started the clock, or the delayed hide when it
    /// produced a mismatch.
    #[instrument(skip(self, now), fields(round = %self.round_id))]
    pub fn select_at(&mut self, index: usize, now: Instant) -> Turn {
        let selection = self.round.select(index, now);
        let effect = match selection {
            Selection::Revealed {
                clock_started: true,
                ..
            } => Some(Effect::StartTicking {
                task: Task::new(self.round_id, TaskKind::Tick),
                period: TICK_PERIOD,
            }),
            Selection::Mismatched { .. } => Some(Effect::HideLater {
                task: Task::new(self.round_id, TaskKind::HideMismatch),
                delay: MISMATCH_DELAY,
            }),
            _ => None,
        };
        Turn { selection, effect }
    }

    /// Runs a task that has fired.
    ///
    /// Tasks from superseded rounds are dropped without touching state.
    #[instrument(skip(self), fields(current = %self.round_id))]
    pub fn run_task(&mut self, task: Task) -> TaskOutcome {
        if task.round != self.round_id {
            debug!("Dropping stale task");
            return TaskOutcome::Stale;
        }
        match task.kind {
            TaskKind::HideMismatch => match self.round.hide_mismatch() {
                Some(pair) => TaskOutcome::Hidden { pair },
                None => TaskOutcome::Finished,
            },
            TaskKind::Tick if self.round.is_running() => TaskOutcome::Ticked,
            TaskKind::Tick => TaskOutcome::Finished,
        }
    }

    /// Captures the live round for rendering now.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Instant::now())
    }

    /// Captures the live round for rendering at `now`.
    pub fn snapshot_at(&self, now: Instant) -> Snapshot {
        Snapshot::capture(self.round_id, self.grid.columns(), &self.round, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Ignored;

    fn game() -> MatchGame {
        MatchGame::seeded(11, GridConfig::with_rows(2)).unwrap()
    }

    /// Two positions holding different symbols.
    fn mismatched_pair(game: &MatchGame) -> (usize, usize) {
        let deck = game.round().deck();
        let first = deck.symbol_at(0).unwrap();
        let other = (1..deck.len())
            .find(|&i| deck.symbol_at(i).unwrap() != first)
            .unwrap();
        (0, other)
    }

    #[test]
    fn test_first_selection_starts_ticking() {
        let mut game = game();
        let turn = game.select_at(0, Instant::now());
        assert!(matches!(turn.effect, Some(Effect::StartTicking { .. })));
        let turn = game.select_at(0, Instant::now());
        assert_eq!(turn.selection, Selection::Ignored(Ignored::AlreadyRevealed));
        assert_eq!(turn.effect, None);
    }

    #[test]
    fn test_mismatch_requests_hide() {
        let mut game = game();
        let (a, b) = mismatched_pair(&game);
        let now = Instant::now();
        game.select_at(a, now);
        let turn = game.select_at(b, now);
        match turn.effect {
            Some(Effect::HideLater { task, delay }) => {
                assert_eq!(task.round, game.round_id());
                assert_eq!(delay, MISMATCH_DELAY);
                assert_eq!(game.run_task(task), TaskOutcome::Hidden { pair: [a, b] });
                assert_eq!(game.run_task(task), TaskOutcome::Finished);
            }
            other => panic!("expected hide effect, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_grid_keeps_round() {
        let mut game = game();
        let id = game.round_id();
        let before = game.round().clone();
        assert!(game.new_round(GridConfig::with_rows(3)).is_err());
        assert_eq!(game.round_id(), id);
        assert_eq!(game.round(), &before);
    }

    #[test]
    fn test_restart_bumps_generation() {
        let mut game = game();
        let id = game.round_id();
        game.restart();
        assert_eq!(game.round_id(), id.next());
        assert_eq!(game.grid(), GridConfig::with_rows(2));
    }
}
