//! Round state machine.
//!
//! A [`RoundState`] holds one deal and everything that happens to it:
//! which cards are face up, which pairs are confirmed, the move and match
//! counters and the elapsed-time clock. Every card moves
//! `hidden → revealed → {matched | hidden}`; the round moves
//! `idle → running → complete`.
//!
//! Time is always passed in, so the machine is fully deterministic.

use crate::deck::Deck;
use crate::invariants::{InvariantSet, RoundInvariants};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Lifecycle phase of a round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum RoundPhase {
    /// Dealt, no card selected yet. The clock has not started.
    Idle,
    /// At least one card selected, pairs remain.
    Running,
    /// Every pair matched. The clock is frozen.
    Complete,
}

/// Why a selection was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ignored {
    /// The index is not a position in the deck.
    OutOfRange,
    /// The card is part of a confirmed pair.
    AlreadyMatched,
    /// The card is already face up.
    AlreadyRevealed,
    /// Two mismatched cards are still showing.
    Locked,
}

/// What a selection did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing changed.
    Ignored(Ignored),
    /// The first card of a pair was turned up.
    Revealed {
        /// Position turned up.
        index: usize,
        /// Whether this selection started the round's clock.
        clock_started: bool,
    },
    /// The second card matched the first; both are now matched.
    Matched {
        /// The matched positions, in selection order.
        pair: [usize; 2],
        /// Whether this pair finished the round.
        complete: bool,
    },
    /// The second card did not match. Both stay up until hidden.
    Mismatched {
        /// The revealed positions, in selection order.
        pair: [usize; 2],
    },
}

impl Selection {
    /// Whether the selection changed any state.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Selection::Ignored(_))
    }
}

/// State of a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub(crate) deck: Deck,
    pub(crate) revealed: Vec<usize>,
    pub(crate) matched: BTreeSet<usize>,
    pub(crate) matched_count: usize,
    pub(crate) move_count: usize,
    pub(crate) started_at: Option<Instant>,
    pub(crate) finished_at: Option<Instant>,
    pub(crate) running: bool,
}

impl RoundState {
    /// Starts an idle round over `deck`.
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            revealed: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            matched_count: 0,
            move_count: 0,
            started_at: None,
            finished_at: None,
            running: false,
        }
    }

    /// The round's deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Face-up, unmatched positions in the order they were turned.
    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    /// Positions belonging to confirmed pairs.
    pub fn matched(&self) -> &BTreeSet<usize> {
        &self.matched
    }

    /// Number of confirmed pairs.
    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    /// Number of completed two-card attempts.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// When the first card was selected.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether every pair has been matched.
    pub fn is_complete(&self) -> bool {
        !self.deck.is_empty() && self.matched_count * 2 == self.deck.len()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoundPhase {
        if self.is_complete() {
            RoundPhase::Complete
        } else if self.started_at.is_some() {
            RoundPhase::Running
        } else {
            RoundPhase::Idle
        }
    }

    /// Whether input is locked behind a showing mismatch.
    pub fn is_locked(&self) -> bool {
        self.revealed.len() == 2
    }

    /// Time on the clock at `now`; frozen once the round is complete.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.finished_at) {
            (None, _) => Duration::ZERO,
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
        }
    }

    /// Whole seconds on the clock at `now`.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs()
    }

    /// Applies a player's selection of the card at `index`.
    ///
    /// Redundant or locked-out selections are reported as
    /// [`Selection::Ignored`] and leave the round untouched.
    #[instrument(skip(self, now), fields(moves = self.move_count, matches = self.matched_count))]
    pub fn select(&mut self, index: usize, now: Instant) -> Selection {
        let symbol = match self.deck.symbol_at(index) {
            Ok(symbol) => symbol,
            Err(e) => {
                debug!(error = %e, "Ignoring selection");
                return Selection::Ignored(Ignored::OutOfRange);
            }
        };
        if self.matched.contains(&index) {
            debug!("Card already matched");
            return Selection::Ignored(Ignored::AlreadyMatched);
        }
        if self.revealed.contains(&index) {
            debug!("Card already revealed");
            return Selection::Ignored(Ignored::AlreadyRevealed);
        }
        if self.is_locked() {
            debug!("Input locked while mismatch is showing");
            return Selection::Ignored(Ignored::Locked);
        }

        let clock_started = self.started_at.is_none();
        if clock_started {
            info!("First selection, starting clock");
            self.started_at = Some(now);
            self.running = true;
        }

        self.revealed.push(index);
        debug!(%symbol, "Card revealed");

        let selection = if self.is_locked() {
            let (first, second) = (self.revealed[0], self.revealed[1]);
            self.resolve_pair(first, second, now)
        } else {
            Selection::Revealed {
                index,
                clock_started,
            }
        };

        debug_assert!(RoundInvariants::check_all(self).is_ok());
        selection
    }

    /// Resolves the two face-up cards.
    fn resolve_pair(&mut self, first: usize, second: usize, now: Instant) -> Selection {
        self.move_count += 1;

        let same = self.deck.symbol_at(first).ok() == self.deck.symbol_at(second).ok();
        if !same {
            debug!(first, second, moves = self.move_count, "Mismatch");
            return Selection::Mismatched {
                pair: [first, second],
            };
        }

        self.revealed.clear();
        self.matched.insert(first);
        self.matched.insert(second);
        self.matched_count += 1;

        let complete = self.matched.len() == self.deck.len();
        if complete {
            self.running = false;
            self.finished_at = Some(now);
            info!(
                moves = self.move_count,
                seconds = self.elapsed_secs(now),
                "Round complete"
            );
        } else {
            debug!(first, second, matches = self.matched_count, "Match");
        }

        Selection::Matched {
            pair: [first, second],
            complete,
        }
    }

    /// Turns a showing mismatch face down, unlocking input.
    ///
    /// Returns the hidden pair, or `None` if no mismatch was showing.
    #[instrument(skip(self))]
    pub fn hide_mismatch(&mut self) -> Option<[usize; 2]> {
        let pair = match *self.revealed.as_slice() {
            [first, second] => [first, second],
            _ => return None,
        };
        self.revealed.clear();
        debug!(?pair, "Mismatch hidden");
        debug_assert!(RoundInvariants::check_all(self).is_ok());
        Some(pair)
    }
}
