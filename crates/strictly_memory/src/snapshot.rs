//! Read-only view of a round for rendering collaborators.

use crate::round::{RoundPhase, RoundState};
use crate::symbol::Symbol;
use crate::task::RoundId;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How a single position should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "symbol", rename_all = "lowercase")]
pub enum CardView {
    /// Face down.
    Hidden,
    /// Face up, waiting for its partner or for the mismatch to clear.
    Revealed(Symbol),
    /// Part of a confirmed pair.
    Matched(Symbol),
}

impl CardView {
    /// The visible symbol, if the card is face up.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            CardView::Hidden => None,
            CardView::Revealed(symbol) | CardView::Matched(symbol) => Some(*symbol),
        }
    }
}

/// Everything a renderer needs to draw a round at one instant.
///
/// Renderers diff snapshots themselves; the game never talks to a display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Snapshot {
    /// Round the snapshot was taken from.
    round: RoundId,
    /// Cards per grid row.
    columns: usize,
    /// One entry per deck position.
    cards: Vec<CardView>,
    /// Completed two-card attempts.
    move_count: usize,
    /// Confirmed pairs.
    matched_count: usize,
    /// Whole seconds on the clock.
    elapsed_secs: u64,
    /// Clock as shown to the player, e.g. `"12s"`.
    #[getter(skip)]
    elapsed: String,
    /// Lifecycle phase.
    phase: RoundPhase,
}

impl Snapshot {
    /// Captures `state` as of `now`.
    pub fn capture(round: RoundId, columns: usize, state: &RoundState, now: Instant) -> Self {
        let cards = state
            .deck()
            .cards()
            .iter()
            .enumerate()
            .map(|(index, symbol)| {
                if state.matched().contains(&index) {
                    CardView::Matched(*symbol)
                } else if state.revealed().contains(&index) {
                    CardView::Revealed(*symbol)
                } else {
                    CardView::Hidden
                }
            })
            .collect();
        let elapsed_secs = state.elapsed_secs(now);

        Self {
            round,
            columns,
            cards,
            move_count: state.move_count(),
            matched_count: state.matched_count(),
            elapsed_secs,
            elapsed: format!("{elapsed_secs}s"),
            phase: state.phase(),
        }
    }

    /// Elapsed time formatted for display, e.g. `"12s"`.
    pub fn elapsed_display(&self) -> &str {
        &self.elapsed
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.cards.len().div_ceil(self.columns)
        }
    }

    /// Whether the round is complete.
    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::Complete
    }
}
