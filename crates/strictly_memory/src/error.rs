//! Error types for the memory game.

/// Error that can occur when configuring a round or addressing a card.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The requested grid cannot be dealt.
    #[display("Invalid grid config ({} rows): {}", rows, reason)]
    InvalidConfig {
        /// Rows that were requested.
        rows: usize,
        /// Why the grid was rejected.
        reason: String,
    },

    /// A card position outside the dealt deck.
    #[display("Card index {} is out of range (deck has {} cards)", index, len)]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of cards in the deck.
        len: usize,
    },
}

impl std::error::Error for GameError {}

impl GameError {
    /// Creates an `InvalidConfig` error.
    pub fn invalid_config(rows: usize, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            rows,
            reason: reason.into(),
        }
    }
}
