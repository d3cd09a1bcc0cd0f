//! Dealing and addressing the cards of a round.

use crate::error::GameError;
use crate::grid::GridConfig;
use crate::symbol::Symbol;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The shuffled cards of one round. Position is a card's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Symbol>,
}

impl Deck {
    /// Deals a deck for `grid`: the first `pair_count` palette symbols,
    /// each twice, in a uniformly random order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the grid fails validation.
    #[instrument(skip(rng))]
    pub fn deal<R: Rng + ?Sized>(grid: GridConfig, rng: &mut R) -> Result<Self, GameError> {
        grid.validate()?;

        let mut cards: Vec<Symbol> = Symbol::first(grid.pair_count())
            .flat_map(|symbol| [symbol, symbol])
            .collect();
        cards.shuffle(rng);

        debug!(cards = cards.len(), "Dealt deck");
        Ok(Self { cards })
    }

    /// Builds a deck in the given order, for replays and fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] unless every symbol appears
    /// exactly twice.
    pub fn from_cards(cards: Vec<Symbol>) -> Result<Self, GameError> {
        let rows = cards.len() / crate::grid::COLUMNS;
        let mut sorted = cards.clone();
        sorted.sort_unstable();
        let paired = !sorted.is_empty()
            && sorted.len() % 2 == 0
            && sorted.chunks(2).all(|pair| pair[0] == pair[1])
            && sorted.windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2]));
        if !paired {
            return Err(GameError::invalid_config(
                rows,
                "every symbol must appear exactly twice",
            ));
        }
        Ok(Self { cards })
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Symbol at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IndexOutOfRange`] past the end of the deck.
    pub fn symbol_at(&self, index: usize) -> Result<Symbol, GameError> {
        self.cards
            .get(index)
            .copied()
            .ok_or(GameError::IndexOutOfRange {
                index,
                len: self.cards.len(),
            })
    }

    /// All cards in deck order.
    pub fn cards(&self) -> &[Symbol] {
        &self.cards
    }

    /// Positions holding `symbol`.
    pub fn positions_of(&self, symbol: Symbol) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == symbol)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn counts(deck: &Deck) -> HashMap<Symbol, usize> {
        let mut counts = HashMap::new();
        for symbol in deck.cards() {
            *counts.entry(*symbol).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_deal_pairs_every_symbol() {
        let mut rng = StdRng::seed_from_u64(7);
        for rows in [2, 4, 6, 8, 10] {
            let grid = GridConfig::with_rows(rows);
            let deck = Deck::deal(grid, &mut rng).expect("valid grid");
            assert_eq!(deck.len(), grid.card_count());
            let counts = counts(&deck);
            assert_eq!(counts.len(), grid.pair_count());
            assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn test_same_seed_same_deck() {
        let grid = GridConfig::with_rows(6);
        let a = Deck::deal(grid, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Deck::deal(grid, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deal_rejects_invalid_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Deck::deal(GridConfig::with_rows(5), &mut rng);
        assert!(matches!(result, Err(GameError::InvalidConfig { rows: 5, .. })));
    }

    #[test]
    fn test_shuffle_reaches_many_orderings() {
        // Two pairs have 4!/(2!2!) = 6 distinct orderings.
        let cards: Vec<Symbol> = Symbol::first(2).flat_map(|s| [s, s]).collect();
        let mut seen = std::collections::HashSet::new();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let mut shuffled = cards.clone();
            shuffled.shuffle(&mut rng);
            seen.insert(shuffled);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_symbol_at_out_of_range() {
        let deck = Deck::deal(GridConfig::with_rows(2), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(deck.symbol_at(7).is_ok());
        assert_eq!(
            deck.symbol_at(8),
            Err(GameError::IndexOutOfRange { index: 8, len: 8 })
        );
    }

    #[test]
    fn test_from_cards_requires_pairs() {
        let a = Symbol::from_slot(0).unwrap();
        let b = Symbol::from_slot(1).unwrap();
        assert!(Deck::from_cards(vec![a, b, a, b]).is_ok());
        assert!(Deck::from_cards(vec![a, a, a, b]).is_err());
        assert!(Deck::from_cards(vec![a, a, a, a]).is_err());
        assert!(Deck::from_cards(vec![a, b, a]).is_err());
        assert!(Deck::from_cards(Vec::new()).is_err());
    }

    #[test]
    fn test_positions_of() {
        let a = Symbol::from_slot(0).unwrap();
        let b = Symbol::from_slot(1).unwrap();
        let deck = Deck::from_cards(vec![a, b, a, b]).unwrap();
        assert_eq!(deck.positions_of(a), vec![0, 2]);
        assert_eq!(deck.positions_of(b), vec![1, 3]);
    }
}
