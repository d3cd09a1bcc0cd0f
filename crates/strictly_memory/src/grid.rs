//! Grid dimensions and the selectable grid sizes.

use crate::error::GameError;
use crate::symbol::PALETTE;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Number of columns in every grid.
pub const COLUMNS: usize = 4;

/// Dimensions of a round's card grid.
///
/// Construction is unchecked; [`GridConfig::validate`] (run by
/// `MatchGame::new_round`) rejects grids that cannot be dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    rows: usize,
}

impl GridConfig {
    /// Creates a grid with `rows` rows of [`COLUMNS`] cards.
    pub fn with_rows(rows: usize) -> Self {
        Self { rows }
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        COLUMNS
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cards in the grid.
    pub fn card_count(&self) -> usize {
        COLUMNS * self.rows
    }

    /// Number of distinct symbols dealt.
    pub fn pair_count(&self) -> usize {
        self.card_count() / 2
    }

    /// Checks that the grid is dealable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `rows` is zero or odd, or the
    /// grid needs more pairs than the palette holds.
    #[instrument]
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 {
            return Err(GameError::invalid_config(self.rows, "rows must be positive"));
        }
        if self.rows % 2 != 0 {
            return Err(GameError::invalid_config(self.rows, "rows must be even"));
        }
        if self.pair_count() > PALETTE.len() {
            return Err(GameError::invalid_config(
                self.rows,
                format!(
                    "{} pairs exceed the {}-symbol palette",
                    self.pair_count(),
                    PALETTE.len()
                ),
            ));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridSize::default().config()
    }
}

/// The grid sizes a player can choose from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum GridSize {
    /// 4×2, 4 pairs.
    #[strum(to_string = "4x2")]
    Tiny,
    /// 4×4, 8 pairs.
    #[default]
    #[strum(to_string = "4x4")]
    Standard,
    /// 4×6, 12 pairs.
    #[strum(to_string = "4x6")]
    Large,
    /// 4×8, 16 pairs.
    #[strum(to_string = "4x8")]
    Huge,
    /// 4×10, the whole palette.
    #[strum(to_string = "4x10")]
    Full,
}

impl GridSize {
    /// Rows in this grid size.
    pub fn rows(self) -> usize {
        match self {
            Self::Tiny => 2,
            Self::Standard => 4,
            Self::Large => 6,
            Self::Huge => 8,
            Self::Full => 10,
        }
    }

    /// The grid this size describes. Always valid.
    pub fn config(self) -> GridConfig {
        GridConfig::with_rows(self.rows())
    }

    /// Looks up a size by row count.
    pub fn from_rows(rows: usize) -> Option<Self> {
        Self::iter().find(|size| size.rows() == rows)
    }

    /// Parses a host-supplied selection such as `"6"` or `"4x6"`.
    ///
    /// Unrecognized labels fall back to [`GridSize::Standard`].
    #[instrument]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        let rows = label
            .strip_prefix("4x")
            .unwrap_or(label)
            .parse::<usize>()
            .ok();
        match rows.and_then(Self::from_rows) {
            Some(size) => size,
            None => {
                debug!(label, "Unrecognized grid size, using default");
                Self::default()
            }
        }
    }

    /// Next larger size, wrapping to the smallest.
    pub fn next(self) -> Self {
        let sizes: Vec<_> = Self::iter().collect();
        let pos = sizes.iter().position(|s| *s == self).unwrap_or(0);
        sizes[(pos + 1) % sizes.len()]
    }

    /// Next smaller size, wrapping to the largest.
    pub fn prev(self) -> Self {
        let sizes: Vec<_> = Self::iter().collect();
        let pos = sizes.iter().position(|s| *s == self).unwrap_or(0);
        sizes[(pos + sizes.len() - 1) % sizes.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_count() {
        let grid = GridConfig::with_rows(4);
        assert_eq!(grid.card_count(), 16);
        assert_eq!(grid.pair_count(), 8);
    }

    #[test]
    fn test_validate_rejects_bad_rows() {
        assert!(GridConfig::with_rows(0).validate().is_err());
        assert!(GridConfig::with_rows(3).validate().is_err());
        assert!(GridConfig::with_rows(12).validate().is_err());
        assert!(GridConfig::with_rows(10).validate().is_ok());
    }

    #[test]
    fn test_every_size_is_valid() {
        for size in GridSize::iter() {
            assert!(size.config().validate().is_ok(), "{size} should be valid");
        }
    }

    #[test]
    fn test_from_label_fallback() {
        assert_eq!(GridSize::from_label("6"), GridSize::Large);
        assert_eq!(GridSize::from_label("4x8"), GridSize::Huge);
        assert_eq!(GridSize::from_label("5"), GridSize::Standard);
        assert_eq!(GridSize::from_label("huge"), GridSize::Standard);
        assert_eq!(GridSize::from_label(""), GridSize::Standard);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(GridSize::Full.next(), GridSize::Tiny);
        assert_eq!(GridSize::Tiny.prev(), GridSize::Full);
        assert_eq!(GridSize::Standard.next().prev(), GridSize::Standard);
    }

    #[test]
    fn test_display_round_trips_through_label() {
        for size in GridSize::iter() {
            assert_eq!(GridSize::from_label(&size.to_string()), size);
        }
    }
}
