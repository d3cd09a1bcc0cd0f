//! Card faces.

use serde::{Deserialize, Serialize};

/// Faces available to a deck, in dealing order.
pub const PALETTE: [&str; 20] = [
    "🧱", "🤖", "⚡", "🧪", "🥋", "🧠", "🪐", "🚀", "🧲", "🧬", "🎮", "🦔", "💡", "🔭", "🧩",
    "⭐", "🌟", "💥", "🧊", "🎯",
];

/// A card face, identified by its slot in [`PALETTE`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Symbol(u8);

impl Symbol {
    /// Returns the symbol at palette slot `slot`, if it exists.
    pub fn from_slot(slot: usize) -> Option<Self> {
        if slot < PALETTE.len() {
            u8::try_from(slot).ok().map(Self)
        } else {
            None
        }
    }

    /// Palette slot of this symbol.
    pub fn slot(self) -> usize {
        usize::from(self.0)
    }

    /// The glyph drawn on the card face.
    pub fn glyph(self) -> &'static str {
        PALETTE[self.slot()]
    }

    /// The first `count` symbols of the palette.
    pub fn first(count: usize) -> impl Iterator<Item = Symbol> {
        (0..count.min(PALETTE.len())).filter_map(Symbol::from_slot)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slot_bounds() {
        assert_eq!(Symbol::from_slot(0).map(Symbol::slot), Some(0));
        assert_eq!(Symbol::from_slot(19).map(Symbol::slot), Some(19));
        assert_eq!(Symbol::from_slot(20), None);
    }

    #[test]
    fn test_first_caps_at_palette() {
        assert_eq!(Symbol::first(8).count(), 8);
        assert_eq!(Symbol::first(50).count(), PALETTE.len());
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let mut glyphs: Vec<_> = PALETTE.to_vec();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), PALETTE.len());
    }
}
