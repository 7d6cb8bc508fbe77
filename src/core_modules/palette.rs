// THEORY:
// The `Palette` is the fixed set of target colors for quantization. It is an
// ordered list: index order is part of its identity because the nearest-color
// search breaks ties in favor of the lowest index, and hardware palettes are
// full of duplicate blacks.
//
// The engine ships one compiled-in reference table (`NES_PALETTE`), but every
// algorithm takes a `&Palette`, so callers can bring any hardware palette.

use crate::core_modules::pixel::pixel::{Color, Distance};
use crate::error::{EngineError, Result};

/// Number of entries in the reference hardware palette.
pub const NES_PALETTE_LEN: usize = 64;

/// The 64-entry NES master palette. Entries 0x0D-0x0F, 0x1D-0x1F, 0x2E-0x2F and
/// 0x3E-0x3F are unused on hardware and render as black.
pub const NES_PALETTE: [Color; NES_PALETTE_LEN] = [
    // $00-$0F
    Color::new(124, 124, 124), Color::new(0, 0, 252), Color::new(0, 0, 188), Color::new(68, 40, 188),
    Color::new(148, 0, 132), Color::new(168, 0, 32), Color::new(168, 16, 0), Color::new(136, 20, 0),
    Color::new(80, 48, 0), Color::new(0, 120, 0), Color::new(0, 104, 0), Color::new(0, 88, 0),
    Color::new(0, 64, 88), Color::new(0, 0, 0), Color::new(0, 0, 0), Color::new(0, 0, 0),
    // $10-$1F
    Color::new(188, 188, 188), Color::new(0, 120, 248), Color::new(0, 88, 248), Color::new(104, 68, 252),
    Color::new(216, 0, 204), Color::new(228, 0, 88), Color::new(248, 56, 0), Color::new(228, 92, 16),
    Color::new(172, 124, 0), Color::new(0, 184, 0), Color::new(0, 168, 0), Color::new(0, 168, 68),
    Color::new(0, 136, 136), Color::new(0, 0, 0), Color::new(0, 0, 0), Color::new(0, 0, 0),
    // $20-$2F
    Color::new(248, 248, 248), Color::new(60, 188, 252), Color::new(104, 136, 252), Color::new(152, 120, 248),
    Color::new(248, 120, 248), Color::new(248, 88, 152), Color::new(248, 120, 88), Color::new(252, 160, 68),
    Color::new(248, 184, 0), Color::new(184, 248, 24), Color::new(88, 216, 84), Color::new(88, 248, 152),
    Color::new(0, 232, 216), Color::new(120, 120, 120), Color::new(0, 0, 0), Color::new(0, 0, 0),
    // $30-$3F
    Color::new(252, 252, 252), Color::new(164, 228, 252), Color::new(184, 184, 248), Color::new(216, 184, 248),
    Color::new(248, 184, 248), Color::new(248, 164, 192), Color::new(240, 208, 176), Color::new(252, 224, 168),
    Color::new(248, 216, 120), Color::new(216, 248, 120), Color::new(184, 248, 184), Color::new(184, 248, 216),
    Color::new(0, 252, 252), Color::new(248, 216, 248), Color::new(0, 0, 0), Color::new(0, 0, 0),
];

/// An ordered, non-empty list of target colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Builds a palette from its entries in index order. Fails with
    /// `InvalidPalette` when `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette);
        }
        Ok(Self { colors })
    }

    /// The reference NES master palette.
    pub fn nes() -> Self {
        Self {
            colors: NES_PALETTE.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Index of the entry closest to `color`. Equal distances resolve to the
    /// lowest index.
    pub fn nearest_index(&self, color: Color) -> usize {
        let mut best = 0usize;
        let mut best_distance = Distance::MAX;
        for (index, entry) in self.colors.iter().enumerate() {
            let distance = color.distance_squared(entry);
            if distance < best_distance {
                best_distance = distance;
                best = index;
                if distance == 0 {
                    break;
                }
            }
        }
        best
    }

    /// The entry closest to `color`.
    pub fn nearest(&self, color: Color) -> Color {
        self.colors[self.nearest_index(color)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::nes()
    }
}
