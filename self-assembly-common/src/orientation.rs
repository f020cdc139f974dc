use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of a rod-like particle on the lattice.
///
/// Empty cells carry no orientation at all; they are represented by `None`
/// wherever a cell is inspected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Occupies consecutive cells along the x-axis at a fixed y.
    #[serde(rename = "H")]
    Horizontal,
    /// Occupies consecutive cells along the y-axis at a fixed x.
    #[serde(rename = "V")]
    Vertical,
}

impl Orientation {
    /// Both orientations, horizontal first.
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// Dense index, usable for per-orientation arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }

    /// Picks an orientation from a fair coin flip (`true` -> vertical).
    #[inline(always)]
    pub fn from_coin(vertical: bool) -> Self {
        if vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}
