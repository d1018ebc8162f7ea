use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Face value printed on a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Face {
    pub suit: u8,
    pub rank: u8,
}

impl Face {
    pub const fn new(suit: u8, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn matches(self, other: Face, rule: &MatchRule) -> bool {
        match rule {
            MatchRule::Exact => self == other,
            MatchRule::SuitGroups(groups) => {
                if self.suit == other.suit && groups.contains(&self.suit) {
                    true
                } else {
                    self == other
                }
            }
        }
    }
}

/// Predicate deciding which faces pair up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchRule {
    /// Same suit and same rank.
    Exact,
    /// Listed suits pair on suit alone (flowers, seasons), every other suit is exact.
    SuitGroups(HashSet<u8>),
}

impl Default for MatchRule {
    fn default() -> Self {
        Self::Exact
    }
}

/// Player-visible state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Hidden,
    Visible,
    Selected,
    IncorrectlySelected,
    Invisible,
}

impl TileState {
    /// Whether the tile still occupies its place on the grid.
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Invisible)
    }

    /// Whether the tile is face up and still on the grid.
    pub const fn is_selectable(self) -> bool {
        matches!(
            self,
            Self::Visible | Self::Selected | Self::IncorrectlySelected
        )
    }
}

impl Default for TileState {
    fn default() -> Self {
        Self::Visible
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub face: Face,
    pub pos: TilePos,
    pub state: TileState,
}

impl Tile {
    pub const fn is_present(&self) -> bool {
        self.state.is_present()
    }
}
