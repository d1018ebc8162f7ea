use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Decides which face lands on every position of a layout.
pub trait TileDealer {
    /// Faces in the order of [`LevelLayout::positions`].
    fn deal(self, layout: &LevelLayout, tile_set: &TileSet) -> Result<Vec<Face>>;
}

/// Pool of matching face pairs a dealer draws from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSet {
    pairs: Vec<(Face, Face)>,
}

impl TileSet {
    pub const DOTS: u8 = 0;
    pub const BAMBOO: u8 = 1;
    pub const CHARACTERS: u8 = 2;
    pub const WINDS: u8 = 3;
    pub const DRAGONS: u8 = 4;
    pub const FLOWERS: u8 = 5;
    pub const SEASONS: u8 = 6;

    pub fn from_pairs(pairs: Vec<(Face, Face)>) -> Self {
        Self { pairs }
    }

    /// The 144 tiles of a Mahjong Solitaire set, as 72 pairs.
    pub fn mahjong() -> Self {
        let mut pairs = Vec::with_capacity(72);
        let mut add_fours = |suit: u8, ranks: core::ops::Range<u8>| {
            for rank in ranks {
                let face = Face::new(suit, rank);
                pairs.push((face, face));
                pairs.push((face, face));
            }
        };
        add_fours(Self::DOTS, 1..10);
        add_fours(Self::BAMBOO, 1..10);
        add_fours(Self::CHARACTERS, 1..10);
        add_fours(Self::WINDS, 0..4);
        add_fours(Self::DRAGONS, 0..3);
        for suit in [Self::FLOWERS, Self::SEASONS] {
            pairs.push((Face::new(suit, 0), Face::new(suit, 1)));
            pairs.push((Face::new(suit, 2), Face::new(suit, 3)));
        }
        Self { pairs }
    }

    /// Match rule that makes [`TileSet::mahjong`] pairs valid.
    pub fn mahjong_rule() -> MatchRule {
        MatchRule::SuitGroups([Self::FLOWERS, Self::SEASONS].into_iter().collect())
    }

    /// `kinds` distinct faces of a single suit, one pair each.
    pub fn simple(kinds: u8) -> Self {
        let pairs = (0..kinds)
            .map(|rank| (Face::new(0, rank), Face::new(0, rank)))
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(Face, Face)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Uses the faces written into the layout itself.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FixedDealer;

impl TileDealer for FixedDealer {
    fn deal(self, layout: &LevelLayout, _tile_set: &TileSet) -> Result<Vec<Face>> {
        layout.validate()?;
        layout
            .faces
            .clone()
            .ok_or_else(|| GameError::InvalidLayout(format!("level {:?} has no faces", layout.name)))
    }
}
