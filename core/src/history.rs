use serde::{Deserialize, Serialize};

use crate::*;

/// Where a tile sat, and how it looked, right before it was removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: TileId,
    pub pos: TilePos,
    pub state: TileState,
}

/// A pair of tiles removed together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub first: Placement,
    pub second: Placement,
}

impl Move {
    /// Snapshots `a` and `b` before they are removed from `grid`.
    pub fn capture(grid: &GridModel, a: TileId, b: TileId) -> Result<Self> {
        Ok(Self {
            first: grid.placement(a)?,
            second: grid.placement(b)?,
        })
    }

    pub fn tiles(&self) -> (TileId, TileId) {
        (self.first.id, self.second.id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(&mut self, first: Placement, second: Placement) -> Move {
        let mv = Move { first, second };
        self.moves.push(mv);
        mv
    }

    /// Pops the latest move and puts both of its tiles back on `grid`.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, grid: &mut GridModel) -> Result<Option<Move>> {
        let Some(mv) = self.moves.last().copied() else {
            return Ok(None);
        };
        grid.restore(mv.second)?;
        grid.restore(mv.first)?;
        self.moves.pop();
        log::debug!("Undid match of tiles {} and {}", mv.first.id, mv.second.id);
        Ok(Some(mv))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}
