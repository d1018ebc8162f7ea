use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Empty,
    One(TileId),
}

/// Outcome of selecting a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Tile is not exposed, nothing happened
    Ignored,
    Selected,
    Deselected,
    Matched(Move),
    Mismatched(TileId, TileId),
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Tracks the zero or one tile waiting for a partner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionTracker {
    selection: Selection,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<TileId> {
        match self.selection {
            Selection::Empty => None,
            Selection::One(id) => Some(id),
        }
    }

    /// Selects `id`, attempting a match when another tile is already selected.
    ///
    /// The tracker is always empty again after a match attempt, whatever the result.
    pub fn select(&mut self, grid: &mut GridModel, id: TileId) -> Result<SelectOutcome> {
        grid.tile(id)?;

        match self.selection {
            Selection::One(current) if current == id => {
                grid.set_state(id, TileState::Visible)?;
                self.selection = Selection::Empty;
                log::trace!("Deselected tile {}", id);
                Ok(SelectOutcome::Deselected)
            }
            _ if !grid.is_exposed(id) => Ok(SelectOutcome::Ignored),
            Selection::Empty => {
                grid.set_state(id, TileState::Selected)?;
                self.selection = Selection::One(id);
                log::trace!("Selected tile {}", id);
                Ok(SelectOutcome::Selected)
            }
            Selection::One(current) => {
                self.selection = Selection::Empty;
                let mv = Move::capture(grid, current, id)?;
                if grid.try_match(current, id) {
                    Ok(SelectOutcome::Matched(mv))
                } else {
                    grid.set_state(current, TileState::IncorrectlySelected)?;
                    grid.set_state(id, TileState::IncorrectlySelected)?;
                    log::trace!("Tiles {} and {} do not match", current, id);
                    Ok(SelectOutcome::Mismatched(current, id))
                }
            }
        }
    }

    /// Drops the pending selection, putting the tile back to visible if it still is selected.
    pub fn clear(&mut self, grid: &mut GridModel) -> Result<()> {
        if let Selection::One(id) = self.selection {
            if grid.tile(id)?.state == TileState::Selected {
                grid.set_state(id, TileState::Visible)?;
            }
        }
        self.selection = Selection::Empty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(ranks: &[u8]) -> GridModel {
        let layout = LevelLayout {
            name: "flat".into(),
            kind: GridKind::Flat,
            columns: ranks.len() as Coord,
            rows: 1,
            cells: (0..ranks.len()).map(|c| (c as Coord, 0, 1)).collect(),
            faces: None,
        };
        let faces: Vec<_> = ranks.iter().map(|&rank| Face::new(2, rank)).collect();
        GridModel::new(&layout, &faces, MatchRule::Exact).unwrap()
    }

    #[test]
    fn selecting_twice_toggles() {
        let mut grid = grid(&[0, 0]);
        let mut tracker = SelectionTracker::new();

        assert_eq!(tracker.select(&mut grid, 0).unwrap(), SelectOutcome::Selected);
        assert_eq!(grid.tile(0).unwrap().state, TileState::Selected);
        assert_eq!(tracker.select(&mut grid, 0).unwrap(), SelectOutcome::Deselected);
        assert_eq!(grid.tile(0).unwrap().state, TileState::Visible);
        assert_eq!(tracker.selection(), Selection::Empty);
    }

    #[test]
    fn second_selection_matches_and_empties() {
        let mut grid = grid(&[5, 5]);
        let mut tracker = SelectionTracker::new();

        tracker.select(&mut grid, 0).unwrap();
        let outcome = tracker.select(&mut grid, 1).unwrap();

        let SelectOutcome::Matched(mv) = outcome else {
            panic!("expected a match, got {outcome:?}");
        };
        assert_eq!(mv.tiles(), (0, 1));
        assert_eq!(mv.first.state, TileState::Selected);
        assert_eq!(grid.remaining(), 0);
        assert_eq!(tracker.selection(), Selection::Empty);
    }

    #[test]
    fn mismatch_flags_both_and_empties() {
        let mut grid = grid(&[1, 2]);
        let mut tracker = SelectionTracker::new();

        tracker.select(&mut grid, 0).unwrap();
        let outcome = tracker.select(&mut grid, 1).unwrap();

        assert_eq!(outcome, SelectOutcome::Mismatched(0, 1));
        assert_eq!(grid.tile(0).unwrap().state, TileState::IncorrectlySelected);
        assert_eq!(grid.tile(1).unwrap().state, TileState::IncorrectlySelected);
        assert_eq!(tracker.selection(), Selection::Empty);

        assert!(grid.clear_incorrect());
        assert_eq!(grid.tile(1).unwrap().state, TileState::Visible);
    }

    #[test]
    fn unexposed_tile_is_ignored() {
        let mut grid = grid(&[3, 3]);
        let mut tracker = SelectionTracker::new();
        tracker.select(&mut grid, 0).unwrap();
        tracker.select(&mut grid, 1).unwrap();

        assert_eq!(tracker.select(&mut grid, 0).unwrap(), SelectOutcome::Ignored);
        assert!(!SelectOutcome::Ignored.has_update());
    }

    #[test]
    fn unknown_tile_is_an_error() {
        let mut grid = grid(&[3, 3]);
        let mut tracker = SelectionTracker::new();
        assert_eq!(
            tracker.select(&mut grid, 7),
            Err(GameError::UnknownTile(7))
        );
    }
}
