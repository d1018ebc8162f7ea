use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

type Stack = SmallVec<[TileId; 4]>;

/// Tiles of a level arranged in per-cell stacks.
///
/// Tiles are never removed from their stack, a matched tile is flagged
/// [`TileState::Invisible`] so undo can put it back exactly where it was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    kind: GridKind,
    rule: MatchRule,
    tiles: Vec<Tile>,
    stacks: Array2<Stack>,
}

impl GridModel {
    pub fn empty(kind: GridKind, size: Coord2, rule: MatchRule) -> Self {
        Self {
            kind,
            rule,
            tiles: Vec::new(),
            stacks: Array2::default(size.to_nd_index()),
        }
    }

    /// Builds the grid for `layout`, assigning `faces` to its positions in order.
    pub fn new(layout: &LevelLayout, faces: &[Face], rule: MatchRule) -> Result<Self> {
        layout.validate()?;
        if faces.len() != usize::from(layout.tile_count()) {
            return Err(GameError::InvalidLayout(format!(
                "{} faces dealt for {} tiles",
                faces.len(),
                layout.tile_count()
            )));
        }

        let mut grid = Self::empty(layout.kind, layout.size(), rule);
        for (pos, &face) in layout.positions().zip(faces) {
            let id = TileId::try_from(grid.tiles.len())
                .map_err(|_| GameError::InvalidLayout("too many tiles".into()))?;
            grid.tiles.push(Tile {
                id,
                face,
                pos,
                state: TileState::Visible,
            });
            grid.stacks[pos.cell().to_nd_index()].push(id);
        }
        Ok(grid)
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn rule(&self) -> &MatchRule {
        &self.rule
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.stacks.dim();
        // stacks are only ever built from a `Coord2`
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn total_tiles(&self) -> TileCount {
        self.tiles.len() as TileCount
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.tiles
            .get(usize::from(id))
            .ok_or(GameError::UnknownTile(id))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Ids stacked on `coords`, bottom first, including removed tiles.
    pub fn stack_at(&self, coords: Coord2) -> Result<&[TileId]> {
        let coords = self.validate_coords(coords)?;
        Ok(self.stacks[coords.to_nd_index()].as_slice())
    }

    /// The highest tile still present on `coords`.
    pub fn top_tile_at(&self, coords: Coord2) -> Result<Option<TileId>> {
        Ok(self
            .stack_at(coords)?
            .iter()
            .rev()
            .copied()
            .find(|&id| self.tiles[usize::from(id)].is_present()))
    }

    pub fn remaining(&self) -> TileCount {
        self.tiles.iter().filter(|tile| tile.is_present()).count() as TileCount
    }

    pub fn is_cleared(&self) -> bool {
        self.tiles.iter().all(|tile| !tile.is_present())
    }

    pub fn is_exposed(&self, id: TileId) -> bool {
        let Some(tile) = self.tiles.get(usize::from(id)) else {
            return false;
        };
        if !tile.state.is_selectable() {
            return false;
        }

        match self.kind {
            GridKind::Flat => true,
            GridKind::Stacked => {
                let cell = tile.pos.cell();
                let covered = self.stacks[cell.to_nd_index()]
                    .iter()
                    .map(|&other| &self.tiles[usize::from(other)])
                    .any(|other| other.is_present() && other.pos.z > tile.pos.z);
                if covered {
                    return false;
                }

                SIDES.iter().any(|&dx| match side_of(cell, dx, self.size()) {
                    Some(side) => !self.blocks(side, tile.pos.z),
                    None => true,
                })
            }
        }
    }

    /// Tiles that can currently be selected, in id order.
    pub fn exposed_tiles(&self) -> Vec<TileId> {
        self.tiles
            .iter()
            .map(|tile| tile.id)
            .filter(|&id| self.is_exposed(id))
            .collect()
    }

    /// Whether `a` and `b` could be matched right now.
    pub fn can_match(&self, a: TileId, b: TileId) -> bool {
        if a == b || !self.is_exposed(a) || !self.is_exposed(b) {
            return false;
        }
        let (face_a, face_b) = (self.tiles[usize::from(a)].face, self.tiles[usize::from(b)].face);
        face_a.matches(face_b, &self.rule)
    }

    /// Removes `a` and `b` when they form a match, otherwise leaves the grid untouched.
    pub fn try_match(&mut self, a: TileId, b: TileId) -> bool {
        if !self.can_match(a, b) {
            return false;
        }
        self.tiles[usize::from(a)].state = TileState::Invisible;
        self.tiles[usize::from(b)].state = TileState::Invisible;
        log::debug!("Matched tiles {} and {}", a, b);
        true
    }

    /// Every pair of exposed tiles that would match, lowest ids first.
    pub fn available_matches(&self) -> Vec<(TileId, TileId)> {
        let exposed = self.exposed_tiles();
        let mut pairs = Vec::new();
        for (i, &a) in exposed.iter().enumerate() {
            for &b in &exposed[i + 1..] {
                if self.can_match(a, b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// Present tiles in drawing order: lowest layer first, then column, then row.
    pub fn render_order(&self) -> Vec<&Tile> {
        let mut order: Vec<&Tile> = self.tiles.iter().filter(|tile| tile.is_present()).collect();
        order.sort_by_key(|tile| (tile.pos.z, tile.pos.column, tile.pos.row));
        order
    }

    /// Resolves a click in screen space to the topmost tile under it.
    pub fn pick_point(&self, x: f32, y: f32, geometry: &TileGeometry) -> Option<TileId> {
        self.render_order()
            .into_iter()
            .rev()
            .find(|tile| geometry.contains(tile.pos, x, y))
            .map(|tile| tile.id)
    }

    /// Resets every incorrectly selected tile back to visible.
    pub fn clear_incorrect(&mut self) -> bool {
        let mut changed = false;
        for tile in &mut self.tiles {
            if tile.state == TileState::IncorrectlySelected {
                tile.state = TileState::Visible;
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn set_state(&mut self, id: TileId, state: TileState) -> Result<()> {
        let tile = self
            .tiles
            .get_mut(usize::from(id))
            .ok_or(GameError::UnknownTile(id))?;
        tile.state = state;
        Ok(())
    }

    pub(crate) fn placement(&self, id: TileId) -> Result<Placement> {
        let tile = self.tile(id)?;
        Ok(Placement {
            id,
            pos: tile.pos,
            state: tile.state,
        })
    }

    /// Puts a removed tile back, visible, at the position it was recorded at.
    pub(crate) fn restore(&mut self, placement: Placement) -> Result<()> {
        let tile = self
            .tiles
            .get_mut(usize::from(placement.id))
            .ok_or(GameError::UnknownTile(placement.id))?;
        if tile.pos != placement.pos {
            return Err(GameError::InvalidCoords);
        }
        tile.state = TileState::Visible;
        Ok(())
    }

    fn blocks(&self, coords: Coord2, z: Depth) -> bool {
        self.stacks[coords.to_nd_index()]
            .iter()
            .map(|&id| &self.tiles[usize::from(id)])
            .any(|tile| tile.is_present() && tile.pos.z >= z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_layout(kind: GridKind, heights: &[Depth]) -> LevelLayout {
        LevelLayout {
            name: "row".into(),
            kind,
            columns: heights.len() as Coord,
            rows: 1,
            cells: heights
                .iter()
                .enumerate()
                .map(|(column, &height)| (column as Coord, 0, height))
                .collect(),
            faces: None,
        }
    }

    fn faces(ranks: &[u8]) -> Vec<Face> {
        ranks.iter().map(|&rank| Face::new(0, rank)).collect()
    }

    #[test]
    fn empty_grid_has_no_exposed_tiles() {
        let grid = GridModel::empty(GridKind::Stacked, (4, 4), MatchRule::Exact);
        assert!(grid.exposed_tiles().is_empty());
        assert!(grid.is_cleared());
    }

    #[test]
    fn middle_of_a_row_is_blocked_on_both_sides() {
        let layout = row_layout(GridKind::Stacked, &[1, 1, 1, 1]);
        let grid = GridModel::new(&layout, &faces(&[0, 1, 1, 0]), MatchRule::Exact).unwrap();

        assert_eq!(grid.exposed_tiles(), vec![0, 3]);
        assert!(!grid.is_exposed(1));
    }

    #[test]
    fn covered_tile_is_not_exposed() {
        let layout = row_layout(GridKind::Stacked, &[2]);
        let grid = GridModel::new(&layout, &faces(&[4, 4]), MatchRule::Exact).unwrap();

        assert_eq!(grid.exposed_tiles(), vec![1]);
        assert_eq!(grid.top_tile_at((0, 0)).unwrap(), Some(1));
    }

    #[test]
    fn lower_neighbour_does_not_block() {
        let layout = row_layout(GridKind::Stacked, &[1, 2, 1]);
        let grid = GridModel::new(&layout, &faces(&[0, 1, 2, 0]), MatchRule::Exact).unwrap();

        // the top of the middle stack sits above both neighbours
        assert!(grid.is_exposed(2));
        assert!(!grid.is_exposed(1));
    }

    #[test]
    fn matching_exposed_pair_becomes_invisible() {
        let layout = row_layout(GridKind::Stacked, &[1, 1]);
        let mut grid = GridModel::new(&layout, &faces(&[3, 3]), MatchRule::Exact).unwrap();

        assert!(grid.try_match(0, 1));
        assert_eq!(grid.tile(0).unwrap().state, TileState::Invisible);
        assert_eq!(grid.tile(1).unwrap().state, TileState::Invisible);
        assert_eq!(grid.remaining(), 0);
    }

    #[test]
    fn failed_match_leaves_grid_untouched() {
        let layout = row_layout(GridKind::Stacked, &[1, 1, 1, 1]);
        let mut grid = GridModel::new(&layout, &faces(&[0, 1, 2, 0]), MatchRule::Exact).unwrap();
        let before = grid.clone();

        assert!(!grid.try_match(0, 0));
        assert!(!grid.try_match(0, 1));
        assert!(!grid.try_match(1, 2));
        assert!(!grid.try_match(0, 99));
        assert_eq!(grid, before);
    }

    #[test]
    fn removing_a_tile_exposes_its_neighbour() {
        let layout = row_layout(GridKind::Stacked, &[1, 1, 1, 1]);
        let mut grid = GridModel::new(&layout, &faces(&[0, 1, 1, 0]), MatchRule::Exact).unwrap();

        assert!(grid.try_match(0, 3));
        assert_eq!(grid.exposed_tiles(), vec![1, 2]);
        assert_eq!(grid.available_matches(), vec![(1, 2)]);
    }

    #[test]
    fn flat_grid_exposes_every_present_tile() {
        let layout = row_layout(GridKind::Flat, &[1, 1, 1, 1]);
        let grid = GridModel::new(&layout, &faces(&[0, 1, 1, 0]), MatchRule::Exact).unwrap();

        assert_eq!(grid.exposed_tiles(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn pick_point_prefers_the_top_of_a_stack() {
        let layout = row_layout(GridKind::Stacked, &[2]);
        let grid = GridModel::new(&layout, &faces(&[4, 4]), MatchRule::Exact).unwrap();
        let geometry = TileGeometry::default();

        assert_eq!(grid.pick_point(1.0, 1.0, &geometry), Some(1));
        assert_eq!(grid.pick_point(-50.0, -50.0, &geometry), None);
    }

    #[test]
    fn rejects_wrong_face_count() {
        let layout = row_layout(GridKind::Flat, &[1, 1]);
        let result = GridModel::new(&layout, &faces(&[0]), MatchRule::Exact);
        assert!(matches!(result, Err(GameError::InvalidLayout(_))));
    }
}
