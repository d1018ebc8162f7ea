use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Stack depth of a tile inside its cell, 0 is the bottom of the stack.
pub type Depth = u8;

/// Count type used for tile totals and remaining-tile counts.
pub type TileCount = u16;

/// Two-dimensional cell coordinates `(column, row)`.
pub type Coord2 = (Coord, Coord);

/// Index of a tile inside its grid, stable for the lifetime of a level.
pub type TileId = u16;

/// Full position of a tile: its cell and how deep in the cell's stack it sits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub column: Coord,
    pub row: Coord,
    pub z: Depth,
}

impl TilePos {
    pub const fn new(column: Coord, row: Coord, z: Depth) -> Self {
        Self { column, row, z }
    }

    pub const fn cell(self) -> Coord2 {
        (self.column, self.row)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Horizontal displacements checked by the stacked exposure rule.
pub(crate) const SIDES: [isize; 2] = [-1, 1];

/// Moves `coords` by `dx` columns, returning a value only when it remains in bounds.
pub(crate) fn side_of(coords: Coord2, dx: isize, bounds: Coord2) -> Option<Coord2> {
    let (column, row) = coords;
    let next_column = column.checked_add_signed(dx.try_into().ok()?)?;
    if next_column >= bounds.0 || row >= bounds.1 {
        return None;
    }
    Some((next_column, row))
}
