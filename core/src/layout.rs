use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::*;

/// How tiles are arranged inside a level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Cells hold stacks of tiles and the side-blocking rule applies.
    Stacked,
    /// One tile per cell, every present tile can be selected.
    Flat,
}

/// Level description: which cells are filled and how tall each stack is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub kind: GridKind,
    pub columns: Coord,
    pub rows: Coord,
    /// `(column, row, height)` for every occupied cell.
    pub cells: Vec<(Coord, Coord, Depth)>,
    /// Faces for every position returned by [`LevelLayout::positions`], when not dealt randomly.
    #[serde(default)]
    pub faces: Option<Vec<Face>>,
}

impl LevelLayout {
    pub fn from_json(text: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(text)
            .map_err(|err| GameError::InvalidLayout(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            GameError::ResourceUnavailable(format!("{}: {}", path.display(), err))
        })?;
        let layout = Self::from_json(&text)?;
        log::debug!(
            "Loaded level {:?} with {} tiles from {}",
            layout.name,
            layout.tile_count(),
            path.display()
        );
        Ok(layout)
    }

    pub fn size(&self) -> Coord2 {
        (self.columns, self.rows)
    }

    /// Number of tiles, saturating at [`TileCount::MAX`]; [`validate`](Self::validate) rejects that many.
    pub fn tile_count(&self) -> TileCount {
        self.checked_tile_count().unwrap_or(TileCount::MAX)
    }

    fn checked_tile_count(&self) -> Option<TileCount> {
        self.cells
            .iter()
            .try_fold(0 as TileCount, |total, &(_, _, height)| {
                total.checked_add(height.into())
            })
            .filter(|&total| total < TileCount::MAX)
    }

    /// Every tile position, cell by cell in declaration order, bottom of each stack first.
    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.cells.iter().flat_map(|&(column, row, height)| {
            (0..height).map(move |z| TilePos::new(column, row, z))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(GameError::InvalidLayout(reason));

        if self.columns == 0 || self.rows == 0 {
            return invalid("grid has no cells".into());
        }

        let mut seen = hashbrown::HashSet::new();
        for &(column, row, height) in &self.cells {
            if column >= self.columns || row >= self.rows {
                return invalid(format!("cell ({column}, {row}) is outside the grid"));
            }
            if height == 0 {
                return invalid(format!("cell ({column}, {row}) has no tiles"));
            }
            if self.kind == GridKind::Flat && height > 1 {
                return invalid(format!("flat cell ({column}, {row}) is stacked"));
            }
            if !seen.insert((column, row)) {
                return invalid(format!("cell ({column}, {row}) is declared twice"));
            }
        }

        let Some(tile_count) = self.checked_tile_count() else {
            return invalid("too many tiles".into());
        };
        if tile_count % 2 != 0 {
            return invalid(format!("odd tile count {tile_count}"));
        }

        if let Some(faces) = &self.faces {
            if faces.len() != usize::from(tile_count) {
                return invalid(format!(
                    "{} faces given for {} tiles",
                    faces.len(),
                    tile_count
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYRAMID: &str = r#"{
        "name": "pyramid",
        "kind": "stacked",
        "columns": 3,
        "rows": 1,
        "cells": [[0, 0, 1], [1, 0, 2], [2, 0, 1]]
    }"#;

    #[test]
    fn parses_and_expands_positions() {
        let layout = LevelLayout::from_json(PYRAMID).unwrap();

        assert_eq!(layout.tile_count(), 4);
        let positions: Vec<_> = layout.positions().collect();
        assert_eq!(positions[1], TilePos::new(1, 0, 0));
        assert_eq!(positions[2], TilePos::new(1, 0, 1));
    }

    #[test]
    fn rejects_cells_outside_grid() {
        let text = r#"{"name":"x","kind":"flat","columns":1,"rows":1,"cells":[[0,0,1],[1,0,1]]}"#;
        assert!(matches!(
            LevelLayout::from_json(text),
            Err(GameError::InvalidLayout(_))
        ));
    }

    #[test]
    fn rejects_odd_tile_count() {
        let text = r#"{"name":"x","kind":"flat","columns":3,"rows":1,"cells":[[0,0,1],[1,0,1],[2,0,1]]}"#;
        assert!(matches!(
            LevelLayout::from_json(text),
            Err(GameError::InvalidLayout(_))
        ));
    }

    #[test]
    fn rejects_face_count_mismatch() {
        let text = r#"{"name":"x","kind":"flat","columns":2,"rows":1,"cells":[[0,0,1],[1,0,1]],
            "faces":[{"suit":0,"rank":0}]}"#;
        assert!(matches!(
            LevelLayout::from_json(text),
            Err(GameError::InvalidLayout(_))
        ));
    }

    #[test]
    fn rejects_tile_count_beyond_tile_ids() {
        let layout = LevelLayout {
            name: "tower".into(),
            kind: GridKind::Stacked,
            columns: 20,
            rows: 15,
            cells: (0..20)
                .flat_map(|column| (0..15).map(move |row| (column, row, 254)))
                .collect(),
            faces: None,
        };
        let text = serde_json::to_string(&layout).unwrap();

        assert_eq!(layout.tile_count(), TileCount::MAX);
        assert!(matches!(
            LevelLayout::from_json(&text),
            Err(GameError::InvalidLayout(_))
        ));
    }

    #[test]
    fn missing_file_is_resource_unavailable() {
        let result = LevelLayout::load("/nonexistent/level.json");
        assert!(matches!(result, Err(GameError::ResourceUnavailable(_))));
    }
}
