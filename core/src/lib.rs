use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use history::*;
pub use jotto::*;
pub use layout::*;
pub use record::*;
pub use selection::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod grid;
mod history;
mod jotto;
mod layout;
mod record;
mod selection;
mod session;
mod snapshot;
mod tile;
mod types;

/// Screen placement of tiles, used to resolve clicks and by renderers.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Shift applied per stack level so upper tiles look raised.
    pub layer_dx: f32,
    pub layer_dy: f32,
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            tile_width: 40.0,
            tile_height: 52.0,
            layer_dx: -4.0,
            layer_dy: -4.0,
        }
    }
}

impl TileGeometry {
    /// Top-left corner of the tile at `pos`.
    pub fn tile_origin(&self, pos: TilePos) -> (f32, f32) {
        let z = f32::from(pos.z);
        (
            self.origin_x + f32::from(pos.column) * self.tile_width + z * self.layer_dx,
            self.origin_y + f32::from(pos.row) * self.tile_height + z * self.layer_dy,
        )
    }

    pub fn contains(&self, pos: TilePos, x: f32, y: f32) -> bool {
        let (left, top) = self.tile_origin(pos);
        x >= left && x < left + self.tile_width && y >= top && y < top + self.tile_height
    }
}

/// Everything a game needs at construction, passed explicitly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub geometry: TileGeometry,
    pub match_rule: MatchRule,
    /// Where player records are kept, records stay in memory when unset.
    pub record_path: Option<PathBuf>,
    /// Seed of the first deal, later games use the following seeds.
    pub seed: u64,
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| GameError::ResourceUnavailable(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            GameError::ResourceUnavailable(format!("{}: {}", path.display(), err))
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_raises_upper_layers() {
        let geometry = TileGeometry::default();
        assert_eq!(geometry.tile_origin(TilePos::new(1, 1, 0)), (40.0, 52.0));
        assert_eq!(geometry.tile_origin(TilePos::new(1, 1, 2)), (32.0, 44.0));
        assert!(geometry.contains(TilePos::new(0, 0, 0), 39.9, 51.9));
        assert!(!geometry.contains(TilePos::new(0, 0, 0), 40.0, 10.0));
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config = GameConfig::from_json(r#"{"seed": 9, "match_rule": "Exact"}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.geometry, TileGeometry::default());
        assert_eq!(config.record_path, None);
    }

    #[test]
    fn config_accepts_suit_groups() {
        let config =
            GameConfig::from_json(r#"{"match_rule": {"SuitGroups": [5, 6]}}"#).unwrap();
        assert_eq!(config.match_rule, TileSet::mahjong_rule());
    }
}
