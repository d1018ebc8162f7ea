use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

/// Immutable copy of everything a renderer draws for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: String,
    pub size: Coord2,
    pub state: EngineState,
    /// Present tiles in drawing order.
    pub tiles: Vec<Tile>,
    pub selected: Option<TileId>,
    pub remaining: TileCount,
    pub total: TileCount,
    pub elapsed: Duration,
    pub can_undo: bool,
    pub record: LevelRecord,
}

impl Snapshot {
    pub fn from_engine(engine: &MatchEngine, record: LevelRecord) -> Self {
        let grid = engine.grid();
        Self {
            level: engine.level().to_owned(),
            size: grid.size(),
            state: engine.state(),
            tiles: grid.render_order().into_iter().copied().collect(),
            selected: engine.selected(),
            remaining: grid.remaining(),
            total: grid.total_tiles(),
            elapsed: engine.elapsed(),
            can_undo: !engine.is_finished() && !engine.history().is_empty(),
            record,
        }
    }

    /// Elapsed time as `m:ss.mmm`.
    pub fn elapsed_text(&self) -> String {
        format_time(self.elapsed)
    }
}

pub fn format_time(time: Duration) -> String {
    let millis = time.as_millis();
    format!(
        "{}:{:02}.{:03}",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}
