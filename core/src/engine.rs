use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Wall-clock game timer, started by the first interaction and frozen at game end.
#[derive(Copy, Clone, Debug, Default)]
struct GameTimer {
    started_at: Option<Instant>,
    frozen: Option<Duration>,
}

impl GameTimer {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed());
        }
    }

    fn elapsed(&self) -> Duration {
        match (self.frozen, self.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started_at)) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }
}

/// One level being played: grid, pending selection, undo history and outcome.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    level: String,
    grid: GridModel,
    selection: SelectionTracker,
    history: MoveHistory,
    state: EngineState,
    timer: GameTimer,
}

impl MatchEngine {
    pub fn new(level: impl Into<String>, grid: GridModel) -> Self {
        Self {
            level: level.into(),
            grid,
            selection: SelectionTracker::new(),
            history: MoveHistory::new(),
            state: EngineState::default(),
            timer: GameTimer::default(),
        }
    }

    /// Deals `layout` with `dealer` and builds a fresh engine for it.
    pub fn deal(
        layout: &LevelLayout,
        dealer: impl TileDealer,
        tile_set: &TileSet,
        rule: MatchRule,
    ) -> Result<Self> {
        let faces = dealer.deal(layout, tile_set)?;
        let grid = GridModel::new(layout, &faces, rule)?;
        Ok(Self::new(layout.name.clone(), grid))
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn selected(&self) -> Option<TileId> {
        self.selection.selected()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn remaining(&self) -> TileCount {
        self.grid.remaining()
    }

    pub fn exposed_tiles(&self) -> Vec<TileId> {
        self.grid.exposed_tiles()
    }

    pub fn select(&mut self, id: TileId) -> Result<SelectOutcome> {
        self.check_not_finished()?;

        let outcome = self.selection.select(&mut self.grid, id)?;
        match outcome {
            SelectOutcome::Ignored => {}
            SelectOutcome::Matched(mv) => {
                self.history.record_move(mv.first, mv.second);
                self.mark_started();
                self.check_end();
            }
            _ => {
                // A deal can be stuck from the start.
                self.mark_started();
                self.check_end();
            }
        }
        Ok(outcome)
    }

    /// Selects the top tile of the clicked cell.
    pub fn click(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        self.check_not_finished()?;
        match self.grid.top_tile_at(coords)? {
            Some(id) => self.select(id),
            None => Ok(SelectOutcome::Ignored),
        }
    }

    pub fn click_point(&mut self, x: f32, y: f32, geometry: &TileGeometry) -> Result<SelectOutcome> {
        self.check_not_finished()?;
        match self.grid.pick_point(x, y, geometry) {
            Some(id) => self.select(id),
            None => Ok(SelectOutcome::Ignored),
        }
    }

    /// Takes back the latest match. An empty history is not an error.
    pub fn undo(&mut self) -> Result<Option<Move>> {
        self.check_not_finished()?;
        self.selection.clear(&mut self.grid)?;
        self.grid.clear_incorrect();
        self.history.undo(&mut self.grid)
    }

    pub fn clear_incorrect(&mut self) -> bool {
        self.grid.clear_incorrect()
    }

    pub fn forfeit(&mut self) -> Result<()> {
        self.check_not_finished()?;
        self.end_game(false);
        Ok(())
    }

    fn check_end(&mut self) {
        if self.grid.is_cleared() {
            self.end_game(true);
        } else if self.grid.available_matches().is_empty() {
            log::debug!("No matches left on level {:?}", self.level);
            self.end_game(false);
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
            self.timer.start();
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.timer.stop();
        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::debug!(
            "Level {:?} ended: {:?} after {:?}",
            self.level,
            self.state,
            self.elapsed()
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
