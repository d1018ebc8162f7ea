use std::sync::{Arc, Mutex};

use crate::*;

/// Input from the UI layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Msg {
    Click(Coord2),
    ClickPoint { x: f32, y: f32 },
    Select(TileId),
    /// Sent once the UI is done showing a mismatch.
    ClearIncorrect,
    Undo,
    Forfeit,
    NewGame,
}

/// Single writer owning the engine of the current level and the player records.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    layout: LevelLayout,
    tile_set: TileSet,
    games_dealt: u64,
    engine: MatchEngine,
    records: RecordStore,
    result_recorded: bool,
    warning: Option<String>,
}

impl Session {
    /// Opens `layout`, loading player records from the configured path.
    ///
    /// An unreadable record file does not prevent playing, it is reported through
    /// [`Session::take_warning`] and the session starts with empty records.
    pub fn open(config: GameConfig, layout: LevelLayout, tile_set: TileSet) -> Result<Self> {
        let mut warning = None;
        let records = match &config.record_path {
            Some(path) => RecordStore::load(path).unwrap_or_else(|err| {
                log::warn!("Could not load records from {}: {}", path.display(), err);
                warning = Some(err.to_string());
                RecordStore::new()
            }),
            None => RecordStore::new(),
        };
        Self::with_records(config, layout, tile_set, records).map(|mut session| {
            session.warning = warning;
            session
        })
    }

    pub fn with_records(
        config: GameConfig,
        layout: LevelLayout,
        tile_set: TileSet,
        records: RecordStore,
    ) -> Result<Self> {
        let engine = Self::deal(&config, &layout, &tile_set, 0)?;
        Ok(Self {
            config,
            layout,
            tile_set,
            games_dealt: 1,
            engine,
            records,
            result_recorded: false,
            warning: None,
        })
    }

    fn deal(
        config: &GameConfig,
        layout: &LevelLayout,
        tile_set: &TileSet,
        game: u64,
    ) -> Result<MatchEngine> {
        let rule = config.match_rule.clone();
        if layout.faces.is_some() {
            MatchEngine::deal(layout, FixedDealer, tile_set, rule)
        } else {
            let dealer = RandomDealer::new(config.seed.wrapping_add(game));
            MatchEngine::deal(layout, dealer, tile_set, rule)
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(&self.engine, self.records.record(&self.layout.name))
    }

    /// Latest record-file problem, if any, cleared once read.
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    /// Applies `msg`, returning whether anything visible changed.
    pub fn update(&mut self, msg: Msg) -> Result<bool> {
        let changed = match msg {
            Msg::Click(coords) => self.engine.click(coords)?.has_update(),
            Msg::ClickPoint { x, y } => {
                let geometry = self.config.geometry;
                self.engine.click_point(x, y, &geometry)?.has_update()
            }
            Msg::Select(id) => self.engine.select(id)?.has_update(),
            Msg::ClearIncorrect => self.engine.clear_incorrect(),
            Msg::Undo => self.engine.undo()?.is_some(),
            Msg::Forfeit => {
                self.engine.forfeit()?;
                true
            }
            Msg::NewGame => {
                self.new_game()?;
                true
            }
        };

        if self.engine.is_finished() && !self.result_recorded {
            self.finish_game();
        }
        Ok(changed)
    }

    /// Deals the next game; abandoning a started game counts as a loss.
    fn new_game(&mut self) -> Result<()> {
        if self.engine.state() == EngineState::Active {
            self.engine.forfeit()?;
            self.finish_game();
        }
        self.engine = Self::deal(&self.config, &self.layout, &self.tile_set, self.games_dealt)?;
        self.games_dealt += 1;
        self.result_recorded = false;
        log::debug!("Dealt game {} of level {:?}", self.games_dealt, self.layout.name);
        Ok(())
    }

    fn finish_game(&mut self) {
        let won = self.engine.state() == EngineState::Won;
        self.records
            .record_result(&self.layout.name, won, self.engine.elapsed());
        self.result_recorded = true;

        if self.config.record_path.is_some() {
            if let Err(err) = self.save_records() {
                self.warning = Some(err.to_string());
            }
        }
    }

    /// Writes every record to the configured file.
    pub fn save_records(&self) -> core::result::Result<(), RecordError> {
        let Some(path) = &self.config.record_path else {
            return Ok(());
        };
        self.records.save(path).inspect_err(|err| {
            log::warn!("Could not save records to {}: {}", path.display(), err);
        })
    }
}

/// Session shared between an input thread and a render thread.
#[derive(Clone, Debug)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Runs `f` with exclusive access to the session.
    ///
    /// Every read and write of game state goes through here, nothing else may hold
    /// the session while `f` runs.
    pub fn with_data<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut session = self.inner.lock().map_err(|_| GameError::StateUnavailable)?;
        Ok(f(&mut *session))
    }

    pub fn dispatch(&self, msg: Msg) -> Result<bool> {
        self.with_data(|session| session.update(msg))?
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.with_data(|session| session.snapshot())
    }
}
