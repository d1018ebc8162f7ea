use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::RecordError;

const MAGIC: &[u8; 4] = b"TMRC";
const VERSION: u16 = 1;
const UNSET_TIME: u64 = u64::MAX;

/// Aggregate play statistics of one level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// `None` until the level has been won once.
    pub fastest_time: Option<Duration>,
}

impl LevelRecord {
    /// Counts one finished game. Times are kept in whole milliseconds, the file's resolution.
    pub fn record_result(&mut self, won: bool, elapsed: Duration) {
        let elapsed = whole_millis(elapsed);
        self.games_played = self.games_played.saturating_add(1);
        if won {
            self.wins = self.wins.saturating_add(1);
            if self.fastest_time.is_none_or(|fastest| elapsed < fastest) {
                self.fastest_time = Some(elapsed);
            }
        } else {
            self.losses = self.losses.saturating_add(1);
        }
    }

    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (f64::from(self.wins) / f64::from(self.games_played)).clamp(0.0, 1.0)
        }
    }
}

fn whole_millis(time: Duration) -> Duration {
    Duration::from_millis(u64::try_from(time.as_millis()).unwrap_or(UNSET_TIME - 1))
}

/// Per-level records, kept in the order levels were first declared.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    levels: Vec<(String, LevelRecord)>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an empty record for each of `levels`, in that order.
    pub fn with_levels<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for level in levels {
            let level: String = level.into();
            store.entry(&level);
        }
        store
    }

    pub fn get(&self, level: &str) -> Option<&LevelRecord> {
        self.levels
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, record)| record)
    }

    /// Record for `level`, zeroed when the level was never played.
    pub fn record(&self, level: &str) -> LevelRecord {
        self.get(level).copied().unwrap_or_default()
    }

    pub fn levels(&self) -> impl Iterator<Item = (&str, &LevelRecord)> {
        self.levels.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn record_result(&mut self, level: &str, won: bool, elapsed: Duration) {
        let record = self.entry(level);
        record.record_result(won, elapsed);
        log::debug!(
            "Level {:?}: {} games, {} wins, {} losses",
            level,
            record.games_played,
            record.wins,
            record.losses
        );
    }

    pub fn win_percentage(&self, level: &str) -> f64 {
        self.record(level).win_percentage()
    }

    fn entry(&mut self, level: &str) -> &mut LevelRecord {
        let index = match self.levels.iter().position(|(name, _)| name == level) {
            Some(index) => index,
            None => {
                self.levels.push((level.to_owned(), LevelRecord::default()));
                self.levels.len() - 1
            }
        };
        &mut self.levels[index].1
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        let mut bytes = Vec::with_capacity(10 + self.levels.len() * 32);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_be_bytes());
        let count = u32::try_from(self.levels.len()).map_err(|_| RecordError::TooManyLevels)?;
        bytes.extend_from_slice(&count.to_be_bytes());

        for (name, record) in &self.levels {
            let len = u16::try_from(name.len()).map_err(|_| RecordError::NameTooLong)?;
            bytes.extend_from_slice(&len.to_be_bytes());
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(&record.games_played.to_be_bytes());
            bytes.extend_from_slice(&record.wins.to_be_bytes());
            bytes.extend_from_slice(&record.losses.to_be_bytes());
            let fastest = record
                .fastest_time
                .map_or(UNSET_TIME, |time| {
                    u64::try_from(time.as_millis()).unwrap_or(UNSET_TIME - 1)
                });
            bytes.extend_from_slice(&fastest.to_be_bytes());
        }

        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut reader = Reader { bytes };

        if reader.take(MAGIC.len())? != MAGIC {
            return Err(RecordError::BadMagic);
        }
        let version = reader.u16()?;
        if version != VERSION {
            return Err(RecordError::UnsupportedVersion(version));
        }

        let count = reader.u32()?;
        let mut store = Self::new();
        for _ in 0..count {
            let len = reader.u16()?;
            let name = core::str::from_utf8(reader.take(len.into())?)
                .map_err(|_| RecordError::InvalidName)?
                .to_owned();
            let games_played = reader.u32()?;
            let wins = reader.u32()?;
            let losses = reader.u32()?;
            let fastest_time = match reader.u64()? {
                UNSET_TIME => None,
                millis => Some(Duration::from_millis(millis)),
            };
            store.levels.push((
                name,
                LevelRecord {
                    games_played,
                    wins,
                    losses,
                    fastest_time,
                },
            ));
        }

        Ok(store)
    }

    /// Reads the store from `path`; a missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No record file at {}, starting fresh", path.display());
                Ok(Self::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrites the whole file at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], RecordError> {
        if self.bytes.len() < len {
            return Err(RecordError::Truncated);
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], RecordError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, RecordError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, RecordError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, RecordError> {
        Ok(u64::from_be_bytes(self.array()?))
    }
}
