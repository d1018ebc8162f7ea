use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unknown tile {0}")]
    UnknownTile(crate::TileId),
    #[error("Invalid level layout: {0}")]
    InvalidLayout(String),
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("{0} is not in the dictionary")]
    NotInDictionary(String),
    #[error("{0} was already guessed")]
    DuplicateGuess(String),
    #[error("Game state lock is poisoned")]
    StateUnavailable,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failures reading or writing the player record file.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Could not access record file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Record file has an unknown header")]
    BadMagic,
    #[error("Record file version {0} is not supported")]
    UnsupportedVersion(u16),
    #[error("Record file ends early")]
    Truncated,
    #[error("Record file contains an invalid level name")]
    InvalidName,
    #[error("Level name is too long to store")]
    NameTooLong,
    #[error("Too many levels to store")]
    TooManyLevels,
}
