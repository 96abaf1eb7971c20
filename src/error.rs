//! Error types for level generation
//!
//! Every failure is reported as a typed error. Nothing is folded into a
//! degenerate but "successful" result.

use std::path::PathBuf;

use thiserror::Error;

use crate::direction::Direction;

/// Invalid input rejected before any generation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{what} must be greater than zero")]
    ZeroDimension { what: &'static str },

    #[error("min_rooms ({min}) must not exceed max_rooms ({max})")]
    RoomBounds { min: usize, max: usize },

    #[error("seed coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    SeedOutOfBounds { x: usize, y: usize, width: usize, height: usize },

    #[error("{what} must allow at least one attempt")]
    ZeroAttempts { what: &'static str },

    #[error("interior {interior:?} does not fit in a {room:?} room")]
    InteriorTooLarge {
        interior: (usize, usize),
        room: (usize, usize),
    },

    #[error("rejection probability {0} must be in [0, 1)")]
    InvalidProbability(f64),

    #[error("tile catalog is empty")]
    EmptyCatalog,

    #[error("tile catalog defines '{0}' more than once")]
    DuplicateTile(String),

    #[error("tile '{tile}' lists unknown tile '{unknown}' as a {direction} neighbor")]
    UnknownTile {
        tile: String,
        unknown: String,
        direction: Direction,
    },

    #[error("tile '{tile}' has no compatible neighbor to the {direction}")]
    NoCompatibleNeighbor { tile: String, direction: Direction },

    #[error("tile catalog has {0} tiles; at most 65536 are supported")]
    TooManyTiles(usize),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of a single WFC solve.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WfcError {
    #[error("contradiction: cell ({x}, {y}) has no remaining candidates")]
    Contradiction { x: usize, y: usize },

    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },

    #[error("cell ({x}, {y}) is already collapsed")]
    AlreadyCollapsed { x: usize, y: usize },

    #[error("tile '{tile}' is not a candidate of cell ({x}, {y})")]
    NotAdmissible { x: usize, y: usize, tile: String },

    #[error("grid still has uncollapsed cells")]
    Incomplete,
}

/// Failures of room graph generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("only {best} rooms after {attempts} attempts (minimum is {min_rooms})")]
    TooFewRooms {
        attempts: usize,
        min_rooms: usize,
        best: usize,
    },

    #[error("room generation has not finished")]
    Unfinished,
}

/// Top-level error of the level pipeline and its exports.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("room {room}: {source}")]
    Wfc {
        room: usize,
        #[source]
        source: WfcError,
    },

    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}
