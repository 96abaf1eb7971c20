//! Dungeon level generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod config;
pub mod direction;
pub mod error;
pub mod export;
pub mod level;
pub mod rooms;
pub mod seeds;
pub mod step;
pub mod tilemap;
pub mod tiles;
pub mod wfc;

pub use config::{InteriorConfig, LayoutConfig, LevelConfig};
pub use error::{ConfigError, GenerationError, LevelError, WfcError};
pub use level::{generate_level, Level};
pub use seeds::LevelSeeds;
pub use tiles::TileCatalog;
