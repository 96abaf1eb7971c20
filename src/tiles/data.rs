//! JSON tile catalog format.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::ConfigError;

/// Embedded default catalog
pub const DEFAULT_TILES_JSON: &str = include_str!("../../data/defaults/tiles.json");

/// Top-level catalog file: `{ "tiles": [ ... ] }`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TilesFile {
    pub tiles: Vec<TileDefinition>,
}

/// A tile as written in a catalog file. Neighbor lists name other tiles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileDefinition {
    pub name: String,
    #[serde(default = "default_glyph")]
    pub glyph: char,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    #[serde(default)]
    pub north: Vec<String>,
    #[serde(default)]
    pub south: Vec<String>,
    #[serde(default)]
    pub east: Vec<String>,
    #[serde(default)]
    pub west: Vec<String>,
}

fn default_glyph() -> char {
    '?'
}

fn default_color() -> [u8; 3] {
    [255, 0, 255]
}

impl TileDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyph: default_glyph(),
            color: default_color(),
            north: Vec::new(),
            south: Vec::new(),
            east: Vec::new(),
            west: Vec::new(),
        }
    }

    pub fn glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set the allowed neighbors in one direction
    pub fn allow(mut self, direction: Direction, names: &[&str]) -> Self {
        let list: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        *self.neighbors_mut(direction) = list;
        self
    }

    /// Set the same allowed neighbors in every direction
    pub fn allow_all(mut self, names: &[&str]) -> Self {
        for dir in Direction::ALL {
            self = self.allow(dir, names);
        }
        self
    }

    pub fn neighbors(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::East => &self.east,
            Direction::West => &self.west,
        }
    }

    fn neighbors_mut(&mut self, direction: Direction) -> &mut Vec<String> {
        match direction {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
        }
    }
}

impl TilesFile {
    pub fn parse(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }
}
