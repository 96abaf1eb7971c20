//! Level configuration
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes. The defaults describe the standard level: a 20x20 room
//! grid holding 10 to 15 rooms of 11x11 tiles.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::wfc::TieBreak;

/// Room graph parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Where growth starts. Defaults to the grid center.
    pub seed_room: Option<(usize, usize)>,
    pub min_rooms: usize,
    pub max_rooms: usize,
    /// Chance that a candidate neighbor is skipped
    pub rejection_probability: f64,
    /// Full regenerations allowed before giving up
    pub max_attempts: usize,
    /// Room footprint in tiles, used to place rooms in world space
    pub room_width: usize,
    pub room_height: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            seed_room: None,
            min_rooms: 10,
            max_rooms: 15,
            rejection_probability: 0.5,
            max_attempts: 1000,
            room_width: 11,
            room_height: 11,
        }
    }
}

impl LayoutConfig {
    pub fn seed_coordinate(&self) -> (usize, usize) {
        self.seed_room
            .unwrap_or((self.grid_width / 2, self.grid_height / 2))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 {
            return Err(ConfigError::ZeroDimension { what: "grid width" });
        }
        if self.grid_height == 0 {
            return Err(ConfigError::ZeroDimension { what: "grid height" });
        }
        if self.room_width == 0 {
            return Err(ConfigError::ZeroDimension { what: "room width" });
        }
        if self.room_height == 0 {
            return Err(ConfigError::ZeroDimension { what: "room height" });
        }
        if self.min_rooms == 0 {
            return Err(ConfigError::ZeroDimension { what: "min_rooms" });
        }
        if self.min_rooms > self.max_rooms {
            return Err(ConfigError::RoomBounds {
                min: self.min_rooms,
                max: self.max_rooms,
            });
        }
        let (x, y) = self.seed_coordinate();
        if x >= self.grid_width || y >= self.grid_height {
            return Err(ConfigError::SeedOutOfBounds {
                x,
                y,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if !(0.0..1.0).contains(&self.rejection_probability) {
            return Err(ConfigError::InvalidProbability(self.rejection_probability));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts { what: "room generation" });
        }
        Ok(())
    }
}

/// Room interior (WFC) parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteriorConfig {
    pub width: usize,
    pub height: usize,
    /// Solves tried per room; 1 means no restart after a contradiction
    pub attempts: usize,
    pub tie_break: TieBreak,
}

impl Default for InteriorConfig {
    fn default() -> Self {
        Self {
            width: 9,
            height: 9,
            attempts: 10,
            tie_break: TieBreak::Random,
        }
    }
}

impl InteriorConfig {
    pub fn validate(&self, layout: &LayoutConfig) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension { what: "interior width" });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension { what: "interior height" });
        }
        if self.width > layout.room_width || self.height > layout.room_height {
            return Err(ConfigError::InteriorTooLarge {
                interior: (self.width, self.height),
                room: (layout.room_width, layout.room_height),
            });
        }
        if self.attempts == 0 {
            return Err(ConfigError::ZeroAttempts { what: "wfc" });
        }
        Ok(())
    }
}

/// Complete level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub layout: LayoutConfig,
    pub interior: InteriorConfig,
}

impl LevelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.interior.validate(&self.layout)
    }
}
