//! Seed management for level generation
//!
//! The layout and the room interiors get separate seeds, derived from a
//! master seed by default. Each room then gets its own seed derived from the
//! tiles seed and its index, so every room solve owns an independent random
//! stream and the result does not depend on the order rooms are solved in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Seeds for every generation stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Room graph growth
    pub layout: u64,
    /// Room interiors (WFC)
    pub tiles: u64,
}

impl LevelSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            layout: derive_seed(master, "layout"),
            tiles: derive_seed(master, "tiles"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> LevelSeedsBuilder {
        LevelSeedsBuilder::new(master)
    }

    /// Seed for the interior of room `index`
    pub fn room(&self, index: usize) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tiles.hash(&mut hasher);
        "room".hash(&mut hasher);
        index.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for LevelSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual seeds while deriving others from master
pub struct LevelSeedsBuilder {
    seeds: LevelSeeds,
}

impl LevelSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: LevelSeeds::from_master(master),
        }
    }

    /// Override the layout seed
    pub fn layout(mut self, seed: u64) -> Self {
        self.seeds.layout = seed;
        self
    }

    /// Override the tiles seed
    pub fn tiles(mut self, seed: u64) -> Self {
        self.seeds.tiles = seed;
        self
    }

    pub fn build(self) -> LevelSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for LevelSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LevelSeeds {{ master: {}, layout: {}, tiles: {} }}",
            self.master, self.layout, self.tiles,
        )
    }
}
