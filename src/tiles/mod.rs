//! Tile rule table
//!
//! The catalog is loaded once and shared read-only by every solver. Tile
//! names are resolved to `TileId` indices at load time, so rule lookups
//! during propagation are plain array indexing.

pub mod data;

use std::collections::HashMap;
use std::path::Path;

use crate::direction::Direction;
use crate::error::ConfigError;

pub use data::{TileDefinition, TilesFile, DEFAULT_TILES_JSON};

/// Stable identity of a tile type: its index in the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u16);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An immutable catalog entry
#[derive(Clone, Debug)]
pub struct TileType {
    pub id: TileId,
    pub name: String,
    pub glyph: char,
    pub color: [u8; 3],
    /// Allowed neighbors per direction, indexed by `Direction::index()`, sorted
    neighbors: [Vec<TileId>; 4],
}

impl TileType {
    pub fn neighbors(&self, direction: Direction) -> &[TileId] {
        &self.neighbors[direction.index()]
    }

    pub fn allows(&self, direction: Direction, other: TileId) -> bool {
        self.neighbors(direction).binary_search(&other).is_ok()
    }
}

/// The closed set of tile types plus their adjacency rules
#[derive(Clone, Debug)]
pub struct TileCatalog {
    tiles: Vec<TileType>,
    by_name: HashMap<String, TileId>,
}

impl TileCatalog {
    /// Build and validate a catalog from definitions.
    pub fn from_definitions(definitions: Vec<TileDefinition>) -> Result<Self, ConfigError> {
        if definitions.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let count = definitions.len();
        let mut by_name = HashMap::with_capacity(count);
        let mut ids = Vec::with_capacity(count);
        for (i, def) in definitions.iter().enumerate() {
            let id = u16::try_from(i).map(TileId).map_err(|_| ConfigError::TooManyTiles(count))?;
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateTile(def.name.clone()));
            }
            ids.push(id);
        }

        let mut tiles = Vec::with_capacity(count);
        for (id, def) in ids.into_iter().zip(definitions) {
            let mut neighbors: [Vec<TileId>; 4] = Default::default();
            for dir in Direction::ALL {
                let mut ids = Vec::with_capacity(def.neighbors(dir).len());
                for name in def.neighbors(dir) {
                    let id = *by_name.get(name).ok_or_else(|| ConfigError::UnknownTile {
                        tile: def.name.clone(),
                        unknown: name.clone(),
                        direction: dir,
                    })?;
                    ids.push(id);
                }
                ids.sort();
                ids.dedup();
                if ids.is_empty() {
                    return Err(ConfigError::NoCompatibleNeighbor {
                        tile: def.name.clone(),
                        direction: dir,
                    });
                }
                neighbors[dir.index()] = ids;
            }

            tiles.push(TileType {
                id,
                name: def.name,
                glyph: def.glyph,
                color: def.color,
                neighbors,
            });
        }

        Ok(Self { tiles, by_name })
    }

    /// The embedded default dungeon catalog.
    pub fn defaults() -> Result<Self, ConfigError> {
        let file = TilesFile::parse(DEFAULT_TILES_JSON, Path::new("<embedded tiles.json>"))?;
        Self::from_definitions(file.tiles)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_definitions(TilesFile::load(path)?.tiles)
    }

    /// A single tile that may sit next to itself in every direction.
    pub fn uniform(name: &str) -> Self {
        let id = TileId(0);
        let tile = TileType {
            id,
            name: name.to_string(),
            glyph: '.',
            color: [200, 200, 200],
            neighbors: [vec![id], vec![id], vec![id], vec![id]],
        };
        let mut by_name = HashMap::new();
        by_name.insert(name.to_string(), id);
        Self { tiles: vec![tile], by_name }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: TileId) -> &TileType {
        &self.tiles[id.index()]
    }

    pub fn id(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TileId) -> &str {
        &self.tiles[id.index()].name
    }

    /// All tile ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// Tiles allowed next to `tile` in `direction`.
    pub fn neighbors(&self, tile: TileId, direction: Direction) -> &[TileId] {
        self.tiles[tile.index()].neighbors(direction)
    }

    pub fn allows(&self, tile: TileId, direction: Direction, other: TileId) -> bool {
        self.tiles[tile.index()].allows(direction, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn east_only_pair() -> Vec<TileDefinition> {
        vec![
            TileDefinition::new("a")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["a"])
                .allow(Direction::West, &["a"]),
            TileDefinition::new("b")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["b"])
                .allow(Direction::West, &["b"]),
        ]
    }

    #[test]
    fn test_default_catalog_loads() {
        let catalog = TileCatalog::defaults().unwrap();
        assert!(catalog.len() >= 2);
        let stone = catalog.id("stone").unwrap();
        let ledge = catalog.id("ledge").unwrap();
        assert!(catalog.allows(stone, Direction::South, ledge));
        assert!(catalog.allows(ledge, Direction::North, stone));
        assert!(!catalog.allows(ledge, Direction::South, stone));
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = TileCatalog::from_definitions(east_only_pair()).unwrap();
        let a = catalog.id("a").unwrap();
        let b = catalog.id("b").unwrap();
        assert_eq!(catalog.name(b), "b");
        assert_eq!(catalog.neighbors(a, Direction::East), &[a]);
        assert_eq!(catalog.neighbors(a, Direction::North), &[a, b]);
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(
            TileCatalog::from_definitions(Vec::new()),
            Err(ConfigError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_rejects_unknown_neighbor() {
        let defs = vec![TileDefinition::new("a").allow_all(&["a", "ghost"])];
        let err = TileCatalog::from_definitions(defs).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTile { ref unknown, .. } if unknown == "ghost"));
    }

    #[test]
    fn test_rejects_missing_direction() {
        let defs = vec![TileDefinition::new("a")
            .allow_all(&["a"])
            .allow(Direction::West, &[])];
        let err = TileCatalog::from_definitions(defs).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoCompatibleNeighbor { direction: Direction::West, .. }
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let defs = vec![
            TileDefinition::new("a").allow_all(&["a"]),
            TileDefinition::new("a").allow_all(&["a"]),
        ];
        assert!(matches!(
            TileCatalog::from_definitions(defs),
            Err(ConfigError::DuplicateTile(_))
        ));
    }

    #[test]
    fn test_accepts_one_sided_rules() {
        let defs = vec![
            TileDefinition::new("a")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["a"]),
            TileDefinition::new("b")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["b"]),
        ];
        let catalog = TileCatalog::from_definitions(defs).unwrap();
        let a = catalog.id("a").unwrap();
        let b = catalog.id("b").unwrap();
        assert!(!catalog.allows(a, Direction::East, b));
        assert!(catalog.allows(b, Direction::West, a));
    }

    #[test]
    fn test_rejects_too_many_tiles() {
        let defs: Vec<_> = (0..=u16::MAX as usize + 1)
            .map(|i| TileDefinition::new(format!("t{i}")))
            .collect();
        assert!(matches!(
            TileCatalog::from_definitions(defs),
            Err(ConfigError::TooManyTiles(65537))
        ));
    }

    #[test]
    fn test_uniform_catalog() {
        let catalog = TileCatalog::uniform("floor");
        let floor = catalog.id("floor").unwrap();
        for dir in Direction::ALL {
            assert!(catalog.allows(floor, dir, floor));
        }
    }
}
