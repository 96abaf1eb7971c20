use crate::direction::Direction;
use crate::tiles::{TileCatalog, TileId};
use crate::tilemap::Tilemap;

/// A fully resolved room interior: exactly one tile per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Tilemap<TileId>,
}

/// A pair of adjacent cells whose tiles break the rule table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleViolation {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub direction: Direction,
}

impl TileGrid {
    pub(crate) fn new(tiles: Tilemap<TileId>) -> Self {
        Self { tiles }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn get(&self, x: usize, y: usize) -> TileId {
        *self.tiles.get(x, y)
    }

    /// Row-major tile ids, row `y = 0` first
    pub fn as_slice(&self) -> &[TileId] {
        self.tiles.as_slice()
    }

    pub fn tilemap(&self) -> &Tilemap<TileId> {
        &self.tiles
    }

    /// Row-major tile names
    pub fn names<'a>(&self, catalog: &'a TileCatalog) -> Vec<&'a str> {
        self.tiles.as_slice().iter().map(|&t| catalog.name(t)).collect()
    }

    /// Every adjacent pair where the neighbor is not allowed by the source
    /// tile's rule in the shared direction.
    pub fn violations(&self, catalog: &TileCatalog) -> Vec<RuleViolation> {
        let mut found = Vec::new();
        for (x, y, &tile) in self.tiles.iter() {
            for (dir, nx, ny) in self.tiles.neighbors(x, y) {
                if !catalog.allows(tile, dir, *self.tiles.get(nx, ny)) {
                    found.push(RuleViolation {
                        from: (x, y),
                        to: (nx, ny),
                        direction: dir,
                    });
                }
            }
        }
        found
    }

    /// Count of each tile, indexed by `TileId::index()`
    pub fn histogram(&self, catalog: &TileCatalog) -> Vec<usize> {
        let mut counts = vec![0; catalog.len()];
        for tile in self.tiles.as_slice() {
            counts[tile.index()] += 1;
        }
        counts
    }
}
