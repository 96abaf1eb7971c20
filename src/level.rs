//! Full level pipeline: room graph, junction pass, then one WFC interior per
//! room.
//!
//! Interiors are solved in parallel with rayon. Each room gets its own
//! `ChaCha8Rng` seeded from `LevelSeeds::room`, so the output is identical
//! whichever thread solves which room.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::LevelConfig;
use crate::direction::Direction;
use crate::error::LevelError;
use crate::rooms::{generate, reclassify, RoomCell, RoomGraph};
use crate::seeds::LevelSeeds;
use crate::tiles::{TileCatalog, TileId};
use crate::wfc::{solve_with_retries, SolveError, TileGrid};

/// What occupies one tile of a room footprint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footprint {
    Tile(TileId),
    Corner,
    HorizontalWall,
    VerticalWall,
    Door,
    /// Between the walls and a smaller interior
    Empty,
}

/// A generated level. `interiors[i]` belongs to `graph.room(i)`.
#[derive(Clone, Debug)]
pub struct Level {
    pub seeds: LevelSeeds,
    pub config: LevelConfig,
    pub graph: RoomGraph,
    pub interiors: Vec<TileGrid>,
}

impl Level {
    pub fn room_count(&self) -> usize {
        self.graph.room_count()
    }

    /// Rooms paired with their interiors, in claim order
    pub fn rooms(&self) -> impl Iterator<Item = (&RoomCell, &TileGrid)> {
        self.graph.rooms().iter().zip(self.interiors.iter())
    }

    /// World-space offset of room `index`, in tiles
    pub fn world_origin(&self, index: usize) -> (i64, i64) {
        let room = self.graph.room(index);
        self.graph.world_origin(
            room.x,
            room.y,
            self.config.layout.room_width,
            self.config.layout.room_height,
        )
    }

    /// Contents of local footprint tile `(lx, ly)` of room `index`, y-up.
    /// The interior is centered and the walls run along the footprint edge,
    /// with a one-tile door gap in the middle of each side that has a door.
    pub fn footprint(&self, index: usize, lx: usize, ly: usize) -> Footprint {
        let w = self.config.layout.room_width;
        let h = self.config.layout.room_height;
        let interior = &self.interiors[index];
        let ox = (w - interior.width()) / 2;
        let oy = (h - interior.height()) / 2;

        if (ox..ox + interior.width()).contains(&lx) && (oy..oy + interior.height()).contains(&ly) {
            return Footprint::Tile(interior.get(lx - ox, ly - oy));
        }

        let doors = self.graph.room(index).doors;
        let left = lx == 0;
        let right = lx + 1 == w;
        let bottom = ly == 0;
        let top = ly + 1 == h;

        let side = match (left, right, bottom, top) {
            (true, _, true, _) | (true, _, _, true) | (_, true, true, _) | (_, true, _, true) => {
                return Footprint::Corner
            }
            (_, _, _, true) => Direction::North,
            (_, _, true, _) => Direction::South,
            (_, true, _, _) => Direction::East,
            (true, _, _, _) => Direction::West,
            _ => return Footprint::Empty,
        };

        let middle = match side {
            Direction::North | Direction::South => lx == w / 2,
            Direction::East | Direction::West => ly == h / 2,
        };
        if middle && doors.is_open(side) {
            Footprint::Door
        } else if matches!(side, Direction::North | Direction::South) {
            Footprint::HorizontalWall
        } else {
            Footprint::VerticalWall
        }
    }

    /// `(min_x, min_y, max_x, max_y)` of the occupied room cells
    pub fn occupied_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let rooms = self.graph.rooms();
        let first = rooms.first()?;
        let mut bounds = (first.x, first.y, first.x, first.y);
        for room in rooms {
            bounds.0 = bounds.0.min(room.x);
            bounds.1 = bounds.1.min(room.y);
            bounds.2 = bounds.2.max(room.x);
            bounds.3 = bounds.3.max(room.y);
        }
        Some(bounds)
    }
}

/// Generate a complete level.
pub fn generate_level(
    config: &LevelConfig,
    catalog: &TileCatalog,
    seeds: &LevelSeeds,
) -> Result<Level, LevelError> {
    config.validate()?;
    info!(seeds = %seeds, "generating level");

    let mut rng = ChaCha8Rng::seed_from_u64(seeds.layout);
    let mut graph = generate(&config.layout, &mut rng)?;
    reclassify(&mut graph);

    let interior = &config.interior;
    let solved: Vec<Result<TileGrid, SolveError>> = (0..graph.room_count())
        .into_par_iter()
        .map(|room| {
            let mut rng = ChaCha8Rng::seed_from_u64(seeds.room(room));
            let result = solve_with_retries(
                interior.width,
                interior.height,
                catalog,
                interior.tie_break,
                interior.attempts,
                &mut rng,
            );
            debug!(room, ok = result.is_ok(), "room interior solved");
            result
        })
        .collect();

    let mut interiors = Vec::with_capacity(solved.len());
    for (room, result) in solved.into_iter().enumerate() {
        match result {
            Ok(grid) => interiors.push(grid),
            Err(SolveError::Config(err)) => return Err(err.into()),
            Err(SolveError::Wfc(source)) => return Err(LevelError::Wfc { room, source }),
        }
    }

    info!(rooms = graph.room_count(), "level complete");
    Ok(Level {
        seeds: *seeds,
        config: config.clone(),
        graph,
        interiors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InteriorConfig, LayoutConfig};
    use crate::error::{GenerationError, WfcError};

    fn small_config() -> LevelConfig {
        LevelConfig {
            layout: LayoutConfig {
                grid_width: 8,
                grid_height: 8,
                min_rooms: 3,
                max_rooms: 6,
                ..LayoutConfig::default()
            },
            interior: InteriorConfig {
                width: 5,
                height: 5,
                ..InteriorConfig::default()
            },
        }
    }

    #[test]
    fn test_level_has_one_interior_per_room() {
        let catalog = TileCatalog::uniform("floor");
        let level = generate_level(&small_config(), &catalog, &LevelSeeds::from_master(5)).unwrap();
        assert_eq!(level.interiors.len(), level.room_count());
        for (_, grid) in level.rooms() {
            assert_eq!((grid.width(), grid.height()), (5, 5));
        }
        assert!(level.graph.is_connected());
    }

    #[test]
    fn test_same_seeds_same_level() {
        let catalog = TileCatalog::defaults().unwrap();
        let config = small_config();
        let run = || {
            generate_level(&config, &catalog, &LevelSeeds::from_master(2024))
                .map(|level| (level.graph.rooms().to_vec(), level.interiors))
                .ok()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_seed_room_at_world_origin() {
        let catalog = TileCatalog::uniform("floor");
        let level = generate_level(&small_config(), &catalog, &LevelSeeds::from_master(8)).unwrap();
        assert_eq!(level.world_origin(0), (0, 0));
    }

    #[test]
    fn test_footprint_walls_and_doors() {
        let mut config = small_config();
        config.layout.room_width = 7;
        config.layout.room_height = 7;
        let catalog = TileCatalog::uniform("floor");
        let level = generate_level(&config, &catalog, &LevelSeeds::from_master(31)).unwrap();
        let floor = catalog.id("floor").unwrap();

        for (index, (room, _)) in level.rooms().enumerate() {
            assert_eq!(level.footprint(index, 0, 0), Footprint::Corner);
            assert_eq!(level.footprint(index, 3, 3), Footprint::Tile(floor));
            assert_eq!(level.footprint(index, 1, 1), Footprint::Tile(floor));
            // Interior 5x5 inside 7x7 leaves exactly the wall ring
            let north = level.footprint(index, 3, 6);
            if room.doors.is_open(Direction::North) {
                assert_eq!(north, Footprint::Door);
            } else {
                assert_eq!(north, Footprint::HorizontalWall);
            }
            assert_eq!(level.footprint(index, 0, 1), Footprint::VerticalWall);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.interior.width = 20;
        let result = generate_level(&config, &TileCatalog::uniform("floor"), &LevelSeeds::from_master(1));
        assert!(matches!(result, Err(LevelError::Config(_))));
    }

    #[test]
    fn test_layout_failure_propagates() {
        let mut config = small_config();
        config.layout.grid_width = 1;
        config.layout.grid_height = 2;
        config.layout.max_attempts = 3;
        let result = generate_level(&config, &TileCatalog::uniform("floor"), &LevelSeeds::from_master(1));
        assert!(matches!(
            result,
            Err(LevelError::Generation(GenerationError::TooFewRooms { .. }))
        ));
    }

    #[test]
    fn test_wfc_error_carries_room_index() {
        let err = LevelError::Wfc {
            room: 4,
            source: WfcError::Contradiction { x: 1, y: 2 },
        };
        assert_eq!(
            err.to_string(),
            "room 4: contradiction: cell (1, 2) has no remaining candidates"
        );
    }
}
