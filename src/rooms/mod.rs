//! Room graph: which grid cells hold rooms and how they connect
//!
//! Rooms are claimed by the frontier generator (`generator`) and later
//! retagged by the junction pass (`reclassify`).

pub mod generator;
pub mod reclassify;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, DoorMask};
use crate::tilemap::Tilemap;

pub use generator::{generate, RoomGenerator};
pub use reclassify::reclassify;

/// Room shape, chosen from how many neighbors a room connects to and in
/// which directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomArchetype {
    /// Plain room (0 or 1 connection at claim time)
    Standard,
    /// Junction room (2 connections at claim time)
    Cross,
    /// Connects north and south
    Vertical,
    /// Connects east and west
    Horizontal,
    BendNorthWest,
    BendNorthEast,
    BendSouthWest,
    BendSouthEast,
}

impl RoomArchetype {
    pub fn all() -> &'static [RoomArchetype] {
        &[
            RoomArchetype::Standard,
            RoomArchetype::Cross,
            RoomArchetype::Vertical,
            RoomArchetype::Horizontal,
            RoomArchetype::BendNorthWest,
            RoomArchetype::BendNorthEast,
            RoomArchetype::BendSouthWest,
            RoomArchetype::BendSouthEast,
        ]
    }

    /// Archetype for a freshly claimed room
    pub fn from_neighbor_count(count: usize) -> Self {
        match count {
            2 => RoomArchetype::Cross,
            _ => RoomArchetype::Standard,
        }
    }

    /// Orientation variant for a room with exactly two connections
    pub fn junction(connections: DoorMask) -> Option<Self> {
        if connections.count() != 2 {
            return None;
        }
        let north = connections.is_open(Direction::North);
        let south = connections.is_open(Direction::South);
        let east = connections.is_open(Direction::East);
        let west = connections.is_open(Direction::West);

        let archetype = match (north, south, east, west) {
            (true, true, _, _) => RoomArchetype::Vertical,
            (_, _, true, true) => RoomArchetype::Horizontal,
            (true, _, _, true) => RoomArchetype::BendNorthWest,
            (true, _, true, _) => RoomArchetype::BendNorthEast,
            (_, true, _, true) => RoomArchetype::BendSouthWest,
            _ => RoomArchetype::BendSouthEast,
        };
        Some(archetype)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomArchetype::Standard => "Standard",
            RoomArchetype::Cross => "Cross",
            RoomArchetype::Vertical => "Vertical",
            RoomArchetype::Horizontal => "Horizontal",
            RoomArchetype::BendNorthWest => "Bend NW",
            RoomArchetype::BendNorthEast => "Bend NE",
            RoomArchetype::BendSouthWest => "Bend SW",
            RoomArchetype::BendSouthEast => "Bend SE",
        }
    }
}

/// A claimed grid cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomCell {
    pub x: usize,
    pub y: usize,
    pub archetype: RoomArchetype,
    pub doors: DoorMask,
    /// Claim order, starting at 0 for the seed room
    pub age: usize,
}

/// Occupancy grid plus the rooms in the order they were claimed
#[derive(Clone, Debug)]
pub struct RoomGraph {
    seed: (usize, usize),
    occupancy: Tilemap<Option<usize>>,
    rooms: Vec<RoomCell>,
}

impl RoomGraph {
    /// Empty graph. `seed` is where growth starts; it is not claimed yet.
    pub fn new(width: usize, height: usize, seed: (usize, usize)) -> Self {
        Self {
            seed,
            occupancy: Tilemap::new(width, height),
            rooms: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.occupancy.width
    }

    pub fn height(&self) -> usize {
        self.occupancy.height
    }

    pub fn seed(&self) -> (usize, usize) {
        self.seed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn rooms(&self) -> &[RoomCell] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> &RoomCell {
        &self.rooms[index]
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        matches!(self.occupancy.try_get(x, y), Some(Some(_)))
    }

    pub fn room_index_at(&self, x: usize, y: usize) -> Option<usize> {
        self.occupancy.try_get(x, y).copied().flatten()
    }

    pub fn room_at(&self, x: usize, y: usize) -> Option<&RoomCell> {
        self.room_index_at(x, y).map(|i| &self.rooms[i])
    }

    /// Directions from `(x, y)` that lead to an occupied cell
    pub fn occupied_neighbors(&self, x: usize, y: usize) -> DoorMask {
        let mut mask = DoorMask::NONE;
        for (dir, nx, ny) in self.occupancy.neighbors(x, y) {
            if self.is_occupied(nx, ny) {
                mask.open(dir);
            }
        }
        mask
    }

    pub fn neighbor_count(&self, x: usize, y: usize) -> usize {
        self.occupied_neighbors(x, y).count()
    }

    /// Claim `(x, y)` and open doors to its occupied neighbors.
    /// Returns None if the cell is outside the grid or already taken.
    pub fn claim(&mut self, x: usize, y: usize, archetype: RoomArchetype) -> Option<usize> {
        if !self.occupancy.in_bounds(x, y) || self.is_occupied(x, y) {
            return None;
        }
        let index = self.rooms.len();
        self.rooms.push(RoomCell {
            x,
            y,
            archetype,
            doors: DoorMask::NONE,
            age: index,
        });
        self.occupancy.set(x, y, Some(index));
        self.open_doors(index);
        Some(index)
    }

    pub(crate) fn set_archetype(&mut self, index: usize, archetype: RoomArchetype) {
        self.rooms[index].archetype = archetype;
    }

    /// Open a door on both sides between room `index` and every occupied
    /// neighbor.
    pub(crate) fn open_doors(&mut self, index: usize) {
        let (x, y) = (self.rooms[index].x, self.rooms[index].y);
        let around: Vec<_> = self.occupancy.neighbors(x, y).collect();
        for (dir, nx, ny) in around {
            if let Some(other) = self.room_index_at(nx, ny) {
                self.rooms[index].doors.open(dir);
                self.rooms[other].doors.open(dir.opposite());
            }
        }
    }

    /// Every room reachable from the seed through occupied neighbors.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.room_index_at(self.seed.0, self.seed.1) else {
            return self.rooms.is_empty();
        };

        let mut seen = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        let mut reached = 1;

        while let Some(index) = queue.pop_front() {
            let room = &self.rooms[index];
            for (_, nx, ny) in self.occupancy.neighbors(room.x, room.y) {
                if let Some(next) = self.room_index_at(nx, ny) {
                    if !seen[next] {
                        seen[next] = true;
                        reached += 1;
                        queue.push_back(next);
                    }
                }
            }
        }

        reached == self.rooms.len()
    }

    /// For every open door A -> B, B has the door B -> A.
    pub fn doors_are_reciprocal(&self) -> bool {
        self.rooms.iter().all(|room| {
            room.doors.directions().all(|dir| {
                dir.step(room.x, room.y, self.width(), self.height())
                    .and_then(|(nx, ny)| self.room_at(nx, ny))
                    .is_some_and(|other| other.doors.is_open(dir.opposite()))
            })
        })
    }

    /// Offset of a room's footprint from the grid center, in tiles
    pub fn world_origin(&self, x: usize, y: usize, room_width: usize, room_height: usize) -> (i64, i64) {
        let ox = room_width as i64 * (x as i64 - (self.width() / 2) as i64);
        let oy = room_height as i64 * (y as i64 - (self.height() / 2) as i64);
        (ox, oy)
    }
}
