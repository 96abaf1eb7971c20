//! Cardinal directions and door masks
//!
//! Both grids in this crate use the same convention: `x` grows east and
//! `y` grows north.

use serde::{Deserialize, Serialize};

/// One of the four grid directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions, in rule-table order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Frontier expansion order: left, right, up, down
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset (dx, dy)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Index into per-direction arrays (matches `ALL`)
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// Step from `(x, y)` inside a `width` x `height` grid.
    /// Returns None when the step leaves the grid.
    pub fn step(self, x: usize, y: usize, width: usize, height: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.offset();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 4-bit set of open doors on a room
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DoorMask(u8);

impl DoorMask {
    pub const NONE: DoorMask = DoorMask(0);

    pub fn from_directions(dirs: &[Direction]) -> Self {
        let mut mask = DoorMask::NONE;
        for &dir in dirs {
            mask.open(dir);
        }
        mask
    }

    pub fn open(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Open directions, in `Direction::ALL` order
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| self.is_open(*d))
    }
}

/// Serializable view of a door mask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDoors {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl From<DoorMask> for OpenDoors {
    fn from(mask: DoorMask) -> Self {
        Self {
            north: mask.is_open(Direction::North),
            south: mask.is_open(Direction::South),
            east: mask.is_open(Direction::East),
            west: mask.is_open(Direction::West),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_offsets_cancel() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_step_stays_in_bounds() {
        assert_eq!(Direction::West.step(0, 0, 3, 3), None);
        assert_eq!(Direction::South.step(0, 0, 3, 3), None);
        assert_eq!(Direction::North.step(1, 1, 3, 3), Some((1, 2)));
        assert_eq!(Direction::East.step(2, 1, 3, 3), None);
    }

    #[test]
    fn test_door_mask() {
        let mut mask = DoorMask::NONE;
        mask.open(Direction::North);
        mask.open(Direction::East);
        mask.open(Direction::North);

        assert_eq!(mask.count(), 2);
        assert!(mask.is_open(Direction::East));
        assert!(!mask.is_open(Direction::West));
        assert_eq!(
            mask.directions().collect::<Vec<_>>(),
            vec![Direction::North, Direction::East]
        );

        let doors = OpenDoors::from(mask);
        assert!(doors.north && doors.east && !doors.south && !doors.west);
    }
}
