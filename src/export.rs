//! JSON and PNG export of generated levels

use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::direction::OpenDoors;
use crate::error::LevelError;
use crate::level::{Footprint, Level};
use crate::rooms::RoomArchetype;
use crate::seeds::LevelSeeds;
use crate::tiles::TileCatalog;

const WALL_COLOR: [u8; 3] = [48, 44, 40];
const DOOR_COLOR: [u8; 3] = [150, 110, 60];
const EMPTY_COLOR: [u8; 3] = [0, 0, 0];

/// Serialized form of a whole level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub seeds: LevelSeeds,
    pub grid_width: usize,
    pub grid_height: usize,
    pub room_width: usize,
    pub room_height: usize,
    pub interior_width: usize,
    pub interior_height: usize,
    pub rooms: Vec<RoomRecord>,
}

/// Serialized form of one room
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub index: usize,
    pub x: usize,
    pub y: usize,
    pub world_origin: (i64, i64),
    pub archetype: RoomArchetype,
    pub open_doors: OpenDoors,
    pub age: usize,
    /// Row-major tile names, row `y = 0` first
    pub tiles: Vec<String>,
}

impl LevelRecord {
    pub fn from_level(level: &Level, catalog: &TileCatalog) -> Self {
        let rooms = level
            .rooms()
            .enumerate()
            .map(|(index, (room, interior))| RoomRecord {
                index,
                x: room.x,
                y: room.y,
                world_origin: level.world_origin(index),
                archetype: room.archetype,
                open_doors: room.doors.into(),
                age: room.age,
                tiles: interior.names(catalog).into_iter().map(str::to_string).collect(),
            })
            .collect();

        Self {
            seeds: level.seeds,
            grid_width: level.config.layout.grid_width,
            grid_height: level.config.layout.grid_height,
            room_width: level.config.layout.room_width,
            room_height: level.config.layout.room_height,
            interior_width: level.config.interior.width,
            interior_height: level.config.interior.height,
            rooms,
        }
    }
}

/// Export a level as pretty-printed JSON.
pub fn export_level_json(level: &Level, catalog: &TileCatalog, path: &str) -> Result<(), LevelError> {
    let record = LevelRecord::from_level(level, catalog);
    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn footprint_color(cell: Footprint, catalog: &TileCatalog) -> [u8; 3] {
    match cell {
        Footprint::Tile(tile) => catalog.get(tile).color,
        Footprint::Corner | Footprint::HorizontalWall | Footprint::VerticalWall => WALL_COLOR,
        Footprint::Door => DOOR_COLOR,
        Footprint::Empty => EMPTY_COLOR,
    }
}

/// Render the level map: every footprint tile becomes a `scale` x `scale`
/// block, north up, cropped to the occupied part of the room grid.
pub fn render_level_image(level: &Level, catalog: &TileCatalog, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let Some((min_x, min_y, max_x, max_y)) = level.occupied_bounds() else {
        return ImageBuffer::new(1, 1);
    };

    let room_w = level.config.layout.room_width;
    let room_h = level.config.layout.room_height;
    let cols = (max_x - min_x + 1) * room_w;
    let rows = (max_y - min_y + 1) * room_h;
    let mut img: RgbImage = ImageBuffer::from_pixel(cols as u32 * scale, rows as u32 * scale, Rgb(EMPTY_COLOR));

    for (index, room) in level.graph.rooms().iter().enumerate() {
        let col0 = (room.x - min_x) * room_w;
        let row0 = (max_y - room.y) * room_h;
        for ly in 0..room_h {
            for lx in 0..room_w {
                let color = Rgb(footprint_color(level.footprint(index, lx, ly), catalog));
                let px = (col0 + lx) as u32 * scale;
                let py = (row0 + room_h - 1 - ly) as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(px + dx, py + dy, color);
                    }
                }
            }
        }
    }

    img
}

/// Export the level map as a PNG.
pub fn export_level_png(level: &Level, catalog: &TileCatalog, path: &str, scale: u32) -> Result<(), image::ImageError> {
    render_level_image(level, catalog, scale).save(path)
}
