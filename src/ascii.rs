//! ASCII rendering and export for generated levels
//!
//! All renderers draw north up: the highest `y` row comes first.

use std::fs::File;
use std::io::{self, Write};

use crate::level::{Footprint, Level};
use crate::rooms::{RoomArchetype, RoomGraph};
use crate::tiles::TileCatalog;
use crate::wfc::TileGrid;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AsciiMode {
    /// One character per room grid cell
    Layout,
    /// Every room footprint with walls, doors and interior tiles
    Level,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Layout => "Layout",
            AsciiMode::Level => "Level",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Layout, AsciiMode::Level]
    }
}

const EMPTY: char = ' ';
const CORNER: char = '+';
const WALL_H: char = '-';
const WALL_V: char = '|';
const DOOR: char = ' ';

/// Get ASCII character for a room archetype
pub fn archetype_char(archetype: RoomArchetype) -> char {
    match archetype {
        RoomArchetype::Standard => 'o',
        RoomArchetype::Cross => 'x',
        RoomArchetype::Vertical => '|',
        RoomArchetype::Horizontal => '-',
        RoomArchetype::BendNorthWest => 'J',
        RoomArchetype::BendNorthEast => 'L',
        RoomArchetype::BendSouthWest => '7',
        RoomArchetype::BendSouthEast => 'r',
    }
}

/// Render the room grid, one character per cell. The seed room is `@`.
pub fn render_room_graph(graph: &RoomGraph) -> String {
    let mut result = String::with_capacity((graph.width() + 1) * graph.height());
    for y in (0..graph.height()).rev() {
        for x in 0..graph.width() {
            let ch = match graph.room_at(x, y) {
                Some(_) if (x, y) == graph.seed() => '@',
                Some(room) => archetype_char(room.archetype),
                None => '.',
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}

/// Render one room interior using each tile's glyph
pub fn render_tile_grid(grid: &TileGrid, catalog: &TileCatalog) -> String {
    let mut result = String::with_capacity((grid.width() + 1) * grid.height());
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            result.push(catalog.get(grid.get(x, y)).glyph);
        }
        result.push('\n');
    }
    result
}

/// Render every room at its place in the level, cropped to the occupied
/// part of the room grid.
pub fn render_level_map(level: &Level, catalog: &TileCatalog) -> String {
    let Some((min_x, min_y, max_x, max_y)) = level.occupied_bounds() else {
        return String::new();
    };

    let room_w = level.config.layout.room_width;
    let room_h = level.config.layout.room_height;
    let cols = (max_x - min_x + 1) * room_w;
    let rows = (max_y - min_y + 1) * room_h;
    let mut canvas = vec![vec![EMPTY; cols]; rows];

    for (index, room) in level.graph.rooms().iter().enumerate() {
        let col0 = (room.x - min_x) * room_w;
        let row0 = (max_y - room.y) * room_h;
        for ly in 0..room_h {
            for lx in 0..room_w {
                canvas[row0 + (room_h - 1 - ly)][col0 + lx] = footprint_char(level.footprint(index, lx, ly), catalog);
            }
        }
    }

    let mut result = String::with_capacity((cols + 1) * rows);
    for row in canvas {
        result.extend(row);
        result.push('\n');
    }
    result
}

/// Get ASCII character for a footprint tile
pub fn footprint_char(cell: Footprint, catalog: &TileCatalog) -> char {
    match cell {
        Footprint::Tile(tile) => catalog.get(tile).glyph,
        Footprint::Corner => CORNER,
        Footprint::HorizontalWall => WALL_H,
        Footprint::VerticalWall => WALL_V,
        Footprint::Door => DOOR,
        Footprint::Empty => EMPTY,
    }
}

/// Generate legend for room characters
pub fn archetype_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== ROOM LEGEND ===\n");
    legend.push_str("  @ Seed room    . Empty\n");
    for archetype in RoomArchetype::all() {
        legend.push_str(&format!("  {} {}\n", archetype_char(*archetype), archetype.name()));
    }
    legend
}

/// Generate legend for tile glyphs
pub fn tile_legend(catalog: &TileCatalog) -> String {
    let mut legend = String::new();
    legend.push_str("=== TILE LEGEND ===\n");
    for tile in catalog.tiles() {
        legend.push_str(&format!("  {} {}\n", tile.glyph, tile.name));
    }
    legend
}

/// Print ASCII map to stdout
pub fn print_ascii_map(level: &Level, catalog: &TileCatalog, mode: AsciiMode) {
    let map_str = match mode {
        AsciiMode::Layout => render_room_graph(&level.graph),
        AsciiMode::Level => render_level_map(level, catalog),
    };
    print!("{}", map_str);
}

/// Export a level to an ASCII file
pub fn export_ascii(level: &Level, catalog: &TileCatalog, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let layout = &level.config.layout;
    let interior = &level.config.interior;

    // Header
    writeln!(file, "=== DUNGEON GENERATOR LEVEL FILE ===")?;
    writeln!(file, "Seeds: {}", level.seeds)?;
    writeln!(file, "Grid: {}x{}", layout.grid_width, layout.grid_height)?;
    writeln!(file, "Room footprint: {}x{} (interior {}x{})", layout.room_width, layout.room_height, interior.width, interior.height)?;
    writeln!(file, "Rooms: {}", level.room_count())?;
    writeln!(file)?;

    writeln!(file, "=== LAYOUT ===")?;
    write!(file, "{}", render_room_graph(&level.graph))?;
    writeln!(file)?;
    write!(file, "{}", archetype_legend())?;
    writeln!(file)?;

    writeln!(file, "=== LEVEL MAP ===")?;
    write!(file, "{}", render_level_map(level, catalog))?;
    writeln!(file)?;
    write!(file, "{}", tile_legend(catalog))?;
    writeln!(file)?;

    writeln!(file, "=== ROOMS ===")?;
    for (index, (room, _)) in level.rooms().enumerate() {
        let doors: Vec<_> = room.doors.directions().map(|d| d.name()).collect();
        let (wx, wy) = level.world_origin(index);
        writeln!(
            file,
            "  #{:<3} ({:>2}, {:>2}) {:10} doors [{}] origin ({}, {})",
            index,
            room.x,
            room.y,
            room.archetype.name(),
            doors.join(", "),
            wx,
            wy,
        )?;
    }
    writeln!(file)?;

    // Tile distribution over all interiors
    writeln!(file, "=== STATISTICS ===")?;
    let mut counts = vec![0usize; catalog.len()];
    for grid in &level.interiors {
        for (count, n) in counts.iter_mut().zip(grid.histogram(catalog)) {
            *count += n;
        }
    }
    let total: usize = counts.iter().sum();
    writeln!(file, "Total tiles: {}", total)?;
    let mut sorted: Vec<_> = catalog.tiles().iter().zip(counts).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    for (tile, count) in sorted {
        let pct = if total > 0 { 100.0 * count as f64 / total as f64 } else { 0.0 };
        writeln!(file, "  {:12} {} {:>6} ({:>5.1}%)", tile.name, tile.glyph, count, pct)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InteriorConfig, LayoutConfig, LevelConfig};
    use crate::seeds::LevelSeeds;
    use crate::level::generate_level;

    #[test]
    fn test_room_graph_north_up() {
        let mut graph = RoomGraph::new(3, 2, (1, 0));
        graph.claim(1, 0, RoomArchetype::Standard);
        graph.claim(1, 1, RoomArchetype::Vertical);
        assert_eq!(render_room_graph(&graph), ".|.\n.@.\n");
    }

    #[test]
    fn test_level_map_dimensions() {
        let config = LevelConfig {
            layout: LayoutConfig {
                grid_width: 6,
                grid_height: 6,
                min_rooms: 2,
                max_rooms: 4,
                room_width: 5,
                room_height: 5,
                ..LayoutConfig::default()
            },
            interior: InteriorConfig {
                width: 3,
                height: 3,
                ..InteriorConfig::default()
            },
        };
        let catalog = TileCatalog::uniform("floor");
        let level = generate_level(&config, &catalog, &LevelSeeds::from_master(17)).unwrap();
        let map = render_level_map(&level, &catalog);

        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len() % 5, 0);
        assert!(rows.iter().all(|r| r.chars().count() == rows[0].chars().count()));
        let glyph = catalog.tiles()[0].glyph;
        let interior_tiles = map.chars().filter(|&c| c == glyph).count();
        assert_eq!(interior_tiles, level.room_count() * 9);
    }

    #[test]
    fn test_legend_lists_every_tile() {
        let catalog = TileCatalog::defaults().unwrap();
        let legend = tile_legend(&catalog);
        for tile in catalog.tiles() {
            assert!(legend.contains(&tile.name));
        }
    }
}
