use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dungeon_generator::ascii::{self, AsciiMode};
use dungeon_generator::config::LevelConfig;
use dungeon_generator::export;
use dungeon_generator::level::generate_level;
use dungeon_generator::seeds::LevelSeeds;
use dungeon_generator::tiles::TileCatalog;
use dungeon_generator::wfc::TieBreak;

#[derive(Parser, Debug)]
#[command(name = "dungeon_generator")]
#[command(about = "Generate procedural dungeon levels: a room graph with WFC-tiled interiors")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the derived layout seed
    #[arg(long)]
    layout_seed: Option<u64>,

    /// Override the derived tiles seed
    #[arg(long)]
    tiles_seed: Option<u64>,

    /// Level configuration JSON (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile catalog JSON (uses the built-in catalog if not specified)
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// Width of the room grid
    #[arg(short = 'W', long)]
    grid_width: Option<usize>,

    /// Height of the room grid
    #[arg(short = 'H', long)]
    grid_height: Option<usize>,

    /// Minimum number of rooms
    #[arg(long)]
    min_rooms: Option<usize>,

    /// Maximum number of rooms
    #[arg(long)]
    max_rooms: Option<usize>,

    /// How WFC picks among equally constrained cells
    #[arg(long, value_enum)]
    tie_break: Option<TieBreak>,

    /// Print an ASCII map to stdout
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "level")]
    ascii: Option<AsciiMode>,

    /// Export the full level report to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export rooms and interiors to JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Export the level map to PNG
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per tile in the PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "dungeon_generator=info".into()),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let catalog = match &args.tiles {
        Some(path) => TileCatalog::load(path)?,
        None => TileCatalog::defaults()?,
    };
    info!(tiles = catalog.len(), "tile catalog loaded");

    let master = args.seed.unwrap_or_else(|| rand::random());
    let mut builder = LevelSeeds::builder(master);
    if let Some(seed) = args.layout_seed {
        builder = builder.layout(seed);
    }
    if let Some(seed) = args.tiles_seed {
        builder = builder.tiles(seed);
    }
    let seeds = builder.build();

    println!("Generating level with seed: {}", master);
    println!(
        "Room grid: {}x{}, rooms {}..={}",
        config.layout.grid_width, config.layout.grid_height, config.layout.min_rooms, config.layout.max_rooms
    );

    let level = generate_level(&config, &catalog, &seeds)?;
    println!("Generated {} rooms", level.room_count());

    if let Some(mode) = args.ascii {
        println!("\n=== {} ===", mode.name());
        ascii::print_ascii_map(&level, &catalog, mode);
    }

    if let Some(path) = &args.export_ascii {
        ascii::export_ascii(&level, &catalog, path)?;
        println!("Exported level report to {}", path);
    }

    if let Some(path) = &args.export_json {
        export::export_level_json(&level, &catalog, path)?;
        println!("Exported level JSON to {}", path);
    }

    if let Some(path) = &args.export_png {
        export::export_level_png(&level, &catalog, path, args.png_scale)?;
        println!("Exported level map to {}", path);
    }

    Ok(())
}

fn apply_overrides(config: &mut LevelConfig, args: &Args) {
    let layout = &mut config.layout;
    if let Some(width) = args.grid_width {
        layout.grid_width = width;
        layout.seed_room = None;
    }
    if let Some(height) = args.grid_height {
        layout.grid_height = height;
        layout.seed_room = None;
    }
    if let Some(min) = args.min_rooms {
        layout.min_rooms = min;
    }
    if let Some(max) = args.max_rooms {
        layout.max_rooms = max;
    }
    if let Some(tie_break) = args.tie_break {
        config.interior.tie_break = tie_break;
    }
}
