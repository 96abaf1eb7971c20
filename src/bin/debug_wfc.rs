//! Debug script: solve one room interior step by step and dump it as ASCII

use std::error::Error;
use std::fs::File;
use std::io::Write;

use dungeon_generator::ascii::{render_tile_grid, tile_legend};
use dungeon_generator::step::StepStatus;
use dungeon_generator::tiles::TileCatalog;
use dungeon_generator::wfc::{TieBreak, WfcSolver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dungeon_generator=debug".into()))
        .init();

    let width = 24;
    let height = 12;
    let seed = 12345u64;
    let max_attempts = 20;

    let catalog = TileCatalog::defaults()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut file = File::create("wfc_debug.txt")?;
    writeln!(file, "=== WFC DEBUG ROOM ({}x{}) seed={} ===", width, height, seed)?;
    writeln!(file)?;
    write!(file, "{}", tile_legend(&catalog))?;
    writeln!(file)?;

    for attempt in 1..=max_attempts {
        let mut solver = WfcSolver::new(width, height, &catalog)?.with_tie_break(TieBreak::Random);

        // Entropy snapshot a quarter of the way in
        let snapshot_at = width * height / 4;
        let mut snapshot = None;

        let status = loop {
            match solver.step(&mut rng) {
                StepStatus::InProgress => {
                    if solver.iterations() == snapshot_at {
                        snapshot = Some(entropy_map(&solver));
                    }
                }
                other => break other,
            }
        };

        match status {
            StepStatus::Failed(err) => {
                writeln!(file, "Attempt {}: {} after {} iterations", attempt, err, solver.iterations())?;
            }
            _ => {
                let grid = solver.tile_grid()?;
                writeln!(file, "Attempt {}: solved in {} iterations", attempt, solver.iterations())?;
                writeln!(file)?;
                if let Some(entropy) = snapshot {
                    writeln!(file, "ENTROPY AFTER {} COLLAPSES (0-9, * = collapsed):", snapshot_at)?;
                    write!(file, "{}", entropy)?;
                    writeln!(file)?;
                }
                writeln!(file, "ROOM:")?;
                write!(file, "{}", render_tile_grid(&grid, &catalog))?;
                writeln!(file)?;

                writeln!(file, "TILE COUNTS:")?;
                let total = width * height;
                for (tile, count) in catalog.tiles().iter().zip(grid.histogram(&catalog)) {
                    let pct = 100.0 * count as f64 / total as f64;
                    writeln!(file, "  {} {:12} {:>5} ({:>5.1}%)", tile.glyph, tile.name, count, pct)?;
                }
                writeln!(file, "Rule violations: {}", grid.violations(&catalog).len())?;
                println!("Wrote wfc_debug.txt (solved on attempt {})", attempt);
                return Ok(());
            }
        }
    }

    println!("Wrote wfc_debug.txt (no solution in {} attempts)", max_attempts);
    Ok(())
}

fn entropy_map(solver: &WfcSolver) -> String {
    let mut out = String::new();
    for y in (0..solver.height()).rev() {
        for x in 0..solver.width() {
            let cell = solver.cell(x, y);
            let ch = if cell.is_collapsed() {
                '*'
            } else {
                char::from_digit(cell.entropy().min(9) as u32, 10).unwrap_or('?')
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
