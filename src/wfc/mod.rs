//! Wave Function Collapse for room interiors
//!
//! - `WfcCell`: candidate set of one cell
//! - `WfcSolver`: step-wise select/collapse/propagate over an owned grid
//! - `TileGrid`: the resolved output
//!
//! There is no backtracking inside a solve. `solve_with_retries` restarts a
//! failed solve from an empty grid, drawing fresh randomness from the same
//! stream; with `attempts = 1` it behaves exactly like `solve`.

pub mod cell;
pub mod grid;
pub mod solver;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, WfcError};
use crate::tiles::TileCatalog;

pub use cell::WfcCell;
pub use grid::{RuleViolation, TileGrid};
pub use solver::WfcSolver;

/// How to choose among cells that share the minimum entropy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Uniformly at random
    #[default]
    Random,
    /// First in row-major order. Changes output for a fixed seed.
    ScanOrder,
}

/// Failure of a solve request: bad input, or no tiling found
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Wfc(#[from] WfcError),
}

/// Solve a `width` x `height` grid once. A contradiction fails the solve.
pub fn solve<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    catalog: &TileCatalog,
    rng: &mut R,
) -> Result<TileGrid, SolveError> {
    solve_with_retries(width, height, catalog, TieBreak::Random, 1, rng)
}

/// Solve, restarting from scratch after a contradiction up to `attempts`
/// times in total. Returns the last contradiction once attempts run out.
pub fn solve_with_retries<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    catalog: &TileCatalog,
    tie_break: TieBreak,
    attempts: usize,
    rng: &mut R,
) -> Result<TileGrid, SolveError> {
    if attempts == 0 {
        return Err(ConfigError::ZeroAttempts { what: "wfc" }.into());
    }

    let mut last = WfcError::Incomplete;
    for attempt in 1..=attempts {
        let mut solver = WfcSolver::new(width, height, catalog)?.with_tie_break(tie_break);
        match solver.run(rng).and_then(|_| solver.tile_grid()) {
            Ok(grid) => {
                debug!(width, height, attempt, "wfc solved");
                return Ok(grid);
            }
            Err(err) => {
                warn!(attempt, attempts, error = %err, "wfc attempt failed");
                last = err;
            }
        }
    }
    Err(last.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileDefinition;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_solve_uniform() {
        let catalog = TileCatalog::uniform("floor");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let grid = solve(4, 4, &catalog, &mut rng).unwrap();
        assert_eq!(grid.as_slice().len(), 16);
        assert!(grid.names(&catalog).iter().all(|n| *n == "floor"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let catalog = TileCatalog::uniform("floor");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = solve_with_retries(2, 2, &catalog, TieBreak::Random, 0, &mut rng);
        assert!(matches!(result, Err(SolveError::Config(_))));
    }

    #[test]
    fn test_checkerboard_never_contradicts() {
        // a and b must alternate; the grid is bipartite so any seed works
        let catalog = TileCatalog::from_definitions(vec![
            TileDefinition::new("a").allow_all(&["b"]),
            TileDefinition::new("b").allow_all(&["a"]),
        ])
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let grid = solve(5, 4, &catalog, &mut rng).unwrap();
        assert!(grid.violations(&catalog).is_empty());
        let first = grid.get(0, 0);
        assert_eq!(grid.get(1, 1), first);
        assert_ne!(grid.get(1, 0), first);
    }

    proptest! {
        #[test]
        fn completed_solves_respect_rules(seed in any::<u64>(), width in 1usize..9, height in 1usize..9) {
            let catalog = TileCatalog::defaults().unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match solve_with_retries(width, height, &catalog, TieBreak::Random, 3, &mut rng) {
                Ok(grid) => {
                    prop_assert_eq!(grid.as_slice().len(), width * height);
                    prop_assert!(grid.violations(&catalog).is_empty());
                }
                Err(SolveError::Wfc(WfcError::Contradiction { .. })) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
