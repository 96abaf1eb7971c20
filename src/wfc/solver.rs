//! Grid solver: select, collapse, propagate.

use rand::Rng;
use tracing::trace;

use super::cell::WfcCell;
use super::grid::TileGrid;
use super::TieBreak;
use crate::error::{ConfigError, WfcError};
use crate::step::StepStatus;
use crate::tiles::{TileCatalog, TileId};
use crate::tilemap::Tilemap;

/// WFC state for one room interior.
///
/// The solver owns its grid exclusively. Each `step` runs one full
/// select/collapse/propagate cycle, so stopping between steps never leaves a
/// half-collapsed cell behind.
pub struct WfcSolver<'a> {
    catalog: &'a TileCatalog,
    cells: Tilemap<WfcCell>,
    tie_break: TieBreak,
    collapsed: usize,
    iterations: usize,
    failure: Option<WfcError>,
    /// Scratch buffer for propagation, indexed by `TileId::index()`
    allowed: Vec<bool>,
}

impl<'a> WfcSolver<'a> {
    /// Grid where every cell admits the full catalog.
    pub fn new(width: usize, height: usize, catalog: &'a TileCatalog) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroDimension { what: "room width" });
        }
        if height == 0 {
            return Err(ConfigError::ZeroDimension { what: "room height" });
        }
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let all: Vec<TileId> = catalog.ids().collect();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(WfcCell::new(x, y, all.clone()));
            }
        }
        let cells = Tilemap::from_vec(width, height, data).ok_or(ConfigError::ZeroDimension {
            what: "room area",
        })?;

        Ok(Self {
            catalog,
            cells,
            tie_break: TieBreak::default(),
            collapsed: 0,
            iterations: 0,
            failure: None,
            allowed: vec![false; catalog.len()],
        })
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn cell(&self, x: usize, y: usize) -> &WfcCell {
        self.cells.get(x, y)
    }

    pub fn cells(&self) -> &Tilemap<WfcCell> {
        &self.cells
    }

    /// Number of select/collapse cycles run so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed
    }

    pub fn is_complete(&self) -> bool {
        self.collapsed == self.cells.len()
    }

    pub fn failure(&self) -> Option<&WfcError> {
        self.failure.as_ref()
    }

    /// Fix a cell to `tile` before (or between) steps and propagate.
    pub fn preset(&mut self, x: usize, y: usize, tile: TileId) -> Result<(), WfcError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if !self.cells.in_bounds(x, y) {
            return Err(WfcError::OutOfBounds { x, y });
        }
        let cell = self.cells.get_mut(x, y);
        if cell.is_collapsed() {
            return Err(WfcError::AlreadyCollapsed { x, y });
        }
        if !cell.is_candidate(tile) {
            return Err(WfcError::NotAdmissible {
                x,
                y,
                tile: self.catalog.name(tile).to_string(),
            });
        }
        cell.collapse_to(tile);
        self.collapsed += 1;

        self.propagate().map_err(|err| {
            self.failure = Some(err.clone());
            err
        })
    }

    /// Advance by one select/collapse/propagate cycle.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepStatus<WfcError> {
        if let Some(err) = &self.failure {
            return StepStatus::Failed(err.clone());
        }
        let Some(index) = self.select(rng) else {
            return StepStatus::Done;
        };

        self.collapse(index, rng);
        self.iterations += 1;

        if let Err(err) = self.propagate() {
            self.failure = Some(err.clone());
            return StepStatus::Failed(err);
        }

        if self.is_complete() {
            StepStatus::Done
        } else {
            StepStatus::InProgress
        }
    }

    /// Step until done or failed.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), WfcError> {
        loop {
            match self.step(rng) {
                StepStatus::InProgress => {}
                StepStatus::Done => return Ok(()),
                StepStatus::Failed(err) => return Err(err),
            }
        }
    }

    /// The resolved grid. Fails unless every cell is collapsed.
    pub fn tile_grid(&self) -> Result<TileGrid, WfcError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut tiles = Vec::with_capacity(self.cells.len());
        for cell in self.cells.as_slice() {
            tiles.push(cell.tile().ok_or(WfcError::Incomplete)?);
        }
        Tilemap::from_vec(self.width(), self.height(), tiles)
            .map(TileGrid::new)
            .ok_or(WfcError::Incomplete)
    }

    /// Lowest-entropy uncollapsed cell, ties broken per `tie_break`.
    fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let min = self
            .cells
            .as_slice()
            .iter()
            .filter(|c| !c.is_collapsed())
            .map(|c| c.entropy())
            .min()?;

        let mut lowest = self
            .cells
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_collapsed() && c.entropy() == min)
            .map(|(i, _)| i);

        match self.tie_break {
            TieBreak::ScanOrder => lowest.next(),
            TieBreak::Random => {
                let lowest: Vec<usize> = lowest.collect();
                Some(lowest[rng.gen_range(0..lowest.len())])
            }
        }
    }

    fn collapse<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) {
        let cell = &mut self.cells.as_mut_slice()[index];
        let choice = cell.candidates()[rng.gen_range(0..cell.entropy())];
        trace!(x = cell.x, y = cell.y, tile = self.catalog.name(choice), "collapse");
        cell.collapse_to(choice);
        self.collapsed += 1;
    }

    /// One in-place sweep in row-major order. Each uncollapsed cell keeps
    /// only the candidates that are compatible, in both directions of the
    /// shared edge, with at least one candidate of every neighbor. Not
    /// iterated to a fixed point: the next step's sweep picks up whatever
    /// this one left behind.
    fn propagate(&mut self) -> Result<(), WfcError> {
        for index in 0..self.cells.len() {
            if self.cells.as_slice()[index].is_collapsed() {
                continue;
            }
            let (x, y) = self.cells.coords(index);
            let around: Vec<_> = self.cells.neighbors(x, y).collect();

            for (dir, nx, ny) in around {
                // Tiles the neighbor allows looking back at this cell, and
                // that allow the neighbor in turn
                self.allowed.fill(false);
                for &t in self.cells.get(nx, ny).candidates() {
                    for &c in self.catalog.neighbors(t, dir.opposite()) {
                        if self.catalog.allows(c, dir, t) {
                            self.allowed[c.index()] = true;
                        }
                    }
                }
                let allowed = &self.allowed;
                self.cells.as_mut_slice()[index].retain(|c| allowed[c.index()]);
            }

            if self.cells.as_slice()[index].entropy() == 0 {
                return Err(WfcError::Contradiction { x, y });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::tiles::TileDefinition;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// `a` and `b` only sit next to their own kind
    fn separated_pair() -> TileCatalog {
        TileCatalog::from_definitions(vec![
            TileDefinition::new("a").allow_all(&["a"]),
            TileDefinition::new("b").allow_all(&["b"]),
        ])
        .unwrap()
    }

    fn east_chain() -> TileCatalog {
        TileCatalog::from_definitions(vec![
            TileDefinition::new("a")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["a"])
                .allow(Direction::West, &["a"]),
            TileDefinition::new("b")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["b"])
                .allow(Direction::West, &["b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_grid_has_full_candidates() {
        let catalog = TileCatalog::defaults().unwrap();
        let solver = WfcSolver::new(3, 2, &catalog).unwrap();
        for (_, _, cell) in solver.cells().iter() {
            assert_eq!(cell.entropy(), catalog.len());
            assert!(!cell.is_collapsed());
        }
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let catalog = TileCatalog::uniform("floor");
        assert!(WfcSolver::new(0, 4, &catalog).is_err());
        assert!(WfcSolver::new(4, 0, &catalog).is_err());
    }

    #[test]
    fn test_uniform_catalog_always_fills() {
        let catalog = TileCatalog::uniform("floor");
        let floor = catalog.id("floor").unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut solver = WfcSolver::new(4, 4, &catalog).unwrap();
            solver.run(&mut rng).unwrap();
            assert_eq!(solver.iterations(), 16);
            let grid = solver.tile_grid().unwrap();
            assert!(grid.as_slice().iter().all(|&t| t == floor));
        }
    }

    #[test]
    fn test_preset_corner_forces_row() {
        let catalog = east_chain();
        let a = catalog.id("a").unwrap();
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut solver = WfcSolver::new(4, 1, &catalog).unwrap();
            solver.preset(0, 0, a).unwrap();
            solver.run(&mut rng).unwrap();
            assert_eq!(solver.tile_grid().unwrap().as_slice(), &[a, a, a, a]);
        }
    }

    /// `a` only has `a` to its east and `b` only `b`; everything else is
    /// open, so the table is one-sided in the east/west pair.
    fn one_sided_east_chain() -> TileCatalog {
        TileCatalog::from_definitions(vec![
            TileDefinition::new("a")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["a"]),
            TileDefinition::new("b")
                .allow_all(&["a", "b"])
                .allow(Direction::East, &["b"]),
        ])
        .unwrap()
    }

    proptest! {
        #[test]
        fn one_sided_rules_force_row(seed in any::<u64>()) {
            let catalog = one_sided_east_chain();
            let a = catalog.id("a").unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut solver = WfcSolver::new(4, 1, &catalog).unwrap();
            solver.preset(0, 0, a).unwrap();
            solver.run(&mut rng).unwrap();
            let grid = solver.tile_grid().unwrap();
            prop_assert_eq!(grid.as_slice(), &[a, a, a, a]);
        }

        #[test]
        fn one_sided_rules_never_violated(seed in any::<u64>(), width in 1usize..7, height in 1usize..7) {
            // `b` may not sit west of `a`, but nothing stops `a` from
            // listing `b` to its west
            let catalog = TileCatalog::from_definitions(vec![
                TileDefinition::new("a").allow_all(&["a", "b"]),
                TileDefinition::new("b")
                    .allow_all(&["a", "b"])
                    .allow(Direction::East, &["b"]),
            ])
            .unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut solver = WfcSolver::new(width, height, &catalog).unwrap();
            if solver.run(&mut rng).is_ok() {
                let grid = solver.tile_grid().unwrap();
                prop_assert!(grid.violations(&catalog).is_empty());
            }
        }
    }

    #[test]
    fn test_preset_errors() {
        let catalog = separated_pair();
        let a = catalog.id("a").unwrap();
        let b = catalog.id("b").unwrap();
        let mut solver = WfcSolver::new(3, 1, &catalog).unwrap();

        assert_eq!(solver.preset(5, 0, a), Err(WfcError::OutOfBounds { x: 5, y: 0 }));
        solver.preset(0, 0, a).unwrap();
        assert_eq!(solver.preset(0, 0, a), Err(WfcError::AlreadyCollapsed { x: 0, y: 0 }));
        assert!(matches!(solver.preset(1, 0, b), Err(WfcError::NotAdmissible { x: 1, y: 0, .. })));
    }

    #[test]
    fn test_contradiction_is_surfaced() {
        let catalog = separated_pair();
        let a = catalog.id("a").unwrap();
        let b = catalog.id("b").unwrap();
        let mut solver = WfcSolver::new(3, 1, &catalog).unwrap();

        // The sweep only reaches one cell back per pass, so (0, 0) still
        // admits `b` after the right end is fixed to `a`.
        solver.preset(2, 0, a).unwrap();
        assert!(solver.cell(0, 0).is_candidate(b));

        assert_eq!(solver.preset(0, 0, b), Err(WfcError::Contradiction { x: 1, y: 0 }));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            solver.step(&mut rng),
            StepStatus::Failed(WfcError::Contradiction { x: 1, y: 0 })
        );
        assert!(solver.tile_grid().is_err());
    }

    #[test]
    fn test_incomplete_grid_is_not_returned() {
        let catalog = TileCatalog::uniform("floor");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut solver = WfcSolver::new(2, 2, &catalog).unwrap();
        assert_eq!(solver.step(&mut rng), StepStatus::InProgress);
        assert_eq!(solver.tile_grid(), Err(WfcError::Incomplete));
    }

    #[test]
    fn test_scan_order_picks_first_lowest() {
        let catalog = TileCatalog::uniform("floor");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut solver = WfcSolver::new(3, 3, &catalog)
            .unwrap()
            .with_tie_break(TieBreak::ScanOrder);
        solver.step(&mut rng);
        assert!(solver.cell(0, 0).is_collapsed());
        solver.step(&mut rng);
        assert!(solver.cell(1, 0).is_collapsed());
    }

    #[test]
    fn test_same_seed_same_grid() {
        let catalog = TileCatalog::defaults().unwrap();
        let solve = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut solver = WfcSolver::new(6, 6, &catalog).unwrap();
            solver.run(&mut rng).and_then(|_| solver.tile_grid())
        };
        assert_eq!(solve(77), solve(77));
    }

    #[test]
    fn test_stopping_early_keeps_collapsed_cells() {
        let catalog = TileCatalog::defaults().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut solver = WfcSolver::new(5, 5, &catalog).unwrap();
        for _ in 0..6 {
            if !solver.step(&mut rng).is_in_progress() {
                break;
            }
        }
        for (_, _, cell) in solver.cells().iter() {
            if cell.is_collapsed() {
                assert_eq!(cell.entropy(), 1);
            } else {
                assert!(cell.entropy() >= 1);
            }
        }
    }
}
