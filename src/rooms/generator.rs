//! Frontier growth of the room graph
//!
//! Starting from the seed room, rooms are popped from a FIFO frontier and
//! each of their four neighbors (left, right, up, down) gets one chance to
//! become a room. A candidate is skipped at random, and also skipped when it
//! already touches more than one room, which keeps the layout a branching
//! tree with no dense clusters. A run that dries up below `min_rooms` is
//! thrown away and grown again from scratch.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, trace};

use super::{RoomArchetype, RoomGraph};
use crate::config::LayoutConfig;
use crate::direction::Direction;
use crate::error::GenerationError;
use crate::step::StepStatus;

/// Incremental room graph generator. Call `step` until it reports `Done`,
/// then take the graph with `finish`.
pub struct RoomGenerator {
    config: LayoutConfig,
    graph: RoomGraph,
    frontier: VecDeque<(usize, usize)>,
    /// Attempts started so far, including the current one
    attempts: usize,
    /// Largest room count reached by a discarded attempt
    best: usize,
    state: GeneratorState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GeneratorState {
    Growing,
    Done,
    Exhausted,
}

impl RoomGenerator {
    pub fn new(config: &LayoutConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut generator = Self {
            config: config.clone(),
            graph: RoomGraph::new(config.grid_width, config.grid_height, config.seed_coordinate()),
            frontier: VecDeque::new(),
            attempts: 0,
            best: 0,
            state: GeneratorState::Growing,
        };
        generator.restart();
        Ok(generator)
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// The finished graph. Fails if generation ran out of attempts or is
    /// still in progress.
    pub fn finish(self) -> Result<RoomGraph, GenerationError> {
        match self.state {
            GeneratorState::Done => Ok(self.graph),
            GeneratorState::Growing => Err(GenerationError::Unfinished),
            GeneratorState::Exhausted => Err(self.too_few_rooms()),
        }
    }

    /// Advance by one frontier coordinate, one regeneration, or the final
    /// completion check.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepStatus<GenerationError> {
        match self.state {
            GeneratorState::Done => return StepStatus::Done,
            GeneratorState::Exhausted => return StepStatus::Failed(self.too_few_rooms()),
            GeneratorState::Growing => {}
        }

        if self.graph.room_count() < self.config.max_rooms {
            if let Some((x, y)) = self.frontier.pop_front() {
                for dir in Direction::EXPANSION_ORDER {
                    if let Some((nx, ny)) = dir.step(x, y, self.graph.width(), self.graph.height()) {
                        self.try_claim(nx, ny, rng);
                    }
                }
                return StepStatus::InProgress;
            }
        }

        let rooms = self.graph.room_count();
        if rooms < self.config.min_rooms {
            self.best = self.best.max(rooms);
            if self.attempts >= self.config.max_attempts {
                self.state = GeneratorState::Exhausted;
                return StepStatus::Failed(self.too_few_rooms());
            }
            debug!(
                rooms,
                min_rooms = self.config.min_rooms,
                attempt = self.attempts,
                "room count below minimum, regenerating"
            );
            self.restart();
            return StepStatus::InProgress;
        }

        info!(rooms, attempts = self.attempts, "room generation complete");
        self.state = GeneratorState::Done;
        StepStatus::Done
    }

    /// Step until done or exhausted.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GenerationError> {
        loop {
            match self.step(rng) {
                StepStatus::InProgress => {}
                StepStatus::Done => return Ok(()),
                StepStatus::Failed(err) => return Err(err),
            }
        }
    }

    /// Discard everything and claim the seed room again.
    fn restart(&mut self) {
        self.attempts += 1;
        let seed = self.config.seed_coordinate();
        self.graph = RoomGraph::new(self.config.grid_width, self.config.grid_height, seed);
        self.frontier.clear();

        // The seed is claimed unconditionally, without a random draw
        if self.graph.claim(seed.0, seed.1, RoomArchetype::Standard).is_some() {
            self.frontier.push_back(seed);
        }
    }

    fn try_claim<R: Rng + ?Sized>(&mut self, x: usize, y: usize, rng: &mut R) -> bool {
        if self.graph.is_occupied(x, y) {
            return false;
        }
        if self.graph.room_count() >= self.config.max_rooms {
            trace!(rooms = self.graph.room_count(), "max rooms reached");
            return false;
        }
        if (x, y) != self.graph.seed() && rng.gen_bool(self.config.rejection_probability) {
            trace!(x, y, "random skip");
            return false;
        }

        let adjacent = self.graph.neighbor_count(x, y);
        if adjacent > 1 {
            trace!(x, y, adjacent, "too many adjacent rooms");
            return false;
        }

        let archetype = RoomArchetype::from_neighbor_count(adjacent);
        match self.graph.claim(x, y, archetype) {
            Some(index) => {
                trace!(x, y, adjacent, index, "room claimed");
                self.frontier.push_back((x, y));
                true
            }
            None => false,
        }
    }

    fn too_few_rooms(&self) -> GenerationError {
        GenerationError::TooFewRooms {
            attempts: self.attempts,
            min_rooms: self.config.min_rooms,
            best: self.best.max(self.graph.room_count()),
        }
    }
}

/// Grow a room graph, regenerating until it has at least `min_rooms` rooms
/// or `max_attempts` runs have failed.
pub fn generate<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Result<RoomGraph, GenerationError> {
    let mut generator = RoomGenerator::new(config)?;
    generator.run(rng)?;
    generator.finish()
}
