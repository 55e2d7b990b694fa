//! Configuration constants and run settings for the dot swarm

use bevy::prelude::*;

use crate::error::ConfigError;

// ============================================================================
// GENOME SETTINGS
// ============================================================================

/// Number of impulses in every genome of a run
pub const GENOME_LENGTH: usize = 200;

/// Default probability that a single impulse is re-rolled when breeding
pub const DEFAULT_MUTATION_RATE: f32 = 0.01;

// ============================================================================
// POPULATION SETTINGS
// ============================================================================

/// Number of dots in every generation
pub const DEFAULT_POPULATION_SIZE: usize = 500;

/// Generations the elite may stay on top before the whole brood is bred from it
pub const STALENESS_LIMIT: u32 = 5;

// ============================================================================
// PHYSICS
// ============================================================================

/// Maximum speed in units per tick
pub const MAX_SPEED: f32 = 5.0;

/// A dot closer than this to the goal has reached it
pub const GOAL_RADIUS: f32 = 10.0;

// ============================================================================
// FITNESS
// ============================================================================

/// Flat bonus every goal reacher receives (1/16)
pub const GOAL_BONUS: f32 = 1.0 / 16.0;

/// Numerator of the step reward for goal reachers: `STEP_REWARD / steps²`
pub const STEP_REWARD: f32 = 10_000.0;

// ============================================================================
// WINDOW & SPRITES
// ============================================================================

pub const ARENA_WIDTH: f32 = 1024.0;
pub const ARENA_HEIGHT: f32 = 760.0;

/// Distance of the start point from the bottom edge and of the goal from the top edge
pub const EDGE_MARGIN: f32 = 10.0;

/// Obstacle bar height
pub const OBSTACLE_THICKNESS: f32 = 26.0;

pub const DOT_SIZE: f32 = 5.0;
pub const ELITE_SIZE: f32 = 20.0;
pub const GOAL_SIZE: f32 = 20.0;

/// Everything needed to build the first generation of a run
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub mutation_rate: f32,
    pub draw_only_best: bool,
    pub seed: u64,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            genome_length: GENOME_LENGTH,
            mutation_rate: DEFAULT_MUTATION_RATE,
            draw_only_best: false,
            seed: 0,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.genome_length == 0 {
            return Err(ConfigError::EmptyGenome);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::ArenaSize {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        Ok(())
    }
}
