use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::sync::Arc;

use crate::brain::{Brain, StepError};
use crate::config::{STALENESS_LIMIT, SimulationConfig};
use crate::error::{ConfigError, SimError};
use crate::geometry::Arena;

/// Where to draw one dot after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub position: Vec2,
    pub heading: f32,
    pub elite: bool,
    pub visible: bool,
}

/// Headcount of a generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub alive: usize,
    pub reached_goal: usize,
    pub dead: usize,
}

/// What a finished generation looked like when it was bred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummary {
    pub generation: u32,
    pub best_index: usize,
    pub best_fitness: f32,
    pub fitness_sum: f32,
    pub reached_goal: usize,
    pub min_steps: usize,
    pub staleness: u32,
    pub stagnating: bool,
}

/// One generation of dots sharing an arena
#[derive(Resource, Debug)]
pub struct Population {
    brains: Vec<Brain>,
    arena: Arc<Arena>,
    min_steps: usize,
    staleness: u32,
    generation: u32,
    draw_only_best: bool,
    previous: Option<GenerationSummary>,
    rng: ChaCha12Rng,
}

impl Population {
    /// Build generation zero with random genomes.
    pub fn new(config: &SimulationConfig, arena: Arena) -> Result<Self, SimError> {
        config.validate()?;
        check_arena_size(config, &arena)?;
        let arena = Arc::new(arena);
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let brains = (0..config.population_size)
            .map(|_| {
                Brain::new(
                    Arc::clone(&arena),
                    config.genome_length,
                    config.mutation_rate,
                    &mut rng,
                )
            })
            .collect();
        Ok(Self::assemble(config, arena, brains, rng))
    }

    /// Build generation zero from existing brains, e.g. hand-written genomes.
    ///
    /// Every brain must live in `arena` and carry the same number of moves.
    /// The configured mutation rate replaces whatever rate the brains had.
    pub fn with_brains(
        config: &SimulationConfig,
        arena: Arc<Arena>,
        mut brains: Vec<Brain>,
    ) -> Result<Self, SimError> {
        let config = SimulationConfig {
            population_size: brains.len(),
            genome_length: brains.first().map_or(0, |brain| brain.genome().len()),
            ..config.clone()
        };
        config.validate()?;
        check_arena_size(&config, &arena)?;
        for (index, brain) in brains.iter_mut().enumerate() {
            if !Arc::ptr_eq(brain.arena(), &arena) {
                return Err(ConfigError::ForeignArena { index }.into());
            }
            if brain.genome().len() != config.genome_length {
                return Err(ConfigError::GenomeLength {
                    index,
                    expected: config.genome_length,
                    actual: brain.genome().len(),
                }
                .into());
            }
            brain.set_mutation_rate(config.mutation_rate);
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(&config, arena, brains, rng))
    }

    fn assemble(
        config: &SimulationConfig,
        arena: Arc<Arena>,
        brains: Vec<Brain>,
        rng: ChaCha12Rng,
    ) -> Self {
        Self {
            brains,
            arena,
            min_steps: config.genome_length,
            staleness: 0,
            generation: 0,
            draw_only_best: config.draw_only_best,
            previous: None,
            rng,
        }
    }

    /// Advance every live dot by one step and report where each one is.
    ///
    /// Running out of moves, hitting a wall, landing in an obstacle or
    /// outlasting the best known step count all kill the dot.
    pub fn tick(&mut self) -> Vec<Marker> {
        let elite = self.elite_index();
        let show_all = !self.draw_only_best || elite.is_none();
        let mut markers = Vec::with_capacity(self.brains.len());

        for (index, brain) in self.brains.iter_mut().enumerate() {
            if !brain.is_terminal() {
                if brain.next_move() > self.min_steps {
                    brain.kill();
                }
                match brain.advance() {
                    Ok(_) => {}
                    Err(StepError::NoMoves { .. } | StepError::HitWall { .. }) => brain.kill(),
                }
                if self.arena.blocked(brain.position()) {
                    brain.kill();
                }
            }

            let is_elite = elite == Some(index);
            markers.push(Marker {
                index,
                position: brain.position(),
                heading: brain.heading(),
                elite: is_elite,
                visible: show_all || is_elite,
            });
        }
        markers
    }

    /// True once every dot has either died or reached the goal.
    pub fn all_dead(&self) -> bool {
        self.brains.iter().all(Brain::is_terminal)
    }

    pub fn calculate_fitnesses(&mut self) {
        for brain in self.brains.iter_mut() {
            brain.calculate_fitness();
        }
    }

    /// Index of the first brain holding the highest cached fitness.
    fn best_index(&self) -> usize {
        let mut best = 0;
        let mut max_fitness = 0.0;
        for (index, brain) in self.brains.iter().enumerate() {
            if brain.fitness() > max_fitness {
                max_fitness = brain.fitness();
                best = index;
            }
        }
        best
    }

    fn fitness_sum(&self) -> f32 {
        self.brains.iter().map(Brain::fitness).sum()
    }

    /// Roulette wheel over cached fitness.
    fn select_parent(&mut self, fitness_sum: f32) -> usize {
        let draw = self.rng.r#gen::<f32>() * fitness_sum;
        let mut running_sum = 0.0;
        for (index, brain) in self.brains.iter().enumerate() {
            running_sum += brain.fitness();
            if running_sum > draw {
                return index;
            }
        }
        // Rounding can park the draw on the very top edge of the wheel.
        self.brains.len() - 1
    }

    /// Breed the next generation from this exhausted one.
    ///
    /// Slot 0 of the result is an unmutated copy of the fittest dot. The rest
    /// are drawn by roulette wheel and mutated, except when the elite has held
    /// slot 0 for more than [`STALENESS_LIMIT`] generations: then every slot
    /// is bred from the elite and only mutation varies them.
    pub fn evolve(mut self) -> Result<Population, SimError> {
        self.calculate_fitnesses();
        let best = self.best_index();

        if self.brains[best].reached_goal() {
            let steps = self.brains[best].next_move();
            if steps < self.min_steps {
                debug!(from = self.min_steps, to = steps, "tightening step cap");
                self.min_steps = steps;
            }
        }

        let staleness = if best == 0 { self.staleness + 1 } else { 0 };
        let fitness_sum = self.fitness_sum();
        if !(fitness_sum.is_finite() && fitness_sum > 0.0) {
            return Err(SimError::DegenerateFitness { sum: fitness_sum });
        }

        let stagnating = self.staleness > STALENESS_LIMIT && best == 0;
        if stagnating {
            debug!(staleness = self.staleness, "breeding every slot from the elite");
        }

        let summary = GenerationSummary {
            generation: self.generation,
            best_index: best,
            best_fitness: self.brains[best].fitness(),
            fitness_sum,
            reached_goal: self.counts().reached_goal,
            min_steps: self.min_steps,
            staleness: self.staleness,
            stagnating,
        };
        info!(
            generation = summary.generation,
            best_index = summary.best_index,
            best_fitness = summary.best_fitness,
            reached_goal = summary.reached_goal,
            min_steps = summary.min_steps,
            staleness = summary.staleness,
            stagnating = summary.stagnating,
            "generation finished"
        );

        let mut brains = Vec::with_capacity(self.brains.len());
        brains.push(self.brains[best].offspring());
        for _ in 1..self.brains.len() {
            let parent = if stagnating {
                0
            } else {
                self.select_parent(fitness_sum)
            };
            brains.push(self.brains[parent].offspring());
        }
        for brain in brains.iter_mut().skip(1) {
            brain.mutate(&mut self.rng);
        }

        Ok(Population {
            brains,
            arena: self.arena,
            min_steps: self.min_steps,
            staleness,
            generation: self.generation + 1,
            draw_only_best: self.draw_only_best,
            previous: Some(summary),
            rng: self.rng,
        })
    }

    pub fn brains(&self) -> &[Brain] {
        &self.brains
    }

    pub fn len(&self) -> usize {
        self.brains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn staleness(&self) -> u32 {
        self.staleness
    }

    pub fn min_steps(&self) -> usize {
        self.min_steps
    }

    /// Slot of the carried-over elite; generation zero has none.
    pub fn elite_index(&self) -> Option<usize> {
        (self.generation > 0).then_some(0)
    }

    pub fn draw_only_best(&self) -> bool {
        self.draw_only_best
    }

    pub fn set_draw_only_best(&mut self, draw_only_best: bool) {
        self.draw_only_best = draw_only_best;
    }

    pub fn previous_summary(&self) -> Option<&GenerationSummary> {
        self.previous.as_ref()
    }

    pub fn counts(&self) -> Counts {
        self.brains
            .iter()
            .fold(Counts::default(), |mut counts, brain| {
                if brain.reached_goal() {
                    counts.reached_goal += 1;
                } else if brain.is_dead() {
                    counts.dead += 1;
                } else {
                    counts.alive += 1;
                }
                counts
            })
    }
}

fn check_arena_size(config: &SimulationConfig, arena: &Arena) -> Result<(), ConfigError> {
    if arena.width != config.arena_width || arena.height != config.arena_height {
        return Err(ConfigError::ArenaMismatch {
            width: arena.width,
            height: arena.height,
            expected_width: config.arena_width,
            expected_height: config.arena_height,
        });
    }
    Ok(())
}
