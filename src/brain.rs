use bevy::math::Vec2;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{GOAL_BONUS, GOAL_RADIUS, MAX_SPEED, STEP_REWARD};
use crate::genome::Genome;
use crate::geometry::Arena;

/// Why a step could not be taken. Both leave the brain alive; the caller decides.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum StepError {
    #[error("no moves left at ({}, {})", .position.x, .position.y)]
    NoMoves { position: Vec2 },
    #[error("hit the arena wall at ({}, {})", .position.x, .position.y)]
    HitWall { position: Vec2 },
}

/// One candidate solution: a genome plus the physical state it drives
#[derive(Debug, Clone)]
pub struct Brain {
    arena: Arc<Arena>,
    genome: Genome,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    next_move: usize,
    dead: bool,
    reached_goal: bool,
    first_move: bool,
    fitness: f32,
    mutation_rate: f32,
}

impl Brain {
    pub fn new<R: Rng + ?Sized>(
        arena: Arc<Arena>,
        genome_length: usize,
        mutation_rate: f32,
        rng: &mut R,
    ) -> Self {
        Self::with_genome(arena, Genome::random(genome_length, rng), mutation_rate)
    }

    pub fn with_genome(arena: Arc<Arena>, genome: Genome, mutation_rate: f32) -> Self {
        Self {
            position: arena.start,
            arena,
            genome,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            next_move: 0,
            dead: false,
            reached_goal: false,
            first_move: true,
            fitness: 0.0,
            mutation_rate,
        }
    }

    /// A fresh brain at the start point carrying a copy of this genome.
    pub fn offspring(&self) -> Self {
        Self::with_genome(Arc::clone(&self.arena), self.genome.clone(), self.mutation_rate)
    }

    /// Apply the next impulse and move.
    ///
    /// The first call only spends the grace tick: no impulse is consumed and the
    /// dot stays on the start point. Terminal brains do not move. A step that
    /// leaves the arena is clamped back onto the wall and reported as
    /// [`StepError::HitWall`]; killing the brain is left to the caller.
    pub fn advance(&mut self) -> Result<Vec2, StepError> {
        if self.is_terminal() {
            return Ok(self.position);
        }
        let Some(impulse) = self.genome.get(self.next_move) else {
            return Err(StepError::NoMoves {
                position: self.position,
            });
        };
        if self.first_move {
            self.first_move = false;
            return Ok(self.position);
        }

        self.acceleration = impulse;
        self.next_move += 1;
        self.velocity += self.acceleration;
        if self.velocity.length_squared() > MAX_SPEED * MAX_SPEED {
            self.velocity = self.velocity.normalize() * MAX_SPEED;
        }

        let next = self.position + self.velocity;
        if self.arena.out_of_bounds(next) {
            self.position = self.arena.clamp(next);
            return Err(StepError::HitWall {
                position: self.position,
            });
        }
        self.position = next;
        if self.position.distance(self.arena.goal) < GOAL_RADIUS {
            self.reached_goal = true;
        }
        Ok(self.position)
    }

    /// Score the brain for breeding and cache the result.
    ///
    /// Goal reachers earn `1/16 + 10000 / steps²`; everyone else earns the
    /// inverse square of their remaining distance.
    pub fn calculate_fitness(&mut self) -> f32 {
        self.fitness = if self.reached_goal {
            let steps = self.next_move as f32;
            GOAL_BONUS + STEP_REWARD / (steps * steps)
        } else {
            let distance = self.position.distance(self.arena.goal);
            1.0 / (distance * distance)
        };
        self.fitness
    }

    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.genome.mutate(self.mutation_rate, rng);
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    pub fn is_terminal(&self) -> bool {
        self.dead || self.reached_goal
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Heading of the last impulse in radians, zero before the first one.
    pub fn heading(&self) -> f32 {
        self.acceleration.to_angle()
    }

    pub fn next_move(&self) -> usize {
        self.next_move
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    /// Last value computed by [`Brain::calculate_fitness`].
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    pub(crate) fn set_mutation_rate(&mut self, mutation_rate: f32) {
        self.mutation_rate = mutation_rate;
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn open_arena() -> Arc<Arena> {
        Arc::new(
            Arena::new(
                1000.0,
                1000.0,
                Vec2::new(500.0, 500.0),
                Vec2::new(500.0, 990.0),
                Vec::new(),
            )
            .unwrap(),
        )
    }

    fn straight(direction: Vec2, length: usize) -> Genome {
        Genome::from_moves(vec![direction; length])
    }

    #[test]
    fn first_step_is_a_grace_tick() {
        let arena = open_arena();
        let mut brain = Brain::with_genome(arena.clone(), straight(Vec2::X, 4), 0.0);
        assert_eq!(brain.advance(), Ok(arena.start));
        assert_eq!(brain.next_move(), 0);
        assert!(!brain.is_first_move());
        assert_eq!(brain.advance(), Ok(arena.start + Vec2::X));
        assert_eq!(brain.next_move(), 1);
    }

    #[test]
    fn speed_is_capped_exactly() {
        let mut brain = Brain::with_genome(open_arena(), straight(Vec2::X, 40), 0.0);
        let mut previous = 0;
        for _ in 0..41 {
            brain.advance().unwrap();
            assert!(brain.next_move() >= previous);
            assert!(brain.velocity().length() <= MAX_SPEED + 1e-4);
            previous = brain.next_move();
        }
        assert!((brain.velocity().length() - MAX_SPEED).abs() < 1e-4);
        // 1 + 2 + 3 + 4 + 5 before the cap, then 5 per step.
        assert!((brain.position().x - (500.0 + 15.0 + 35.0 * 5.0)).abs() < 1e-2);
    }

    #[test]
    fn diagonal_speed_cap_keeps_direction() {
        let diagonal = Vec2::new(1.0, 1.0).normalize();
        let mut brain = Brain::with_genome(open_arena(), straight(diagonal, 20), 0.0);
        for _ in 0..21 {
            brain.advance().unwrap();
        }
        let velocity = brain.velocity();
        assert!((velocity.length() - MAX_SPEED).abs() < 1e-4);
        assert!((velocity.x - velocity.y).abs() < 1e-4);
    }

    #[test]
    fn exhausted_genome_reports_no_moves() {
        let mut brain = Brain::with_genome(open_arena(), straight(Vec2::Y, 2), 0.0);
        for _ in 0..3 {
            brain.advance().unwrap();
        }
        let position = brain.position();
        assert_eq!(brain.advance(), Err(StepError::NoMoves { position }));
        assert_eq!(brain.next_move(), 2);
        // Not fatal by itself.
        assert!(!brain.is_dead());
    }

    #[test]
    fn wall_clamps_and_reports() {
        let arena = Arc::new(
            Arena::new(20.0, 20.0, Vec2::new(18.0, 10.0), Vec2::new(2.0, 10.0), Vec::new())
                .unwrap(),
        );
        let mut brain = Brain::with_genome(arena, straight(Vec2::X, 5), 0.0);
        brain.advance().unwrap();
        assert_eq!(brain.advance(), Ok(Vec2::new(19.0, 10.0)));
        let err = brain.advance().unwrap_err();
        assert_eq!(err, StepError::HitWall { position: Vec2::new(20.0, 10.0) });
        assert_eq!(brain.position(), Vec2::new(20.0, 10.0));
        assert!(!brain.is_dead());
    }

    #[test]
    fn reaching_the_goal_is_terminal() {
        let arena = Arc::new(
            Arena::new(100.0, 100.0, Vec2::new(50.0, 10.0), Vec2::new(50.0, 30.0), Vec::new())
                .unwrap(),
        );
        let mut brain = Brain::with_genome(arena, straight(Vec2::Y, 50), 0.0);
        while !brain.reached_goal() {
            brain.advance().unwrap();
        }
        // y: 11, 13, 16, 20, 25. Exactly 10 away does not count.
        assert_eq!(brain.next_move(), 5);
        let frozen = brain.position();
        assert_eq!(brain.advance(), Ok(frozen));
        assert_eq!(brain.next_move(), 5);
    }

    #[test]
    fn dead_brains_do_not_move() {
        let mut brain = Brain::with_genome(open_arena(), straight(Vec2::X, 10), 0.0);
        brain.advance().unwrap();
        brain.advance().unwrap();
        brain.kill();
        let position = brain.position();
        assert_eq!(brain.advance(), Ok(position));
        assert_eq!(brain.next_move(), 1);
    }

    fn goal_reacher(steps: usize) -> Brain {
        let mut brain = Brain::with_genome(open_arena(), straight(Vec2::Y, 200), 0.0);
        brain.next_move = steps;
        brain.reached_goal = true;
        brain
    }

    #[test]
    fn fewer_steps_score_higher() {
        let fast = goal_reacher(50).calculate_fitness();
        let slow = goal_reacher(150).calculate_fitness();
        assert!(fast > slow);
        assert!((fast - (1.0 / 16.0 + 10_000.0 / 2_500.0)).abs() < 1e-5);
    }

    #[test]
    fn distance_fitness_is_inverse_square() {
        let mut brain = Brain::with_genome(open_arena(), straight(Vec2::Y, 5), 0.0);
        // Start sits 490 below the goal.
        let fitness = brain.calculate_fitness();
        assert!(fitness > 0.0);
        assert!((fitness - 1.0 / (490.0 * 490.0)).abs() < 1e-9);
        assert_eq!(brain.calculate_fitness(), fitness);
        assert_eq!(brain.fitness(), fitness);
    }

    #[test]
    fn reachers_outrank_distant_dots() {
        let slowest = goal_reacher(200).calculate_fitness();
        let mut near_miss = Brain::with_genome(open_arena(), straight(Vec2::Y, 5), 0.0);
        near_miss.position = Vec2::new(500.0, 975.0);
        assert!(slowest > near_miss.calculate_fitness());
    }

    #[test]
    fn offspring_copies_genome_and_resets_state() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut parent = Brain::new(open_arena(), 30, 0.2, &mut rng);
        for _ in 0..10 {
            let _ = parent.advance();
        }
        parent.kill();
        parent.calculate_fitness();

        let child = parent.offspring();
        assert_eq!(child.genome(), parent.genome());
        assert_eq!(child.next_move(), 0);
        assert!(!child.is_dead());
        assert!(!child.reached_goal());
        assert!(child.is_first_move());
        assert_eq!(child.position(), parent.arena().start);
        assert_eq!(child.velocity(), Vec2::ZERO);
        assert_eq!(child.mutation_rate(), 0.2);
    }
}
