use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// A unit impulse pointing in a uniformly random direction
pub fn random_impulse<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..TAU))
}

/// A genome is the fixed sequence of impulses a dot applies, one per tick
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    moves: Vec<Vec2>,
}

impl Genome {
    /// Create a new random genome
    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        let moves = (0..length).map(|_| random_impulse(rng)).collect();
        Self { moves }
    }

    /// Wrap a hand-written move list
    pub fn from_moves(moves: Vec<Vec2>) -> Self {
        Self { moves }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.moves.get(index).copied()
    }

    pub fn moves(&self) -> &[Vec2] {
        &self.moves
    }

    /// Re-roll each impulse independently with probability `rate`.
    /// The length never changes.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) {
        for slot in self.moves.iter_mut() {
            if rng.r#gen::<f32>() < rate {
                *slot = random_impulse(rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn random_moves_are_unit_impulses() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let genome = Genome::random(500, &mut rng);
        assert_eq!(genome.len(), 500);
        for impulse in genome.moves() {
            assert!((impulse.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_rate_never_mutates() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let original = Genome::random(300, &mut rng);
        let mut genome = original.clone();
        for _ in 0..50 {
            genome.mutate(0.0, &mut rng);
        }
        assert_eq!(genome, original);
    }

    #[test]
    fn full_rate_rerolls_every_slot() {
        let mut rng = ChaCha12Rng::seed_from_u64(13);
        let mut replaced = 0usize;
        let mut total = 0usize;
        for _ in 0..20 {
            let original = Genome::random(200, &mut rng);
            let mut genome = original.clone();
            genome.mutate(1.0, &mut rng);
            assert_eq!(genome.len(), original.len());
            replaced += genome
                .moves()
                .iter()
                .zip(original.moves())
                .filter(|(a, b)| a != b)
                .count();
            total += original.len();
        }
        assert!(replaced as f32 / total as f32 > 0.999);
    }

    #[test]
    fn partial_rate_tracks_probability() {
        let mut rng = ChaCha12Rng::seed_from_u64(17);
        let original = Genome::random(20_000, &mut rng);
        let mut genome = original.clone();
        genome.mutate(0.25, &mut rng);
        let changed = genome
            .moves()
            .iter()
            .zip(original.moves())
            .filter(|(a, b)| a != b)
            .count() as f32
            / original.len() as f32;
        assert!((changed - 0.25).abs() < 0.02, "changed fraction {changed}");
    }
}
