use thiserror::Error;

/// Rejected run settings.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("population must contain at least one dot")]
    EmptyPopulation,
    #[error("genome must contain at least one move")]
    EmptyGenome,
    #[error("mutation rate {0} must be between 0.0 and 1.0")]
    MutationRate(f32),
    #[error("arena {width}x{height} must have positive dimensions")]
    ArenaSize { width: f32, height: f32 },
    #[error("{what} ({x}, {y}) lies outside the arena")]
    OutsideArena { what: &'static str, x: f32, y: f32 },
    #[error("arena {width}x{height} does not match configured {expected_width}x{expected_height}")]
    ArenaMismatch {
        width: f32,
        height: f32,
        expected_width: f32,
        expected_height: f32,
    },
    #[error("dot {index} carries {actual} moves, expected {expected}")]
    GenomeLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("dot {index} lives in a different arena")]
    ForeignArena { index: usize },
}

/// Conditions that mean the simulation state is corrupt. Nothing here is retryable.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("fitness sum {sum} leaves nothing to select from")]
    DegenerateFitness { sum: f32 },
}
