pub mod brain;
pub mod config;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod population;
pub mod render;
pub mod simulation;
pub mod ui;

pub use brain::{Brain, StepError};
pub use config::SimulationConfig;
pub use error::{ConfigError, SimError};
pub use genome::Genome;
pub use geometry::Arena;
pub use population::{Counts, GenerationSummary, Marker, Population};
