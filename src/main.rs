use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{ArgAction, Parser};
use genetic_dots::config::*;
use genetic_dots::render::ArenaViewPlugin;
use genetic_dots::simulation::SimulationPlugin;
use genetic_dots::ui::StatsPanelPlugin;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "dots")]
#[command(about = "Breed a swarm of dots that learns to reach the goal")]
struct Cli {
    /// Number of dots per generation
    #[arg(default_value_t = DEFAULT_POPULATION_SIZE)]
    population_size: usize,

    /// Chance that each move of a bred dot is re-rolled
    #[arg(default_value_t = DEFAULT_MUTATION_RATE)]
    mutation_rate: f32,

    /// Only draw the carried-over best dot after the first generation
    #[arg(default_value_t = false, action = ArgAction::Set)]
    draw_only_best: bool,

    /// Seed for genome sampling, mutation and selection (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Exit after breeding this many generations
    #[arg(long)]
    generations: Option<u32>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> AppExit {
    let cli = Cli::parse();
    let config = SimulationConfig {
        population_size: cli.population_size,
        mutation_rate: cli.mutation_rate,
        draw_only_best: cli.draw_only_best,
        seed: cli.seed.unwrap_or_else(clock_seed),
        ..SimulationConfig::default()
    };
    if let Err(err) = config.validate() {
        eprintln!("dots: {err}");
        return AppExit::error();
    }

    let simulation = SimulationPlugin {
        config: config.clone(),
        generation_limit: cli.generations,
    };

    if cli.headless {
        return App::new()
            .add_plugins((MinimalPlugins, LogPlugin::default(), simulation))
            .run();
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Genetic Dots".to_string(),
                resolution: (config.arena_width, config.arena_height).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((simulation, ArenaViewPlugin, StatsPanelPlugin))
        .run()
}
