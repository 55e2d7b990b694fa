use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::geometry::Arena;
use crate::population::{Marker, Population};

/// Resource to control simulation state
#[derive(Resource, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SimulationState {
    #[default]
    Running,
    Paused,
}

/// Stop the app once this many generations have been bred
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct GenerationLimit(pub Option<u32>);

/// Dot positions produced by the latest tick
#[derive(Resource, Debug, Default)]
pub struct TickMarkers(pub Vec<Marker>);

/// Runs one population tick per frame and breeds a new generation whenever
/// the current one is exhausted
pub struct SimulationPlugin {
    pub config: SimulationConfig,
    pub generation_limit: Option<u32>,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(GenerationLimit(self.generation_limit))
            .init_resource::<SimulationState>()
            .init_resource::<TickMarkers>()
            .add_systems(Startup, spawn_population)
            .add_systems(
                Update,
                advance_population
                    .run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
            );
    }
}

fn spawn_population(world: &mut World) {
    let config = world.resource::<SimulationConfig>().clone();
    let population = Arena::classic(config.arena_width, config.arena_height)
        .map_err(SimError::from)
        .and_then(|arena| Population::new(&config, arena));
    match population {
        Ok(population) => {
            info!(
                dots = population.len(),
                genome_length = config.genome_length,
                mutation_rate = config.mutation_rate,
                seed = config.seed,
                "population ready"
            );
            world.insert_resource(population);
        }
        Err(err) => {
            error!("could not build the first generation: {err}");
            world.send_event(AppExit::error());
        }
    }
}

/// Tick, then swap in the next generation once everyone is done.
fn advance_population(world: &mut World) {
    let Some(mut population) = world.get_resource_mut::<Population>() else {
        return;
    };
    let markers = population.tick();
    let finished = population.all_dead();
    world.resource_mut::<TickMarkers>().0 = markers;
    if !finished {
        return;
    }

    let Some(population) = world.remove_resource::<Population>() else {
        return;
    };
    match population.evolve() {
        Ok(next) => {
            let bred = next.generation();
            world.insert_resource(next);
            if let GenerationLimit(Some(limit)) = *world.resource::<GenerationLimit>() {
                if bred >= limit {
                    info!(generations = bred, "generation limit reached");
                    world.send_event(AppExit::Success);
                }
            }
        }
        Err(err) => {
            error!("simulation state is corrupt: {err}");
            world.send_event(AppExit::error());
        }
    }
}
