use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, egui};

use crate::population::Population;
use crate::simulation::SimulationState;

/// Stats window with pause and display controls
pub struct StatsPanelPlugin;

impl Plugin for StatsPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin).add_systems(Update, ui_system);
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut simulation_state: ResMut<SimulationState>,
    population: Option<ResMut<Population>>,
) {
    egui::Window::new("Evolution")
        .default_pos(egui::pos2(10.0, 10.0))
        .show(contexts.ctx_mut(), |ui| {
            // Pause/Resume
            ui.horizontal(|ui| {
                let running = *simulation_state == SimulationState::Running;
                let button_text = if running { "⏸ Pause" } else { "▶ Resume" };
                if ui.button(button_text).clicked() {
                    *simulation_state = if running {
                        SimulationState::Paused
                    } else {
                        SimulationState::Running
                    };
                }
                ui.label(format!("State: {}", if running { "Running" } else { "Paused" }));
            });

            let Some(mut population) = population else {
                ui.label("No population");
                return;
            };

            let mut draw_only_best = population.draw_only_best();
            if ui.checkbox(&mut draw_only_best, "Draw only best").changed() {
                population.set_draw_only_best(draw_only_best);
            }

            ui.separator();
            ui.heading("Generation");
            ui.separator();

            let counts = population.counts();
            ui.label(format!("Generation: {}", population.generation()));
            ui.label(format!("Alive: {}", counts.alive));
            ui.label(format!("Reached goal: {}", counts.reached_goal));
            ui.label(format!("Dead: {}", counts.dead));
            ui.label(format!("Step cap: {}", population.min_steps()));
            ui.label(format!("Staleness: {}", population.staleness()));

            if let Some(summary) = population.previous_summary() {
                ui.separator();
                ui.heading("Last generation");
                ui.separator();

                ui.label(format!("Best fitness: {:.5}", summary.best_fitness));
                ui.label(format!("Best slot: {}", summary.best_index));
                ui.label(format!("Reached goal: {}", summary.reached_goal));
                if summary.stagnating {
                    ui.colored_label(egui::Color32::from_rgb(255, 150, 50), "Stagnating: bred from elite");
                }
            }
        });
}
