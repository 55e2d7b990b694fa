use bevy::prelude::*;

use crate::config::{DOT_SIZE, ELITE_SIZE, GOAL_SIZE};
use crate::population::Population;
use crate::simulation::TickMarkers;

#[derive(Component)]
pub struct MainCamera;

/// Sprite standing in for the dot at `index` of the current generation
#[derive(Component)]
pub struct Dot {
    pub index: usize,
}

/// Arena offset so that arena coordinates (origin bottom-left) land centered on screen
#[derive(Resource, Default)]
pub struct ArenaOrigin(pub Vec2);

/// Draws the arena, the goal, the obstacles and every dot
pub struct ArenaViewPlugin;

impl Plugin for ArenaViewPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::WHITE))
            .init_resource::<ArenaOrigin>()
            .add_systems(PostStartup, setup_arena)
            .add_systems(Update, sync_dots);
    }
}

fn setup_arena(
    mut commands: Commands,
    mut origin: ResMut<ArenaOrigin>,
    population: Option<Res<Population>>,
) {
    commands.spawn((Camera2d, MainCamera, Transform::from_xyz(0.0, 0.0, 0.0)));

    let Some(population) = population else {
        return;
    };
    let arena = population.arena();
    origin.0 = arena.center();

    for obstacle in &arena.obstacles {
        let center = obstacle.center() - origin.0;
        commands.spawn((
            Sprite::from_color(Color::srgb(0.9, 0.1, 0.1), obstacle.size()),
            Transform::from_xyz(center.x, center.y, 0.0),
        ));
    }

    let goal = arena.goal - origin.0;
    commands.spawn((
        Sprite::from_color(Color::srgb(0.1, 0.7, 0.1), Vec2::splat(GOAL_SIZE)),
        Transform::from_xyz(goal.x, goal.y, 0.1),
    ));
}

/// Move dot sprites to the latest tick, restyling the elite and hiding
/// suppressed dots.
fn sync_dots(
    mut commands: Commands,
    markers: Res<TickMarkers>,
    origin: Res<ArenaOrigin>,
    mut dots: Query<(&Dot, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    if !markers.is_changed() {
        return;
    }

    let mut seen = vec![false; markers.0.len()];
    for (dot, mut sprite, mut transform, mut visibility) in dots.iter_mut() {
        let Some(marker) = markers.0.get(dot.index) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        seen[dot.index] = true;

        let (color, size, depth) = if marker.elite {
            (Color::srgb(0.1, 0.7, 0.1), ELITE_SIZE, 2.0)
        } else {
            (Color::BLACK, DOT_SIZE, 1.0)
        };
        sprite.color = color;
        sprite.custom_size = Some(Vec2::splat(size));
        let position = marker.position - origin.0;
        transform.translation = Vec3::new(position.x, position.y, depth);
        transform.rotation = Quat::from_rotation_z(marker.heading);
        *visibility = if marker.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    for marker in markers.0.iter().filter(|marker| !seen[marker.index]) {
        let position = marker.position - origin.0;
        commands.spawn((
            Dot {
                index: marker.index,
            },
            Sprite::from_color(Color::BLACK, Vec2::splat(DOT_SIZE)),
            Transform::from_xyz(position.x, position.y, 1.0),
            if marker.visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
        ));
    }
}
