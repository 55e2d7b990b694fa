use bevy::math::{Rect, Vec2};

use crate::config::{EDGE_MARGIN, OBSTACLE_THICKNESS};
use crate::error::ConfigError;

/// The bounded field every dot of a run moves in. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub start: Vec2,
    pub goal: Vec2,
    pub obstacles: Vec<Rect>,
}

impl Arena {
    pub fn new(
        width: f32,
        height: f32,
        start: Vec2,
        goal: Vec2,
        obstacles: Vec<Rect>,
    ) -> Result<Self, ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::ArenaSize { width, height });
        }
        let arena = Self {
            width,
            height,
            start,
            goal,
            obstacles,
        };
        for (what, point) in [("start", start), ("goal", goal)] {
            if arena.out_of_bounds(point) {
                return Err(ConfigError::OutsideArena {
                    what,
                    x: point.x,
                    y: point.y,
                });
            }
        }
        Ok(arena)
    }

    /// Start at the bottom center, goal at the top center, and two staggered
    /// bars the dots have to weave around.
    pub fn classic(width: f32, height: f32) -> Result<Self, ConfigError> {
        let bar = Vec2::new(width / 1.4, OBSTACLE_THICKNESS);
        let obstacles = vec![
            Rect::from_center_size(Vec2::new(width / 4.0, height / 1.5), bar),
            Rect::from_center_size(Vec2::new(3.0 * width / 4.0, height / 3.3), bar),
        ];
        Self::new(
            width,
            height,
            Vec2::new(width / 2.0, EDGE_MARGIN),
            Vec2::new(width / 2.0, height - EDGE_MARGIN),
            obstacles,
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }

    pub fn out_of_bounds(&self, point: Vec2) -> bool {
        point.x < 0.0 || point.y < 0.0 || point.x > self.width || point.y > self.height
    }

    /// Component-wise clamp into `[0, width] x [0, height]`.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(Vec2::ZERO, self.size())
    }

    /// Obstacle containment includes the rectangle edges.
    pub fn blocked(&self, point: Vec2) -> bool {
        self.obstacles.iter().any(|obstacle| obstacle.contains(point))
    }
}
