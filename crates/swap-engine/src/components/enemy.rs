//! Enemy patrol: constant-speed back-and-forth between two absolute bounds.
//!
//! Patrols never touch collision groups. Contact with the player is a separate
//! overlap test owned by the world and never displaces anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Aabb;

/// Distances a patrol may travel left and right of its spawn centre.
/// Serialized as a `[left, right]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct PatrolExtents {
    pub left: f32,
    pub right: f32,
}

impl PatrolExtents {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }
}

impl From<(f32, f32)> for PatrolExtents {
    fn from((left, right): (f32, f32)) -> Self {
        Self::new(left, right)
    }
}

impl From<PatrolExtents> for (f32, f32) {
    fn from(e: PatrolExtents) -> Self {
        (e.left, e.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    /// Leftmost centre x.
    pub min: f32,
    /// Rightmost centre x.
    pub max: f32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
    pub speed: f32,
    pub facing_left: bool,
}

impl Patrol {
    /// Bounds are fixed here, from the spawn centre, and never move.
    pub fn new(spawn_x: f32, extents: PatrolExtents, speed: f32) -> Self {
        Self {
            min: spawn_x - extents.left,
            max: spawn_x + extents.right,
            direction: 1.0,
            speed,
            facing_left: false,
        }
    }

    /// Advance one tick, moving `bounds` horizontally. Reaching or passing a
    /// bound stops there and turns around.
    pub fn step(&mut self, bounds: &mut Aabb) {
        let center = bounds.center();
        let mut x = center.x + self.direction * self.speed;
        if x >= self.max {
            x = self.max;
            self.turn();
        } else if x <= self.min {
            x = self.min;
            self.turn();
        }
        bounds.set_center(Vec2::new(x, center.y));
    }

    fn turn(&mut self) {
        self.direction = -self.direction;
        self.facing_left = !self.facing_left;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saw_at(x: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, 100.0), Vec2::new(60.0, 30.0))
    }

    #[test]
    fn bounds_come_from_spawn_center() {
        let p = Patrol::new(300.0, PatrolExtents::new(40.0, 70.0), 3.0);
        assert_eq!(p.min, 260.0);
        assert_eq!(p.max, 370.0);
    }

    #[test]
    fn stays_within_bounds_forever() {
        let mut bounds = saw_at(300.0);
        let mut p = Patrol::new(300.0, PatrolExtents::new(10.0, 8.0), 3.0);
        for _ in 0..500 {
            p.step(&mut bounds);
            let x = bounds.center().x;
            assert!(x >= p.min && x <= p.max, "x={x} escaped [{}, {}]", p.min, p.max);
        }
    }

    #[test]
    fn turns_exactly_at_bound() {
        let mut bounds = saw_at(300.0);
        let mut p = Patrol::new(300.0, PatrolExtents::new(6.0, 6.0), 3.0);

        p.step(&mut bounds);
        assert_eq!(bounds.center().x, 303.0);
        assert_eq!(p.direction, 1.0);

        p.step(&mut bounds);
        assert_eq!(bounds.center().x, 306.0);
        assert_eq!(p.direction, -1.0);
        assert!(p.facing_left);

        p.step(&mut bounds);
        assert_eq!(bounds.center().x, 303.0);
    }

    #[test]
    fn overshooting_step_is_clamped() {
        let mut bounds = saw_at(300.0);
        let mut p = Patrol::new(300.0, PatrolExtents::new(5.0, 5.0), 3.0);
        p.step(&mut bounds);
        p.step(&mut bounds);
        assert_eq!(bounds.center().x, 305.0);
        assert_eq!(p.direction, -1.0);
    }

    #[test]
    fn vertical_position_is_untouched() {
        let mut bounds = saw_at(300.0);
        let mut p = Patrol::new(300.0, PatrolExtents::new(50.0, 50.0), 3.0);
        for _ in 0..40 {
            p.step(&mut bounds);
        }
        assert_eq!(bounds.center().y, 100.0);
    }
}
