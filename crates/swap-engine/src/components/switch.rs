//! Switch state: the activity flag and the optional wander of moving switches.

use glam::Vec2;

/// Bounded back-and-forth wander of a moving switch around an origin.
/// Overshoots its extent by up to one step before turning, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    /// Centre the wander is bounded around.
    pub origin: Vec2,
    /// Current centre.
    pub position: Vec2,
    /// Signed per-tick displacement.
    pub velocity: Vec2,
    /// Allowed distance from `origin` on each axis.
    pub extent: Vec2,
}

impl Oscillation {
    pub fn new(origin: Vec2, velocity: Vec2, extent: Vec2) -> Self {
        Self {
            origin,
            position: origin,
            velocity,
            extent,
        }
    }

    /// Advance one tick and return the new centre.
    pub fn step(&mut self) -> Vec2 {
        self.position += self.velocity;
        if self.position.x > self.origin.x + self.extent.x
            || self.position.x < self.origin.x - self.extent.x
        {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y > self.origin.y + self.extent.y
            || self.position.y < self.origin.y - self.extent.y
        {
            self.velocity.y = -self.velocity.y;
        }
        self.position
    }

    /// Continue wandering around `center` from now on.
    pub fn recenter(&mut self, center: Vec2) {
        self.origin = center;
        self.position = center;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchState {
    /// Flips on every completed swap; picks the sprite.
    pub active: bool,
    pub oscillation: Option<Oscillation>,
}

impl SwitchState {
    /// A switch that stays where it was placed.
    pub fn fixed() -> Self {
        Self {
            active: true,
            oscillation: None,
        }
    }

    /// A switch that wanders around `center`.
    pub fn moving(center: Vec2, velocity: Vec2, extent: Vec2) -> Self {
        Self {
            active: true,
            oscillation: Some(Oscillation::new(center, velocity, extent)),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.oscillation.is_some()
    }
}
