//! Interpolated position exchange between a switch and the player.
//!
//! The exchange runs as per-tick state owned by the world: each step moves
//! both centres a fixed fraction of the original separation toward each
//! other, and the last step assigns the exact swapped centres. While it runs
//! nothing else in the world advances.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::collision::{CollisionGroup, ObstacleKind};
use crate::core::geometry::Aabb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapAnimation {
    pub switch: EntityId,
    switch_from: Vec2,
    other_from: Vec2,
    steps: u32,
    step: u32,
}

/// Centres after one swap step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapFrame {
    pub switch_center: Vec2,
    pub other_center: Vec2,
    pub finished: bool,
}

impl SwapAnimation {
    /// Zero steps is treated as one.
    pub fn new(switch: EntityId, switch_center: Vec2, other_center: Vec2, steps: u32) -> Self {
        Self {
            switch,
            switch_from: switch_center,
            other_from: other_center,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Compute the next step's centres.
    pub fn step(&mut self) -> SwapFrame {
        self.step = (self.step + 1).min(self.steps);
        if self.is_finished() {
            return SwapFrame {
                switch_center: self.other_from,
                other_center: self.switch_from,
                finished: true,
            };
        }
        let delta = (self.other_from - self.switch_from) / self.steps as f32;
        let moved = delta * self.step as f32;
        SwapFrame {
            switch_center: self.switch_from + moved,
            other_center: self.other_from - moved,
            finished: false,
        }
    }

    /// Take one step and write it into the switch and the other box. On the
    /// last step the switch flips its activity and a moving switch re-centres
    /// its wander on the new spot. Returns true once finished.
    pub fn advance(&mut self, switches: &mut CollisionGroup, other: &mut Aabb) -> bool {
        let frame = self.step();
        other.set_center(frame.other_center);

        let Some(switch) = switches.get_mut(self.switch) else {
            log::warn!("swap target {:?} is gone", self.switch);
            return frame.finished;
        };
        switch.bounds.set_center(frame.switch_center);

        if frame.finished {
            if let ObstacleKind::Switch(state) = &mut switch.kind {
                state.active = !state.active;
                if let Some(oscillation) = state.oscillation.as_mut() {
                    oscillation.recenter(frame.switch_center);
                }
            }
            log::debug!("swap with {:?} finished at {:?}", self.switch, frame.switch_center);
        }
        frame.finished
    }
}
