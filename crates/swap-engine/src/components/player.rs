//! The player state machine.
//!
//! Per tick: read controls, maybe jump, maybe fire, integrate gravity, move
//! through the collision groups, fly the projectile, check for falling out of
//! the world, then pick the animation strip. Death is started by the world
//! and runs for a fixed number of ticks before the player is removed.

use glam::Vec2;

use crate::api::game::Tuning;
use crate::api::types::EntityId;
use crate::components::animation::{AnimationComponent, AnimationDef};
use crate::components::projectile::{Projectile, ProjectileOutcome};
use crate::core::collision::{
    move_and_collide, register_group, Collidable, CollisionGroups, GroupKind, MoveReport, Obstacle,
    Resolve,
};
use crate::core::geometry::{Aabb, Side};
use crate::input::state::Controls;

pub const ANIM_IDLE: &str = "idle";
pub const ANIM_WALK: &str = "walk";
pub const ANIM_JUMP: &str = "jump";
pub const ANIM_DEAD: &str = "dead";

/// Observable movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Walking,
    /// Airborne and rising.
    Jumping,
    /// Airborne and not rising.
    Falling,
    /// Death animation running; terminal.
    Dead,
}

/// What happened to the player during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTick {
    /// A projectile was spawned this tick.
    pub fired: bool,
    /// Result of the live projectile's flight, if one was live.
    pub projectile: Option<ProjectileOutcome>,
    /// The player dropped below the world and must be removed.
    pub fell_out: bool,
    pub movement: MoveReport,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub bounds: Aabb,
    /// Horizontal intent this tick.
    pub velocity_x: f32,
    /// Vertical velocity; negative is up.
    pub velocity_y: f32,
    /// Gravity applied this tick.
    pub gravity: f32,
    pub airborne: bool,
    pub facing_left: bool,
    /// Aim angle, counter-clockwise from +x in a Y-up frame.
    pub aim_angle: f32,
    pub projectile: Option<Projectile>,
    /// Remaining death ticks once dying.
    pub death_ticks: Option<u32>,
    pub animation: AnimationComponent,
    groups: Vec<GroupKind>,
}

impl Player {
    /// Starts airborne, so it cannot jump before landing.
    pub fn new(id: EntityId, bounds: Aabb, mut animation: AnimationComponent) -> Self {
        animation.show(ANIM_IDLE);
        let mut groups = Vec::with_capacity(2);
        register_group(&mut groups, GroupKind::Platforms);
        register_group(&mut groups, GroupKind::Switches);
        Self {
            id,
            bounds,
            velocity_x: 0.0,
            velocity_y: 0.0,
            gravity: 0.0,
            airborne: true,
            facing_left: false,
            aim_angle: 0.0,
            projectile: None,
            death_ticks: None,
            animation,
            groups,
        }
    }

    /// Default strips: idle, walk, jump, dead on atlas rows 0..4.
    pub fn default_animation(frame_period_ms: f32, counts: [usize; 4]) -> AnimationComponent {
        AnimationComponent::new(frame_period_ms)
            .with(ANIM_IDLE, AnimationDef::strip(0.0, counts[0]))
            .with(ANIM_WALK, AnimationDef::strip(1.0, counts[1]))
            .with(ANIM_JUMP, AnimationDef::strip(2.0, counts[2]))
            .with(ANIM_DEAD, AnimationDef::strip(3.0, counts[3]))
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn is_dying(&self) -> bool {
        self.death_ticks.is_some()
    }

    pub fn state(&self) -> PlayerState {
        if self.is_dying() {
            PlayerState::Dead
        } else if self.airborne {
            if self.velocity_y < 0.0 {
                PlayerState::Jumping
            } else {
                PlayerState::Falling
            }
        } else if self.velocity_x != 0.0 {
            PlayerState::Walking
        } else {
            PlayerState::Idle
        }
    }

    /// Start a jump if standing on something.
    pub fn jump(&mut self, groups: &CollisionGroups, tuning: &Tuning) {
        if self.airborne {
            return;
        }
        self.velocity_y = tuning.jump_velocity;
        self.airborne = true;
        move_and_collide(self, groups, Vec2::new(0.0, -tuning.jump_nudge), Resolve::PassThrough);
    }

    /// Fire along the current aim unless a projectile is already live.
    pub fn fire(&mut self, tuning: &Tuning) -> bool {
        if self.projectile.is_some() {
            return false;
        }
        self.projectile = Some(Projectile::spawn(
            self.id,
            self.center(),
            self.aim_angle,
            tuning.muzzle_offset,
            tuning.projectile_speed,
            tuning.projectile_size,
            &self.groups,
        ));
        log::debug!("player {:?} fired at {:.2} rad", self.id, self.aim_angle);
        true
    }

    /// Add gravity for this tick and apply the airborne coupling.
    pub fn integrate_gravity(&mut self, tuning: &Tuning) {
        if self.velocity_y < tuning.gravity_cap {
            self.velocity_y = (self.velocity_y + self.gravity).min(tuning.gravity_cap);
        }
        // Walking off a ledge counts as airborne once falling fast enough.
        if self.velocity_y > tuning.airborne_threshold {
            self.airborne = true;
        }
    }

    /// One living tick. `world` is the world rectangle.
    pub fn update(
        &mut self,
        controls: &Controls,
        groups: &CollisionGroups,
        world: &Aabb,
        tuning: &Tuning,
    ) -> PlayerTick {
        let mut tick = PlayerTick::default();

        self.velocity_x = 0.0;
        // Aim is measured from the box's top-left corner.
        let to_pointer = controls.pointer - self.bounds.min;
        self.aim_angle = (-to_pointer.y).atan2(to_pointer.x);

        if controls.jump {
            self.gravity = tuning.gravity_held;
            self.jump(groups, tuning);
        } else {
            self.gravity = tuning.gravity_released;
        }

        if controls.left {
            self.facing_left = true;
            self.velocity_x = -tuning.walk_speed;
        }
        if controls.right {
            self.facing_left = false;
            self.velocity_x = tuning.walk_speed;
        }
        if controls.sprint {
            self.velocity_x *= tuning.sprint_multiplier;
        }

        if controls.fire {
            tick.fired = self.fire(tuning);
        }

        self.integrate_gravity(tuning);

        let delta = Vec2::new(self.velocity_x, self.velocity_y);
        tick.movement = move_and_collide(self, groups, delta, Resolve::Collide);

        if let Some(projectile) = self.projectile.as_mut() {
            let outcome = projectile.update(groups, world);
            if outcome.is_destroyed() {
                self.projectile = None;
            }
            tick.projectile = Some(outcome);
        }

        if self.bounds.top() > world.bottom() {
            tick.fell_out = true;
        }

        self.select_animation();
        tick
    }

    fn select_animation(&mut self) {
        let name = match self.state() {
            PlayerState::Dead => ANIM_DEAD,
            PlayerState::Jumping | PlayerState::Falling => ANIM_JUMP,
            PlayerState::Walking => ANIM_WALK,
            PlayerState::Idle => ANIM_IDLE,
        };
        self.animation.show(name);
    }

    /// Begin the death animation. No effect if already dying.
    pub fn kill(&mut self, ticks: u32) {
        if self.death_ticks.is_none() {
            self.death_ticks = Some(ticks);
            self.projectile = None;
            self.select_animation();
        }
    }

    /// Count down the death animation. Returns true once it has finished.
    pub fn tick_death(&mut self) -> bool {
        match self.death_ticks.as_mut() {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                *left == 0
            }
            None => false,
        }
    }
}

impl Collidable for Player {
    fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Aabb {
        &mut self.bounds
    }

    fn collision_groups(&self) -> &[GroupKind] {
        &self.groups
    }

    fn on_collision(&mut self, side: Side, obstacle: &Obstacle) {
        self.bounds.snap_to(side, &obstacle.bounds);
        match side {
            Side::Top => self.velocity_y = 0.0,
            Side::Bottom => {
                self.velocity_y = 0.0;
                self.airborne = false;
            }
            Side::Left | Side::Right => {}
        }
    }
}
