//! The level world: obstacle groups, the player, the entrance and the exit.
//!
//! One `update` is one simulation tick. A running swap or death sequence
//! consumes the whole tick; otherwise the player moves first, then switches
//! and enemies, then the enemy contact test, then any swap the player's
//! projectile triggered, then the exit test.

use glam::Vec2;

use crate::api::game::{EngineContext, GameConfig, Tuning};
use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::assets::level::{LevelLayout, LevelSource};
use crate::components::animation::{AnimationComponent, AnimationDef};
use crate::components::enemy::{Patrol, PatrolExtents};
use crate::components::player::{Player, ANIM_JUMP};
use crate::components::projectile::ProjectileOutcome;
use crate::components::switch::SwitchState;
use crate::core::collision::{CollisionGroups, Obstacle, ObstacleKind};
use crate::core::geometry::Aabb;
use crate::input::state::Controls;
use crate::renderer::instance::Sheet;
use crate::systems::animation::tick_animations;
use crate::systems::swap::SwapAnimation;

const ENEMY_SIZE: Vec2 = Vec2::new(60.0, 30.0);
/// Enemies sit this far below their cell centre.
const ENEMY_DROP: f32 = 5.0;

const ANIM_LOOP: &str = "loop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldStatus {
    Playing,
    /// A swap is running; nothing else advances.
    Swapping,
    /// The death sequence is running; nothing else advances.
    Dying,
    /// The player reached the exit.
    Complete,
    /// The player fell out or finished dying.
    PlayerLost,
}

impl WorldStatus {
    pub fn is_over(self) -> bool {
        matches!(self, WorldStatus::Complete | WorldStatus::PlayerLost)
    }
}

/// The exit box and the margin shaved off every side before the overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitZone {
    pub bounds: Aabb,
    pub margin: f32,
}

impl ExitZone {
    pub fn new(bounds: Aabb, margin: f32) -> Self {
        Self { bounds, margin }
    }

    /// Strict overlap with the shrunk exit. A margin that consumes the whole
    /// box leaves its centre point, which must lie strictly inside `player`.
    pub fn is_reached(&self, player: &Aabb) -> bool {
        let center = self.bounds.center();
        let half = (self.bounds.size / 2.0 - Vec2::splat(self.margin)).max(Vec2::ZERO);
        player.left() < center.x + half.x
            && player.right() > center.x - half.x
            && player.top() < center.y + half.y
            && player.bottom() > center.y - half.y
    }
}

pub struct World {
    pub groups: CollisionGroups,
    pub player: Option<Player>,
    /// Player spawn centre.
    pub entrance: Vec2,
    pub exit: Option<ExitZone>,
    pub enemy_animation: AnimationComponent,
    pub exit_animation: AnimationComponent,
    bounds: Aabb,
    tuning: Tuning,
    swap: Option<SwapAnimation>,
    status: WorldStatus,
}

impl World {
    pub fn load(source: &LevelSource, config: &GameConfig, ctx: &mut EngineContext) -> Self {
        Self::from_layout(&source.layout, &source.enemies, config, ctx)
    }

    /// Walk the grid and spawn everything, then the player at the entrance.
    /// Unknown symbols are ignored, as are `V` cells beyond the patrol list.
    pub fn from_layout(
        layout: &LevelLayout,
        enemies: &[PatrolExtents],
        config: &GameConfig,
        ctx: &mut EngineContext,
    ) -> Self {
        let tile = config.tile_size;
        let tuning = &config.tuning;
        let mut groups = CollisionGroups::new();
        let mut entrance = Vec2::ZERO;
        let mut exit = None;
        let mut patrols = enemies.iter();

        for (col, row, symbol) in layout.cells() {
            let center = Vec2::new(tile / 2.0 + col as f32 * tile, tile / 2.0 + row as f32 * tile);
            let cell = Aabb::from_center(center, Vec2::splat(tile));
            match symbol {
                'Q' => entrance = center,
                'E' => exit = Some(ExitZone::new(cell, tuning.exit_margin)),
                'S' => groups
                    .switches
                    .spawn(Obstacle::switch(ctx.next_id(), cell, SwitchState::fixed())),
                'M' => {
                    let state = SwitchState::moving(
                        center,
                        Vec2::new(tuning.switch_speed_x, tuning.switch_speed_y),
                        Vec2::new(tuning.switch_wander_x, tuning.switch_wander_y),
                    );
                    groups.switches.spawn(Obstacle::switch(ctx.next_id(), cell, state));
                }
                'V' => match patrols.next() {
                    Some(extents) => {
                        let bounds = Aabb::from_center(center + Vec2::new(0.0, ENEMY_DROP), ENEMY_SIZE);
                        let patrol = Patrol::new(center.x, *extents, tuning.patrol_speed);
                        groups.enemies.spawn(Obstacle::enemy(ctx.next_id(), bounds, patrol));
                    }
                    None => log::debug!("no patrol for enemy at ({col}, {row}), skipped"),
                },
                _ => {
                    if let Some(digit) = symbol.to_digit(10) {
                        groups
                            .platforms
                            .spawn(Obstacle::platform(ctx.next_id(), cell, digit as u8));
                    }
                }
            }
        }

        let player_bounds = Aabb::from_center(entrance, config.player_size());
        let player = Player::new(
            ctx.next_id(),
            player_bounds,
            Player::default_animation(tuning.frame_period_ms, config.frames.player()),
        );

        log::info!(
            "world built: {} platforms, {} switches, {} enemies",
            groups.platforms.len(),
            groups.switches.len(),
            groups.enemies.len()
        );

        Self {
            groups,
            player: Some(player),
            entrance,
            exit,
            enemy_animation: looping(tuning.frame_period_ms, Sheet::Enemy, config.frames.enemy),
            exit_animation: looping(tuning.frame_period_ms, Sheet::Exit, config.frames.exit),
            bounds: Aabb::new(Vec2::ZERO, Vec2::new(config.world_width, config.world_height)),
            tuning: tuning.clone(),
            swap: None,
            status: WorldStatus::Playing,
        }
    }

    /// The world rectangle.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn status(&self) -> WorldStatus {
        self.status
    }

    pub fn swap(&self) -> Option<&SwapAnimation> {
        self.swap.as_ref()
    }

    /// Run one tick.
    pub fn update(&mut self, controls: &Controls, ctx: &mut EngineContext) -> WorldStatus {
        if self.status.is_over() {
            return self.status;
        }

        self.status = if self.swap.is_some() {
            self.step_swap(ctx)
        } else if self.player.as_ref().is_some_and(Player::is_dying) {
            self.step_death(ctx)
        } else {
            self.step_play(controls, ctx)
        };

        tick_animations(self, ctx.clock.now_ms());
        self.status
    }

    fn step_play(&mut self, controls: &Controls, ctx: &mut EngineContext) -> WorldStatus {
        let Some(player) = self.player.as_mut() else {
            return WorldStatus::PlayerLost;
        };

        let tick = player.update(controls, &self.groups, &self.bounds, &self.tuning);
        if tick.fired {
            ctx.emit_sound(SoundEvent::SHOOT);
        }
        if tick.fell_out {
            return self.lose_player(ctx);
        }

        self.step_obstacles();

        if self.touches_enemy() {
            if let Some(player) = self.player.as_mut() {
                player.kill(self.tuning.death_ticks);
                log::info!("player {:?} hit an enemy", player.id);
            }
            ctx.emit_sound(SoundEvent::DEATH);
            return WorldStatus::Dying;
        }

        if let Some(ProjectileOutcome::HitSwitch(switch)) = tick.projectile {
            if self.begin_swap(switch, ctx) {
                return WorldStatus::Swapping;
            }
        }

        self.check_exit(ctx)
    }

    /// Advance moving switches and enemy patrols.
    fn step_obstacles(&mut self) {
        for switch in self.groups.switches.iter_mut() {
            if let ObstacleKind::Switch(state) = &mut switch.kind {
                if let Some(oscillation) = state.oscillation.as_mut() {
                    switch.bounds.set_center(oscillation.step());
                }
            }
        }
        for enemy in self.groups.enemies.iter_mut() {
            if let ObstacleKind::Enemy(patrol) = &mut enemy.kind {
                patrol.step(&mut enemy.bounds);
            }
        }
    }

    fn touches_enemy(&self) -> bool {
        let Some(player) = self.player.as_ref() else {
            return false;
        };
        self.groups.enemies.overlapping(&player.bounds).next().is_some()
    }

    /// Start exchanging `switch` with the player. False if either is gone.
    pub fn begin_swap(&mut self, switch: EntityId, ctx: &mut EngineContext) -> bool {
        let (Some(player), Some(target)) = (self.player.as_mut(), self.groups.switches.get(switch)) else {
            return false;
        };
        self.swap = Some(SwapAnimation::new(
            switch,
            target.bounds.center(),
            player.center(),
            self.tuning.swap_steps,
        ));
        player.animation.show(ANIM_JUMP);
        ctx.emit_sound(SoundEvent::SWAP);
        log::debug!("swap with {switch:?} started");
        true
    }

    fn step_swap(&mut self, ctx: &mut EngineContext) -> WorldStatus {
        let (Some(swap), Some(player)) = (self.swap.as_mut(), self.player.as_mut()) else {
            self.swap = None;
            return WorldStatus::PlayerLost;
        };
        if !swap.advance(&mut self.groups.switches, &mut player.bounds) {
            return WorldStatus::Swapping;
        }

        let switch = swap.switch;
        self.swap = None;
        if let Some(target) = self.groups.switches.get(switch) {
            let at = target.bounds.center();
            ctx.emit_event(GameEvent::new(GameEvent::SWAPPED, at.x, at.y, 0.0));
        }
        self.check_exit(ctx)
    }

    fn step_death(&mut self, ctx: &mut EngineContext) -> WorldStatus {
        let finished = self.player.as_mut().map_or(true, Player::tick_death);
        if finished {
            self.lose_player(ctx)
        } else {
            WorldStatus::Dying
        }
    }

    fn lose_player(&mut self, ctx: &mut EngineContext) -> WorldStatus {
        if let Some(player) = self.player.take() {
            let at = player.center();
            log::info!("player {:?} lost at ({:.0}, {:.0})", player.id, at.x, at.y);
            ctx.emit_event(GameEvent::new(GameEvent::PLAYER_DIED, at.x, at.y, 0.0));
        }
        WorldStatus::PlayerLost
    }

    fn check_exit(&mut self, ctx: &mut EngineContext) -> WorldStatus {
        let reached = match (self.player.as_ref(), self.exit.as_ref()) {
            (Some(player), Some(exit)) => exit.is_reached(&player.bounds),
            _ => false,
        };
        if reached {
            ctx.emit_sound(SoundEvent::LEVEL_COMPLETE);
            WorldStatus::Complete
        } else {
            WorldStatus::Playing
        }
    }
}

fn looping(frame_period_ms: f32, sheet: Sheet, frames: usize) -> AnimationComponent {
    let mut anim = AnimationComponent::new(frame_period_ms).with(ANIM_LOOP, AnimationDef::strip(sheet.id(), frames));
    anim.show(ANIM_LOOP);
    anim
}
