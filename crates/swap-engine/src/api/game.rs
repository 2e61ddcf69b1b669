use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::core::time::Clock;
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;

/// The player box is a tile narrowed by this much.
pub const PLAYER_NARROWING: f32 = 10.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tile_size {0} leaves no room for the player (must exceed 10)")]
    TileSize(f32),
    #[error("tick_rate must be positive, got {0}")]
    TickRate(f32),
}

/// Gameplay constants. All distances are in world units, all speeds in
/// units per tick. Integration is per tick, not scaled by frame time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal speed while a direction key is held.
    pub walk_speed: f32,
    /// Multiplier applied to the walk speed while sprinting.
    pub sprint_multiplier: f32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_velocity: f32,
    /// Unresolved upward nudge applied when a jump starts.
    pub jump_nudge: f32,
    /// Per-tick gravity while the jump input is held.
    pub gravity_held: f32,
    /// Per-tick gravity otherwise.
    pub gravity_released: f32,
    /// Vertical velocity never exceeds this value through gravity.
    pub gravity_cap: f32,
    /// Vertical velocity above which the player counts as airborne.
    pub airborne_threshold: f32,
    /// Projectile travel per tick.
    pub projectile_speed: f32,
    /// Distance from the player's centre at which projectiles spawn.
    pub muzzle_offset: f32,
    /// Projectile box edge length.
    pub projectile_size: f32,
    /// Enemy patrol speed.
    pub patrol_speed: f32,
    /// Moving-switch horizontal speed.
    pub switch_speed_x: f32,
    /// Moving-switch vertical speed.
    pub switch_speed_y: f32,
    /// Moving-switch horizontal wander extent around its origin.
    pub switch_wander_x: f32,
    /// Moving-switch vertical wander extent around its origin.
    pub switch_wander_y: f32,
    /// Interpolation steps of a swap animation.
    pub swap_steps: u32,
    /// Ticks the death animation holds the world.
    pub death_ticks: u32,
    /// Margin trimmed from every side of the exit zone before the overlap test.
    pub exit_margin: f32,
    /// Milliseconds between animation frames.
    pub frame_period_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            sprint_multiplier: 2.0,
            jump_velocity: -6.0,
            jump_nudge: 4.0,
            gravity_held: 0.3,
            gravity_released: 1.0,
            gravity_cap: 8.0,
            airborne_threshold: 3.0,
            projectile_speed: 20.0,
            muzzle_offset: 20.0,
            projectile_size: 10.0,
            patrol_speed: 3.0,
            switch_speed_x: 3.0,
            switch_speed_y: 0.0,
            switch_wander_x: 200.0,
            switch_wander_y: 120.0,
            swap_steps: 10,
            death_ticks: 7,
            exit_margin: 20.0,
            frame_period_ms: 75.0,
        }
    }
}

/// Frames per sprite strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameCounts {
    pub player_idle: usize,
    pub player_walk: usize,
    pub player_jump: usize,
    pub player_dead: usize,
    pub enemy: usize,
    pub exit: usize,
}

impl Default for FrameCounts {
    fn default() -> Self {
        Self {
            player_idle: 4,
            player_walk: 6,
            player_jump: 2,
            player_dead: 7,
            enemy: 4,
            exit: 4,
        }
    }
}

impl FrameCounts {
    /// Player strips in idle, walk, jump, dead order.
    pub fn player(&self) -> [usize; 4] {
        [self.player_idle, self.player_walk, self.player_jump, self.player_dead]
    }
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second. Physics moves fixed amounts per tick.
    pub tick_rate: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Grid spacing of level layouts.
    pub tile_size: f32,
    /// Maximum number of render instances (default: 512).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    pub tuning: Tuning,
    pub frames: FrameCounts,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 40.0,
            world_width: 800.0,
            world_height: 600.0,
            tile_size: 40.0,
            max_instances: 512,
            max_sounds: 32,
            max_events: 32,
            tuning: Tuning::default(),
            frames: FrameCounts::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes and rates that would build degenerate boxes or stall
    /// the tick loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written to also reject NaN.
        if !(self.tile_size > PLAYER_NARROWING) {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        if !(self.tick_rate > 0.0) {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        Ok(())
    }

    /// Player box size: one tile tall, slightly narrower than a tile.
    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.tile_size - PLAYER_NARROWING, self.tile_size)
    }

    /// Seconds per simulation tick.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and load the first level.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One simulation tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass writing instances for the host.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pub clock: Clock,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            events: Vec::new(),
            clock: Clock::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Handed to `Game::render`. Animation frames are already chosen during
/// `update`, so rendering only copies state out.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}
