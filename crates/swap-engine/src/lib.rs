pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{
    ConfigError, EngineContext, FrameCounts, Game, GameConfig, RenderContext, Tuning, PLAYER_NARROWING,
};
pub use api::types::{EntityId, GameEvent, SoundEvent};
pub use assets::level::{
    parse_enemy_params, LevelError, LevelLayout, LevelManifest, LevelProvider, LevelSet,
    LevelSource,
};
pub use components::animation::{AnimationComponent, AnimationDef};
pub use components::enemy::{Patrol, PatrolExtents};
pub use components::player::{Player, PlayerState, PlayerTick};
pub use components::projectile::{Projectile, ProjectileOutcome};
pub use components::switch::{Oscillation, SwitchState};
pub use core::collision::{
    move_and_collide, register_group, Collidable, CollisionGroup, CollisionGroups, Contact,
    GroupKind, MoveReport, Obstacle, ObstacleKind, Resolve,
};
pub use core::geometry::{Aabb, Side};
pub use core::time::{Clock, FixedTimestep};
pub use core::world::{ExitZone, World, WorldStatus};
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{Controls, InputState, KeyBindings};
pub use renderer::instance::{RenderBuffer, RenderInstance, Sheet};
pub use systems::animation::tick_animations;
pub use systems::render::build_render_buffer;
pub use systems::swap::{SwapAnimation, SwapFrame};
