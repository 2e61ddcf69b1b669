//! Animation system: advances every frame strip in the world by wall-clock time.

use crate::core::world::World;

/// Tick the player, enemy and exit animations.
///
/// Call once per simulation tick, after movement.
pub fn tick_animations(world: &mut World, now_ms: f64) {
    if let Some(player) = world.player.as_mut() {
        player.animation.tick(now_ms);
    }
    world.enemy_animation.tick(now_ms);
    world.exit_animation.tick(now_ms);
}
