//! Builds the per-tick instance list the host draws.

use crate::components::projectile::Projectile;
use crate::core::collision::{Obstacle, ObstacleKind};
use crate::core::world::World;
use crate::renderer::instance::{RenderBuffer, RenderInstance, Sheet};

/// Rebuild `buffer` from the world. Draw order: platforms, switches, exit,
/// enemies, player, projectile.
pub fn build_render_buffer(world: &World, buffer: &mut RenderBuffer) {
    buffer.clear();

    for platform in world.groups.platforms.iter() {
        push_obstacle(buffer, platform, 0.0, false);
    }
    for switch in world.groups.switches.iter() {
        push_obstacle(buffer, switch, 0.0, false);
    }

    if let Some(exit) = world.exit.as_ref() {
        let frame = world.exit_animation.current_frame().map_or(0.0, |(col, _)| col);
        let c = exit.bounds.center();
        buffer.push(RenderInstance {
            x: c.x,
            y: c.y,
            width: exit.bounds.width(),
            height: exit.bounds.height(),
            sheet: Sheet::Exit.id(),
            frame,
            rotation: 0.0,
            mirror: 0.0,
        });
    }

    let enemy_frame = world.enemy_animation.current_frame().map_or(0.0, |(col, _)| col);
    for enemy in world.groups.enemies.iter() {
        let facing_left = matches!(&enemy.kind, ObstacleKind::Enemy(p) if p.facing_left);
        push_obstacle(buffer, enemy, enemy_frame, facing_left);
    }

    if let Some(player) = world.player.as_ref() {
        let (frame, sheet) = player
            .animation
            .current_frame()
            .unwrap_or((0.0, Sheet::PlayerIdle.id()));
        let c = player.center();
        buffer.push(RenderInstance {
            x: c.x,
            y: c.y,
            width: player.bounds.width(),
            height: player.bounds.height(),
            sheet,
            frame,
            rotation: 0.0,
            mirror: if player.facing_left { 1.0 } else { 0.0 },
        });

        if let Some(shot) = player.projectile.as_ref() {
            push_projectile(buffer, shot);
        }
    }
}

fn push_obstacle(buffer: &mut RenderBuffer, obstacle: &Obstacle, frame: f32, mirrored: bool) {
    let (sheet, frame) = match &obstacle.kind {
        ObstacleKind::Platform { variant } => (Sheet::Platform, *variant as f32),
        ObstacleKind::Switch(state) if state.active => (Sheet::SwitchActive, 0.0),
        ObstacleKind::Switch(_) => (Sheet::SwitchInactive, 0.0),
        ObstacleKind::Enemy(_) => (Sheet::Enemy, frame),
    };
    let c = obstacle.bounds.center();
    buffer.push(RenderInstance {
        x: c.x,
        y: c.y,
        width: obstacle.bounds.width(),
        height: obstacle.bounds.height(),
        sheet: sheet.id(),
        frame,
        rotation: 0.0,
        mirror: if mirrored { 1.0 } else { 0.0 },
    });
}

fn push_projectile(buffer: &mut RenderBuffer, shot: &Projectile) {
    let c = shot.bounds.center();
    buffer.push(RenderInstance {
        x: c.x,
        y: c.y,
        width: shot.bounds.width(),
        height: shot.bounds.height(),
        sheet: Sheet::Projectile.id(),
        frame: 0.0,
        // Screen rotation is clockwise in a Y-down frame.
        rotation: -shot.angle,
        mirror: 0.0,
    });
}
