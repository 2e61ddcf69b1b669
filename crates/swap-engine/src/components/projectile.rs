//! Player projectiles: straight flight along an angle frozen at spawn.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::core::collision::{CollisionGroups, GroupKind, ObstacleKind};
use crate::core::geometry::Aabb;

/// Unit direction for an aim angle measured counter-clockwise from +x in a
/// Y-up frame, expressed in the Y-down world.
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub bounds: Aabb,
    /// Travel direction, frozen at spawn.
    pub angle: f32,
    /// Travel per tick.
    pub speed: f32,
    /// The player that fired it.
    pub owner: EntityId,
    /// The owner's collision groups at spawn, in registration order.
    pub groups: Vec<GroupKind>,
}

/// What one projectile tick ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    /// Still flying.
    Flying,
    /// Left the world rectangle; destroy.
    OutOfBounds,
    /// Hit a platform; destroy.
    HitPlatform(EntityId),
    /// Hit a switch; destroy and swap the switch with the owner.
    HitSwitch(EntityId),
}

impl ProjectileOutcome {
    pub fn is_destroyed(self) -> bool {
        self != ProjectileOutcome::Flying
    }
}

impl Projectile {
    /// Spawn `muzzle_offset` from `origin` along `angle`.
    pub fn spawn(
        owner: EntityId,
        origin: Vec2,
        angle: f32,
        muzzle_offset: f32,
        speed: f32,
        size: f32,
        groups: &[GroupKind],
    ) -> Self {
        let center = origin + aim_direction(angle) * muzzle_offset;
        Self {
            bounds: Aabb::from_center(center, Vec2::splat(size)),
            angle,
            speed,
            owner,
            groups: groups.to_vec(),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        aim_direction(self.angle) * self.speed
    }

    /// Advance one tick, then test the world edge and the owner's groups.
    /// The first qualifying obstacle in group order decides the outcome.
    pub fn update(&mut self, groups: &CollisionGroups, world: &Aabb) -> ProjectileOutcome {
        self.bounds.translate(self.velocity());

        if !world.contains_point(self.bounds.min) {
            return ProjectileOutcome::OutOfBounds;
        }

        for kind in &self.groups {
            for obstacle in groups.get(*kind).overlapping(&self.bounds) {
                match obstacle.kind {
                    ObstacleKind::Platform { .. } => {
                        return ProjectileOutcome::HitPlatform(obstacle.id);
                    }
                    ObstacleKind::Switch(_) => {
                        return ProjectileOutcome::HitSwitch(obstacle.id);
                    }
                    ObstacleKind::Enemy(_) => {}
                }
            }
        }

        ProjectileOutcome::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::switch::SwitchState;
    use crate::core::collision::Obstacle;
    use std::f32::consts::FRAC_PI_2;

    fn world() -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn shot(origin: Vec2, angle: f32) -> Projectile {
        Projectile::spawn(
            EntityId(1),
            origin,
            angle,
            20.0,
            20.0,
            10.0,
            &[GroupKind::Platforms, GroupKind::Switches],
        )
    }

    #[test]
    fn spawns_at_muzzle_offset() {
        let p = shot(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(p.bounds.center(), Vec2::new(120.0, 100.0));

        // Straight up in a Y-down world.
        let p = shot(Vec2::new(100.0, 100.0), FRAC_PI_2);
        let c = p.bounds.center();
        assert!((c.x - 100.0).abs() < 1e-4);
        assert!((c.y - 80.0).abs() < 1e-4);
    }

    #[test]
    fn flies_straight_along_frozen_angle() {
        let groups = CollisionGroups::new();
        let mut p = shot(Vec2::new(100.0, 300.0), 0.0);
        for i in 1..=3 {
            assert_eq!(p.update(&groups, &world()), ProjectileOutcome::Flying);
            assert_eq!(p.bounds.center(), Vec2::new(120.0 + 20.0 * i as f32, 300.0));
        }
    }

    #[test]
    fn leaves_world_past_right_edge() {
        let groups = CollisionGroups::new();
        let mut p = shot(Vec2::new(700.0, 300.0), 0.0);
        let mut ticks = 0;
        while p.update(&groups, &world()) == ProjectileOutcome::Flying {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(p.bounds.left() > 800.0);
    }

    #[test]
    fn platform_hit_reports_obstacle() {
        let mut groups = CollisionGroups::new();
        groups.platforms.spawn(Obstacle::platform(
            EntityId(9),
            Aabb::new(Vec2::new(150.0, 280.0), Vec2::splat(40.0)),
            2,
        ));
        let mut p = shot(Vec2::new(100.0, 300.0), 0.0);
        assert_eq!(p.update(&groups, &world()), ProjectileOutcome::Flying);
        assert_eq!(p.update(&groups, &world()), ProjectileOutcome::HitPlatform(EntityId(9)));
    }

    #[test]
    fn switch_hit_reports_switch() {
        let mut groups = CollisionGroups::new();
        groups.switches.spawn(Obstacle::switch(
            EntityId(4),
            Aabb::new(Vec2::new(130.0, 280.0), Vec2::splat(40.0)),
            SwitchState::fixed(),
        ));
        let mut p = shot(Vec2::new(100.0, 300.0), 0.0);
        let outcome = p.update(&groups, &world());
        assert_eq!(outcome, ProjectileOutcome::HitSwitch(EntityId(4)));
        assert!(outcome.is_destroyed());
    }

    #[test]
    fn groups_outside_owner_registration_are_ignored() {
        let mut groups = CollisionGroups::new();
        groups.switches.spawn(Obstacle::switch(
            EntityId(4),
            Aabb::new(Vec2::new(130.0, 280.0), Vec2::splat(40.0)),
            SwitchState::fixed(),
        ));
        let mut p = Projectile::spawn(
            EntityId(1),
            Vec2::new(100.0, 300.0),
            0.0,
            20.0,
            20.0,
            10.0,
            &[GroupKind::Platforms],
        );
        assert_eq!(p.update(&groups, &world()), ProjectileOutcome::Flying);
    }
}
