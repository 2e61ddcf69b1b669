//! Axis-separated movement and overlap resolution against named obstacle groups.
//!
//! A move applies its horizontal component first, then its vertical one. After
//! each non-zero sub-step every member of every registered group is tested in
//! registration order, then member order, against the mover's current box.
//! Each overlapping member gets the mover's collision callback, whose default
//! snaps the mover flush against that member.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::enemy::Patrol;
use crate::components::switch::SwitchState;
use crate::core::geometry::{Aabb, Side};

/// The named obstacle groups a world owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Platforms,
    Switches,
    Enemies,
}

/// What an obstacle is. Carried on every obstacle so impact handling can
/// branch on it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleKind {
    /// Static tile; `variant` picks the sprite.
    Platform { variant: u8 },
    /// Swap trigger, optionally oscillating.
    Switch(SwitchState),
    /// Patrolling hazard. Never pushes anything back; contact kills.
    Enemy(Patrol),
}

/// A box in a collision group.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn platform(id: EntityId, bounds: Aabb, variant: u8) -> Self {
        Self {
            id,
            bounds,
            kind: ObstacleKind::Platform { variant },
        }
    }

    pub fn switch(id: EntityId, bounds: Aabb, state: SwitchState) -> Self {
        Self {
            id,
            bounds,
            kind: ObstacleKind::Switch(state),
        }
    }

    pub fn enemy(id: EntityId, bounds: Aabb, patrol: Patrol) -> Self {
        Self {
            id,
            bounds,
            kind: ObstacleKind::Enemy(patrol),
        }
    }

    pub fn is_platform(&self) -> bool {
        matches!(self.kind, ObstacleKind::Platform { .. })
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, ObstacleKind::Switch(_))
    }
}

/// Ordered obstacle storage. Iteration order is insertion order and is
/// preserved across removals, because collision tie-breaks depend on it.
#[derive(Debug, Clone, Default)]
pub struct CollisionGroup {
    members: Vec<Obstacle>,
}

impl CollisionGroup {
    pub fn new() -> Self {
        Self {
            members: Vec::with_capacity(64),
        }
    }

    /// Append an obstacle.
    pub fn spawn(&mut self, obstacle: Obstacle) {
        self.members.push(obstacle);
    }

    pub fn get(&self, id: EntityId) -> Option<&Obstacle> {
        self.members.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Obstacle> {
        self.members.iter_mut().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.members.iter_mut()
    }

    /// Members whose boxes overlap `bounds`, in group order.
    pub fn overlapping<'a>(&'a self, bounds: &'a Aabb) -> impl Iterator<Item = &'a Obstacle> + 'a {
        self.members.iter().filter(move |o| o.bounds.overlaps(bounds))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The three groups a level owns.
#[derive(Debug, Clone)]
pub struct CollisionGroups {
    pub platforms: CollisionGroup,
    pub switches: CollisionGroup,
    pub enemies: CollisionGroup,
}

impl CollisionGroups {
    pub fn new() -> Self {
        Self {
            platforms: CollisionGroup::new(),
            switches: CollisionGroup::new(),
            enemies: CollisionGroup::new(),
        }
    }

    pub fn get(&self, kind: GroupKind) -> &CollisionGroup {
        match kind {
            GroupKind::Platforms => &self.platforms,
            GroupKind::Switches => &self.switches,
            GroupKind::Enemies => &self.enemies,
        }
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::new()
    }
}

/// Something with a box that may test itself against collision groups when moved.
pub trait Collidable {
    fn bounds(&self) -> &Aabb;

    fn bounds_mut(&mut self) -> &mut Aabb;

    /// Groups tested on every resolved move, in registration order.
    fn collision_groups(&self) -> &[GroupKind] {
        &[]
    }

    /// Called for each overlapping obstacle after a sub-step. Overrides must
    /// still snap flush.
    fn on_collision(&mut self, side: Side, obstacle: &Obstacle) {
        self.bounds_mut().snap_to(side, &obstacle.bounds);
    }
}

/// Add `kind` to a membership list unless already present.
pub fn register_group(memberships: &mut Vec<GroupKind>, kind: GroupKind) {
    if !memberships.contains(&kind) {
        memberships.push(kind);
    }
}

/// One callback fired during a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub side: Side,
    pub group: GroupKind,
    pub obstacle: EntityId,
}

/// Every contact raised by a move, in the order the callbacks fired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveReport {
    pub contacts: Vec<Contact>,
}

impl MoveReport {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn hit(&self, side: Side) -> bool {
        self.contacts.iter().any(|c| c.side == side)
    }
}

/// Whether a move tests for overlaps at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    /// Test and resolve after each sub-step.
    Collide,
    /// Apply both components blindly (jump-clearance nudges).
    PassThrough,
}

/// Move `body` by `delta`, horizontal component first.
pub fn move_and_collide<C>(body: &mut C, groups: &CollisionGroups, delta: Vec2, resolve: Resolve) -> MoveReport
where
    C: Collidable + ?Sized,
{
    let mut report = MoveReport::default();

    if resolve == Resolve::PassThrough {
        body.bounds_mut().translate(delta);
        return report;
    }

    for step in [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)] {
        let Some(side) = Side::of_displacement(step) else {
            continue;
        };
        body.bounds_mut().translate(step);
        resolve_step(body, groups, side, &mut report);
    }

    report
}

fn resolve_step<C>(body: &mut C, groups: &CollisionGroups, side: Side, report: &mut MoveReport)
where
    C: Collidable + ?Sized,
{
    // Copied so the callback can borrow `body` mutably.
    let memberships: Vec<GroupKind> = body.collision_groups().to_vec();
    for kind in memberships {
        for obstacle in groups.get(kind).iter() {
            // Each member is tested against the box as left by earlier snaps.
            if obstacle.bounds.overlaps(body.bounds()) {
                body.on_collision(side, obstacle);
                report.contacts.push(Contact {
                    side,
                    group: kind,
                    obstacle: obstacle.id,
                });
            }
        }
    }
}
