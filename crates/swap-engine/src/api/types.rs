use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A sound event emitted by the simulation.
/// The numeric value maps to a host-defined sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    pub const SHOOT: SoundEvent = SoundEvent(1);
    pub const SWAP: SoundEvent = SoundEvent(2);
    pub const DEATH: SoundEvent = SoundEvent(3);
    pub const LEVEL_COMPLETE: SoundEvent = SoundEvent(4);
}

/// A game event communicated from the simulation to the host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    /// `a` = level number.
    pub const LEVEL_STARTED: f32 = 1.0;
    /// `a` = level number.
    pub const LEVEL_COMPLETE: f32 = 2.0;
    /// `a`, `b` = where the player died.
    pub const PLAYER_DIED: f32 = 3.0;
    /// `a` = level number.
    pub const RESTART: f32 = 4.0;
    pub const MENU_REQUESTED: f32 = 5.0;
    /// `a`, `b` = switch centre after the swap.
    pub const SWAPPED: f32 = 6.0;
    pub const QUIT_REQUESTED: f32 = 7.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn simple(kind: f32) -> Self {
        Self::new(kind, 0.0, 0.0, 0.0)
    }
}
