use bytemuck::{Pod, Zeroable};

/// Sprite sheets the host renderer knows about. The value is written to
/// `RenderInstance::sheet`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    PlayerIdle = 0,
    PlayerWalk = 1,
    PlayerJump = 2,
    PlayerDead = 3,
    Enemy = 4,
    Exit = 5,
    /// Frame is the platform variant digit.
    Platform = 6,
    SwitchActive = 7,
    SwitchInactive = 8,
    Projectile = 9,
}

impl Sheet {
    pub fn id(self) -> f32 {
        self as u8 as f32
    }
}

/// Per-instance render data read by the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Centre x in world space.
    pub x: f32,
    /// Centre y in world space (y grows downward).
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Sheet id, see [`Sheet`].
    pub sheet: f32,
    /// Frame within the sheet.
    pub frame: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// 1.0 to mirror horizontally.
    pub mirror: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing all sprite instances, in draw order.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// A buffer that drops instances past `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
