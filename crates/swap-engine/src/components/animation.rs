//! Animation component for sprite frame strips.
//!
//! Frames advance on wall-clock time, independent of the simulation tick:
//! once more than `frame_period_ms` has passed since the last advance, the
//! frame index moves on by one. Switching strips keeps the index, so an index
//! past the end of the new strip falls back to frame 0.

use std::collections::HashMap;

/// A horizontal strip of frames on one atlas row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDef {
    /// Atlas row holding the strip.
    pub row: f32,
    /// Number of frames in the strip. Zero means the strip is missing.
    pub frame_count: usize,
}

impl AnimationDef {
    pub fn strip(row: f32, frame_count: usize) -> Self {
        Self { row, frame_count }
    }
}

/// Animation state for an entity.
#[derive(Debug, Clone)]
pub struct AnimationComponent {
    /// Named strips available for this entity.
    pub animations: HashMap<String, AnimationDef>,
    /// Currently shown strip.
    pub current: String,
    /// Current frame index. May briefly exceed the strip length after a switch.
    pub frame_index: usize,
    /// Clock reading of the last frame advance.
    pub last_update_ms: f64,
    /// Milliseconds between frame advances.
    pub frame_period_ms: f64,
}

impl AnimationComponent {
    pub fn new(frame_period_ms: f32) -> Self {
        Self {
            animations: HashMap::new(),
            current: String::new(),
            frame_index: 0,
            last_update_ms: 0.0,
            frame_period_ms: frame_period_ms as f64,
        }
    }

    /// Add a strip.
    pub fn with(mut self, name: impl Into<String>, def: AnimationDef) -> Self {
        self.animations.insert(name.into(), def);
        self
    }

    /// Show a strip. The frame index carries over.
    pub fn show(&mut self, name: &str) {
        if self.current != name && self.animations.contains_key(name) {
            self.current = name.to_string();
        }
    }

    pub fn current_def(&self) -> Option<&AnimationDef> {
        self.animations.get(&self.current)
    }

    /// Advance by wall-clock time. Returns true if the frame changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(def) = self.animations.get(&self.current).copied() else {
            return false;
        };

        let mut changed = false;
        if now_ms - self.last_update_ms > self.frame_period_ms {
            self.frame_index += 1;
            if self.frame_index >= def.frame_count {
                self.frame_index = 0;
            }
            self.last_update_ms = now_ms;
            changed = true;
        }
        if self.frame_index >= def.frame_count {
            self.frame_index = 0;
        }
        changed
    }

    /// Current frame as (col, row) for sprite rendering.
    pub fn current_frame(&self) -> Option<(f32, f32)> {
        let def = self.current_def()?;
        let index = if self.frame_index < def.frame_count {
            self.frame_index
        } else {
            0
        };
        Some((index as f32, def.row))
    }
}
