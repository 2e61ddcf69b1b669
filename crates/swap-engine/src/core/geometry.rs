//! Axis-aligned boxes and collision sides.
//!
//! Boxes are stored as a top-left corner plus a size, in a Y-down world:
//! `top < bottom`, `left < right`.

use glam::Vec2;

/// Which face of the moving box met an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Moving up (dy < 0); the box's top meets the obstacle's bottom.
    Top,
    /// Moving right (dx > 0); the box's right meets the obstacle's left.
    Right,
    /// Moving down (dy > 0); the box's bottom meets the obstacle's top.
    Bottom,
    /// Moving left (dx < 0); the box's left meets the obstacle's right.
    Left,
}

impl Side {
    /// Classify a displacement by its dominant axis, then its sign.
    ///
    /// A tie in magnitude picks the vertical axis. A zero displacement has no
    /// side and returns `None`.
    pub fn of_displacement(delta: Vec2) -> Option<Side> {
        let (dx, dy) = if delta.x.abs() > delta.y.abs() {
            (delta.x, 0.0)
        } else {
            (0.0, delta.y)
        };
        if dy < 0.0 {
            Some(Side::Top)
        } else if dy > 0.0 {
            Some(Side::Bottom)
        } else if dx < 0.0 {
            Some(Side::Left)
        } else if dx > 0.0 {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Whether this side lies on the horizontal axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner in world space.
    pub min: Vec2,
    /// Width and height. Both strictly positive.
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "degenerate box {size:?}");
        Self { min, size }
    }

    /// Create a box of `size` centred on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.min = center - self.size * 0.5;
    }

    pub fn set_left(&mut self, left: f32) {
        self.min.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.min.x = right - self.size.x;
    }

    pub fn set_top(&mut self, top: f32) {
        self.min.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.min.y = bottom - self.size.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.min += delta;
    }

    /// Strict overlap: boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point containment, edges inclusive.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// A copy grown or shrunk per axis by `delta` (total, split across both sides).
    pub fn inflated(&self, delta: Vec2) -> Aabb {
        let size = (self.size + delta).max(Vec2::ONE);
        Aabb::from_center(self.center(), size)
    }

    /// Move flush against `obstacle` on the given side of this box.
    pub fn snap_to(&mut self, side: Side, obstacle: &Aabb) {
        match side {
            Side::Top => self.set_top(obstacle.bottom()),
            Side::Bottom => self.set_bottom(obstacle.top()),
            Side::Right => self.set_right(obstacle.left()),
            Side::Left => self.set_left(obstacle.right()),
        }
    }
}
