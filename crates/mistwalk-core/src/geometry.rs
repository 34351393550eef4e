use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Extra reach added to each box's far edge by the overlap test, so contact
/// registers slightly before the edges actually meet.
pub const CONTACT_PADDING: f32 = 2.0;

/// 2D vector in world units. Screen convention: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `self` if both components are finite, otherwise zero.
    pub fn finite_or_zero(self) -> Self {
        if self.is_finite() { self } else { Self::ZERO }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_position(position: Vec2, width: f32, height: f32) -> Self {
        Self::new(position.x, position.y, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zero-area or non-finite rectangles take no part in collision.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Padded overlap test: the boxes touch when their extents overlap on both
    /// axes after adding [`CONTACT_PADDING`] to each box's far edge.
    pub fn touches(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let same_x =
            self.right() + CONTACT_PADDING > other.x && other.right() + CONTACT_PADDING > self.x;
        let same_y =
            self.bottom() + CONTACT_PADDING > other.y && other.bottom() + CONTACT_PADDING > self.y;
        same_x && same_y
    }
}

/// True if `rect` touches any rectangle in `platforms`.
pub fn overlaps_any(rect: &Rect, platforms: &[Rect]) -> bool {
    platforms.iter().any(|p| rect.touches(p))
}
