#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are in one shared logical-pixel space (origin at the top-left
//! of the board host). The rendering layer is responsible for converting its
//! own units before reporting geometry.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A position or displacement in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box of one on-screen element.
///
/// Produced by layout observation and replaced wholesale on every update.
/// The default value is the zero box, used before the first layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Top-left corner.
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

impl Coordinates {
    /// Create a new box.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Point::new(x, y),
            width,
            height,
        }
    }

    /// Left edge.
    #[inline]
    pub const fn left(&self) -> f32 {
        self.position.x
    }

    /// Top edge.
    #[inline]
    pub const fn top(&self) -> f32 {
        self.position.y
    }

    /// Right edge (inclusive for hit testing).
    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    /// Bottom edge (inclusive for hit testing).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    /// Horizontal midpoint.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.position.x + self.width / 2.0
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.position.y + self.height / 2.0
    }

    /// Midpoint of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Half the box size, i.e. the distance from the top-left to the center.
    #[inline]
    pub fn half_extent(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Check if the box has zero area (never laid out, or collapsed).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `x` lies in `[left, right]`.
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left() && x <= self.right()
    }

    /// Whether `y` lies in `[top, bottom]`.
    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top() && y <= self.bottom()
    }

    /// Check if a point is inside the box (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.contains_x(point.x) && self.contains_y(point.y)
    }
}
