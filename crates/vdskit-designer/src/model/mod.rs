//! Geometric model: points, typed paths and the drawing tree.

use serde::{Deserialize, Serialize};

mod drawing;
mod path;

pub use drawing::{Drawing, WalkedPath};
pub use path::{Path, PathType};

/// Distance under which two points are considered the same
pub const POINT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both points lie within [`POINT_TOLERANCE`] of each other
    pub fn coincides(&self, other: &Point) -> bool {
        self.distance_to(other) <= POINT_TOLERANCE
    }

    /// Point on a circle at `angle` degrees
    pub fn on_circle(center: Point, radius: f64, angle: f64) -> Self {
        let rad = angle.to_radians();
        Self::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
    }

    pub(crate) fn to_lyon(self) -> lyon::geom::Point<f64> {
        lyon::geom::point(self.x, self.y)
    }

    pub(crate) fn from_lyon(p: lyon::geom::Point<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
