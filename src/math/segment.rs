use super::{Point2d, Vector2d};

/// A straight line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment2d {
    pub start: Point2d,
    pub end: Point2d,
}

impl LineSegment2d {
    /// Creates a line segment from its two end points.
    pub const fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self { start, end }
    }

    /// Creates a line segment starting at `start` and extending along `dir` by `length`.
    /// `dir` is expected to be a unit vector.
    pub fn from_dir(start: Point2d, dir: Vector2d, length: f64) -> Self {
        Self {
            start,
            end: start + length * dir,
        }
    }

    /// The vector from the start to the end of the segment.
    pub fn delta(&self) -> Vector2d {
        self.end - self.start
    }

    /// Samples the point a fraction `t` of the way along the segment.
    pub fn sample(&self, t: f64) -> Point2d {
        self.start + t * self.delta()
    }
}
