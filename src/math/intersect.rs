use super::{LineSegment2d, Point2d};
use crate::util::Interval;

/// Relative slack on the bounding box test, so that points solved on an axis-aligned
/// segment are not lost to rounding.
const BOUNDS_EPSILON: f64 = 1e-9;

/// Finds the point at which two line segments cross.
///
/// Both segments are written as lines `a*x + b*y = c` and solved via the determinant.
/// Returns `None` if the lines are parallel or collinear (a determinant of exactly zero),
/// or if the solution falls outside the bounding box of either segment.
/// The bounding boxes are inclusive of their edges, give or take rounding error.
pub fn segment_intersect(s1: &LineSegment2d, s2: &LineSegment2d) -> Option<Point2d> {
    let (p1, p2) = (s1.start, s1.end);
    let (p3, p4) = (s2.start, s2.end);

    let a1 = p2.y - p1.y;
    let b1 = p1.x - p2.x;
    let c1 = a1 * p1.x + b1 * p1.y;

    let a2 = p4.y - p3.y;
    let b2 = p3.x - p4.x;
    let c2 = a2 * p3.x + b2 * p3.y;

    let det = a1 * b2 - a2 * b1;
    if det == 0.0 {
        return None;
    }

    let x = (b2 * c1 - b1 * c2) / det;
    let y = (a1 * c2 - a2 * c1) / det;

    let within = |s: &LineSegment2d| {
        bounds(s.start.x, s.end.x).contains(x) && bounds(s.start.y, s.end.y).contains(y)
    };

    if within(s1) && within(s2) {
        Some(Point2d::new(x, y))
    } else {
        None
    }
}

/// The inclusive range between `a` and `b`, widened slightly in proportion to their magnitude.
fn bounds(a: f64, b: f64) -> Interval<f64> {
    let range = Interval::spanning(a, b);
    let slack = BOUNDS_EPSILON * f64::max(1.0, f64::max(range.min.abs(), range.max.abs()));
    Interval::new(range.min - slack, range.max + slack)
}

/// Finds where a ray first enters (or, if it starts inside, leaves) a circle.
///
/// Solves `|start + t * (end - start) - centre| = radius` for `t`. The smaller root is
/// preferred if it lies within `[0, 1]`, otherwise the larger root is used.
/// Returns `None` if neither root is on the ray, or if the ray has zero length.
pub fn ray_circle_intersect(ray: &LineSegment2d, centre: Point2d, radius: f64) -> Option<Point2d> {
    let d = ray.delta();
    let f = ray.start - centre;

    let a = d.x * d.x + d.y * d.y;
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * (f.x * d.x + f.y * d.y);
    let c = (f.x * f.x + f.y * f.y) - radius * radius;

    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return None;
    }
    let discr = discr.sqrt();

    let t1 = (-b - discr) / (2.0 * a);
    let t2 = (-b + discr) / (2.0 * a);
    let valid = Interval::new(0.0, 1.0);

    [t1, t2]
        .into_iter()
        .find(|t| valid.contains(*t))
        .map(|t| ray.sample(t))
}
