use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use cgmath::Rad;

/// The Euclidean distance between two points.
pub fn distance(a: Point2d, b: Point2d) -> f64 {
    a.distance(b)
}

/// A unit vector pointing in the direction of `angle`,
/// measured from the positive x-axis towards the positive y-axis.
pub fn heading_vector(angle: Rad<f64>) -> Vector2d {
    let (sin, cos) = angle.sin_cos();
    Vector2d::new(cos, sin)
}

/// Linearly interpolates between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn distance_is_euclidean() {
        let a = Point2d::new(1.0, 2.0);
        let b = Point2d::new(4.0, 6.0);
        assert_approx_eq!(distance(a, b), 5.0);
        assert_approx_eq!(distance(b, a), 5.0);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn heading_vector_is_unit() {
        let v = heading_vector(Rad(0.0));
        assert_approx_eq!(v.x, 1.0);
        assert_approx_eq!(v.y, 0.0);

        let v = heading_vector(Rad(std::f64::consts::FRAC_PI_2));
        assert_approx_eq!(v.x, 0.0);
        assert_approx_eq!(v.y, 1.0);
    }
}
