use crate::math::{segment_intersect, LineSegment2d, Point2d};
use crate::util::Interval;

/// An autonomous vehicle which drives against the flow of traffic along a single lane.
///
/// Obstacles do not sense anything, never change lanes and never stop.
/// When one falls behind the visible window it is respawned further ahead.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// The world space coordinates of the centre of the obstacle.
    pos: Point2d,
    /// Half the obstacle's extent along the road.
    half_len: f64,
    /// Half the obstacle's extent across the road.
    half_wid: f64,
    /// The distance travelled each tick, towards decreasing x.
    vel: f64,
    /// The lane the obstacle was last placed in.
    lane: usize,
}

impl Obstacle {
    /// Creates a new obstacle.
    ///
    /// # Parameters
    /// * `pos` - The centre of the obstacle
    /// * `length` - The extent of the obstacle along the road
    /// * `width` - The extent of the obstacle across the road
    /// * `vel` - The distance travelled per tick
    /// * `lane` - The lane the obstacle is in
    pub fn new(pos: Point2d, length: f64, width: f64, vel: f64, lane: usize) -> Self {
        Self {
            pos,
            half_len: 0.5 * length,
            half_wid: 0.5 * width,
            vel,
            lane,
        }
    }

    /// The obstacle's extent along the road.
    pub fn length(&self) -> f64 {
        2.0 * self.half_len
    }

    /// The obstacle's extent across the road.
    pub fn width(&self) -> f64 {
        2.0 * self.half_wid
    }

    /// The world space coordinates of the centre of the obstacle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The obstacle's speed in units per tick.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The lane the obstacle was last placed in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Moves the obstacle one tick along the road.
    pub fn advance(&mut self) {
        self.pos.x -= self.vel;
    }

    /// Places the obstacle at the centre of a lane with a new speed.
    pub(crate) fn respawn(&mut self, x: f64, lane: usize, lane_centre: f64, vel: f64) {
        self.pos = Point2d::new(x, lane_centre);
        self.lane = lane;
        self.vel = vel;
    }

    /// The four edges of the obstacle's bounding box: top, right, bottom, then left.
    pub fn edges(&self) -> [LineSegment2d; 4] {
        let xs = Interval::disc(self.pos.x, self.half_len);
        let ys = Interval::disc(self.pos.y, self.half_wid);
        let corners = [
            Point2d::new(xs.min, ys.min),
            Point2d::new(xs.max, ys.min),
            Point2d::new(xs.max, ys.max),
            Point2d::new(xs.min, ys.max),
        ];
        [0, 1, 2, 3].map(|i| LineSegment2d::from_ends(corners[i], corners[(i + 1) % 4]))
    }

    /// Tests the ray against each edge of the bounding box in turn
    /// and returns the first hit found.
    ///
    /// The edges are tested in a fixed order, so the point returned
    /// is not necessarily the one nearest to the start of the ray.
    pub fn intersect(&self, ray: &LineSegment2d) -> Option<Point2d> {
        self.edges()
            .iter()
            .find_map(|edge| segment_intersect(ray, edge))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn obstacle() -> Obstacle {
        Obstacle::new(Point2d::new(100.0, 50.0), 40.0, 20.0, 2.0, 0)
    }

    #[test]
    fn moves_towards_decreasing_x() {
        let mut obstacle = obstacle();
        obstacle.advance();
        obstacle.advance();
        assert_approx_eq!(obstacle.position().x, 96.0);
        assert_approx_eq!(obstacle.position().y, 50.0);
    }

    #[test]
    fn edges_form_closed_loop() {
        let edges = obstacle().edges();
        for i in 0..4 {
            assert_eq!(edges[i].end, edges[(i + 1) % 4].start);
        }
        assert_eq!(edges[0].start, Point2d::new(80.0, 40.0));
        assert_eq!(edges[2].start, Point2d::new(120.0, 60.0));
    }

    #[test]
    fn head_on_ray_reports_far_edge() {
        let ray = LineSegment2d::from_ends(Point2d::new(0.0, 50.0), Point2d::new(500.0, 50.0));
        let hit = obstacle().intersect(&ray).unwrap();
        // The right edge is tested before the left, so the far side is reported
        assert_approx_eq!(hit.x, 120.0);
        assert_approx_eq!(hit.y, 50.0);
    }

    #[test]
    fn diagonal_ray_reports_first_edge_in_order() {
        // Crosses the left edge first, then the top edge, but the top is tested first
        let ray = LineSegment2d::from_ends(Point2d::new(70.0, 55.0), Point2d::new(100.0, 25.0));
        let hit = obstacle().intersect(&ray).unwrap();
        assert_approx_eq!(hit.y, 40.0);
        assert_approx_eq!(hit.x, 85.0);
    }

    #[test]
    fn missing_ray() {
        let ray = LineSegment2d::from_ends(Point2d::new(0.0, 0.0), Point2d::new(500.0, 0.0));
        assert!(obstacle().intersect(&ray).is_none());
    }

    #[test]
    fn respawn_moves_to_lane_centre() {
        let mut obstacle = obstacle();
        obstacle.respawn(900.0, 3, 350.0, 3.5);
        assert_eq!(obstacle.position(), Point2d::new(900.0, 350.0));
        assert_eq!(obstacle.lane(), 3);
        assert_eq!(obstacle.vel(), 3.5);
    }
}
