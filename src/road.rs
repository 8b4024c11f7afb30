use crate::config::RoadConfig;
use crate::util::Interval;

/// A straight multi-lane road running along the x-axis.
///
/// Lane 0 is the top-most lane, and lane indices increase with y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Road {
    lane_count: usize,
    lane_height: f64,
    top: f64,
}

impl Road {
    /// Creates the road described by a validated [RoadConfig].
    pub(crate) fn new(config: &RoadConfig) -> Self {
        Self {
            lane_count: config.lane_count,
            lane_height: config.lane_height,
            top: config.top,
        }
    }

    /// The number of lanes.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// The height of a single lane.
    pub fn lane_height(&self) -> f64 {
        self.lane_height
    }

    /// The index of the lane beneath the y-coordinate.
    ///
    /// Positions above or below the road are clamped onto the nearest lane.
    pub fn lane_at(&self, y: f64) -> usize {
        let idx = ((y - self.top) / self.lane_height).floor();
        if idx.is_nan() || idx < 0.0 {
            0
        } else {
            usize::min(idx as usize, self.lane_count - 1)
        }
    }

    /// The lateral extent of a lane.
    pub fn lane_extent(&self, lane: usize) -> Interval<f64> {
        let min = self.top + lane as f64 * self.lane_height;
        Interval::new(min, min + self.lane_height)
    }

    /// The y-coordinate of the centre of a lane.
    pub fn lane_centre(&self, lane: usize) -> f64 {
        self.lane_extent(lane).midpoint()
    }

    /// The middle lane, which the controlled vehicle starts in and the camera follows.
    pub fn middle_lane(&self) -> usize {
        self.lane_count / 2
    }

    /// The lanes immediately adjacent to `lane`, lower index first.
    pub fn adjacent_lanes(&self, lane: usize) -> impl Iterator<Item = usize> {
        let below = lane.checked_sub(1);
        let above = Some(lane + 1).filter(|l| *l < self.lane_count);
        below.into_iter().chain(above)
    }
}
