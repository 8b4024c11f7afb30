use crate::light::{LightState, TrafficLight};
use crate::math::{LineSegment2d, Point2d};
use crate::obstacle::Obstacle;

/// Something a sensor ray can hit.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    Light(&'a TrafficLight),
    Obstacle(&'a Obstacle),
}

/// What kind of entity a sensor ray detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectionKind {
    /// An obstacle vehicle.
    Obstacle,
    /// A traffic light, in the state it was in when detected.
    Light(LightState),
}

impl Target<'_> {
    /// Finds where the ray hits the target, if it does.
    pub fn intersect(&self, ray: &LineSegment2d) -> Option<Point2d> {
        match self {
            Target::Light(light) => light.intersect(ray),
            Target::Obstacle(obstacle) => obstacle.intersect(ray),
        }
    }

    /// The world space position of the target's centre.
    pub fn position(&self) -> Point2d {
        match self {
            Target::Light(light) => light.position(),
            Target::Obstacle(obstacle) => obstacle.position(),
        }
    }

    /// The detection tag for a hit on this target.
    pub fn kind(&self) -> DetectionKind {
        match self {
            Target::Light(light) => DetectionKind::Light(light.state()),
            Target::Obstacle(_) => DetectionKind::Obstacle,
        }
    }
}

impl<'a> From<&'a TrafficLight> for Target<'a> {
    fn from(light: &'a TrafficLight) -> Self {
        Target::Light(light)
    }
}

impl<'a> From<&'a Obstacle> for Target<'a> {
    fn from(obstacle: &'a Obstacle) -> Self {
        Target::Obstacle(obstacle)
    }
}
