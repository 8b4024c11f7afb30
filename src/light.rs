use crate::config::LightTimings;
use crate::math::{ray_circle_intersect, LineSegment2d, Point2d};

/// A traffic light standing at a single point on the road.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficLight {
    /// The world space position of the light.
    pos: Point2d,
    /// The current state.
    state: LightState,
    /// The time since the current state was entered, in ms.
    since: f64,
    /// The duration of each state.
    timings: LightTimings,
}

/// The state of a traffic light.
///
/// States cycle green, amber, red, then back to green.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    Green,
    Amber,
    Red,
}

impl LightState {
    /// The state which follows this one.
    pub fn next(self) -> Self {
        use LightState::*;
        match self {
            Green => Amber,
            Amber => Red,
            Red => Green,
        }
    }
}

impl TrafficLight {
    /// Creates a traffic light which starts at the beginning of its green phase.
    pub fn new(pos: Point2d, timings: LightTimings) -> Self {
        Self {
            pos,
            state: LightState::Green,
            since: 0.0,
            timings,
        }
    }

    /// Returns the light in the given state, at the beginning of that phase.
    pub fn with_state(mut self, state: LightState) -> Self {
        self.state = state;
        self.since = 0.0;
        self
    }

    /// The world space position of the light.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The current state of the light.
    pub fn state(&self) -> LightState {
        self.state
    }

    /// The time spent in the current state, in ms.
    pub fn elapsed(&self) -> f64 {
        self.since
    }

    /// The radius of the circle rays are tested against.
    pub fn radius(&self) -> f64 {
        self.timings.radius
    }

    /// How long the light stays in `state`, in ms.
    pub fn duration(&self, state: LightState) -> f64 {
        match state {
            LightState::Green => self.timings.green,
            LightState::Amber => self.timings.amber,
            LightState::Red => self.timings.red,
        }
    }

    /// Advances the light's timer by `dt` ms.
    ///
    /// Once the timer exceeds the current state's duration, the light moves to the
    /// next state and the timer restarts from zero. At most one transition happens
    /// per call, however large `dt` is.
    pub fn step(&mut self, dt: f64) {
        self.since += dt;
        if self.since > self.duration(self.state) {
            self.since = 0.0;
            self.state = self.state.next();
            log::debug!("light at {:?} turned {:?}", self.pos, self.state);
        }
    }

    /// Finds where a ray crosses the light's detection circle.
    pub fn intersect(&self, ray: &LineSegment2d) -> Option<Point2d> {
        ray_circle_intersect(ray, self.pos, self.timings.radius)
    }
}
