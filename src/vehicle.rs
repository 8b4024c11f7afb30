use self::acceleration::{AccelerationModel, ModelParams};
use self::controller::DecisionInput;
use crate::config::{DriverParams, SensorConfig};
use crate::math::Point2d;
use crate::road::Road;
use crate::target::Target;
use cgmath::Rad;

pub use self::acceleration::Throttle;
pub use self::controller::{Decision, DriveState, DrivingController, LaneCommand};
pub use self::sensor::{Detection, Ray, SensorArray};

mod acceleration;
mod controller;
mod sensor;

/// The vehicle controlled by the simulation, which senses its surroundings and drives itself.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// Half the vehicle's width.
    half_wid: f64,
    /// Half the vehicle's length.
    half_len: f64,
    /// The world space coordinates of the centre of the vehicle.
    pos: Point2d,
    /// The direction the vehicle faces, measured from the positive x-axis.
    heading: Rad<f64>,
    /// The speed in units per tick.
    vel: f64,
    /// The acceleration model.
    acc: AccelerationModel,
    /// The lane the vehicle is committed to.
    lane: usize,
    /// The lane the vehicle is moving into; equal to `lane` if not changing lanes.
    target_lane: usize,
    /// The behavioural state.
    state: DriveState,
    /// The sensor array.
    sensor: SensorArray,
    /// The decision model.
    controller: DrivingController,
}

/// The attributes of the controlled vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAttributes {
    /// The extent of the vehicle along the road.
    pub length: f64,
    /// The extent of the vehicle across the road.
    pub width: f64,
    /// The top speed, in units per tick.
    pub max_speed: f64,
    /// The speed gained per tick when accelerating.
    pub acceleration: f64,
    /// The speed lost per tick when braking.
    pub deceleration: f64,
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            length: 40.0,
            width: 20.0,
            max_speed: 4.0,
            acceleration: 0.2,
            deceleration: 0.2,
        }
    }
}

impl Vehicle {
    /// Creates a stationary vehicle facing along the positive x-axis.
    /// It starts in whichever lane lies beneath `pos`.
    pub fn new(
        attributes: &VehicleAttributes,
        sensor: &SensorConfig,
        driver: &DriverParams,
        pos: Point2d,
        road: &Road,
    ) -> Self {
        let lane = road.lane_at(pos.y);
        Self {
            half_wid: 0.5 * attributes.width,
            half_len: 0.5 * attributes.length,
            pos,
            heading: Rad(0.0),
            vel: 0.0,
            acc: AccelerationModel::new(&ModelParams {
                max_velocity: attributes.max_speed,
                max_acceleration: attributes.acceleration,
                max_deceleration: attributes.deceleration,
            }),
            lane,
            target_lane: lane,
            state: DriveState::Driving,
            sensor: SensorArray::new(sensor),
            controller: DrivingController::new(driver),
        }
    }

    /// Returns the vehicle travelling at the given speed, clamped to `[0, max_speed]`.
    pub fn with_vel(mut self, vel: f64) -> Self {
        self.vel = vel.clamp(0.0, self.acc.max_vel());
        self
    }

    /// The vehicle's width.
    pub fn width(&self) -> f64 {
        2.0 * self.half_wid
    }

    /// The vehicle's length.
    pub fn length(&self) -> f64 {
        2.0 * self.half_len
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The direction the vehicle faces.
    pub fn heading(&self) -> Rad<f64> {
        self.heading
    }

    /// The vehicle's speed in units per tick.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The vehicle's top speed in units per tick.
    pub fn max_vel(&self) -> f64 {
        self.acc.max_vel()
    }

    /// The lane the vehicle is committed to.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The lane the vehicle is moving into.
    pub fn target_lane(&self) -> usize {
        self.target_lane
    }

    /// Whether a lane change is in progress.
    pub fn is_changing_lanes(&self) -> bool {
        self.lane != self.target_lane
    }

    /// The vehicle's behavioural state.
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Whether the vehicle is stopped.
    pub fn has_stopped(&self) -> bool {
        self.vel < 0.1
    }

    /// The vehicle's sensor array.
    pub fn sensor(&self) -> &SensorArray {
        &self.sensor
    }

    /// The comfortable stopping distance at the current speed.
    pub fn stopping_distance(&self) -> f64 {
        self.acc.stopping_distance(self.vel)
    }

    /// Recasts the sensor rays against the given targets.
    pub fn sense(&mut self, targets: &[Target]) {
        self.sensor.update(self.pos, self.heading, targets);
    }

    /// Decides how to react to the latest sensor readings, then moves the vehicle.
    ///
    /// # Parameters
    /// * `road` - The road being driven on
    /// * `targets` - Every entity in the world, used to check whether a lane is free
    pub fn drive(&mut self, road: &Road, targets: &[Target]) -> Decision {
        let decision = self.controller.decide(&DecisionInput {
            pos: self.pos,
            vel: self.vel,
            lane: self.lane,
            road,
            acc: &self.acc,
            detections: self.sensor.detections(),
            targets,
        });

        self.state = decision.state;
        match decision.lane {
            LaneCommand::Keep => {}
            LaneCommand::Change(lane) => self.target_lane = lane,
            LaneCommand::Stay => self.target_lane = road.lane_at(self.pos.y),
        }
        self.steer(road);
        self.integrate(decision.throttle);
        decision
    }

    /// Senses and then drives; one full tick for the vehicle.
    pub fn update(&mut self, road: &Road, targets: &[Target]) -> Decision {
        self.sense(targets);
        self.drive(road, targets)
    }

    /// Moves the vehicle laterally towards the centre of its target lane,
    /// committing to that lane once it arrives.
    fn steer(&mut self, road: &Road) {
        let centre = road.lane_centre(self.target_lane);
        let (y, arrived) = self.controller.steer(self.pos.y, centre);
        self.pos.y = y;
        if arrived && self.lane != self.target_lane {
            log::debug!("lane change {} -> {} complete", self.lane, self.target_lane);
            self.lane = self.target_lane;
        }
    }

    /// Applies the throttle to the speed, then advances the vehicle along the road.
    fn integrate(&mut self, throttle: Throttle) {
        self.vel = self.acc.apply(self.vel, throttle);
        self.pos.x += self.vel;
    }
}
