pub use camera::Camera;
pub use cgmath;
pub use config::{
    ConfigError, DriverParams, LightTimings, RoadConfig, SensorConfig, SimConfig, TrafficConfig,
};
pub use light::{LightState, TrafficLight};
pub use obstacle::Obstacle;
pub use road::Road;
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use target::{DetectionKind, Target};
pub use util::Interval;
pub use vehicle::{
    Decision, Detection, DriveState, DrivingController, LaneCommand, Ray, SensorArray, Throttle,
    Vehicle, VehicleAttributes,
};

mod camera;
mod config;
mod debug;
mod light;
pub mod math;
mod obstacle;
mod road;
mod simulation;
mod target;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of an [Obstacle].
    pub struct ObstacleId;
    /// Unique ID of a [TrafficLight].
    pub struct TrafficLightId;
}

type ObstacleSet = SlotMap<ObstacleId, Obstacle>;
type LightSet = SlotMap<TrafficLightId, TrafficLight>;
