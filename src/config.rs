//! Tunable parameters of the simulation.

use crate::util::Interval;
use crate::vehicle::VehicleAttributes;
use cgmath::Deg;
use thiserror::Error;

/// The complete configuration of a [Simulation](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// The lane layout.
    pub road: RoadConfig,
    /// The width of the visible world window, used for respawning and recycling.
    pub view_width: f64,
    /// The controlled vehicle.
    pub vehicle: VehicleAttributes,
    /// The controlled vehicle's sensor array.
    pub sensor: SensorConfig,
    /// The driving decision thresholds.
    pub driver: DriverParams,
    /// Traffic light timings and shape.
    pub light: LightTimings,
    /// Obstacle and traffic light population.
    pub traffic: TrafficConfig,
    /// Seed for the random number generator; drawn from entropy if absent.
    pub seed: Option<u64>,
}

/// The geometry of a multi-lane road running along the x-axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadConfig {
    /// The number of lanes.
    pub lane_count: usize,
    /// The height of each lane.
    pub lane_height: f64,
    /// The y-coordinate of the top edge of lane 0.
    pub top: f64,
}

/// The layout of the sensor fan.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    /// The number of rays.
    pub ray_count: usize,
    /// The maximum range of each ray.
    pub ray_length: f64,
    /// The total angle covered by the fan, centred on the vehicle's heading.
    pub spread: Deg<f64>,
}

/// Thresholds used by the driving controller.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverParams {
    /// A lane is blocked if an obstacle is closer than this, longitudinally.
    pub obstacle_buffer: f64,
    /// A lane is blocked if a red light is ahead and closer than this.
    pub signal_buffer: f64,
    /// Extra distance added to the stopping distance before braking for a red light.
    pub stop_margin: f64,
    /// The fraction of the remaining lateral gap closed each tick during a lane change.
    pub lane_change_rate: f64,
    /// A lane change completes once the lateral gap is no more than this.
    pub snap_threshold: f64,
}

/// The timing cycle and detection shape shared by all traffic lights.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightTimings {
    /// Duration of the green phase in ms.
    pub green: f64,
    /// Duration of the amber phase in ms.
    pub amber: f64,
    /// Duration of the red phase in ms.
    pub red: f64,
    /// The radius of the circle a ray must cross to detect the light.
    pub radius: f64,
}

/// The population of obstacles and traffic lights.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficConfig {
    /// The number of obstacles spawned by `populate`.
    pub obstacle_count: usize,
    /// Obstacle extent along the road.
    pub obstacle_length: f64,
    /// Obstacle extent across the road.
    pub obstacle_width: f64,
    /// Obstacle speeds are drawn uniformly from this range, in units per tick.
    pub obstacle_speed: Interval<f64>,
    /// The number of traffic lights kept alive per lane; zero disables recycling.
    pub lights_per_lane: usize,
    /// The distance beyond the view edge at which the first light is placed.
    pub first_light_offset: f64,
    /// The minimum spacing between consecutive lights.
    pub light_spacing: f64,
    /// The maximum random extra spacing added to recycled lights.
    pub light_jitter: f64,
}

/// An invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("road must have at least one lane")]
    NoLanes,
    #[error("lane height must be positive, got {0}")]
    LaneHeight(f64),
    #[error("view width must be positive, got {0}")]
    ViewWidth(f64),
    #[error("sensor must have at least one ray")]
    NoRays,
    #[error("ray length must be positive, got {0}")]
    RayLength(f64),
    #[error("ray spread must be finite and non-negative, got {0} degrees")]
    RaySpread(f64),
    #[error("vehicle dimensions must be positive, got {length} x {width}")]
    VehicleSize { length: f64, width: f64 },
    #[error("max speed must be non-negative, got {0}")]
    MaxSpeed(f64),
    #[error("acceleration and deceleration must be positive, got {acc} and {dec}")]
    Acceleration { acc: f64, dec: f64 },
    #[error("lane change buffers and stop margin must be non-negative")]
    Buffers,
    #[error("lane change rate must be within (0, 1], got {0}")]
    LaneChangeRate(f64),
    #[error("snap threshold must be positive, got {0}")]
    SnapThreshold(f64),
    #[error("light phase durations must be positive")]
    LightDurations,
    #[error("light radius must be positive, got {0}")]
    LightRadius(f64),
    #[error("obstacle dimensions must be positive, got {length} x {width}")]
    ObstacleSize { length: f64, width: f64 },
    #[error("obstacle speed range {0:?} is invalid")]
    ObstacleSpeed(Interval<f64>),
    #[error("light spacing and jitter must be non-negative")]
    LightSpacing,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            road: RoadConfig::default(),
            view_width: 800.0,
            vehicle: VehicleAttributes::default(),
            sensor: SensorConfig::default(),
            driver: DriverParams::default(),
            light: LightTimings::default(),
            traffic: TrafficConfig::default(),
            seed: None,
        }
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            lane_count: 4,
            lane_height: 100.0,
            top: 0.0,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ray_count: 36,
            ray_length: 500.0,
            spread: Deg(180.0),
        }
    }
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            obstacle_buffer: 150.0,
            signal_buffer: 500.0,
            stop_margin: 20.0,
            lane_change_rate: 0.05,
            snap_threshold: 1.0,
        }
    }
}

impl Default for LightTimings {
    fn default() -> Self {
        Self {
            green: 15000.0,
            amber: 5000.0,
            red: 15000.0,
            radius: 5.0,
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            obstacle_count: 8,
            obstacle_length: 40.0,
            obstacle_width: 20.0,
            obstacle_speed: Interval::new(2.0, 4.0),
            lights_per_lane: 3,
            first_light_offset: 1500.0,
            light_spacing: 1800.0,
            light_jitter: 600.0,
        }
    }
}

/// Checks that a value is strictly positive and finite.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Checks that a value is non-negative and finite.
fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl SimConfig {
    /// Checks every parameter, returning the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let road = &self.road;
        if road.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if !positive(road.lane_height) {
            return Err(ConfigError::LaneHeight(road.lane_height));
        }
        if !positive(self.view_width) {
            return Err(ConfigError::ViewWidth(self.view_width));
        }

        let sensor = &self.sensor;
        if sensor.ray_count == 0 {
            return Err(ConfigError::NoRays);
        }
        if !positive(sensor.ray_length) {
            return Err(ConfigError::RayLength(sensor.ray_length));
        }
        if !non_negative(sensor.spread.0) {
            return Err(ConfigError::RaySpread(sensor.spread.0));
        }

        let veh = &self.vehicle;
        if !positive(veh.length) || !positive(veh.width) {
            return Err(ConfigError::VehicleSize {
                length: veh.length,
                width: veh.width,
            });
        }
        if !non_negative(veh.max_speed) {
            return Err(ConfigError::MaxSpeed(veh.max_speed));
        }
        if !positive(veh.acceleration) || !positive(veh.deceleration) {
            return Err(ConfigError::Acceleration {
                acc: veh.acceleration,
                dec: veh.deceleration,
            });
        }

        let driver = &self.driver;
        if ![driver.obstacle_buffer, driver.signal_buffer, driver.stop_margin]
            .into_iter()
            .all(non_negative)
        {
            return Err(ConfigError::Buffers);
        }
        if !(positive(driver.lane_change_rate) && driver.lane_change_rate <= 1.0) {
            return Err(ConfigError::LaneChangeRate(driver.lane_change_rate));
        }
        if !positive(driver.snap_threshold) {
            return Err(ConfigError::SnapThreshold(driver.snap_threshold));
        }

        let light = &self.light;
        if ![light.green, light.amber, light.red].into_iter().all(positive) {
            return Err(ConfigError::LightDurations);
        }
        if !positive(light.radius) {
            return Err(ConfigError::LightRadius(light.radius));
        }

        let traffic = &self.traffic;
        if !positive(traffic.obstacle_length) || !positive(traffic.obstacle_width) {
            return Err(ConfigError::ObstacleSize {
                length: traffic.obstacle_length,
                width: traffic.obstacle_width,
            });
        }
        let speed = traffic.obstacle_speed;
        if !(non_negative(speed.min) && non_negative(speed.max) && speed.is_ordered()) {
            return Err(ConfigError::ObstacleSpeed(speed));
        }
        if ![
            traffic.first_light_offset,
            traffic.light_spacing,
            traffic.light_jitter,
        ]
        .into_iter()
        .all(non_negative)
        {
            return Err(ConfigError::LightSpacing);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_rays_is_rejected() {
        let mut config = SimConfig::default();
        config.sensor.ray_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoRays));
    }

    #[test]
    fn zero_lanes_is_rejected() {
        let mut config = SimConfig::default();
        config.road.lane_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoLanes));
    }

    #[test]
    fn zero_deceleration_is_rejected() {
        let mut config = SimConfig::default();
        config.vehicle.deceleration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Acceleration { .. })
        ));
    }

    #[test]
    fn lane_change_rate_bounds() {
        let mut config = SimConfig::default();
        config.driver.lane_change_rate = 1.0;
        assert_eq!(config.validate(), Ok(()));
        config.driver.lane_change_rate = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::LaneChangeRate(1.5)));
        config.driver.lane_change_rate = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::LaneChangeRate(0.0)));
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        let mut config = SimConfig::default();
        config.traffic.obstacle_speed = Interval::new(4.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ObstacleSpeed(_))
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let mut config = SimConfig::default();
        config.road.lane_height = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::LaneHeight(_))));
    }
}
