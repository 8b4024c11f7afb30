use crate::camera::Camera;
use crate::config::{ConfigError, SimConfig, TrafficConfig};
#[cfg(feature = "debug")]
use crate::debug::take_sensor_frame;
use crate::light::{LightState, TrafficLight};
use crate::math::Point2d;
use crate::obstacle::Obstacle;
use crate::road::Road;
use crate::target::Target;
use crate::vehicle::{Decision, Detection, Ray, Vehicle};
use crate::{LightSet, ObstacleId, ObstacleSet, TrafficLightId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

/// How far in from the left edge of the view the controlled vehicle starts.
const START_OFFSET: f64 = 100.0;

/// Obstacles are spawned up to this many view widths beyond the right edge of the view.
const SPAWN_VIEWS: f64 = 3.0;

/// A traffic simulation of one self-driving vehicle on an endless multi-lane road.
pub struct Simulation {
    /// The parameters the simulation was created with.
    config: SimConfig,
    /// The road layout.
    road: Road,
    /// The controlled vehicle.
    vehicle: Vehicle,
    /// The obstacle vehicles.
    obstacles: ObstacleSet,
    /// The traffic lights.
    lights: LightSet,
    /// The visible window, which follows the controlled vehicle.
    camera: Camera,
    /// Randomness for spawning and respawning entities.
    rng: StdRng,
    /// The current frame of simulation.
    frame: usize,
    /// The controlled vehicle's decision on the previous frame.
    decision: Option<Decision>,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a simulation with the controlled vehicle at its starting position,
    /// and no obstacles or traffic lights.
    ///
    /// Fails if any of the configuration values are invalid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let road = Road::new(&config.road);
        let camera = Camera::new(0.0, road.lane_centre(road.middle_lane()));
        let start = Point2d::new(
            camera.visible(config.view_width).min + START_OFFSET,
            road.lane_centre(road.middle_lane()),
        );
        let vehicle = Self::build_vehicle(&config, &road, start);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "created simulation with {} lanes, vehicle at {:?}",
            road.lane_count(),
            start
        );

        Ok(Self {
            config,
            road,
            vehicle,
            obstacles: Default::default(),
            lights: Default::default(),
            camera,
            rng,
            frame: 0,
            decision: None,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        })
    }

    /// Fills the road ahead of the view with obstacles in random lanes,
    /// and places one traffic light in each lane at increasing distances.
    pub fn populate(&mut self) {
        let traffic = self.config.traffic;
        let view_edge = self.camera.visible(self.config.view_width).max;

        for _ in 0..traffic.obstacle_count {
            let x = view_edge + self.rng.gen::<f64>() * self.config.view_width * SPAWN_VIEWS;
            let lane = self.rng.gen_range(0..self.road.lane_count());
            let vel = traffic.obstacle_speed.lerp(self.rng.gen());
            let pos = Point2d::new(x, self.road.lane_centre(lane));
            self.obstacles.insert(Obstacle::new(
                pos,
                traffic.obstacle_length,
                traffic.obstacle_width,
                vel,
                lane,
            ));
        }

        for lane in 0..self.road.lane_count() {
            let x = view_edge + traffic.first_light_offset + lane as f64 * traffic.light_spacing;
            self.add_traffic_light(Point2d::new(x, self.road.lane_centre(lane)), LightState::Green);
        }

        log::info!(
            "populated {} obstacles and {} traffic lights",
            self.obstacles.len(),
            self.lights.len()
        );
    }

    /// Replaces the controlled vehicle with a fresh one at `pos` travelling at `vel`,
    /// and moves the camera to follow it.
    pub fn place_vehicle(&mut self, pos: Point2d, vel: f64) {
        self.vehicle = Self::build_vehicle(&self.config, &self.road, pos).with_vel(vel);
        self.camera.x = pos.x;
    }

    /// Adds an obstacle centred at `pos`, which travels `vel` units per tick.
    pub fn add_obstacle(&mut self, pos: Point2d, vel: f64) -> ObstacleId {
        let traffic = &self.config.traffic;
        self.obstacles.insert(Obstacle::new(
            pos,
            traffic.obstacle_length,
            traffic.obstacle_width,
            vel,
            self.road.lane_at(pos.y),
        ))
    }

    /// Removes an obstacle from the simulation.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.obstacles.remove(id)
    }

    /// Adds a traffic light at `pos`, starting at the beginning of the given state.
    pub fn add_traffic_light(&mut self, pos: Point2d, state: LightState) -> TrafficLightId {
        let light = TrafficLight::new(pos, self.config.light).with_state(state);
        self.lights.insert(light)
    }

    /// Removes a traffic light from the simulation.
    pub fn remove_traffic_light(&mut self, id: TrafficLightId) -> Option<TrafficLight> {
        self.lights.remove(id)
    }

    /// Advances the simulation by one tick, `dt` ms after the previous one.
    ///
    /// Negative values of `dt` are treated as zero.
    pub fn step(&mut self, dt: f64) {
        let dt = f64::max(dt, 0.0);
        self.update_lights(dt);
        self.update_vehicle();
        self.update_obstacles();
        self.recycle_lights();
        self.update_camera();
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = take_sensor_frame();
        }
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The parameters the simulation was created with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The road layout.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// The controlled vehicle.
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// The controlled vehicle's decision on the previous frame.
    pub fn last_decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// The centre of the visible window.
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The sensor rays cast on the previous frame.
    pub fn rays(&self) -> &[Ray] {
        self.vehicle.sensor().rays()
    }

    /// The sensor hits recorded on the previous frame.
    pub fn detections(&self) -> &[Detection] {
        self.vehicle.sensor().detections()
    }

    /// Returns an iterator over all the obstacles in the simulation.
    pub fn iter_obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.obstacles.iter()
    }

    /// Returns an iterator over all the traffic lights in the simulation.
    pub fn iter_lights(&self) -> impl Iterator<Item = (TrafficLightId, &TrafficLight)> {
        self.lights.iter()
    }

    /// Gets a reference to the obstacle with the given ID.
    pub fn get_obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    /// Gets a reference to the traffic light with the given ID.
    pub fn get_light(&self, id: TrafficLightId) -> Option<&TrafficLight> {
        self.lights.get(id)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Creates the controlled vehicle at the given position.
    fn build_vehicle(config: &SimConfig, road: &Road, pos: Point2d) -> Vehicle {
        Vehicle::new(&config.vehicle, &config.sensor, &config.driver, pos, road)
    }

    /// Advances the traffic light timers.
    fn update_lights(&mut self, dt: f64) {
        for (_, light) in &mut self.lights {
            light.step(dt);
        }
    }

    /// Recasts the controlled vehicle's sensors, then lets it decide and move.
    fn update_vehicle(&mut self) {
        let targets = self
            .lights
            .values()
            .map(Target::from)
            .chain(self.obstacles.values().map(Target::from))
            .collect::<SmallVec<[_; 32]>>();
        self.decision = Some(self.vehicle.update(&self.road, &targets));
    }

    /// Moves the obstacles, respawning any that have fallen behind the view.
    fn update_obstacles(&mut self) {
        let view = self.camera.visible(self.config.view_width);
        for (id, obstacle) in &mut self.obstacles {
            obstacle.advance();
            if obstacle.position().x < view.min - obstacle.length() {
                let x = view.max
                    + obstacle.length()
                    + self.rng.gen::<f64>() * self.config.view_width * SPAWN_VIEWS;
                let lane = self.rng.gen_range(0..self.road.lane_count());
                let vel = self.config.traffic.obstacle_speed.lerp(self.rng.gen());
                obstacle.respawn(x, lane, self.road.lane_centre(lane), vel);
                log::debug!("respawned obstacle {:?} at {:.1} in lane {}", id, x, lane);
            }
        }
    }

    /// Removes traffic lights well behind the view and tops up the lights ahead.
    fn recycle_lights(&mut self) {
        let TrafficConfig {
            lights_per_lane,
            first_light_offset,
            light_spacing,
            light_jitter,
            ..
        } = self.config.traffic;
        let wanted = lights_per_lane * self.road.lane_count();
        if wanted == 0 {
            return;
        }

        let cutoff = self.camera.x - self.config.view_width;
        self.lights.retain(|id, light| {
            let keep = light.position().x > cutoff;
            if !keep {
                log::debug!("recycling traffic light {:?}", id);
            }
            keep
        });

        let view_edge = self.camera.visible(self.config.view_width).max;
        while self.lights.len() < wanted {
            let lane = self.rng.gen_range(0..self.road.lane_count());
            let furthest = self.lights.values().map(|l| l.position().x).reduce(f64::max);
            let x = match furthest {
                Some(x) => x + light_spacing + self.rng.gen::<f64>() * light_jitter,
                None => view_edge + first_light_offset + self.rng.gen::<f64>() * light_spacing,
            };
            self.add_traffic_light(Point2d::new(x, self.road.lane_centre(lane)), LightState::Green);
        }
    }

    /// Recentres the camera on the controlled vehicle.
    fn update_camera(&mut self) {
        self.camera.x = self.vehicle.position().x;
        self.camera.y = self.road.lane_centre(self.road.middle_lane());
    }
}
