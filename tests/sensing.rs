//! Tests of how the controlled vehicle senses and reacts to obstacles and traffic lights.

use assert_approx_eq::assert_approx_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use traffic_rayscan::cgmath::{Deg, Rad};
use traffic_rayscan::math::{distance, heading_vector, LineSegment2d, Point2d};
use traffic_rayscan::{
    DetectionKind, DriveState, LightState, LightTimings, Obstacle, SensorArray, SensorConfig,
    SimConfig, Simulation, Target, Throttle, TrafficLight,
};

/// A simulation with no automatic traffic, and the given sensor layout.
fn sim_with_sensor(sensor: SensorConfig) -> Simulation {
    let mut config = SimConfig {
        sensor,
        seed: Some(3),
        ..Default::default()
    };
    config.traffic.obstacle_count = 0;
    config.traffic.lights_per_lane = 0;
    Simulation::new(config).unwrap()
}

/// A sensor with a ray pointing straight ahead.
fn narrow_sensor() -> SensorConfig {
    SensorConfig {
        ray_count: 5,
        ray_length: 500.0,
        spread: Deg(90.0),
    }
}

/// Places the vehicle at speed 2 in lane 1, with a red light whose near edge is `gap` ahead.
fn approach_red_light(gap: f64) -> Simulation {
    let mut sim = sim_with_sensor(narrow_sensor());
    let y = sim.road().lane_centre(1);
    let radius = sim.config().light.radius;
    sim.place_vehicle(Point2d::new(0.0, y), 2.0);
    sim.add_traffic_light(Point2d::new(gap + radius, y), LightState::Red);
    sim
}

#[test]
fn brakes_for_red_light_within_stopping_margin() {
    let mut sim = approach_red_light(25.0);
    assert_approx_eq!(sim.vehicle().stopping_distance(), 10.0);
    sim.step(0.0);

    let decision = sim.last_decision().unwrap();
    assert_eq!(decision.state, DriveState::Stopped);
    assert_eq!(decision.throttle, Throttle::Brake);
    assert!(sim.vehicle().vel() < 2.0);
    assert_approx_eq!(sim.vehicle().vel(), 1.8);
}

#[test]
fn coasts_towards_distant_red_light() {
    let mut sim = approach_red_light(35.0);
    sim.step(0.0);

    let decision = sim.last_decision().unwrap();
    assert_eq!(decision.state, DriveState::Stopped);
    assert_eq!(decision.throttle, Throttle::Hold);
    assert_eq!(sim.vehicle().vel(), 2.0);
}

#[test]
fn speed_never_rises_once_braking_for_red_light() {
    let mut sim = approach_red_light(25.0);
    let mut vel = sim.vehicle().vel();
    for _ in 0..200 {
        sim.step(0.0);
        assert!(sim.vehicle().vel() <= vel);
        vel = sim.vehicle().vel();
    }
    assert!(sim.vehicle().has_stopped());
    assert!(sim.vehicle().position().x < 25.0);
}

#[test]
fn resumes_when_light_turns_green() {
    let mut sim = approach_red_light(25.0);
    for _ in 0..100 {
        sim.step(0.0);
    }
    assert!(sim.vehicle().has_stopped());

    // Run out the red phase
    let red = sim.config().light.red;
    sim.step(red + 1.0);
    sim.step(0.0);
    assert_eq!(sim.vehicle().state(), DriveState::Driving);
    assert!(sim.vehicle().vel() > 0.0);
}

#[test]
fn changes_lane_around_obstacle() {
    let mut sim = sim_with_sensor(SensorConfig::default());
    let y1 = sim.road().lane_centre(1);
    sim.place_vehicle(Point2d::new(0.0, y1), 0.0);
    sim.add_obstacle(Point2d::new(100.0, y1), 0.0);

    sim.step(16.0);
    let veh = sim.vehicle();
    assert_eq!(veh.target_lane(), 0);
    assert_eq!(veh.lane(), 1);
    assert!(veh.is_changing_lanes());
    assert!(veh.position().y < y1);
}

#[test]
fn lane_change_commits_and_snaps_to_centre() {
    let mut sim = sim_with_sensor(SensorConfig::default());
    let y1 = sim.road().lane_centre(1);
    let y0 = sim.road().lane_centre(0);
    sim.place_vehicle(Point2d::new(0.0, y1), 0.0);
    sim.add_obstacle(Point2d::new(100.0, y1), 0.0);

    let mut ticks = 0;
    while sim.vehicle().lane() != 0 {
        sim.step(16.0);
        ticks += 1;
        assert!(ticks < 500, "lane change never completed");
    }

    for _ in 0..20 {
        let veh = sim.vehicle();
        assert_eq!(veh.lane(), 0);
        assert_eq!(veh.target_lane(), 0);
        assert_eq!(veh.position().y, y0);
        sim.step(16.0);
    }
}

#[test]
fn prefers_higher_lane_when_lower_is_occupied() {
    let mut sim = sim_with_sensor(SensorConfig::default());
    let y0 = sim.road().lane_centre(0);
    let y1 = sim.road().lane_centre(1);
    sim.place_vehicle(Point2d::new(0.0, y1), 0.0);
    sim.add_obstacle(Point2d::new(100.0, y1), 0.0);
    sim.add_obstacle(Point2d::new(-100.0, y0), 0.0);

    sim.step(16.0);
    assert_eq!(sim.vehicle().target_lane(), 2);
}

#[test]
fn slows_down_when_no_lane_is_free() {
    let mut sim = sim_with_sensor(SensorConfig::default());
    let y = |lane| sim.road().lane_centre(lane);
    let (y0, y1) = (y(0), y(1));
    sim.place_vehicle(Point2d::new(0.0, y0), 3.0);
    sim.add_obstacle(Point2d::new(100.0, y0), 0.0);
    sim.add_obstacle(Point2d::new(60.0, y1), 0.0);

    sim.step(16.0);
    let decision = sim.last_decision().unwrap();
    assert_eq!(decision.throttle, Throttle::Brake);
    assert_eq!(sim.vehicle().target_lane(), 0);
    assert_approx_eq!(sim.vehicle().vel(), 2.8);
}

#[test]
fn obstacle_in_other_lane_is_ignored() {
    let mut sim = sim_with_sensor(SensorConfig::default());
    let y1 = sim.road().lane_centre(1);
    let y2 = sim.road().lane_centre(2);
    sim.place_vehicle(Point2d::new(0.0, y1), 1.0);
    sim.add_obstacle(Point2d::new(100.0, y2), 0.0);

    sim.step(16.0);
    assert!(sim
        .detections()
        .iter()
        .any(|d| d.kind == DetectionKind::Obstacle));
    assert_eq!(sim.vehicle().target_lane(), 1);
    assert_approx_eq!(sim.vehicle().vel(), 1.2);
}

/// Every ray must end at the nearest hit among all targets, or at maximum range.
#[test]
fn rays_end_at_nearest_hit() {
    let mut rng = StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
    let config = SensorConfig::default();
    let timings = LightTimings::default();
    let origin = Point2d::new(0.0, 0.0);

    for _ in 0..50 {
        let obstacles: Vec<Obstacle> = (0..10)
            .map(|_| {
                let pos = Point2d::new(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));
                Obstacle::new(pos, 40.0, 20.0, 0.0, 0)
            })
            .collect();
        let lights: Vec<TrafficLight> = (0..10)
            .map(|_| {
                let pos = Point2d::new(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));
                TrafficLight::new(pos, timings)
            })
            .collect();
        let targets: Vec<Target> = lights
            .iter()
            .map(Target::from)
            .chain(obstacles.iter().map(Target::from))
            .collect();

        let mut sensor = SensorArray::new(&config);
        sensor.update(origin, Rad(0.0), &targets);
        assert_eq!(sensor.rays().len(), config.ray_count);

        for ray in sensor.rays() {
            let segment =
                LineSegment2d::from_dir(origin, heading_vector(ray.angle), config.ray_length);
            let nearest = targets
                .iter()
                .filter_map(|t| t.intersect(&segment))
                .map(|p| distance(origin, p))
                .fold(f64::INFINITY, f64::min);

            if nearest.is_finite() {
                assert!(ray.detection.is_some());
                assert_approx_eq!(distance(origin, ray.end), nearest);
            } else {
                assert!(ray.detection.is_none());
                assert_approx_eq!(distance(origin, ray.end), config.ray_length);
            }
        }

        let hits = sensor.rays().iter().filter(|r| r.detection.is_some()).count();
        assert_eq!(sensor.detections().len(), hits);
    }
}
