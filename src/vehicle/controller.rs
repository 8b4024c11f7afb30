use super::acceleration::{AccelerationModel, Throttle};
use super::sensor::Detection;
use crate::config::DriverParams;
use crate::light::LightState;
use crate::math::{distance, Point2d};
use crate::road::Road;
use crate::target::{DetectionKind, Target};

/// The behavioural state of the controlled vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveState {
    #[default]
    Driving,
    Stopped,
}

/// Decides how the controlled vehicle reacts to what its sensors see.
#[derive(Clone, Debug)]
pub struct DrivingController {
    params: DriverParams,
}

/// Inputs into the [`DrivingController::decide`] method.
pub struct DecisionInput<'a> {
    /// The vehicle's position.
    pub pos: Point2d,
    /// The vehicle's speed.
    pub vel: f64,
    /// The lane the vehicle is committed to.
    pub lane: usize,
    /// The road being driven on.
    pub road: &'a Road,
    /// The vehicle's acceleration model.
    pub acc: &'a AccelerationModel,
    /// The hits from the latest sensor update.
    pub detections: &'a [Detection],
    /// Every entity in the world, used to check whether a lane is free.
    pub targets: &'a [Target<'a>],
}

/// The outcome of one tick of decision making.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// The vehicle's new behavioural state.
    pub state: DriveState,
    /// What to do with the vehicle's speed.
    pub throttle: Throttle,
    /// What to do with the vehicle's target lane.
    pub lane: LaneCommand,
}

/// A change to the vehicle's target lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneCommand {
    /// Leave the target lane as it is.
    Keep,
    /// Move into the given lane.
    Change(usize),
    /// Settle into whichever lane the vehicle currently occupies,
    /// which abandons a lane change that has not yet crossed the lane boundary.
    Stay,
}

/// The relevant detections in the vehicle's own lane.
#[derive(Default)]
struct Surroundings<'a> {
    /// The nearest red light ahead.
    red_light: Option<&'a Detection>,
    /// The distance to the nearest obstacle ahead.
    obstacle: Option<f64>,
}

impl DrivingController {
    /// Creates a new controller.
    pub fn new(params: &DriverParams) -> Self {
        Self { params: *params }
    }

    /// The controller's thresholds.
    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    /// Decides whether to stop, change lanes, slow down or cruise.
    ///
    /// Red lights take priority over obstacles.
    pub fn decide(&self, input: &DecisionInput) -> Decision {
        let ahead = Self::scan(input);

        if let Some(light) = ahead.red_light {
            let stopping_distance = input.acc.stopping_distance(input.vel);
            let dist = distance(input.pos, light.pos);
            let throttle = if dist <= stopping_distance + self.params.stop_margin {
                Throttle::Brake
            } else {
                Throttle::Hold
            };
            return Decision {
                state: DriveState::Stopped,
                throttle,
                lane: LaneCommand::Keep,
            };
        }

        if let Some(obstacle_dist) = ahead.obstacle {
            let free_lane = input
                .road
                .adjacent_lanes(input.lane)
                .find(|lane| self.lane_is_free(*lane, input.pos, input.road, input.targets));

            return match free_lane {
                Some(lane) => {
                    log::debug!(
                        "obstacle {:.1} ahead, changing from lane {} to {}",
                        obstacle_dist,
                        input.lane,
                        lane
                    );
                    Decision {
                        state: DriveState::Driving,
                        throttle: Throttle::Accelerate,
                        lane: LaneCommand::Change(lane),
                    }
                }
                None => {
                    log::debug!("obstacle {:.1} ahead, no free lane", obstacle_dist);
                    Decision {
                        state: DriveState::Driving,
                        throttle: Throttle::Brake,
                        lane: LaneCommand::Keep,
                    }
                }
            };
        }

        Decision {
            state: DriveState::Driving,
            throttle: Throttle::Accelerate,
            lane: LaneCommand::Stay,
        }
    }

    /// Determines whether a lane is clear enough to move into.
    ///
    /// A lane is blocked by any obstacle within `obstacle_buffer` in front or behind,
    /// or by a red light up to `signal_buffer` ahead.
    pub fn lane_is_free(&self, lane: usize, pos: Point2d, road: &Road, targets: &[Target]) -> bool {
        targets.iter().all(|target| {
            let target_pos = target.position();
            if road.lane_at(target_pos.y) != lane {
                return true;
            }
            let dx = target_pos.x - pos.x;
            match target.kind() {
                DetectionKind::Obstacle => dx.abs() >= self.params.obstacle_buffer,
                DetectionKind::Light(LightState::Red) => {
                    !(0.0..self.params.signal_buffer).contains(&dx)
                }
                DetectionKind::Light(_) => true,
            }
        })
    }

    /// Moves `y` a fraction of the way towards `centre`, snapping onto it once close enough.
    /// Returns the new y-coordinate and whether it has arrived.
    pub fn steer(&self, y: f64, centre: f64) -> (f64, bool) {
        let gap = centre - y;
        if gap.abs() > self.params.snap_threshold {
            (y + gap * self.params.lane_change_rate, false)
        } else {
            (centre, true)
        }
    }

    /// Picks out the detections in the vehicle's lane and in front of it.
    fn scan<'a>(input: &DecisionInput<'a>) -> Surroundings<'a> {
        let own_lane = input.road.lane_at(input.pos.y);
        let relevant = input
            .detections
            .iter()
            .filter(|det| input.road.lane_at(det.pos.y) == own_lane && det.pos.x > input.pos.x);

        let mut ahead = Surroundings::default();
        for det in relevant {
            match det.kind {
                DetectionKind::Light(LightState::Red) => {
                    if ahead.red_light.map_or(true, |nearest| det.dist < nearest.dist) {
                        ahead.red_light = Some(det);
                    }
                }
                DetectionKind::Light(_) => {}
                DetectionKind::Obstacle => {
                    let min = ahead.obstacle.get_or_insert(det.dist);
                    *min = f64::min(*min, det.dist);
                }
            }
        }
        ahead
    }
}
