/// The acceleration model of a vehicle.
///
/// Speeds change by a fixed step each tick rather than being integrated over time.
#[derive(Clone, Debug)]
pub struct AccelerationModel {
    max_vel: f64,
    max_acc: f64,
    max_dec: f64,
}

/// The parameters of the acceleration model.
pub struct ModelParams {
    /// The top speed of the vehicle, in units per tick.
    pub max_velocity: f64,
    /// The speed gained per tick when accelerating.
    pub max_acceleration: f64,
    /// The speed lost per tick when braking.
    pub max_deceleration: f64,
}

/// What the vehicle should do with its speed this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Throttle {
    /// Speed up towards the top speed.
    Accelerate,
    /// Keep the current speed.
    Hold,
    /// Slow down towards a stop.
    Brake,
}

impl AccelerationModel {
    /// Creates a new acceleration model.
    pub fn new(params: &ModelParams) -> Self {
        AccelerationModel {
            max_vel: params.max_velocity,
            max_acc: params.max_acceleration,
            max_dec: params.max_deceleration,
        }
    }

    /// The top speed.
    pub fn max_vel(&self) -> f64 {
        self.max_vel
    }

    /// Applies one step of the throttle to `vel`.
    /// The result is always within `[0, max_vel]`.
    pub fn apply(&self, vel: f64, throttle: Throttle) -> f64 {
        let vel = match throttle {
            Throttle::Accelerate => f64::min(vel + self.max_acc, self.max_vel),
            Throttle::Hold => vel,
            Throttle::Brake => f64::max(vel - self.max_dec, 0.0),
        };
        vel.clamp(0.0, self.max_vel)
    }

    /// Calculates the distance needed to brake to a stop from `vel`.
    pub fn stopping_distance(&self, vel: f64) -> f64 {
        vel * vel / (2.0 * self.max_dec)
    }
}
