use crate::config::SensorConfig;
use crate::debug::{debug_detection, debug_ray};
use crate::math::{distance, heading_vector, lerp, LineSegment2d, Point2d};
use crate::target::{DetectionKind, Target};
use cgmath::{Rad, Zero};

/// A fan of rays cast from a vehicle to find the nearest entity in each direction.
#[derive(Clone, Debug)]
pub struct SensorArray {
    /// The number of rays.
    ray_count: usize,
    /// The maximum range of each ray.
    ray_length: f64,
    /// The total angle covered by the fan.
    spread: Rad<f64>,
    /// The rays cast on the most recent update.
    rays: Vec<Ray>,
    /// The hits recorded on the most recent update, one per ray that hit something.
    detections: Vec<Detection>,
}

/// A single sensor ray.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// The point the ray was cast from.
    pub origin: Point2d,
    /// The absolute direction of the ray.
    pub angle: Rad<f64>,
    /// The nearest hit, or the point at maximum range if nothing was hit.
    pub end: Point2d,
    /// What was hit, if anything.
    pub detection: Option<DetectionKind>,
}

/// A point at which a sensor ray hit an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    /// Where the ray hit.
    pub pos: Point2d,
    /// The distance from the ray's origin to the hit.
    pub dist: f64,
    /// What was hit.
    pub kind: DetectionKind,
}

impl SensorArray {
    /// Creates a sensor array with no rays cast yet.
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            ray_count: config.ray_count,
            ray_length: config.ray_length,
            spread: config.spread.into(),
            rays: Vec::with_capacity(config.ray_count),
            detections: Vec::with_capacity(config.ray_count),
        }
    }

    /// The maximum range of each ray.
    pub fn ray_length(&self) -> f64 {
        self.ray_length
    }

    /// The rays cast on the most recent update.
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// The hits recorded on the most recent update.
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// The direction of the `idx`th ray relative to the vehicle's heading.
    ///
    /// The rays are evenly spaced across the fan, including both of its edges.
    /// A lone ray points straight ahead.
    pub fn ray_offset(&self, idx: usize) -> Rad<f64> {
        if self.ray_count < 2 {
            return Rad::zero();
        }
        let t = idx as f64 / (self.ray_count - 1) as f64;
        let half = 0.5 * self.spread.0;
        Rad(lerp(-half, half, t))
    }

    /// Discards the previous rays and casts a fresh fan from `origin`.
    ///
    /// Each ray ends at the nearest hit among all `targets`, measured from `origin`.
    /// When two hits are equally near, the one from the earlier target wins.
    pub fn update(&mut self, origin: Point2d, heading: Rad<f64>, targets: &[Target]) {
        self.rays.clear();
        self.detections.clear();

        for idx in 0..self.ray_count {
            let ray = self.cast(origin, heading + self.ray_offset(idx), targets);
            debug_ray(ray.origin, ray.end, ray.detection);
            if let Some(kind) = ray.detection {
                debug_detection(ray.end, 5.0, kind);
                self.detections.push(Detection {
                    pos: ray.end,
                    dist: distance(origin, ray.end),
                    kind,
                });
            }
            self.rays.push(ray);
        }

        log::trace!(
            "cast {} rays from {:?}, {} hit",
            self.rays.len(),
            origin,
            self.detections.len()
        );
    }

    /// Casts a single ray and finds its nearest hit.
    fn cast(&self, origin: Point2d, angle: Rad<f64>, targets: &[Target]) -> Ray {
        let segment = LineSegment2d::from_dir(origin, heading_vector(angle), self.ray_length);

        let mut nearest: Option<(f64, Point2d, DetectionKind)> = None;
        for target in targets {
            if let Some(hit) = target.intersect(&segment) {
                let dist = distance(origin, hit);
                if nearest.map_or(true, |(min, _, _)| dist < min) {
                    nearest = Some((dist, hit, target.kind()));
                }
            }
        }

        match nearest {
            Some((_, end, kind)) => Ray {
                origin,
                angle,
                end,
                detection: Some(kind),
            },
            None => Ray {
                origin,
                angle,
                end: segment.end,
                detection: None,
            },
        }
    }
}
