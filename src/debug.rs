use crate::math::Point2d;
use crate::target::DetectionKind;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static SENSOR_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

/// Records a sensor ray, and what it hit, for the current frame.
#[allow(unused)]
pub fn debug_ray(origin: Point2d, end: Point2d, hit: Option<DetectionKind>) {
    #[cfg(feature = "debug")]
    SENSOR_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "ray",
            "from": [origin.x, origin.y],
            "to": [end.x, end.y],
            "hit": hit,
        }))
    })
}

/// Records the point at which a ray detected something, drawn as a circle.
#[allow(unused)]
pub fn debug_detection(pos: Point2d, radius: f64, kind: DetectionKind) {
    #[cfg(feature = "debug")]
    SENSOR_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "detection",
            "centre": [pos.x, pos.y],
            "radius": radius,
            "kind": kind,
        }))
    })
}

/// Takes everything recorded since the last call, as a JSON array.
#[cfg(feature = "debug")]
pub fn take_sensor_frame() -> serde_json::Value {
    json!(SENSOR_FRAME.with(|frame| frame.take()))
}

#[cfg(all(test, feature = "debug"))]
mod test {
    use super::*;
    use crate::light::LightState;

    #[test]
    fn frame_is_taken_once() {
        take_sensor_frame();
        let kind = DetectionKind::Light(LightState::Red);
        debug_ray(Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0), Some(kind));
        debug_detection(Point2d::new(1.0, 0.0), 5.0, kind);
        debug_ray(Point2d::new(0.0, 0.0), Point2d::new(0.0, 1.0), None);

        let frame = take_sensor_frame();
        assert_eq!(frame.as_array().map(Vec::len), Some(3));
        assert_eq!(frame[1]["type"], "detection");
        assert_eq!(frame[2]["hit"], serde_json::Value::Null);
        assert_eq!(take_sensor_frame().as_array().map(Vec::len), Some(0));
    }
}
