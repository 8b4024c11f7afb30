use crate::util::Interval;

/// The centre of the visible window onto the world.
///
/// The camera follows the controlled vehicle along the road and stays
/// fixed on the middle lane across it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    pub x: f64,
    pub y: f64,
}

impl Camera {
    /// Creates a camera centred on the given point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The range of x-coordinates visible in a window of the given width.
    pub fn visible(&self, view_width: f64) -> Interval<f64> {
        Interval::disc(self.x, 0.5 * view_width)
    }
}
