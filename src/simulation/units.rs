//! Vector types and the simulation ↔ display unit conversion.
//!
//! Physics runs in meters (`NVec2` in simulation space); everything the
//! presentation layer sees, spawn requests included, is in pixels.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Fixed scale factor between simulation meters and display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub pixels_per_meter: f64,
}

impl Scale {
    pub fn new(pixels_per_meter: f64) -> Self {
        Self { pixels_per_meter }
    }

    /// Display point -> simulation point
    pub fn to_sim(&self, p: NVec2) -> NVec2 {
        p / self.pixels_per_meter
    }

    /// Simulation point -> display point
    pub fn to_display(&self, p: NVec2) -> NVec2 {
        p * self.pixels_per_meter
    }

    pub fn length_to_sim(&self, l: f64) -> f64 {
        l / self.pixels_per_meter
    }

    pub fn length_to_display(&self, l: f64) -> f64 {
        l * self.pixels_per_meter
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(30.0)
    }
}

/// Rotate `v` by +90° (counter-clockwise in a y-up frame)
pub fn perp(v: NVec2) -> NVec2 {
    NVec2::new(-v.y, v.x)
}

/// Euclidean distance between two points
pub fn distance(a: NVec2, b: NVec2) -> f64 {
    (a - b).norm()
}
