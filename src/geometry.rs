//! Transforms between tape, part and board frames.
//!
//! Inputs are not validated: a NaN position or angle flows through to the
//! emitted command text unchanged.

use crate::model::{Pad, Part};
use glam::Vec2;

/// Folds an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let mut angle = degrees % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    // Tiny negative inputs round up to exactly 360 above.
    if angle >= 360.0 {
        angle -= 360.0;
    }
    // -0.0 would render as a negative rotation.
    if angle == 0.0 { 0.0 } else { angle }
}

/// Maps board-relative positions into machine coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardFrame {
    pub origin: Vec2,
}

impl BoardFrame {
    pub fn new(origin: Vec2) -> Self {
        Self { origin }
    }

    /// Machine position of the part's origin.
    ///
    /// Only the part's own orientation rotates; its position is a plain offset.
    pub fn place(&self, part: &Part) -> Vec2 {
        self.origin + part.pos
    }

    /// Machine position of `pad`, rotating its offset by the part's angle.
    pub fn pad(&self, part: &Part, pad: &Pad) -> Vec2 {
        let rotation = Vec2::from_angle(part.angle.to_radians());
        self.place(part) + rotation.rotate(pad.pos)
    }
}

/// Converts angles in degrees into nozzle motor units.
///
/// Scaling happens in `f64` so the three-decimal rotation field matches the
/// reference firmware output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleScale {
    /// Motor units per degree.
    pub factor: f64,
}

impl AngleScale {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Scales an arbitrary angle after normalizing it.
    pub fn units(&self, degrees: f32) -> f64 {
        self.factor * normalize_degrees(f64::from(degrees))
    }

    /// Nozzle rotation used when picking from a tape.
    pub fn pick(&self, tape_angle: f32) -> f64 {
        self.units(tape_angle)
    }

    /// Relative rotation turning a component from its tape orientation into
    /// its target orientation on the board.
    ///
    /// The extra turn is added in `f32` before folding; the rounding this
    /// introduces is part of the expected output.
    pub fn place(&self, part_angle: f32, tape_angle: f32) -> f64 {
        self.units(part_angle - tape_angle + 360.0)
    }
}
