//! Z heights for every pick, place and dispense sequence.
//!
//! Each sequence follows the same order: hover at travel height, descend to
//! contact, actuate, ascend back to travel height.

use crate::config::{Calibration, DispenseCalibration, PnpConfig};

/// Heights used while picking a component from a tape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHeights {
    /// Hover height when arriving over the tape.
    pub approach: f32,
    /// Resting height of the component in the tape.
    pub contact: f32,
    /// Height to travel at with the component on the nozzle.
    pub travel: f32,
}

/// Heights used while placing a component on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceHeights {
    pub travel: f32,
    pub contact: f32,
    pub ascend: f32,
}

/// Heights used for each paste pad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispenseHeights {
    pub hover: f32,
    pub dispense: f32,
    pub separate: f32,
}

/// Computes z heights from board geometry and calibration clearances.
#[derive(Clone, Debug)]
pub struct HeightSequencer {
    board_top: f32,
    board_thickness: f32,
    hover_clearance: f32,
    spring_compensation: f32,
    dispense: DispenseCalibration,
}

impl HeightSequencer {
    pub fn new(config: &PnpConfig, calibration: &Calibration) -> Self {
        Self {
            board_top: config.board.top,
            board_thickness: config.board_thickness(),
            hover_clearance: calibration.hover_clearance,
            spring_compensation: calibration.spring_compensation,
            dispense: calibration.dispense.clone(),
        }
    }

    pub fn board_thickness(&self) -> f32 {
        self.board_thickness
    }

    /// Height for lateral moves while a component from a tape at `tape_height`
    /// is on the nozzle.
    ///
    /// Already placed neighbours are not modelled; this is where a
    /// collision-aware clearance would be computed.
    pub fn travel_height(&self, tape_height: f32) -> f32 {
        tape_height + self.board_thickness + self.hover_clearance
    }

    pub fn pick(&self, tape_height: f32) -> PickHeights {
        PickHeights {
            approach: tape_height + self.hover_clearance,
            contact: tape_height,
            travel: self.travel_height(tape_height),
        }
    }

    pub fn place(&self, tape_height: f32) -> PlaceHeights {
        let travel = self.travel_height(tape_height);
        PlaceHeights {
            travel,
            contact: tape_height + self.board_thickness - self.spring_compensation,
            ascend: travel,
        }
    }

    pub fn dispense(&self) -> DispenseHeights {
        DispenseHeights {
            hover: self.board_top + self.dispense.hover_above,
            dispense: self.board_top + self.dispense.dispense_above,
            separate: self.board_top + self.dispense.separate_above,
        }
    }
}

/// Height that clears the board and every configured tape, plus `clearance`.
pub fn preamble_height(config: &PnpConfig, clearance: f32) -> f32 {
    let highest = config
        .tapes
        .values()
        .map(|tape| tape.height())
        .fold(config.board.top, f32::max);
    highest + clearance
}
