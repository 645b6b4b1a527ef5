//! Job configuration and machine calibration.
//!
//! [`PnpConfig`] describes what is on the bed (board and tapes). [`Calibration`]
//! holds the machine constants: clearances, speeds and actuator wiring. Both
//! load from TOML; calibration fields that are left out keep their defaults.

use crate::error::ConfigError;
use crate::model::{Board, Tape};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Process-wide job configuration, read-only for the lifetime of a session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PnpConfig {
    pub board: Board,

    /// Machine z of the bed the board rests on.
    #[serde(default)]
    pub bed_level: f32,

    /// Tape feeding each component, keyed by [`crate::Part::component_key`].
    #[serde(default)]
    pub tapes: HashMap<String, Tape>,
}

impl PnpConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_toml(path.as_ref())
    }

    /// Distance between the bed and the top of the board.
    pub fn board_thickness(&self) -> f32 {
        self.board.top - self.bed_level
    }
}

/// Machine constants that would otherwise be compiled in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Clearance above tape and board while carrying a component.
    pub hover_clearance: f32,
    /// Subtracted from the place height to spring-load the nozzle. Nominally zero.
    pub spring_compensation: f32,
    /// Clearance above the highest tape or board surface for the initial needle lift.
    pub preamble_clearance: f32,
    /// Motor units for one full turn of the nozzle.
    pub rotation_units_per_turn: f64,
    /// Speed moving the empty needle to the tape, in mm/s.
    pub to_tape_speed: u32,
    /// Speed carrying a component to the board, in mm/s.
    pub to_board_speed: u32,
    /// Feed for vertical plunges, in mm/min.
    pub plunge_feed: u32,
    pub suction_pin: u8,
    pub blower_pin: u8,
    /// Duration of the release puff after placing, in ms.
    pub blow_ms: f32,
    pub dispense: DispenseCalibration,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            hover_clearance: 10.0,
            spring_compensation: 0.0,
            preamble_clearance: 10.0,
            rotation_units_per_turn: 50.34965,
            to_tape_speed: 1000,
            to_board_speed: 100,
            plunge_feed: 4000,
            suction_pin: 6,
            blower_pin: 8,
            blow_ms: 40.0,
            dispense: DispenseCalibration::default(),
        }
    }
}

impl Calibration {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_toml(path.as_ref())
    }

    /// Motor units per degree of nozzle rotation.
    pub fn angle_factor(&self) -> f64 {
        self.rotation_units_per_turn / 360.0
    }
}

/// Paste dispenser heights (relative to the board top) and timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispenseCalibration {
    /// Height above the board while moving between pads.
    pub hover_above: f32,
    /// Height above the board while paste is pushed out.
    pub dispense_above: f32,
    /// Height the needle pulls up to so the droplet separates.
    pub separate_above: f32,
    /// Base dwell for every pad, in ms.
    pub init_ms: f32,
    /// Additional dwell per square unit of pad area, in ms.
    pub area_ms: f32,
}

impl Default for DispenseCalibration {
    fn default() -> Self {
        Self {
            hover_above: 2.0,
            dispense_above: 0.3,
            separate_above: 5.0,
            init_ms: 30.0,
            area_ms: 10.0,
        }
    }
}

pub(crate) fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}
