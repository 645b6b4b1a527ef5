//! # pnp-gcode
//!
//! Turns component placements on a circuit board into G-code for a
//! pick-and-place machine that doubles as a solder-paste dispenser.
//!
//! Parts are picked from tapes, carried at a safe travel height, rotated from
//! their tape orientation into their board orientation and dropped on the
//! board. Paste pads are visited one by one with a dwell scaled by pad area.
//! Commands are built as typed records ([`Program`]) and rendered to text only
//! at the end, so the output can be checked line by line.

pub mod config;
pub mod emitter;
pub mod error;
pub mod gcode;
pub mod geometry;
pub mod heights;
pub mod job;
pub mod machine;
pub mod model;

pub use config::*;
pub use error::*;
pub use gcode::*;
pub use geometry::*;
pub use heights::*;
pub use job::*;
pub use machine::*;
pub use model::*;
