//! Session lifecycle: initialize, per-part operations, finish.
//!
//! The entry point is [`MachineBuilder`]. Give it a [`PnpConfig`] (and
//! optionally a [`Calibration`]), then call [`MachineBuilder::build`] to get a
//! ready [`Session`] with the preamble already emitted. Pick, place and
//! dispense operations append to the session's [`Program`];
//! [`Session::finish`] appends the closing group and hands the program back.
//!
//! Diagnostics (board thickness, skipped parts) go through `tracing`, never
//! into the command output.

use crate::config::{Calibration, PnpConfig};
use crate::emitter::{Emitter, PasteDot, Target, dwell_ms, feed_per_minute};
use crate::error::{MachineError, Result};
use crate::gcode::Program;
use crate::geometry::{AngleScale, BoardFrame};
use crate::heights::{HeightSequencer, preamble_height};
use crate::model::{Pad, Part, Tape};
use glam::Vec2;
use tracing::{debug, info, warn};

/// Collects the session inputs.
#[derive(Clone, Debug, Default)]
pub struct MachineBuilder {
    config: Option<PnpConfig>,
    calibration: Calibration,
    banner: Option<String>,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PnpConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Comment line emitted before the preamble, e.g. the job's source file.
    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// Starts a session and emits the preamble.
    ///
    /// Fails with [`MachineError::ConfigurationMissing`] if no configuration was given.
    pub fn build(self) -> Result<Session> {
        let Some(config) = self.config else {
            warn!("Need configuration");
            return Err(MachineError::ConfigurationMissing);
        };
        let calibration = self.calibration;

        let heights = HeightSequencer::new(&config, &calibration);
        info!(
            board_thickness = heights.board_thickness(),
            "Board-thickness = {:.1}mm",
            heights.board_thickness()
        );

        let emitter = Emitter::new(&calibration);
        let mut program = Program::new();
        program.push(emitter.preamble(
            self.banner.as_deref(),
            preamble_height(&config, calibration.preamble_clearance),
        ));

        Ok(Session {
            frame: BoardFrame::new(config.board.origin),
            angles: AngleScale::new(calibration.angle_factor()),
            config,
            calibration,
            heights,
            emitter,
            program,
        })
    }
}

/// A machine session in the ready state.
pub struct Session {
    config: PnpConfig,
    calibration: Calibration,
    heights: HeightSequencer,
    frame: BoardFrame,
    angles: AngleScale,
    emitter: Emitter,
    program: Program,
}

impl Session {
    pub fn config(&self) -> &PnpConfig {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn heights(&self) -> &HeightSequencer {
        &self.heights
    }

    /// Commands emitted so far.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Looks up the tape feeding `part`.
    ///
    /// This is the only way operations obtain a tape, so a part can never be
    /// paired with another component's tape.
    pub fn tape_for(&self, part: &Part) -> Result<&Tape> {
        let key = part.component_key();
        self.config
            .tapes
            .get(&key)
            .ok_or(MachineError::NoTape { component: key })
    }

    /// Mutable access to a tape, for the job driver advancing feeds.
    pub fn tape_mut(&mut self, component_key: &str) -> Option<&mut Tape> {
        self.config.tapes.get_mut(component_key)
    }

    /// Emits the pick sequence for the next component on `part`'s tape.
    ///
    /// Nothing is emitted if the tape is missing or exhausted.
    pub fn pick_part(&mut self, part: &Part) -> Result<()> {
        let (tape, pos) = self.feed(part)?;
        let label = part.label();
        let group = self.emitter.pick(
            Target {
                label: &label,
                feed: feed_per_minute(self.calibration.to_tape_speed),
                pos,
                rotation: self.angles.pick(tape.angle()),
            },
            self.heights.pick(tape.height()),
        );
        debug!(component = %part.component_name, "pick");
        self.program.push(group);
        Ok(())
    }

    /// Emits the place sequence carrying `part` to its board position.
    ///
    /// Nothing is emitted if the tape is missing or exhausted.
    pub fn place_part(&mut self, part: &Part) -> Result<()> {
        let (tape, _) = self.feed(part)?;
        if !self.config.board.contains(part.pos) {
            warn!(
                component = %part.component_name,
                x = part.pos.x,
                y = part.pos.y,
                "placement outside the board extent"
            );
        }
        let label = part.label();
        let group = self.emitter.place(
            Target {
                label: &label,
                feed: feed_per_minute(self.calibration.to_board_speed),
                pos: self.frame.place(part),
                rotation: self.angles.place(part.angle, tape.angle()),
            },
            self.heights.place(tape.height()),
        );
        debug!(component = %part.component_name, "place");
        self.program.push(group);
        Ok(())
    }

    /// Emits a paste dot on `pad` of `part`.
    pub fn dispense(&mut self, part: &Part, pad: &Pad) {
        let dispense = &self.calibration.dispense;
        let area = pad.area();
        let group = self.emitter.dispense(
            PasteDot {
                component: &part.component_name,
                pad: &pad.name,
                pos: self.frame.pad(part, pad),
                area,
                dwell_ms: dwell_ms(dispense.init_ms, dispense.area_ms, area),
            },
            self.heights.dispense(),
        );
        self.program.push(group);
    }

    /// Emits a paste dot on every pad of `part`.
    pub fn dispense_part(&mut self, part: &Part) {
        for pad in &part.pads {
            self.dispense(part, pad);
        }
    }

    /// Emits the finish group and ends the session.
    pub fn finish(mut self) -> Program {
        self.program.push(self.emitter.finish());
        self.program
    }

    fn feed(&self, part: &Part) -> Result<(&Tape, Vec2)> {
        let tape = self.tape_for(part).inspect_err(|_| {
            warn!(component = %part.component_name, "no tape for {}", part.component_key());
        })?;
        match tape.feed_position() {
            Some(pos) => Ok((tape, pos)),
            None => {
                warn!(
                    component = %part.component_name,
                    "We are out of components for {} {}",
                    part.footprint,
                    part.value
                );
                Err(MachineError::TapeExhausted {
                    component: part.component_key(),
                })
            }
        }
    }
}
