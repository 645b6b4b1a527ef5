//! Command group templates.
//!
//! Every group has a fixed shape; only the numeric parameters change. All
//! parameters arrive fully resolved, so building a group cannot fail.

use crate::config::Calibration;
use crate::gcode::{Align, Axes, CommandGroup, Fixed, GroupKind, Line, Op};
use crate::heights::{DispenseHeights, PickHeights, PlaceHeights};
use glam::Vec2;

const SUCTION_ON: u8 = 255;
const OUTPUT_OFF: u8 = 0;

/// Converts a speed in units per second into the firmware's units per minute.
///
/// Saturates at `u32::MAX` for absurd calibration values.
pub fn feed_per_minute(speed_per_sec: u32) -> u32 {
    speed_per_sec.saturating_mul(60)
}

/// Dwell time for a pad of `area`, linear in the area.
pub fn dwell_ms(init_ms: f32, area_ms: f32, area: f32) -> f32 {
    init_ms + area_ms * area
}

/// Where and how a component is moved for a pick or place.
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    pub label: &'a str,
    /// Feed rate in units per minute.
    pub feed: u32,
    pub pos: Vec2,
    /// Absolute nozzle rotation in motor units.
    pub rotation: f64,
}

/// A single paste dot.
#[derive(Clone, Copy, Debug)]
pub struct PasteDot<'a> {
    pub component: &'a str,
    pub pad: &'a str,
    pub pos: Vec2,
    pub area: f32,
    pub dwell_ms: f32,
}

/// Renders command groups with the actuator wiring from a [`Calibration`].
#[derive(Clone, Debug)]
pub struct Emitter {
    plunge_feed: u32,
    suction_pin: u8,
    blower_pin: u8,
    blow_ms: f32,
}

impl Emitter {
    pub fn new(calibration: &Calibration) -> Self {
        Self {
            plunge_feed: calibration.plunge_feed,
            suction_pin: calibration.suction_pin,
            blower_pin: calibration.blower_pin,
            blow_ms: calibration.blow_ms,
        }
    }

    /// Homes all axes and lifts the needle to `clear_z`.
    pub fn preamble(&self, banner: Option<&str>, clear_z: f32) -> CommandGroup {
        let mut lines = Vec::with_capacity(11);
        if let Some(banner) = banner {
            lines.push(Line::Comment(banner.to_string()));
        }
        let col = Align::Column(11);
        lines.extend([
            Line::Blank,
            Line::code(Op::Home(Axes::XY)).with_note(col, "Home (x/y) - needle over free space"),
            Line::code(Op::Home(Axes::Z)).with_note(col, "Now it is safe to home z"),
            Line::code(Op::Millimeters).with_note(col, "set to mm"),
            Line::code(Op::SelectTool(1)).with_note(col, "Use E1 extruder, our 'A' axis."),
            Line::code(Op::AllowColdExtrusion).with_note(
                col,
                "cold extrusion override - because it is not actually an extruder.",
            ),
            Line::code(Op::AbsolutePositioning).with_note(col, "Use absolute positions in general."),
            Line::code(Op::ResetExtruder).with_note(col, "'home' E axis"),
            Line::Blank,
            Line::code(Op::Linear {
                z: Fixed::new(clear_z, 1),
                rotation: Some(Fixed::new(0.0, 0)),
                feed: None,
            })
            .with_note(Align::Gap(1), "Move needle out of way"),
        ]);
        CommandGroup::new(GroupKind::Preamble, lines)
    }

    /// Moves over the tape, descends, turns suction on and lifts to travel height.
    pub fn pick(&self, target: Target<'_>, z: PickHeights) -> CommandGroup {
        let col = Align::Column(13);
        let lines = vec![
            Line::Blank,
            Line::Section(format!("Pick {}", target.label)),
            Line::code(Op::Rapid {
                feed: Some(target.feed),
                pos: target.pos,
                z: z.approach,
                rotation: Some(target.rotation),
            })
            .with_note(Align::Gap(1), "Move over component to pick."),
            Line::code(Op::Linear {
                z: Fixed::new(z.contact, 2).width(6).trail(2),
                rotation: None,
                feed: Some(self.plunge_feed),
            })
            .with_note(Align::Gap(1), "move down on tape."),
            Line::code(Op::Dwell { ms: None }).with_note(col, "flush buffer"),
            Line::code(Op::SetPin {
                pin: self.suction_pin,
                value: SUCTION_ON,
            })
            .with_note(col, "turn on suckage"),
            Line::code(Op::Linear {
                z: Fixed::new(z.travel, 3).width(6),
                rotation: None,
                feed: None,
            })
            .with_note(Align::Gap(3), "Move up a bit for travelling"),
        ];
        CommandGroup::new(GroupKind::Pick, lines)
    }

    /// Carries the component over the board, descends, releases it with a puff
    /// of air and lifts again.
    pub fn place(&self, target: Target<'_>, z: PlaceHeights) -> CommandGroup {
        let col = Align::Column(14);
        let blow = Fixed::new(self.blow_ms, 0);
        let lines = vec![
            Line::Blank,
            Line::Section(format!("Place {}", target.label)),
            Line::code(Op::Rapid {
                feed: Some(target.feed),
                pos: target.pos,
                z: z.travel,
                rotation: Some(target.rotation),
            })
            .with_note(Align::Gap(1), "Move component to place on board."),
            Line::code(Op::Linear {
                z: Fixed::new(z.contact, 3).width(6),
                rotation: None,
                feed: Some(self.plunge_feed),
            })
            .with_note(Align::Gap(1), "move down over board thickness."),
            Line::code(Op::Dwell { ms: None }).with_note(col, "flush buffer."),
            Line::code(Op::SetPin {
                pin: self.suction_pin,
                value: OUTPUT_OFF,
            })
            .with_note(col, "turn off suckage"),
            Line::code(Op::Dwell { ms: None }).with_note(col, "flush buffer."),
            Line::code(Op::SetPin {
                pin: self.blower_pin,
                value: SUCTION_ON,
            })
            .with_note(col, "blow"),
            Line::code(Op::Dwell { ms: Some(blow) }).with_note(col, format!(".. for {blow}ms")),
            Line::code(Op::SetPin {
                pin: self.blower_pin,
                value: OUTPUT_OFF,
            })
            .with_note(col, "done."),
            Line::code(Op::Linear {
                z: Fixed::new(z.ascend, 2).width(6),
                rotation: None,
                feed: None,
            })
            .with_note(Align::Gap(4), "Move up"),
        ];
        CommandGroup::new(GroupKind::Place, lines)
    }

    /// Moves over a pad and pushes out paste for the dot's dwell time.
    pub fn dispense(&self, dot: PasteDot<'_>, z: DispenseHeights) -> CommandGroup {
        let col = Align::Column(10);
        let lines = vec![
            Line::Blank,
            Line::Section(format!("component {}, pad {}", dot.component, dot.pad)),
            Line::code(Op::Rapid {
                feed: None,
                pos: dot.pos,
                z: z.hover,
                rotation: None,
            })
            .with_note(Align::Gap(3), "move there."),
            Line::code(Op::Linear {
                z: Fixed::new(z.dispense, 2),
                rotation: None,
                feed: None,
            })
            .with_note(Align::Gap(1), "Go down to dispense"),
            Line::code(Op::SolenoidOn).with_note(col, "switch on fan (=solenoid)"),
            Line::code(Op::Dwell {
                ms: Some(Fixed::new(dot.dwell_ms, 1).width(5)),
            })
            .with_note(
                Align::Gap(1),
                format!("Wait time dependent on area {:.2} mm^2", dot.area),
            ),
            Line::code(Op::SolenoidOff).with_note(col, "switch off solenoid"),
            Line::code(Op::Linear {
                z: Fixed::new(z.separate, 2),
                rotation: None,
                feed: None,
            })
            .with_note(Align::Gap(1), "high above to have paste separated"),
        ];
        CommandGroup::new(GroupKind::Dispense, lines)
    }

    /// Homes x/y, leaving z clear, and switches the motors off.
    pub fn finish(&self) -> CommandGroup {
        let col = Align::Column(11);
        let lines = vec![
            Line::Blank,
            Line::code(Op::Home(Axes::XY)).with_note(col, "Home x/y, but leave z clear"),
            Line::code(Op::MotorsOff).with_note(col, "stop motors"),
        ];
        CommandGroup::new(GroupKind::Finish, lines)
    }
}
