//! Typed G-code instructions and their textual rendering.
//!
//! Command groups are built as lists of [`Line`] records and only turned into
//! text when a [`Program`] is displayed or written. Field precision and comment
//! alignment are part of the firmware-facing format and are reproduced exactly.

use glam::Vec2;
use std::fmt;
use std::io;

/// A numeric field rendered like printf's `%-W.Pf`, optionally followed by
/// `trail` spaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixed {
    pub value: f32,
    pub precision: usize,
    pub width: usize,
    pub trail: usize,
}

impl Fixed {
    pub fn new(value: f32, precision: usize) -> Self {
        Self {
            value,
            precision,
            width: 0,
            trail: 0,
        }
    }

    /// Left-justifies the value in a field of `width` characters.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn trail(mut self, trail: usize) -> Self {
        self.trail = trail;
        self
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$.precision$}{:trail$}",
            self.value,
            "",
            width = self.width,
            precision = self.precision,
            trail = self.trail,
        )
    }
}

/// Axes addressed by a homing move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axes {
    XY,
    Z,
}

/// The instruction vocabulary understood by the machine firmware.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// `G28`: home the given axes.
    Home(Axes),
    /// `G21`: units are millimeters.
    Millimeters,
    /// `T<n>`: select the extruder driving the nozzle rotation.
    SelectTool(u8),
    /// `M302`: allow moving the extruder axis while cold.
    AllowColdExtrusion,
    /// `G90`: absolute positioning.
    AbsolutePositioning,
    /// `G92 E0`: declare the current rotation as zero.
    ResetExtruder,
    /// `G0`: rapid move to an absolute position, optionally rotating the nozzle.
    Rapid {
        feed: Option<u32>,
        pos: Vec2,
        z: f32,
        rotation: Option<f64>,
    },
    /// `G1`: vertical move.
    Linear {
        z: Fixed,
        rotation: Option<Fixed>,
        feed: Option<u32>,
    },
    /// `G4`: wait for the move queue to drain, then optionally pause for `ms`.
    Dwell { ms: Option<Fixed> },
    /// `M42`: set an auxiliary output pin.
    SetPin { pin: u8, value: u8 },
    /// `M106`: fan output, wired to the paste solenoid.
    SolenoidOn,
    /// `M107`
    SolenoidOff,
    /// `M84`: disable stepper motors.
    MotorsOff,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Home(Axes::XY) => f.write_str("G28 X0 Y0"),
            Op::Home(Axes::Z) => f.write_str("G28 Z0"),
            Op::Millimeters => f.write_str("G21"),
            Op::SelectTool(tool) => write!(f, "T{tool}"),
            Op::AllowColdExtrusion => f.write_str("M302"),
            Op::AbsolutePositioning => f.write_str("G90"),
            Op::ResetExtruder => f.write_str("G92 E0"),
            Op::Rapid {
                feed,
                pos,
                z,
                rotation,
            } => {
                f.write_str("G0")?;
                if let Some(feed) = feed {
                    write!(f, " F{feed}")?;
                }
                write!(f, " X{:.3} Y{:.3} Z{:.3}", pos.x, pos.y, z)?;
                if let Some(rotation) = rotation {
                    write!(f, " E{rotation:.3}")?;
                }
                Ok(())
            }
            Op::Linear { z, rotation, feed } => {
                write!(f, "G1 Z{z}")?;
                if let Some(rotation) = rotation {
                    write!(f, " E{rotation}")?;
                }
                if let Some(feed) = feed {
                    write!(f, " F{feed}")?;
                }
                Ok(())
            }
            Op::Dwell { ms: None } => f.write_str("G4"),
            Op::Dwell { ms: Some(ms) } => write!(f, "G4 P{ms}"),
            Op::SetPin { pin, value } => write!(f, "M42 P{pin} S{value}"),
            Op::SolenoidOn => f.write_str("M106"),
            Op::SolenoidOff => f.write_str("M107"),
            Op::MotorsOff => f.write_str("M84"),
        }
    }
}

/// Placement of a trailing `; note` after an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Start the note at this column, or one space after the code if it is longer.
    Column(usize),
    /// Separate the note from the code by a fixed number of spaces.
    Gap(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub align: Align,
    pub text: String,
}

/// One line of output.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Blank,
    /// `; text`
    Comment(String),
    /// `;; -- text`, heading a command group.
    Section(String),
    Code { op: Op, note: Option<Note> },
}

impl Line {
    pub fn code(op: Op) -> Self {
        Line::Code { op, note: None }
    }

    /// Attaches a trailing note to a code line. Other lines are returned unchanged.
    pub fn with_note(self, align: Align, text: impl Into<String>) -> Self {
        match self {
            Line::Code { op, .. } => Line::Code {
                op,
                note: Some(Note {
                    align,
                    text: text.into(),
                }),
            },
            other => other,
        }
    }

    pub fn op(&self) -> Option<&Op> {
        match self {
            Line::Code { op, .. } => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Blank => Ok(()),
            Line::Comment(text) => write!(f, "; {text}"),
            Line::Section(text) => write!(f, ";; -- {text}"),
            Line::Code { op, note: None } => write!(f, "{op}"),
            Line::Code {
                op,
                note: Some(note),
            } => {
                let code = op.to_string();
                let padding = match note.align {
                    Align::Column(column) => column.saturating_sub(code.len()).max(1),
                    Align::Gap(gap) => gap,
                };
                write!(f, "{code}{:padding$}; {}", "", note.text)
            }
        }
    }
}

/// The kind of a command group; each kind is a fixed template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Preamble,
    Pick,
    Place,
    Dispense,
    Finish,
}

/// The lines emitted for one operation.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandGroup {
    pub kind: GroupKind,
    pub lines: Vec<Line>,
}

impl CommandGroup {
    pub fn new(kind: GroupKind, lines: Vec<Line>) -> Self {
        Self { kind, lines }
    }

    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.lines.iter().filter_map(Line::op)
    }
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Append-only, ordered list of command groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    groups: Vec<CommandGroup>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: CommandGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    pub fn kinds(&self) -> impl Iterator<Item = GroupKind> + '_ {
        self.groups.iter().map(|group| group.kind)
    }

    pub fn count(&self, kind: GroupKind) -> usize {
        self.kinds().filter(|k| *k == kind).count()
    }

    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_matches_printf_left_justify() {
        assert_eq!(Fixed::new(2.0, 2).width(6).to_string(), "2.00  ");
        assert_eq!(Fixed::new(17.0, 3).width(6).to_string(), "17.000");
        assert_eq!(Fixed::new(123.5, 3).width(6).to_string(), "123.500");
        assert_eq!(Fixed::new(2.0, 2).width(6).trail(2).to_string(), "2.00    ");
        assert_eq!(Fixed::new(0.0, 0).to_string(), "0");
    }

    #[test]
    fn note_column_and_gap() {
        let homed = Line::code(Op::Home(Axes::XY)).with_note(Align::Column(11), "Home");
        assert_eq!(homed.to_string(), "G28 X0 Y0  ; Home");

        let crowded = Line::code(Op::ResetExtruder).with_note(Align::Column(3), "x");
        assert_eq!(crowded.to_string(), "G92 E0 ; x");

        let moved = Line::code(Op::Rapid {
            feed: None,
            pos: Vec2::new(1.0, 2.0),
            z: 3.0,
            rotation: None,
        })
        .with_note(Align::Gap(3), "move there.");
        assert_eq!(
            moved.to_string(),
            "G0 X1.000 Y2.000 Z3.000   ; move there."
        );
    }

    #[test]
    fn rapid_with_feed_and_rotation() {
        let op = Op::Rapid {
            feed: Some(60000),
            pos: Vec2::new(10.5, -3.25),
            z: 12.0,
            rotation: Some(4.5),
        };
        assert_eq!(op.to_string(), "G0 F60000 X10.500 Y-3.250 Z12.000 E4.500");
    }

    #[test]
    fn program_renders_groups_in_order() {
        let mut program = Program::new();
        program.push(CommandGroup::new(
            GroupKind::Preamble,
            vec![Line::Comment("job".into()), Line::Blank],
        ));
        program.push(CommandGroup::new(
            GroupKind::Finish,
            vec![Line::code(Op::MotorsOff)],
        ));
        assert_eq!(program.to_string(), "; job\n\nM84\n");
        assert_eq!(program.count(GroupKind::Finish), 1);
        let ops: Vec<_> = program.groups()[1].ops().collect();
        assert_eq!(ops, vec![&Op::MotorsOff]);
        assert_eq!(program.groups()[0].ops().count(), 0);
    }
}
