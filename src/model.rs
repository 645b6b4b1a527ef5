//! Board, component and tape geometry consumed by the machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Physical description of the board being populated.
///
/// All heights are absolute machine-frame z values, in the same units as
/// [`Tape::height`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Machine position of the board's reference corner.
    pub origin: Vec2,

    /// Height of the top copper surface.
    pub top: f32,

    /// Width and height of the board. Zero means "unknown" and disables the
    /// off-board diagnostic.
    #[serde(default)]
    pub extent: Vec2,
}

impl Board {
    /// Returns `true` if the board-relative `pos` lies within the known extent.
    ///
    /// Always `true` when the extent is unknown.
    pub fn contains(&self, pos: Vec2) -> bool {
        if self.extent.x <= 0.0 || self.extent.y <= 0.0 {
            return true;
        }
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.extent.x && pos.y <= self.extent.y
    }
}

/// A solder-paste target within a component footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub name: String,

    /// Offset from the part origin, before the part's rotation is applied.
    pub pos: Vec2,

    /// Rectangular size (width, height).
    pub size: Vec2,
}

impl Pad {
    /// Paste area in square units.
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }
}

/// One component to be placed on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Reference designator, e.g. `R12`.
    pub component_name: String,
    pub footprint: String,
    pub value: String,

    /// Target position relative to the board origin.
    pub pos: Vec2,

    /// Target rotation in degrees, board frame.
    #[serde(default)]
    pub angle: f32,

    /// Paste pads of the footprint, part-relative.
    #[serde(default)]
    pub pads: Vec<Pad>,
}

impl Part {
    /// Identifier used to look up the tape feeding this component.
    pub fn component_key(&self) -> String {
        format!("{}@{}", self.footprint, self.value)
    }

    /// Human readable name used in emitted section comments.
    pub fn label(&self) -> String {
        format!("{} ({})", self.component_name, self.component_key())
    }
}

/// A reel of identical components.
///
/// The feed index is runtime state owned by whoever drives the job; the
/// machine only ever reads [`Tape::feed_position`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tape {
    /// Machine position of the first component on the tape.
    pub first: Vec2,

    /// Distance between two consecutive components.
    pub spacing: Vec2,

    /// Number of components on the tape.
    pub count: u32,

    /// Absolute z of a component resting in the tape.
    pub height: f32,

    /// Orientation of the components in the tape, in degrees.
    #[serde(default)]
    pub angle: f32,

    #[serde(skip)]
    index: u32,
}

impl Tape {
    pub fn new(first: Vec2, spacing: Vec2, count: u32, height: f32, angle: f32) -> Self {
        Self {
            first,
            spacing,
            count,
            height,
            angle,
            index: 0,
        }
    }

    /// Position of the next component to pick, or `None` once the tape is exhausted.
    pub fn feed_position(&self) -> Option<Vec2> {
        self.parts_available()
            .then(|| self.first + self.spacing * self.index as f32)
    }

    pub fn parts_available(&self) -> bool {
        self.index < self.count
    }

    /// Moves the feed to the next component. Returns `false` if the tape was
    /// already exhausted.
    pub fn advance(&mut self) -> bool {
        if !self.parts_available() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Number of components already taken from the tape.
    pub fn consumed(&self) -> u32 {
        self.index
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}
