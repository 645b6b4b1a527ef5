//! Drives a list of parts through a session.

use crate::config::load_toml;
use crate::error::{ConfigError, MachineError};
use crate::machine::Session;
use crate::model::Part;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// The parts of one board, in placement order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, rename = "part")]
    pub parts: Vec<Part>,
}

impl Job {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_toml(path.as_ref())
    }
}

/// Outcome of a pick-and-place run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobSummary {
    pub placed: usize,
    /// Parts skipped, with the reason.
    pub skipped: Vec<(String, MachineError)>,
}

/// Picks and places every part, advancing each tape after use.
///
/// Parts whose tape is missing or exhausted are skipped; the run continues.
pub fn run_pick_and_place(session: &mut Session, parts: &[Part]) -> JobSummary {
    let mut summary = JobSummary::default();
    for part in parts {
        let placed = session
            .pick_part(part)
            .and_then(|()| session.place_part(part));
        match placed {
            Ok(()) => {
                if let Some(tape) = session.tape_mut(&part.component_key()) {
                    tape.advance();
                }
                summary.placed += 1;
            }
            Err(err) => summary.skipped.push((part.component_name.clone(), err)),
        }
    }
    info!(
        placed = summary.placed,
        skipped = summary.skipped.len(),
        "pick and place done"
    );
    summary
}

/// Dispenses paste on every pad of every part.
pub fn run_dispense(session: &mut Session, parts: &[Part]) -> usize {
    let mut dots = 0;
    for part in parts {
        session.dispense_part(part);
        dots += part.pads.len();
    }
    info!(dots, "dispensing done");
    dots
}
