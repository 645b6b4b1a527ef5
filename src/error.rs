//! Error types for configuration loading and machine sessions.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a configuration, calibration or job file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors reported by a machine session.
///
/// Only [`MachineError::ConfigurationMissing`] is fatal. The per-part variants
/// mean the part was skipped and the session can carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    #[error("need configuration")]
    ConfigurationMissing,

    #[error("no tape configured for {component}")]
    NoTape { component: String },

    #[error("we are out of components for {component}")]
    TapeExhausted { component: String },
}

pub type Result<T, E = MachineError> = std::result::Result<T, E>;
