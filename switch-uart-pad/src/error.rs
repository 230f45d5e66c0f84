//! Contains the error type of the library

use std::io;

use thiserror::Error;

use crate::input::Directions;

/// Represents all possible errors in the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open serial device {device}")]
    TransportOpen {
        device: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to sync during {stage} (got {got:?})")]
    SyncFailed { stage: &'static str, got: Option<u8> },

    #[error("Command {command:#018x} was not acknowledged (got {response:?})")]
    Send { command: u64, response: Option<u8> },

    #[error("Serial I/O failed")]
    Io(#[from] io::Error),

    #[error("Unknown key {0:?}")]
    UnknownKey(String),

    #[error("Unknown action {0:?}")]
    UnknownAction(String),

    #[error("Malformed pointer delta {0:?}")]
    BadPointer(String),

    #[error("Impossible stick direction combination {0:?}")]
    InvalidStickCombination(Directions),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
