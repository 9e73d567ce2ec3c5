//! Error types for the frequency-table subsystem.
//!
//! Missing catalog keys and unresolved multiplexes are not errors here;
//! they surface as `Option` (see the module docs on `catalog` and
//! `resolver`). Only malformed caller input is reported through this type.

use thiserror::Error;

/// Errors raised when parsing standard or modulation tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The broadcast standard token is not recognized.
    #[error("Unknown broadcast standard: {0}")]
    UnknownStandard(String),

    /// The modulation token is not recognized.
    #[error("Unknown modulation: {0}")]
    UnknownModulation(String),
}
