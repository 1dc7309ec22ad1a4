//! Error types for the defusal engine.

use fw_core::CoreError;

use crate::module::ModuleKind;

/// Errors that can occur while starting or playing a defusal session.
///
/// Wrong wires, codes, and button timing are not errors; they come back as
/// strikes in [`crate::ActionOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum EodError {
    /// No series with this id exists in the catalog.
    #[error("unknown device series: {0}")]
    UnknownSeries(String),

    /// The action targets a module the device doesn't carry.
    #[error("device has no {0} module")]
    ModuleNotPresent(ModuleKind),

    /// The wire index is out of range.
    #[error("no wire at position {index} (device has {count})")]
    InvalidWire {
        /// The requested 0-based wire index.
        index: usize,
        /// Number of wires on the device.
        count: usize,
    },

    /// The keypad only accepts decimal digits.
    #[error("invalid keypad key: '{0}'")]
    InvalidKey(char),

    /// No session is running.
    #[error("no active session")]
    NoSession,

    /// Skill check, storage, or lockout failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for defusal operations.
pub type EodResult<T> = Result<T, EodError>;
