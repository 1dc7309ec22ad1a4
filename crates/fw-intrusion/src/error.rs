//! Error types for the intrusion minigame.

use fw_core::CoreError;

/// Errors that can occur while starting or playing an intrusion run.
///
/// Illegal captures are not errors; they come back as
/// [`crate::CaptureOutcome::Ignored`].
#[derive(Debug, thiserror::Error)]
pub enum IntrusionError {
    /// No difficulty with this name.
    #[error("unknown difficulty: {0} (expected easy, normal, or hard)")]
    UnknownDifficulty(String),

    /// No run is in progress.
    #[error("no active intrusion")]
    NoRun,

    /// Skill check, storage, or lockout failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for intrusion operations.
pub type IntrusionResult<T> = Result<T, IntrusionError>;
