//! Error types shared by every Feuerwerker crate.

/// Errors raised by skill checks, storage, and lockout gating.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A percentile roll outside 1..=100.
    #[error("invalid d100 roll: {0} (expected 1-100)")]
    InvalidRoll(u32),

    /// The terminal is hard-locked after repeated override failures.
    #[error("terminal locked, {remaining_secs}s remaining")]
    HardLocked {
        /// Whole seconds until the lock expires (rounded up).
        remaining_secs: i64,
    },

    /// A prior failure left a soft-lock marker; an override code is required.
    #[error("simulation frozen after a critical failure, override code required")]
    SoftLocked,

    /// Reset was attempted without supplying the override code.
    #[error("override code required ({attempts_remaining} attempt(s) remaining)")]
    OverrideRequired {
        /// Wrong entries still allowed before the hard lock engages.
        attempts_remaining: u32,
    },

    /// Reading or writing the backing store failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store held malformed JSON.
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
