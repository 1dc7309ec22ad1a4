//! Shared building blocks for the Feuerwerker minigames.
//!
//! Provides the d100 skill check every minigame opens with, an injectable
//! key/value storage capability so lockouts survive restarts, and the
//! soft/hard lockout policy that gates a fresh attempt after a failure.

pub mod check;
pub mod error;
pub mod lockout;
pub mod practice;
pub mod storage;

pub use check::{CheckTier, SkillCheck, roll_d100};
pub use error::{CoreError, CoreResult};
pub use lockout::{
    LockStatus, Lockout, LockoutKeys, LockoutPolicy, LockoutRecord, OverrideOutcome, ResetOutcome,
};
pub use practice::PracticeMode;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
