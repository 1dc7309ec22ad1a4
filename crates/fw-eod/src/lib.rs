//! Bomb-defusal minigame engine for Feuerwerker.
//!
//! A device series defines the timer, strike allowance, and module pool.
//! Starting a [`Session`] rolls the opening skill check, stamps a serial
//! number, and generates each module from the rule catalog together with its
//! manual. Player actions and one-second ticks drive the session from
//! `Armed` to `Disarmed` or `Detonated`. [`Range`] ties sessions to the
//! persisted lockout so a detonation survives a restart.

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod manual;
pub mod module;
pub mod range;
pub mod series;
pub mod session;

pub use catalog::RuleContext;
pub use config::EodConfig;
pub use error::{EodError, EodResult};
pub use fw_core::ResetOutcome;
pub use manual::{Manual, ManualSection};
pub use module::{
    ButtonAction, ButtonColor, ButtonLabel, ButtonModule, KeypadModule, Module, ModuleKind,
    WireColor, WiresModule,
};
pub use range::{BootState, Range};
pub use series::{DifficultyTier, SeriesDefinition};
pub use session::{
    ActionOutcome, DetonationCause, PlayerAction, Session, SessionStatus, TickOutcome,
};
