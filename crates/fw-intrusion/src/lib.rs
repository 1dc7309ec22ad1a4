//! Network intrusion minigame for Feuerwerker.
//!
//! The runner captures a path of nodes across a grid from the start corner
//! to the end corner before a system trace reaches 100 percent. The opening
//! skill check sets the trace speed; a fumble also turns on ICE, which can
//! sever the captured path. Getting traced leaves a lockout on the terminal.

pub mod config;
pub mod difficulty;
pub mod error;
pub mod grid;
pub mod run;
pub mod terminal;

pub use config::IntrusionConfig;
pub use difficulty::Difficulty;
pub use error::{IntrusionError, IntrusionResult};
pub use grid::{Grid, Node, NodeKind};
pub use run::{CaptureOutcome, Intrusion, RunStatus, TICK_MILLIS, TraceOutcome};
pub use terminal::Terminal;
