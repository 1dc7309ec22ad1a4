//! One intrusion attempt.
//!
//! The runner captures nodes outward from the start while a trace climbs
//! toward 100 percent. Capturing the end node breaches the network; letting
//! the trace finish gets the runner traced. Under active ICE each tick may
//! sever part of the captured path.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use fw_core::{CheckTier, SkillCheck};

use crate::difficulty::Difficulty;
use crate::error::IntrusionResult;
use crate::grid::{Grid, NodeKind};

/// Trace percentage at which the runner is traced.
pub const TRACE_LIMIT: f64 = 100.0;

/// Trace percentage added by capturing a firewall.
pub const FIREWALL_PENALTY: f64 = 5.0;

/// Chance per tick that active ICE severs the path.
pub const ICE_CHANCE: f64 = 0.05;

/// Milliseconds between trace ticks.
pub const TICK_MILLIS: u64 = 100;

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// The trace is running.
    InProgress,
    /// The end node was captured.
    Breached,
    /// The trace completed.
    Traced,
}

impl RunStatus {
    /// Whether the run has ended.
    pub fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN PROGRESS"),
            Self::Breached => write!(f, "SUCCESS"),
            Self::Traced => write!(f, "TRACED"),
        }
    }
}

/// The result of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not capturable: run over, out of bounds, already captured, or not
    /// adjacent to the path.
    Ignored,
    /// Node added to the path. `firewall` marks a trace penalty.
    Captured {
        /// Whether the node was a firewall.
        firewall: bool,
    },
    /// The end node was captured.
    Breached,
}

/// The result of a trace tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    /// The run is over (or the tick was stale).
    Ignored,
    /// The trace advanced.
    Tracing {
        /// Trace progress after the tick.
        progress: f64,
        /// Nodes ICE cut from the path this tick.
        severed: Vec<(usize, usize)>,
    },
    /// The trace completed.
    Traced,
}

/// An intrusion run.
#[derive(Debug, Clone)]
pub struct Intrusion {
    difficulty: Difficulty,
    check: SkillCheck,
    grid: Grid,
    trace_progress: f64,
    trace_speed: f64,
    ice_active: bool,
    status: RunStatus,
}

impl Intrusion {
    /// Roll the skill check and lay out the grid.
    pub fn start(
        difficulty: Difficulty,
        skill: u32,
        roll: u32,
        rng: &mut StdRng,
    ) -> IntrusionResult<Self> {
        let check = SkillCheck::resolve(skill, roll)?;
        let base = difficulty.base_trace_speed();
        let (trace_speed, ice_active) = match check.tier {
            CheckTier::Fumble => (base * 1.5, true),
            CheckTier::Failure => (base * 1.25, false),
            CheckTier::Critical => (base * 0.5, false),
            CheckTier::Success => (base, false),
        };
        let grid = Grid::generate(difficulty.grid_size(), difficulty.firewall_count(), rng);

        tracing::info!(
            %difficulty,
            tier = %check.tier,
            trace_speed,
            ice_active,
            "intrusion started"
        );

        Ok(Self {
            difficulty,
            check,
            grid,
            trace_progress: 0.0,
            trace_speed,
            ice_active,
            status: RunStatus::InProgress,
        })
    }

    /// The network difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The opening skill check.
    pub fn check(&self) -> &SkillCheck {
        &self.check
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Trace progress in percent.
    pub fn trace_progress(&self) -> f64 {
        self.trace_progress
    }

    /// Trace progress gained per tick.
    pub fn trace_speed(&self) -> f64 {
        self.trace_speed
    }

    /// Whether ICE countermeasures are active.
    pub fn ice_active(&self) -> bool {
        self.ice_active
    }

    /// Current status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The player-facing line describing the skill check's effect.
    pub fn briefing(&self) -> String {
        let roll = self.check.roll;
        match self.check.tier {
            CheckTier::Fumble => format!(
                "FUMBLE ({roll}) - Counter-hack detected! Active ICE countermeasures and accelerated trace."
            ),
            CheckTier::Failure => format!(
                "FAILURE ({roll}) - Unfamiliar network architecture. System trace is faster than anticipated."
            ),
            CheckTier::Critical => format!(
                "CRITICAL ({roll}) - Found a backdoor exploit. The system trace is significantly slowed."
            ),
            CheckTier::Success => format!(
                "SUCCESS ({roll}) - Standard intrusion. Operating within expected parameters."
            ),
        }
    }

    /// Capture the node at (`x`, `y`).
    pub fn capture(&mut self, x: usize, y: usize) -> CaptureOutcome {
        if self.status.is_over() {
            return CaptureOutcome::Ignored;
        }
        let Some(node) = self.grid.capture(x, y) else {
            return CaptureOutcome::Ignored;
        };

        match node.kind {
            NodeKind::End => {
                self.status = RunStatus::Breached;
                tracing::info!(trace = self.trace_progress, "network breached");
                CaptureOutcome::Breached
            }
            NodeKind::Firewall => {
                self.trace_progress = (self.trace_progress + FIREWALL_PENALTY).min(TRACE_LIMIT);
                tracing::debug!(x, y, trace = self.trace_progress, "firewall tripped");
                CaptureOutcome::Captured { firewall: true }
            }
            NodeKind::Start | NodeKind::Normal => CaptureOutcome::Captured { firewall: false },
        }
    }

    /// Advance the trace by one tick.
    pub fn tick(&mut self, rng: &mut StdRng) -> TraceOutcome {
        if self.status.is_over() {
            return TraceOutcome::Ignored;
        }

        self.trace_progress += self.trace_speed;

        let mut severed = Vec::new();
        if self.ice_active && rng.random_bool(ICE_CHANCE) {
            severed = self.trigger_ice(rng);
        }

        if self.trace_progress >= TRACE_LIMIT {
            self.status = RunStatus::Traced;
            tracing::info!("runner traced");
            return TraceOutcome::Traced;
        }
        TraceOutcome::Tracing {
            progress: self.trace_progress,
            severed,
        }
    }

    fn trigger_ice(&mut self, rng: &mut StdRng) -> Vec<(usize, usize)> {
        let len = self.grid.path().len();
        if len <= 1 {
            return Vec::new();
        }
        let index = rng.random_range(1..len);
        let severed = self.grid.sever(index);
        tracing::debug!(nodes = severed.len(), "ICE severed the path");
        severed
    }
}
