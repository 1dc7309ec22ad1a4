//! Network difficulty presets.

use serde::{Deserialize, Serialize};

use crate::error::{IntrusionError, IntrusionResult};

/// How hard the target network is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 5x5 grid, slow trace, few firewalls.
    Easy,
    /// 8x8 grid.
    #[default]
    Normal,
    /// 12x12 grid, fast trace, dense firewalls.
    Hard,
}

impl Difficulty {
    /// Every preset.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Parse a difficulty name (case-insensitive).
    pub fn parse(s: &str) -> IntrusionResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(IntrusionError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Side length of the square grid.
    pub fn grid_size(self) -> usize {
        match self {
            Self::Easy => 5,
            Self::Normal => 8,
            Self::Hard => 12,
        }
    }

    /// Trace progress (percent) gained per tick before the skill check.
    pub fn base_trace_speed(self) -> f64 {
        match self {
            Self::Easy => 0.2,
            Self::Normal => 0.3,
            Self::Hard => 0.4,
        }
    }

    /// Share of the grid turned into firewalls, in percent.
    pub fn firewall_percent(self) -> usize {
        match self {
            Self::Easy => 10,
            Self::Normal => 20,
            Self::Hard => 25,
        }
    }

    /// Number of firewalls on a grid of this difficulty.
    pub fn firewall_count(self) -> usize {
        let n = self.grid_size();
        n * n * self.firewall_percent() / 100
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Normal => write!(f, "normal"),
            Self::Hard => write!(f, "hard"),
        }
    }
}
