//! Percentile skill checks.
//!
//! Every minigame opens with the player rolling d100 against a skill rating.
//! The result is classified into one of four tiers, checked in this order:
//! a roll of 96 or more is always a fumble, a roll above the skill is a
//! failure, a roll of 5 or less is a critical, anything else is a plain
//! success.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Rolls of this value or higher always fumble.
pub const FUMBLE_THRESHOLD: u32 = 96;

/// Rolls of this value or lower are criticals (unless they already failed).
pub const CRITICAL_THRESHOLD: u32 = 5;

/// How well the opening skill check went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckTier {
    /// Roll of 96 or more.
    Fumble,
    /// Roll above the skill rating.
    Failure,
    /// Roll of 5 or less within the skill rating.
    Critical,
    /// Any other roll within the skill rating.
    Success,
}

impl CheckTier {
    /// Whether the tier counts against the player.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Fumble | Self::Failure)
    }
}

impl std::fmt::Display for CheckTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fumble => write!(f, "FUMBLE"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Critical => write!(f, "CRITICAL"),
            Self::Success => write!(f, "SUCCESS"),
        }
    }
}

/// A resolved skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    /// The skill rating rolled against.
    pub skill: u32,
    /// The d100 roll (1-100).
    pub roll: u32,
    /// The resulting tier.
    pub tier: CheckTier,
}

impl SkillCheck {
    /// Classify `roll` against `skill`.
    pub fn resolve(skill: u32, roll: u32) -> CoreResult<Self> {
        if !(1..=100).contains(&roll) {
            return Err(CoreError::InvalidRoll(roll));
        }

        let tier = if roll >= FUMBLE_THRESHOLD {
            CheckTier::Fumble
        } else if roll > skill {
            CheckTier::Failure
        } else if roll <= CRITICAL_THRESHOLD {
            CheckTier::Critical
        } else {
            CheckTier::Success
        };

        Ok(Self { skill, roll, tier })
    }
}

/// Roll a d100 (1-100) for players who don't bring their own dice.
pub fn roll_d100(rng: &mut StdRng) -> u32 {
    rng.random_range(1..=100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tier(skill: u32, roll: u32) -> CheckTier {
        SkillCheck::resolve(skill, roll).unwrap().tier
    }

    #[test]
    fn fumble_beats_everything() {
        assert_eq!(tier(50, 96), CheckTier::Fumble);
        assert_eq!(tier(100, 100), CheckTier::Fumble);
        assert_eq!(tier(99, 97), CheckTier::Fumble);
    }

    #[test]
    fn failure_above_skill() {
        assert_eq!(tier(50, 70), CheckTier::Failure);
        assert_eq!(tier(50, 51), CheckTier::Failure);
        assert_eq!(tier(50, 95), CheckTier::Failure);
    }

    #[test]
    fn critical_at_or_below_five() {
        assert_eq!(tier(50, 3), CheckTier::Critical);
        assert_eq!(tier(50, 5), CheckTier::Critical);
        assert_eq!(tier(50, 1), CheckTier::Critical);
    }

    #[test]
    fn low_roll_over_tiny_skill_is_failure() {
        // The failure branch is evaluated before the critical branch.
        assert_eq!(tier(2, 4), CheckTier::Failure);
    }

    #[test]
    fn plain_success() {
        assert_eq!(tier(50, 30), CheckTier::Success);
        assert_eq!(tier(50, 50), CheckTier::Success);
        assert_eq!(tier(50, 6), CheckTier::Success);
    }

    #[test]
    fn out_of_range_rolls_rejected() {
        assert!(matches!(
            SkillCheck::resolve(50, 0),
            Err(CoreError::InvalidRoll(0))
        ));
        assert!(matches!(
            SkillCheck::resolve(50, 101),
            Err(CoreError::InvalidRoll(101))
        ));
    }

    #[test]
    fn failure_tiers() {
        assert!(CheckTier::Fumble.is_failure());
        assert!(CheckTier::Failure.is_failure());
        assert!(!CheckTier::Critical.is_failure());
        assert!(!CheckTier::Success.is_failure());
    }

    #[test]
    fn d100_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let r = roll_d100(&mut rng);
            assert!((1..=100).contains(&r));
        }
    }

    #[test]
    fn tier_display() {
        assert_eq!(CheckTier::Fumble.to_string(), "FUMBLE");
        assert_eq!(CheckTier::Critical.to_string(), "CRITICAL");
    }
}
