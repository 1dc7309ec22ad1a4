//! Configuration for an intrusion terminal.

use fw_core::LockoutPolicy;

use crate::difficulty::Difficulty;

/// Configuration for a [`crate::Terminal`].
#[derive(Debug, Clone)]
pub struct IntrusionConfig {
    /// RNG seed for grid layout and ICE.
    pub seed: u64,
    /// Difficulty used when a run doesn't name one.
    pub difficulty: Difficulty,
    /// Lockout rules applied after being traced.
    pub policy: LockoutPolicy,
}

impl Default for IntrusionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::Normal,
            policy: LockoutPolicy::default(),
        }
    }
}

impl IntrusionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the default difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the lockout policy.
    pub fn with_policy(mut self, policy: LockoutPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = IntrusionConfig::default();
        assert_eq!(c.seed, 42);
        assert_eq!(c.difficulty, Difficulty::Normal);
        assert_eq!(c.policy, LockoutPolicy::default());
    }

    #[test]
    fn builders() {
        let c = IntrusionConfig::default()
            .with_seed(7)
            .with_difficulty(Difficulty::Hard)
            .with_policy(LockoutPolicy::default().with_max_attempts(3));
        assert_eq!(c.seed, 7);
        assert_eq!(c.difficulty, Difficulty::Hard);
        assert_eq!(c.policy.max_attempts, 3);
    }
}
