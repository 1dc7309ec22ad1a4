//! Configuration for a defusal range.

use fw_core::LockoutPolicy;

/// Configuration for a [`crate::Range`].
#[derive(Debug, Clone)]
pub struct EodConfig {
    /// RNG seed for reproducible device generation.
    pub seed: u64,
    /// Lockout rules applied after a detonation.
    pub policy: LockoutPolicy,
}

impl Default for EodConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            policy: LockoutPolicy::default(),
        }
    }
}

impl EodConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the lockout policy.
    pub fn with_policy(mut self, policy: LockoutPolicy) -> Self {
        self.policy = policy;
        self
    }
}
