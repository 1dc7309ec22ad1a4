//! Soft and hard lockouts after a failed attempt.
//!
//! A failure (detonation, trace) writes a *soft lock* marker. While it is
//! present the terminal stays frozen and only an override code can clear it.
//! Each wrong code counts against the attempt budget; exhausting it replaces
//! the soft lock with a *hard lock* that refuses everything until it expires.
//! Expiry wipes the whole record.
//!
//! [`LockoutPolicy`] holds the rules and evaluates them over a
//! [`LockoutRecord`] and an explicit `now`. [`Lockout`] binds a policy to a
//! set of storage keys so records survive restarts.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::storage::KeyValueStore;

/// Lockout rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutPolicy {
    /// The code that clears a soft lock.
    pub override_code: String,
    /// Wrong entries that escalate a soft lock to a hard lock.
    pub max_attempts: u32,
    /// How long a hard lock lasts, in seconds.
    pub hard_lock_secs: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            override_code: "1711".to_string(),
            max_attempts: 2,
            hard_lock_secs: 300,
        }
    }
}

impl LockoutPolicy {
    /// Set the override code.
    pub fn with_override_code(mut self, code: impl Into<String>) -> Self {
        self.override_code = code.into();
        self
    }

    /// Set the attempt budget (at least 1).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the hard lock duration in seconds.
    pub fn with_hard_lock_secs(mut self, secs: i64) -> Self {
        self.hard_lock_secs = secs.max(0);
        self
    }

    fn hard_lock_duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.hard_lock_secs)
    }

    /// Evaluate the record at `now`. An expired hard lock clears the record.
    pub fn status(&self, record: &mut LockoutRecord, now: DateTime<Utc>) -> LockStatus {
        if let Some(locked_at) = record.hard_lock {
            let elapsed = now.signed_duration_since(locked_at);
            if elapsed < self.hard_lock_duration() {
                return LockStatus::HardLocked {
                    remaining_secs: ceil_secs(self.hard_lock_duration() - elapsed),
                };
            }
            tracing::info!("hard lock expired, clearing lockout record");
            *record = LockoutRecord::default();
        }

        if record.soft_lock.is_some() {
            LockStatus::SoftLocked {
                attempts_remaining: self.max_attempts.saturating_sub(record.failed_attempts),
            }
        } else {
            LockStatus::Clear
        }
    }

    /// Write the soft lock marker for a failure at `now`.
    pub fn record_failure(&self, record: &mut LockoutRecord, now: DateTime<Utc>) {
        record.soft_lock = Some(now);
    }

    /// Check an override code against the record.
    pub fn attempt_override(
        &self,
        record: &mut LockoutRecord,
        code: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<OverrideOutcome> {
        match self.status(record, now) {
            LockStatus::Clear => Ok(OverrideOutcome::NotRequired),
            LockStatus::HardLocked { remaining_secs } => {
                Err(CoreError::HardLocked { remaining_secs })
            }
            LockStatus::SoftLocked { .. } => {
                if code.trim() == self.override_code {
                    *record = LockoutRecord::default();
                    return Ok(OverrideOutcome::Granted);
                }

                record.failed_attempts += 1;
                if record.failed_attempts >= self.max_attempts {
                    tracing::warn!(
                        attempts = record.failed_attempts,
                        "override attempts exhausted, escalating to hard lock"
                    );
                    record.hard_lock = Some(now);
                    record.soft_lock = None;
                    Ok(OverrideOutcome::Escalated {
                        remaining_secs: self.hard_lock_secs,
                    })
                } else {
                    let attempts_remaining = self.max_attempts - record.failed_attempts;
                    tracing::warn!(attempts_remaining, "override code rejected");
                    Ok(OverrideOutcome::Denied { attempts_remaining })
                }
            }
        }
    }
}

/// Round a positive duration up to whole seconds.
fn ceil_secs(delta: TimeDelta) -> i64 {
    let ms = delta.num_milliseconds();
    (ms + 999).div_euclid(1000)
}

/// The persisted lockout state of one minigame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// Wrong override codes entered since the last clear.
    pub failed_attempts: u32,
    /// When the last failure froze the terminal.
    pub soft_lock: Option<DateTime<Utc>>,
    /// When the hard lock engaged.
    pub hard_lock: Option<DateTime<Utc>>,
}

impl LockoutRecord {
    /// Whether nothing is recorded.
    pub fn is_clear(&self) -> bool {
        self == &Self::default()
    }

    /// Load from the store. Malformed values are logged and treated as absent.
    pub fn load(store: &dyn KeyValueStore, keys: &LockoutKeys) -> Self {
        let failed_attempts = match store.get(&keys.attempts) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    key = %keys.attempts,
                    value = %raw,
                    "ignoring malformed attempt count"
                );
                0
            }),
            None => 0,
        };

        Self {
            failed_attempts,
            soft_lock: load_timestamp(store, &keys.soft),
            hard_lock: load_timestamp(store, &keys.hard),
        }
    }

    /// Save to the store, removing keys for absent fields.
    pub fn save(&self, store: &mut dyn KeyValueStore, keys: &LockoutKeys) -> CoreResult<()> {
        if self.failed_attempts > 0 {
            store.set(&keys.attempts, self.failed_attempts.to_string())?;
        } else {
            store.remove(&keys.attempts)?;
        }
        save_timestamp(store, &keys.soft, self.soft_lock)?;
        save_timestamp(store, &keys.hard, self.hard_lock)
    }
}

fn load_timestamp(store: &dyn KeyValueStore, key: &str) -> Option<DateTime<Utc>> {
    let raw = store.get(key)?;
    let parsed = raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis);
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "ignoring malformed timestamp");
    }
    parsed
}

fn save_timestamp(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: Option<DateTime<Utc>>,
) -> CoreResult<()> {
    match value {
        Some(ts) => store.set(key, ts.timestamp_millis().to_string()),
        None => store.remove(key),
    }
}

/// Storage keys for one minigame's lockout record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutKeys {
    /// Soft lock timestamp key.
    pub soft: String,
    /// Hard lock timestamp key.
    pub hard: String,
    /// Failed attempt counter key.
    pub attempts: String,
}

impl LockoutKeys {
    /// Keys namespaced for one minigame, e.g. `fw_eod_detonated_timestamp`.
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            soft: format!("fw_{namespace}_detonated_timestamp"),
            hard: format!("fw_{namespace}_hard_lock_timestamp"),
            attempts: format!("fw_{namespace}_lock_tries"),
        }
    }

    /// All three keys.
    pub fn all(&self) -> [&str; 3] {
        [&self.soft, &self.hard, &self.attempts]
    }
}

/// Where a lockout currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Nothing recorded; a fresh attempt may start.
    Clear,
    /// Frozen after a failure until the override code is entered.
    SoftLocked {
        /// Wrong entries still allowed.
        attempts_remaining: u32,
    },
    /// Refusing everything until the lock expires.
    HardLocked {
        /// Whole seconds remaining (rounded up).
        remaining_secs: i64,
    },
}

impl LockStatus {
    /// Whether a fresh attempt may start.
    pub fn is_clear(self) -> bool {
        matches!(self, Self::Clear)
    }
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clear => write!(f, "clear"),
            Self::SoftLocked { attempts_remaining } => {
                write!(f, "frozen ({attempts_remaining} override attempt(s) remaining)")
            }
            Self::HardLocked { remaining_secs } => {
                write!(
                    f,
                    "locked ({:02}:{:02} remaining)",
                    remaining_secs / 60,
                    remaining_secs % 60
                )
            }
        }
    }
}

/// The result of entering an override code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOutcome {
    /// No lock was active; nothing to override.
    NotRequired,
    /// Correct code; the record is cleared.
    Granted,
    /// Wrong code; more attempts remain.
    Denied {
        /// Wrong entries still allowed.
        attempts_remaining: u32,
    },
    /// Wrong code and the budget is spent; the hard lock is engaged.
    Escalated {
        /// Duration of the new hard lock in seconds.
        remaining_secs: i64,
    },
}

/// The result of a reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Nothing blocks a fresh attempt.
    Cleared,
    /// Wrong override code.
    Denied {
        /// Wrong entries still allowed.
        attempts_remaining: u32,
    },
    /// Wrong override code; the hard lock is now engaged.
    Escalated {
        /// Lock duration in seconds.
        remaining_secs: i64,
    },
}

/// A [`LockoutPolicy`] bound to the storage keys of one minigame.
#[derive(Debug, Clone)]
pub struct Lockout {
    keys: LockoutKeys,
    policy: LockoutPolicy,
}

impl Lockout {
    /// Bind `policy` to the keys of `namespace`.
    pub fn new(namespace: &str, policy: LockoutPolicy) -> Self {
        Self {
            keys: LockoutKeys::for_namespace(namespace),
            policy,
        }
    }

    /// The storage keys in use.
    pub fn keys(&self) -> &LockoutKeys {
        &self.keys
    }

    /// The policy in use.
    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Load the persisted record without evaluating it.
    pub fn record(&self, store: &dyn KeyValueStore) -> LockoutRecord {
        LockoutRecord::load(store, &self.keys)
    }

    /// Current status. Persists the cleared record if a hard lock expired.
    pub fn status(
        &self,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> CoreResult<LockStatus> {
        let mut record = LockoutRecord::load(store, &self.keys);
        let before = record.clone();
        let status = self.policy.status(&mut record, now);
        if record != before {
            record.save(store, &self.keys)?;
        }
        Ok(status)
    }

    /// Refuse to proceed unless the lockout is clear.
    pub fn ensure_clear(
        &self,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        match self.status(store, now)? {
            LockStatus::Clear => Ok(()),
            LockStatus::SoftLocked { .. } => Err(CoreError::SoftLocked),
            LockStatus::HardLocked { remaining_secs } => {
                Err(CoreError::HardLocked { remaining_secs })
            }
        }
    }

    /// Persist a soft lock marker for a failure at `now`.
    pub fn record_failure(
        &self,
        store: &mut dyn KeyValueStore,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut record = LockoutRecord::load(store, &self.keys);
        self.policy.record_failure(&mut record, now);
        record.save(store, &self.keys)
    }

    /// Check an override code and persist the result.
    pub fn attempt_override(
        &self,
        store: &mut dyn KeyValueStore,
        code: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<OverrideOutcome> {
        let mut record = LockoutRecord::load(store, &self.keys);
        let before = record.clone();
        let outcome = self.policy.attempt_override(&mut record, code, now);
        if record != before {
            record.save(store, &self.keys)?;
        }
        outcome
    }

    /// Gate a reset. A clear lockout needs nothing, a soft lock needs the
    /// override `code`, and a hard lock refuses until it expires.
    pub fn reset(
        &self,
        store: &mut dyn KeyValueStore,
        code: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<ResetOutcome> {
        let attempts_remaining = match self.status(store, now)? {
            LockStatus::Clear => return Ok(ResetOutcome::Cleared),
            LockStatus::HardLocked { remaining_secs } => {
                return Err(CoreError::HardLocked { remaining_secs });
            }
            LockStatus::SoftLocked { attempts_remaining } => attempts_remaining,
        };
        let Some(code) = code else {
            return Err(CoreError::OverrideRequired { attempts_remaining });
        };

        match self.attempt_override(store, code, now)? {
            OverrideOutcome::NotRequired | OverrideOutcome::Granted => {
                tracing::info!(key = %self.keys.soft, "override accepted");
                Ok(ResetOutcome::Cleared)
            }
            OverrideOutcome::Denied { attempts_remaining } => {
                Ok(ResetOutcome::Denied { attempts_remaining })
            }
            OverrideOutcome::Escalated { remaining_secs } => {
                Ok(ResetOutcome::Escalated { remaining_secs })
            }
        }
    }

    /// Remove every key of this lockout.
    pub fn clear(&self, store: &mut dyn KeyValueStore) -> CoreResult<()> {
        for key in self.keys.all() {
            store.remove(key)?;
        }
        Ok(())
    }
}
