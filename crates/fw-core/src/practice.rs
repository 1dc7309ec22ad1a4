//! Practice mode.
//!
//! A persisted flag that neutralizes lockouts: every known lockout namespace
//! is wiped when a minigame boots, and resets skip the override code.

use crate::error::CoreResult;
use crate::lockout::LockoutKeys;
use crate::storage::KeyValueStore;

/// Storage key of the practice flag.
pub const PRACTICE_KEY: &str = "fw_practice_mode";

/// Lockout namespaces cleared by practice mode.
pub const LOCKOUT_NAMESPACES: &[&str] = &["eod", "net"];

/// Accessors for the persisted practice flag.
pub struct PracticeMode;

impl PracticeMode {
    /// Whether practice mode is on.
    pub fn is_enabled(store: &dyn KeyValueStore) -> bool {
        store.get(PRACTICE_KEY).as_deref() == Some("true")
    }

    /// Turn practice mode on or off.
    pub fn set(store: &mut dyn KeyValueStore, enabled: bool) -> CoreResult<()> {
        if enabled {
            store.set(PRACTICE_KEY, "true".to_string())
        } else {
            store.remove(PRACTICE_KEY)
        }
    }

    /// Wipe every lockout key if practice mode is on. Returns whether it did.
    pub fn neutralize(store: &mut dyn KeyValueStore) -> CoreResult<bool> {
        if !Self::is_enabled(store) {
            return Ok(false);
        }
        for namespace in LOCKOUT_NAMESPACES {
            for key in LockoutKeys::for_namespace(namespace).all() {
                store.remove(key)?;
            }
        }
        tracing::debug!("practice mode: lockouts neutralized");
        Ok(true)
    }
}
