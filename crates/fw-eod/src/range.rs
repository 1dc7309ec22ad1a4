//! The defusal range: sessions bound to persisted lockout state.
//!
//! [`Range`] owns the storage, the lockout policy, the seeded RNG, and at
//! most one live [`Session`]. Every session carries an epoch; a timer that
//! was started for an older epoch is ignored once a newer session replaces
//! it or the range resets.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use fw_core::{KeyValueStore, LockStatus, Lockout, PracticeMode, ResetOutcome};

use crate::config::EodConfig;
use crate::error::{EodError, EodResult};
use crate::series::SeriesDefinition;
use crate::session::{ActionOutcome, PlayerAction, Session, SessionStatus, TickOutcome};

/// Storage namespace of the defusal lockout.
pub const NAMESPACE: &str = "eod";

/// What the terminal shows after a (re)start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    /// Ready for a new device.
    Ready,
    /// A detonation is on record; the override code is required.
    Frozen {
        /// Wrong entries still allowed.
        attempts_remaining: u32,
    },
    /// Hard-locked until the countdown runs out.
    Locked {
        /// Whole seconds remaining.
        remaining_secs: i64,
    },
}

impl From<LockStatus> for BootState {
    fn from(status: LockStatus) -> Self {
        match status {
            LockStatus::Clear => Self::Ready,
            LockStatus::SoftLocked { attempts_remaining } => Self::Frozen { attempts_remaining },
            LockStatus::HardLocked { remaining_secs } => Self::Locked { remaining_secs },
        }
    }
}

/// A defusal range backed by a key-value store.
#[derive(Debug)]
pub struct Range<S: KeyValueStore> {
    store: S,
    lockout: Lockout,
    rng: StdRng,
    catalog: Vec<SeriesDefinition>,
    session: Option<Session>,
    epoch: u64,
}

impl<S: KeyValueStore> Range<S> {
    /// Open a range on `store` with the built-in series catalog.
    pub fn new(store: S, config: EodConfig) -> Self {
        Self::with_catalog(store, config, SeriesDefinition::builtin())
    }

    /// Open a range with a custom series catalog.
    pub fn with_catalog(store: S, config: EodConfig, catalog: Vec<SeriesDefinition>) -> Self {
        Self {
            store,
            lockout: Lockout::new(NAMESPACE, config.policy),
            rng: StdRng::seed_from_u64(config.seed),
            catalog,
            session: None,
            epoch: 0,
        }
    }

    /// Rebuild the terminal view from persisted state alone.
    ///
    /// In practice mode every lockout namespace is cleared first.
    pub fn boot(&mut self, now: DateTime<Utc>) -> EodResult<BootState> {
        if PracticeMode::neutralize(&mut self.store)? {
            tracing::info!("practice mode: lockouts cleared at boot");
        }
        let state = BootState::from(self.lockout.status(&mut self.store, now)?);
        tracing::debug!(?state, "range booted");
        Ok(state)
    }

    /// Current lockout status.
    pub fn lock_status(&mut self, now: DateTime<Utc>) -> EodResult<LockStatus> {
        Ok(self.lockout.status(&mut self.store, now)?)
    }

    /// Arm a new device, replacing any previous session. Returns the new
    /// session's epoch.
    pub fn start(
        &mut self,
        series_id: &str,
        skill: u32,
        roll: u32,
        now: DateTime<Utc>,
    ) -> EodResult<u64> {
        let series = SeriesDefinition::find(&self.catalog, series_id)
            .ok_or_else(|| EodError::UnknownSeries(series_id.to_string()))?
            .clone();
        self.lockout.ensure_clear(&mut self.store, now)?;

        let session = Session::start(&series, skill, roll, &mut self.rng)?;
        self.epoch += 1;
        self.session = Some(session);
        Ok(self.epoch)
    }

    /// Apply a one-second tick for the session started at `epoch`.
    pub fn tick(&mut self, epoch: u64, now: DateTime<Utc>) -> EodResult<TickOutcome> {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "ignoring stale tick");
            return Ok(TickOutcome::Ignored);
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(TickOutcome::Ignored);
        };

        let outcome = session.tick();
        if outcome == TickOutcome::Detonated {
            self.lockout.record_failure(&mut self.store, now)?;
        }
        Ok(outcome)
    }

    /// Apply a player action to the live session.
    pub fn act(&mut self, action: PlayerAction, now: DateTime<Utc>) -> EodResult<ActionOutcome> {
        let session = self.session.as_mut().ok_or(EodError::NoSession)?;
        let outcome = session.apply(action)?;
        if outcome == ActionOutcome::Detonated {
            self.lockout.record_failure(&mut self.store, now)?;
        }
        Ok(outcome)
    }

    /// Discard the session.
    ///
    /// Without a lockout this always succeeds. A frozen terminal needs the
    /// override `code`; a hard-locked one refuses until it expires. In
    /// practice mode the code is never asked for.
    pub fn reset(&mut self, code: Option<&str>, now: DateTime<Utc>) -> EodResult<ResetOutcome> {
        if PracticeMode::is_enabled(&self.store) {
            PracticeMode::neutralize(&mut self.store)?;
            self.discard();
            return Ok(ResetOutcome::Cleared);
        }

        let outcome = self.lockout.reset(&mut self.store, code, now)?;
        match outcome {
            ResetOutcome::Cleared | ResetOutcome::Escalated { .. } => self.discard(),
            ResetOutcome::Denied { .. } => {}
        }
        Ok(outcome)
    }

    fn discard(&mut self) {
        if self.session.take().is_some() {
            self.epoch += 1;
        }
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Status of the live session, if any.
    pub fn session_status(&self) -> Option<SessionStatus> {
        self.session.as_ref().map(Session::status)
    }

    /// The epoch of the current session. Ticks for any other epoch are
    /// ignored.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The series catalog.
    pub fn catalog(&self) -> &[SeriesDefinition] {
        &self.catalog
    }

    /// The lockout in use.
    pub fn lockout(&self) -> &Lockout {
        &self.lockout
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the backing store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use fw_core::{CoreError, LockoutKeys, MemoryStore};

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    fn range() -> Range<MemoryStore> {
        Range::new(MemoryStore::new(), EodConfig::default())
    }

    /// Start a fumbled Scorpion and blow it up with an empty keypad submit.
    fn detonate(range: &mut Range<MemoryStore>, now: DateTime<Utc>) {
        range.start("M4-S", 50, 99, now).unwrap();
        let outcome = range.act(PlayerAction::KeypadSubmit, now).unwrap();
        assert_eq!(outcome, ActionOutcome::Detonated);
    }

    #[test]
    fn fresh_range_is_ready() {
        let mut r = range();
        assert_eq!(r.boot(t0()).unwrap(), BootState::Ready);
        assert!(r.session().is_none());
    }

    #[test]
    fn unknown_series_rejected() {
        let mut r = range();
        assert!(matches!(
            r.start("X9", 50, 30, t0()),
            Err(EodError::UnknownSeries(id)) if id == "X9"
        ));
        assert_eq!(r.epoch(), 0);
    }

    #[test]
    fn invalid_roll_mutates_nothing() {
        let mut r = range();
        assert!(r.start("M1-T", 50, 101, t0()).is_err());
        assert!(r.session().is_none());
        assert_eq!(r.epoch(), 0);
    }

    #[test]
    fn act_without_session() {
        let mut r = range();
        assert!(matches!(
            r.act(PlayerAction::KeypadClear, t0()),
            Err(EodError::NoSession)
        ));
    }

    #[test]
    fn detonation_writes_single_soft_lock() {
        let mut r = range();
        detonate(&mut r, t0());
        let keys = LockoutKeys::for_namespace(NAMESPACE);
        let stamp = r.store().get(&keys.soft).unwrap();
        assert_eq!(stamp, t0().timestamp_millis().to_string());

        // Later no-op actions on the dead session don't rewrite the marker.
        r.act(PlayerAction::KeypadSubmit, at(5)).unwrap();
        r.tick(r.epoch(), at(6)).unwrap();
        assert_eq!(r.store().get(&keys.soft).unwrap(), stamp);
        assert!(r.store().get(&keys.hard).is_none());
    }

    #[test]
    fn soft_lock_survives_restart() {
        let mut r = range();
        detonate(&mut r, t0());
        let store = r.into_store();

        let mut reborn = Range::new(store, EodConfig::default());
        assert_eq!(
            reborn.boot(at(60)).unwrap(),
            BootState::Frozen {
                attempts_remaining: 2
            }
        );
        assert!(matches!(
            reborn.start("M1-T", 50, 30, at(60)),
            Err(EodError::Core(CoreError::SoftLocked))
        ));
    }

    #[test]
    fn reset_without_lock_clears_immediately() {
        let mut r = range();
        let epoch = r.start("M1-T", 50, 30, t0()).unwrap();
        assert_eq!(r.reset(None, t0()).unwrap(), ResetOutcome::Cleared);
        assert!(r.session().is_none());
        assert_eq!(r.tick(epoch, at(1)).unwrap(), TickOutcome::Ignored);
    }

    #[test]
    fn reset_when_frozen_needs_code() {
        let mut r = range();
        detonate(&mut r, t0());
        assert!(matches!(
            r.reset(None, t0()),
            Err(EodError::Core(CoreError::OverrideRequired {
                attempts_remaining: 2
            }))
        ));
        assert!(r.session().is_some());
    }

    #[test]
    fn correct_code_first_try_clears_everything() {
        let mut r = range();
        detonate(&mut r, t0());
        assert_eq!(r.reset(Some("1711"), at(10)).unwrap(), ResetOutcome::Cleared);
        for key in LockoutKeys::for_namespace(NAMESPACE).all() {
            assert!(r.store().get(key).is_none());
        }
        assert!(r.start("M1-T", 50, 30, at(11)).is_ok());
    }

    #[test]
    fn two_wrong_codes_hard_lock_for_five_minutes() {
        let mut r = range();
        detonate(&mut r, t0());
        assert_eq!(
            r.reset(Some("0000"), at(1)).unwrap(),
            ResetOutcome::Denied {
                attempts_remaining: 1
            }
        );
        assert_eq!(
            r.reset(Some("9999"), at(2)).unwrap(),
            ResetOutcome::Escalated {
                remaining_secs: 300
            }
        );

        assert!(matches!(
            r.start("M1-T", 50, 30, at(3)),
            Err(EodError::Core(CoreError::HardLocked { remaining_secs: 299 }))
        ));
        assert!(matches!(
            r.start("M1-T", 50, 30, at(301)),
            Err(EodError::Core(CoreError::HardLocked { remaining_secs: 1 }))
        ));
        assert!(matches!(
            r.reset(Some("1711"), at(200)),
            Err(EodError::Core(CoreError::HardLocked { .. }))
        ));

        assert!(r.start("M1-T", 50, 30, at(302)).is_ok());
        let keys = LockoutKeys::for_namespace(NAMESPACE);
        assert!(r.store().get(&keys.attempts).is_none());
    }

    #[test]
    fn boot_reports_hard_lock_remaining() {
        let mut r = range();
        detonate(&mut r, t0());
        r.reset(Some("1"), t0()).unwrap();
        r.reset(Some("2"), t0()).unwrap();
        assert_eq!(
            r.boot(at(100)).unwrap(),
            BootState::Locked {
                remaining_secs: 200
            }
        );
        assert_eq!(r.boot(at(300)).unwrap(), BootState::Ready);
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut r = range();
        let first = r.start("M1-T", 50, 30, t0()).unwrap();
        let second = r.start("M1-T", 50, 30, t0()).unwrap();
        assert_ne!(first, second);
        assert_eq!(r.tick(first, at(1)).unwrap(), TickOutcome::Ignored);
        assert_eq!(r.session().unwrap().time_remaining(), 300);
        assert_eq!(r.tick(second, at(1)).unwrap(), TickOutcome::Running(299));
    }

    #[test]
    fn timer_expiry_records_soft_lock() {
        let mut r = range();
        let epoch = r.start("M1-T", 50, 30, t0()).unwrap();
        let mut last = TickOutcome::Ignored;
        for s in 1..=300 {
            last = r.tick(epoch, at(s)).unwrap();
        }
        assert_eq!(last, TickOutcome::Detonated);
        assert_eq!(r.session_status(), Some(SessionStatus::Detonated));
        let keys = LockoutKeys::for_namespace(NAMESPACE);
        assert_eq!(
            r.store().get(&keys.soft).unwrap(),
            at(300).timestamp_millis().to_string()
        );
    }

    #[test]
    fn practice_mode_clears_at_boot_and_skips_code() {
        let mut r = range();
        detonate(&mut r, t0());
        let mut store = r.into_store();
        PracticeMode::set(&mut store, true).unwrap();

        let mut r = Range::new(store, EodConfig::default());
        assert_eq!(r.boot(at(1)).unwrap(), BootState::Ready);

        detonate(&mut r, at(2));
        assert_eq!(r.reset(None, at(3)).unwrap(), ResetOutcome::Cleared);
        assert!(r.lock_status(at(3)).unwrap().is_clear());
    }

    #[test]
    fn same_seed_same_device() {
        let mut a = range();
        let mut b = range();
        a.start("M7-B", 50, 30, t0()).unwrap();
        b.start("M7-B", 50, 30, t0()).unwrap();
        let (a, b) = (a.session().unwrap(), b.session().unwrap());
        assert_eq!(a.serial(), b.serial());
        assert_eq!(a.module_kinds(), b.module_kinds());
    }
}
