//! The intrusion terminal: runs bound to persisted lockout state.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use fw_core::{KeyValueStore, LockStatus, Lockout, PracticeMode, ResetOutcome};

use crate::config::IntrusionConfig;
use crate::difficulty::Difficulty;
use crate::error::{IntrusionError, IntrusionResult};
use crate::run::{CaptureOutcome, Intrusion, TraceOutcome};

/// Storage namespace of the intrusion lockout.
pub const NAMESPACE: &str = "net";

/// An intrusion terminal backed by a key-value store.
#[derive(Debug)]
pub struct Terminal<S: KeyValueStore> {
    store: S,
    lockout: Lockout,
    rng: StdRng,
    default_difficulty: Difficulty,
    run: Option<Intrusion>,
    epoch: u64,
}

impl<S: KeyValueStore> Terminal<S> {
    /// Open a terminal on `store`.
    pub fn new(store: S, config: IntrusionConfig) -> Self {
        Self {
            store,
            lockout: Lockout::new(NAMESPACE, config.policy),
            rng: StdRng::seed_from_u64(config.seed),
            default_difficulty: config.difficulty,
            run: None,
            epoch: 0,
        }
    }

    /// Rebuild the terminal view from persisted state alone.
    pub fn boot(&mut self, now: DateTime<Utc>) -> IntrusionResult<LockStatus> {
        if PracticeMode::neutralize(&mut self.store)? {
            tracing::info!("practice mode: lockouts cleared at boot");
        }
        Ok(self.lockout.status(&mut self.store, now)?)
    }

    /// Start a run, replacing any previous one. Returns the run's epoch.
    pub fn start(
        &mut self,
        difficulty: Option<Difficulty>,
        skill: u32,
        roll: u32,
        now: DateTime<Utc>,
    ) -> IntrusionResult<u64> {
        self.lockout.ensure_clear(&mut self.store, now)?;
        let difficulty = difficulty.unwrap_or(self.default_difficulty);
        let run = Intrusion::start(difficulty, skill, roll, &mut self.rng)?;
        self.epoch += 1;
        self.run = Some(run);
        Ok(self.epoch)
    }

    /// Apply one trace tick for the run started at `epoch`.
    pub fn tick(&mut self, epoch: u64, now: DateTime<Utc>) -> IntrusionResult<TraceOutcome> {
        if epoch != self.epoch {
            return Ok(TraceOutcome::Ignored);
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(TraceOutcome::Ignored);
        };

        let outcome = run.tick(&mut self.rng);
        if outcome == TraceOutcome::Traced {
            self.lockout.record_failure(&mut self.store, now)?;
        }
        Ok(outcome)
    }

    /// Capture a node in the live run.
    pub fn capture(&mut self, x: usize, y: usize) -> IntrusionResult<CaptureOutcome> {
        let run = self.run.as_mut().ok_or(IntrusionError::NoRun)?;
        Ok(run.capture(x, y))
    }

    /// Discard the run, gated by the lockout. Practice mode skips the code.
    pub fn reset(
        &mut self,
        code: Option<&str>,
        now: DateTime<Utc>,
    ) -> IntrusionResult<ResetOutcome> {
        let outcome = if PracticeMode::is_enabled(&self.store) {
            PracticeMode::neutralize(&mut self.store)?;
            ResetOutcome::Cleared
        } else {
            self.lockout.reset(&mut self.store, code, now)?
        };
        if !matches!(outcome, ResetOutcome::Denied { .. }) && self.run.take().is_some() {
            self.epoch += 1;
        }
        Ok(outcome)
    }

    /// Current lockout status.
    pub fn lock_status(&mut self, now: DateTime<Utc>) -> IntrusionResult<LockStatus> {
        Ok(self.lockout.status(&mut self.store, now)?)
    }

    /// The live run, if any.
    pub fn run(&self) -> Option<&Intrusion> {
        self.run.as_ref()
    }

    /// The epoch of the current run.
    pub fn epoch(&self) -> u64 {
        self.epoch
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

    fn terminal() -> Terminal<MemoryStore> {
        Terminal::new(MemoryStore::new(), IntrusionConfig::default())
    }

    /// Start an easy run and let the trace finish.
    fn get_traced(t: &mut Terminal<MemoryStore>, now: DateTime<Utc>) {
        let epoch = t.start(Some(Difficulty::Easy), 50, 30, now).unwrap();
        while t.tick(epoch, now).unwrap() != TraceOutcome::Traced {}
    }

    #[test]
    fn default_difficulty_applies() {
        let mut t = terminal();
        t.start(None, 50, 30, t0()).unwrap();
        assert_eq!(t.run().unwrap().difficulty(), Difficulty::Normal);
    }

    #[test]
    fn capture_without_run() {
        let mut t = terminal();
        assert!(matches!(t.capture(1, 0), Err(IntrusionError::NoRun)));
    }

    #[test]
    fn traced_writes_net_soft_lock() {
        let mut t = terminal();
        get_traced(&mut t, t0());
        let keys = LockoutKeys::for_namespace(NAMESPACE);
        assert!(t.store().get(&keys.soft).is_some());
        assert!(t.store().get("fw_eod_detonated_timestamp").is_none());

        assert!(matches!(
            t.start(None, 50, 30, at(1)),
            Err(IntrusionError::Core(CoreError::SoftLocked))
        ));
    }

    #[test]
    fn override_code_reopens_terminal() {
        let mut t = terminal();
        get_traced(&mut t, t0());
        assert_eq!(t.reset(Some("1711"), at(1)).unwrap(), ResetOutcome::Cleared);
        assert!(t.run().is_none());
        assert!(t.start(None, 50, 30, at(2)).is_ok());
    }

    #[test]
    fn wrong_codes_hard_lock() {
        let mut t = terminal();
        get_traced(&mut t, t0());
        t.reset(Some("0"), at(1)).unwrap();
        assert!(t.run().is_some());
        assert_eq!(
            t.reset(Some("0"), at(2)).unwrap(),
            ResetOutcome::Escalated {
                remaining_secs: 300
            }
        );
        assert!(matches!(
            t.boot(at(3)).unwrap(),
            LockStatus::HardLocked { remaining_secs: 299 }
        ));
    }

    #[test]
    fn stale_tick_ignored() {
        let mut t = terminal();
        let first = t.start(None, 50, 30, t0()).unwrap();
        t.start(None, 50, 30, t0()).unwrap();
        assert_eq!(t.tick(first, t0()).unwrap(), TraceOutcome::Ignored);
        assert!(t.run().unwrap().trace_progress() < 1e-9);
    }

    #[test]
    fn practice_mode_reset_skips_code() {
        let mut t = terminal();
        get_traced(&mut t, t0());
        let mut store = t.into_store();
        PracticeMode::set(&mut store, true).unwrap();
        let mut t = Terminal::new(store, IntrusionConfig::default());
        assert_eq!(t.reset(None, at(1)).unwrap(), ResetOutcome::Cleared);
        assert!(t.lock_status(at(1)).unwrap().is_clear());
    }
}
