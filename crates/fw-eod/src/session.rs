//! Defusal session state machine.
//!
//! A session starts `Armed` and ends exactly once, in `Disarmed` (every
//! module solved) or `Detonated` (timer ran out or strikes exceeded the
//! allowance). Terminal states are final: every later action or tick is a
//! no-op. Ticks and actions are discrete steps applied one at a time.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use fw_core::{CheckTier, SkillCheck};

use crate::catalog::RuleContext;
use crate::error::{EodError, EodResult};
use crate::generator;
use crate::manual::Manual;
use crate::module::{ButtonModule, KeypadModule, Module, ModuleKind, WiresModule};
use crate::series::SeriesDefinition;

/// Length of a device serial number.
pub const SERIAL_LEN: usize = 6;

const SERIAL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Live: the timer runs and actions are accepted.
    Armed,
    /// Every module solved.
    Disarmed,
    /// Timer expired or too many strikes.
    Detonated,
}

impl SessionStatus {
    /// Whether the session has ended.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Armed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Armed => write!(f, "ARMED"),
            Self::Disarmed => write!(f, "DISARMED"),
            Self::Detonated => write!(f, "DETONATED"),
        }
    }
}

/// Why a device went off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetonationCause {
    /// The timer reached zero.
    TimerExpired,
    /// Strikes exceeded the allowance.
    StrikesExceeded,
}

/// A player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Cut the wire at this 0-based position.
    CutWire(usize),
    /// Type a digit on the keypad.
    KeypadDigit(char),
    /// Clear the keypad entry.
    KeypadClear,
    /// Submit the keypad entry.
    KeypadSubmit,
    /// Press and hold the button.
    PressButton,
    /// Let go of the button.
    ReleaseButton,
}

/// The result of a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed: session over, module solved, or input redundant.
    Ignored,
    /// Input accepted without resolving anything (keypad typing, button down).
    Accepted,
    /// A module was solved; others remain.
    Solved(ModuleKind),
    /// Wrong action, but within the allowance.
    Strike {
        /// Strikes so far.
        strikes: u32,
        /// Strikes allowed.
        allowance: u32,
    },
    /// The last module was solved.
    Disarmed,
    /// The wrong action that exceeded the allowance.
    Detonated,
}

/// The result of a one-second tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session isn't armed (or the tick was stale).
    Ignored,
    /// Seconds left after the tick.
    Running(u32),
    /// The timer hit zero.
    Detonated,
}

/// One defusal attempt.
#[derive(Debug, Clone)]
pub struct Session {
    series: SeriesDefinition,
    check: SkillCheck,
    serial: String,
    time_remaining: u32,
    strike_count: u32,
    strike_allowance: u32,
    module_kinds: Vec<ModuleKind>,
    modules: BTreeMap<ModuleKind, Module>,
    status: SessionStatus,
    cause: Option<DetonationCause>,
}

impl Session {
    /// Start a session on a device of `series`.
    ///
    /// The d100 `roll` against `skill` adjusts the timer and the strike
    /// allowance. Modules are drawn from the series pool without
    /// replacement and generated in [`ModuleKind`] order.
    pub fn start(
        series: &SeriesDefinition,
        skill: u32,
        roll: u32,
        rng: &mut StdRng,
    ) -> EodResult<Self> {
        let check = SkillCheck::resolve(skill, roll)?;
        let (time_remaining, strike_allowance) = apply_check(series, check.tier);
        let serial = generate_serial(rng);

        let mut module_kinds = series.module_pool.clone();
        module_kinds.shuffle(rng);
        module_kinds.truncate(series.module_count);
        module_kinds.sort();
        module_kinds.dedup();

        let mut modules = BTreeMap::new();
        for &kind in &module_kinds {
            let module = {
                let ctx = RuleContext {
                    serial: &serial,
                    strike_allowance,
                    modules: &module_kinds,
                    wires: modules
                        .get(&ModuleKind::Wires)
                        .and_then(Module::as_wires)
                        .map(WiresModule::wires),
                };
                generator::generate(kind, &ctx, rng)
            };
            modules.insert(kind, module);
        }

        tracing::info!(
            series = %series.id,
            %serial,
            tier = %check.tier,
            time = time_remaining,
            strikes = strike_allowance,
            modules = ?module_kinds,
            "device armed"
        );

        Ok(Self {
            series: series.clone(),
            check,
            serial,
            time_remaining,
            strike_count: 0,
            strike_allowance,
            module_kinds,
            modules,
            status: SessionStatus::Armed,
            cause: None,
        })
    }

    /// The device series.
    pub fn series(&self) -> &SeriesDefinition {
        &self.series
    }

    /// The opening skill check.
    pub fn check(&self) -> &SkillCheck {
        &self.check
    }

    /// The device serial number.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Seconds left on the timer.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// The timer as `mm:ss`.
    pub fn timer_display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.time_remaining / 60,
            self.time_remaining % 60
        )
    }

    /// Strikes so far.
    pub fn strike_count(&self) -> u32 {
        self.strike_count
    }

    /// Strikes allowed before the next one detonates.
    pub fn strike_allowance(&self) -> u32 {
        self.strike_allowance
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Why the device detonated, if it did.
    pub fn detonation_cause(&self) -> Option<DetonationCause> {
        self.cause
    }

    /// Whether the session is still live.
    pub fn is_armed(&self) -> bool {
        self.status == SessionStatus::Armed
    }

    /// Module kinds on the device, in generation order.
    pub fn module_kinds(&self) -> &[ModuleKind] {
        &self.module_kinds
    }

    /// All modules, keyed by kind.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// The module of `kind`, if the device carries one.
    pub fn module(&self, kind: ModuleKind) -> Option<&Module> {
        self.modules.get(&kind)
    }

    /// The wires module, if present.
    pub fn wires(&self) -> Option<&WiresModule> {
        self.module(ModuleKind::Wires).and_then(Module::as_wires)
    }

    /// The keypad module, if present.
    pub fn keypad(&self) -> Option<&KeypadModule> {
        self.module(ModuleKind::Keypad).and_then(Module::as_keypad)
    }

    /// The button module, if present.
    pub fn button(&self) -> Option<&ButtonModule> {
        self.module(ModuleKind::Button).and_then(Module::as_button)
    }

    /// A snapshot of the session for rule evaluation.
    pub fn rule_context(&self) -> RuleContext<'_> {
        RuleContext {
            serial: &self.serial,
            strike_allowance: self.strike_allowance,
            modules: &self.module_kinds,
            wires: self.wires().map(WiresModule::wires),
        }
    }

    /// The manual for every module, in generation order.
    pub fn manual(&self) -> Manual {
        Manual {
            sections: self.modules.values().map(Module::manual).collect(),
        }
    }

    /// The player-facing line describing the skill check's effect.
    pub fn briefing(&self) -> String {
        let roll = self.check.roll;
        match self.check.tier {
            CheckTier::Fumble => {
                format!("FUMBLE ({roll}) - Panic sets in! Less time, one mistake is fatal.")
            }
            CheckTier::Failure => {
                format!("FAILURE ({roll}) - Unfamiliar configuration. Time pressure is on.")
            }
            CheckTier::Critical => format!(
                "CRITICAL ({roll}) - You've seen this before. Extra time and margin for error."
            ),
            CheckTier::Success => {
                format!("SUCCESS ({roll}) - Standard procedure. Operating within parameters.")
            }
        }
    }

    /// Advance the timer by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_armed() {
            return TickOutcome::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.detonate(DetonationCause::TimerExpired);
            TickOutcome::Detonated
        } else {
            TickOutcome::Running(self.time_remaining)
        }
    }

    /// Apply a player action.
    pub fn apply(&mut self, action: PlayerAction) -> EodResult<ActionOutcome> {
        match action {
            PlayerAction::CutWire(index) => self.cut_wire(index),
            PlayerAction::KeypadDigit(digit) => self.keypad_digit(digit),
            PlayerAction::KeypadClear => self.keypad_clear(),
            PlayerAction::KeypadSubmit => self.keypad_submit(),
            PlayerAction::PressButton => self.press_button(),
            PlayerAction::ReleaseButton => self.release_button(),
        }
    }

    /// Cut the wire at `index`. Cutting the correct wire solves the module;
    /// any other wire is a strike and stays uncut.
    pub fn cut_wire(&mut self, index: usize) -> EodResult<ActionOutcome> {
        let armed = self.is_armed();
        let wires = self.wires_mut()?;
        let count = wires.wires().len();
        if index >= count {
            return Err(EodError::InvalidWire { index, count });
        }
        if !armed || wires.is_solved() || wires.is_cut(index) {
            return Ok(ActionOutcome::Ignored);
        }

        if wires.correct_wire() == Some(index) {
            wires.cut(index);
            wires.mark_solved();
            Ok(self.solve(ModuleKind::Wires))
        } else {
            Ok(self.strike())
        }
    }

    /// Type a digit on the keypad.
    pub fn keypad_digit(&mut self, digit: char) -> EodResult<ActionOutcome> {
        let armed = self.is_armed();
        let keypad = self.keypad_mut()?;
        if !digit.is_ascii_digit() {
            return Err(EodError::InvalidKey(digit));
        }
        if !armed || keypad.is_solved() {
            return Ok(ActionOutcome::Ignored);
        }
        if keypad.push_digit(digit) {
            Ok(ActionOutcome::Accepted)
        } else {
            Ok(ActionOutcome::Ignored)
        }
    }

    /// Clear the keypad entry.
    pub fn keypad_clear(&mut self) -> EodResult<ActionOutcome> {
        let armed = self.is_armed();
        let keypad = self.keypad_mut()?;
        if !armed || keypad.is_solved() {
            return Ok(ActionOutcome::Ignored);
        }
        keypad.clear_entry();
        Ok(ActionOutcome::Accepted)
    }

    /// Submit the keypad entry. A wrong entry is a strike and is kept.
    pub fn keypad_submit(&mut self) -> EodResult<ActionOutcome> {
        let armed = self.is_armed();
        let keypad = self.keypad_mut()?;
        if !armed || keypad.is_solved() {
            return Ok(ActionOutcome::Ignored);
        }

        if keypad.entry_matches() {
            keypad.mark_solved();
            Ok(self.solve(ModuleKind::Keypad))
        } else {
            Ok(self.strike())
        }
    }

    /// Press and hold the button.
    pub fn press_button(&mut self) -> EodResult<ActionOutcome> {
        let armed = self.is_armed();
        let button = self.button_mut()?;
        if !armed || button.is_solved() || button.is_held() {
            return Ok(ActionOutcome::Ignored);
        }
        button.set_held(true);
        Ok(ActionOutcome::Accepted)
    }

    /// Let go of the button. Correct when the rules say release, or when they
    /// say hold and the timer shows the release digit right now.
    pub fn release_button(&mut self) -> EodResult<ActionOutcome> {
        let timer = self.timer_display();
        let armed = self.is_armed();
        let button = self.button_mut()?;
        if !armed || !button.is_held() {
            return Ok(ActionOutcome::Ignored);
        }
        button.set_held(false);

        let success = match self.button() {
            Some(button) => button.release_succeeds(&self.rule_context(), &timer),
            None => return Err(EodError::ModuleNotPresent(ModuleKind::Button)),
        };

        if success {
            if let Ok(button) = self.button_mut() {
                button.mark_solved();
            }
            Ok(self.solve(ModuleKind::Button))
        } else {
            Ok(self.strike())
        }
    }

    fn wires_mut(&mut self) -> EodResult<&mut WiresModule> {
        match self.modules.get_mut(&ModuleKind::Wires) {
            Some(Module::Wires(m)) => Ok(m),
            _ => Err(EodError::ModuleNotPresent(ModuleKind::Wires)),
        }
    }

    fn keypad_mut(&mut self) -> EodResult<&mut KeypadModule> {
        match self.modules.get_mut(&ModuleKind::Keypad) {
            Some(Module::Keypad(m)) => Ok(m),
            _ => Err(EodError::ModuleNotPresent(ModuleKind::Keypad)),
        }
    }

    fn button_mut(&mut self) -> EodResult<&mut ButtonModule> {
        match self.modules.get_mut(&ModuleKind::Button) {
            Some(Module::Button(m)) => Ok(m),
            _ => Err(EodError::ModuleNotPresent(ModuleKind::Button)),
        }
    }

    fn solve(&mut self, kind: ModuleKind) -> ActionOutcome {
        tracing::debug!(module = %kind, "module solved");
        if self.modules.values().all(Module::is_solved) {
            self.status = SessionStatus::Disarmed;
            tracing::info!(serial = %self.serial, time = self.time_remaining, "device disarmed");
            ActionOutcome::Disarmed
        } else {
            ActionOutcome::Solved(kind)
        }
    }

    fn strike(&mut self) -> ActionOutcome {
        self.strike_count += 1;
        tracing::debug!(strikes = self.strike_count, allowance = self.strike_allowance, "strike");
        if self.strike_count > self.strike_allowance {
            self.detonate(DetonationCause::StrikesExceeded);
            ActionOutcome::Detonated
        } else {
            ActionOutcome::Strike {
                strikes: self.strike_count,
                allowance: self.strike_allowance,
            }
        }
    }

    fn detonate(&mut self, cause: DetonationCause) {
        self.status = SessionStatus::Detonated;
        self.cause = Some(cause);
        tracing::info!(serial = %self.serial, ?cause, "device detonated");
    }
}

/// Timer and strike allowance after the skill check.
fn apply_check(series: &SeriesDefinition, tier: CheckTier) -> (u32, u32) {
    let base_time = u64::from(series.base_time_secs);
    let scale = |num: u64, den: u64| u32::try_from(base_time * num / den).unwrap_or(u32::MAX);
    match tier {
        CheckTier::Fumble => (scale(7, 10), 0),
        CheckTier::Failure => (scale(85, 100), series.base_strikes.saturating_sub(1)),
        CheckTier::Critical => (scale(3, 2), series.base_strikes + 1),
        CheckTier::Success => (series.base_time_secs, series.base_strikes),
    }
}

fn generate_serial(rng: &mut StdRng) -> String {
    (0..SERIAL_LEN)
        .map(|_| char::from(SERIAL_ALPHABET[rng.random_range(0..SERIAL_ALPHABET.len())]))
        .collect()
}
