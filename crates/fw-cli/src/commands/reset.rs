use std::path::Path;

use chrono::Utc;
use colored::Colorize;

use fw_core::ResetOutcome;
use fw_eod::{EodConfig, EodError, Range};
use fw_intrusion::{IntrusionConfig, IntrusionError, Terminal};

pub fn eod(state: &Path, code: Option<&str>) -> Result<(), String> {
    let store = super::open_store(state)?;
    let mut range = Range::new(store, EodConfig::default());
    let outcome = range.reset(code, Utc::now()).map_err(|e| match e {
        EodError::Core(core) => super::lockout_message(&core, "eod"),
        other => other.to_string(),
    })?;
    report(outcome, "EOD range")
}

pub fn net(state: &Path, code: Option<&str>) -> Result<(), String> {
    let store = super::open_store(state)?;
    let mut terminal = Terminal::new(store, IntrusionConfig::default());
    let outcome = terminal.reset(code, Utc::now()).map_err(|e| match e {
        IntrusionError::Core(core) => super::lockout_message(&core, "net"),
        other => other.to_string(),
    })?;
    report(outcome, "Intrusion terminal")
}

fn report(outcome: ResetOutcome, name: &str) -> Result<(), String> {
    match outcome {
        ResetOutcome::Cleared => {
            println!("  {} {name} reset.", "OK".green().bold());
            Ok(())
        }
        ResetOutcome::Denied { attempts_remaining } => Err(format!(
            "override code rejected ({attempts_remaining} attempt(s) remaining)"
        )),
        ResetOutcome::Escalated { remaining_secs } => Err(format!(
            "override code rejected. Terminal locked for {}.",
            super::mmss(remaining_secs)
        )),
    }
}
