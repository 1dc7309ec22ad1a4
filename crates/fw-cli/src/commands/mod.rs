pub mod eod;
pub mod intrusion;
pub mod lock;
pub mod practice;
pub mod reset;
pub mod series;

use std::io::{self, BufRead, Write};
use std::path::Path;

use fw_core::{CoreError, JsonFileStore, roll_d100};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Open the state file, creating it on first write.
fn open_store(path: &Path) -> Result<JsonFileStore, String> {
    JsonFileStore::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))
}

/// Render seconds as `mm:ss`.
fn mmss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The d100 roll used when the player doesn't pass `--roll`.
///
/// Drawn from its own stream so it is independent of the game RNG seeded
/// with the same `seed`.
fn auto_roll(seed: u64) -> u32 {
    roll_d100(&mut StdRng::seed_from_u64(seed.wrapping_add(1)))
}

/// Explain a lockout error in terms of the commands that clear it.
fn lockout_message(err: &CoreError, game: &str) -> String {
    match err {
        CoreError::SoftLocked => format!(
            "terminal frozen after a failure. Run `fw reset --game {game} --code <code>` to clear it."
        ),
        CoreError::HardLocked { remaining_secs } => {
            format!("terminal locked. Try again in {}.", mmss(*remaining_secs))
        }
        CoreError::OverrideRequired { attempts_remaining } => format!(
            "override code required ({attempts_remaining} attempt(s) remaining). Pass --code <code>."
        ),
        other => other.to_string(),
    }
}

/// Prompt and read one line. `false` on end of input.
fn read_command(reader: &mut impl BufRead, line: &mut String) -> Result<bool, String> {
    print!("> ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    line.clear();
    match reader.read_line(line) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(true),
        Err(e) => Err(e.to_string()),
    }
}
