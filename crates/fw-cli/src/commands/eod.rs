use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use colored::Colorize;

use fw_core::KeyValueStore;
use fw_eod::{
    ActionOutcome, BootState, DetonationCause, EodConfig, EodError, Module, PlayerAction, Range,
    Session, SessionStatus, TickOutcome,
};

const HELP: &str = "\
  cut <n>        cut wire number n
  key <digits>   type digits on the keypad
  clear          clear the keypad entry
  submit         submit the keypad entry
  press          press and hold the button
  release        release the button
  status         show the device
  manual         show the defusal manual
  quit           walk away";

pub fn run(
    state: &Path,
    seed: u64,
    series: &str,
    skill: u32,
    roll: Option<u32>,
) -> Result<(), String> {
    let store = super::open_store(state)?;
    let mut range = Range::new(store, EodConfig::default().with_seed(seed));

    match range.boot(Utc::now()).map_err(|e| describe(&e))? {
        BootState::Ready => {}
        BootState::Frozen { attempts_remaining } => {
            return Err(format!(
                "the last device detonated and the terminal is frozen ({attempts_remaining} override attempt(s) remaining). Run `fw reset --game eod --code <code>`."
            ));
        }
        BootState::Locked { remaining_secs } => {
            return Err(format!(
                "terminal locked. Try again in {}.",
                super::mmss(remaining_secs)
            ));
        }
    }

    let roll = roll.unwrap_or_else(|| super::auto_roll(seed));
    let epoch = range
        .start(series, skill, roll, Utc::now())
        .map_err(|e| describe(&e))?;
    let session = range.session().ok_or("device failed to arm")?;

    println!(
        "  {} {} | serial {}",
        "Arming".bold(),
        session.series().display_name,
        session.serial()
    );
    println!("  {}", tier_line(session));
    println!("{}", render_status(session));
    println!("  Type 'help' for commands, 'manual' for the defusal manual, 'quit' to walk away.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let mut clock = Instant::now();

    loop {
        if !super::read_command(&mut reader, &mut line)? {
            break;
        }

        // The timer kept running while waiting for input.
        let elapsed = clock.elapsed().as_secs();
        clock += Duration::from_secs(elapsed);
        for _ in 0..elapsed {
            let outcome = range.tick(epoch, Utc::now()).map_err(|e| describe(&e))?;
            if !matches!(outcome, TickOutcome::Running(_)) {
                break;
            }
        }
        if range.session_status() != Some(SessionStatus::Armed) {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            println!("  You walk away from the device.");
            return Ok(());
        }

        match process(&mut range, input, Utc::now()) {
            Ok(output) => println!("{output}\n"),
            Err(e) => println!("{}\n", e.as_str().yellow()),
        }

        if range.session_status() != Some(SessionStatus::Armed) {
            break;
        }
    }

    if let Some(session) = range.session() {
        println!("{}", verdict(session));
    }
    Ok(())
}

/// Run one REPL command against the live session.
fn process<S: KeyValueStore>(
    range: &mut Range<S>,
    input: &str,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();
    let session = range.session().ok_or("no device armed")?;

    match cmd.as_str() {
        "help" | "h" | "?" => Ok(HELP.to_string()),
        "status" | "s" => Ok(render_status(session)),
        "manual" | "m" => Ok(session.manual().to_string()),
        "cut" => {
            let n: usize = arg
                .ok_or("usage: cut <wire number>")?
                .parse()
                .map_err(|_| "wire number must be a positive integer")?;
            if n == 0 {
                return Err("wires are numbered from 1".into());
            }
            let outcome = act(range, PlayerAction::CutWire(n - 1), now)?;
            Ok(describe_outcome(outcome, "You cut the wire."))
        }
        "key" => {
            let digits = arg.ok_or("usage: key <digits>")?;
            let bad = digits.chars().find(|c| !c.is_ascii_digit());
            if let (Some(bad), Some(_)) = (bad, session.keypad()) {
                return Err(describe(&EodError::InvalidKey(bad)));
            }
            let mut outcome = ActionOutcome::Ignored;
            for digit in digits.chars() {
                outcome = act(range, PlayerAction::KeypadDigit(digit), now)?;
            }
            Ok(describe_outcome(outcome, &keypad_line(range.session())))
        }
        "clear" => {
            let outcome = act(range, PlayerAction::KeypadClear, now)?;
            Ok(describe_outcome(outcome, &keypad_line(range.session())))
        }
        "submit" => {
            let outcome = act(range, PlayerAction::KeypadSubmit, now)?;
            Ok(describe_outcome(outcome, ""))
        }
        "press" => {
            let outcome = act(range, PlayerAction::PressButton, now)?;
            Ok(describe_outcome(outcome, "You press and hold the button."))
        }
        "release" => {
            let outcome = act(range, PlayerAction::ReleaseButton, now)?;
            Ok(describe_outcome(outcome, ""))
        }
        other => Err(format!("unknown command '{other}'. Type 'help'.")),
    }
}

fn act<S: KeyValueStore>(
    range: &mut Range<S>,
    action: PlayerAction,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, String> {
    range.act(action, now).map_err(|e| describe(&e))
}

fn describe(err: &EodError) -> String {
    match err {
        EodError::Core(core) => super::lockout_message(core, "eod"),
        other => other.to_string(),
    }
}

fn describe_outcome(outcome: ActionOutcome, accepted: &str) -> String {
    match outcome {
        ActionOutcome::Ignored => "  Nothing happens.".dimmed().to_string(),
        ActionOutcome::Accepted => format!("  {accepted}"),
        ActionOutcome::Solved(kind) => {
            let line = format!("{kind} module disarmed.");
            format!("  {}", line.as_str().green())
        }
        ActionOutcome::Strike { strikes, allowance } => format!(
            "  {} {strikes} of {allowance} allowed.",
            "STRIKE!".red().bold()
        ),
        ActionOutcome::Disarmed => format!("  {}", "DISARMED".green().bold()),
        ActionOutcome::Detonated => format!("  {}", "DETONATED".red().bold()),
    }
}

fn tier_line(session: &Session) -> String {
    let line = session.briefing();
    if session.check().tier.is_failure() {
        line.as_str().red().to_string()
    } else {
        line.as_str().green().to_string()
    }
}

fn keypad_line(session: Option<&Session>) -> String {
    match session.and_then(Session::keypad) {
        Some(keypad) => format!("KEYPAD [{:_<4}]", keypad.entry()),
        None => String::new(),
    }
}

fn render_status(session: &Session) -> String {
    let mut out = format!(
        "  TIMER {}  STRIKES {} of {} allowed  SERIAL {}\n",
        session.timer_display().as_str().bold(),
        session.strike_count(),
        session.strike_allowance(),
        session.serial()
    );

    for module in session.modules() {
        let body = match module {
            Module::Wires(wires) => wires
                .wires()
                .iter()
                .enumerate()
                .map(|(i, color)| {
                    if wires.is_cut(i) {
                        format!("{}:--", i + 1)
                    } else {
                        format!("{}:{color}", i + 1)
                    }
                })
                .collect::<Vec<_>>()
                .join("  "),
            Module::Keypad(keypad) => format!("[{:_<4}]", keypad.entry()),
            Module::Button(button) => format!(
                "{} button labeled \"{}\"{}",
                button.color(),
                button.label(),
                if button.is_held() { " (held)" } else { "" }
            ),
        };
        let solved = if module.is_solved() {
            " SOLVED".green().to_string()
        } else {
            String::new()
        };
        out.push_str(&format!("  [{}] {body}{solved}\n", module.kind()));
    }
    out
}

fn verdict(session: &Session) -> String {
    match session.status() {
        SessionStatus::Disarmed => format!(
            "  {} with {} remaining.",
            "DEVICE DISARMED".green().bold(),
            session.timer_display()
        ),
        SessionStatus::Detonated => {
            let cause = match session.detonation_cause() {
                Some(DetonationCause::TimerExpired) => "timer expired",
                _ => "too many strikes",
            };
            format!(
                "  {} ({cause}).\n  The terminal is frozen. Run `fw reset --game eod --code <code>`.",
                "DEVICE DETONATED".red().bold()
            )
        }
        SessionStatus::Armed => String::new(),
    }
}
