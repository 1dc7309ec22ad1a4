use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use colored::Colorize;

use fw_core::{KeyValueStore, LockStatus};
use fw_intrusion::{
    CaptureOutcome, Difficulty, Grid, Intrusion, IntrusionConfig, IntrusionError, NodeKind,
    RunStatus, TICK_MILLIS, Terminal, TraceOutcome,
};

const HELP: &str = "\
  capture <x> <y>   capture the node at column x, row y
  map               show the network
  status            show trace progress
  quit              disconnect";

pub fn run(
    state: &Path,
    seed: u64,
    difficulty: &str,
    skill: u32,
    roll: Option<u32>,
) -> Result<(), String> {
    let difficulty = Difficulty::parse(difficulty).map_err(|e| e.to_string())?;
    let store = super::open_store(state)?;
    let config = IntrusionConfig::default()
        .with_seed(seed)
        .with_difficulty(difficulty);
    let mut terminal = Terminal::new(store, config);

    match terminal.boot(Utc::now()).map_err(|e| describe(&e))? {
        LockStatus::Clear => {}
        LockStatus::SoftLocked { attempts_remaining } => {
            return Err(format!(
                "the last intrusion was traced and the terminal is frozen ({attempts_remaining} override attempt(s) remaining). Run `fw reset --game net --code <code>`."
            ));
        }
        LockStatus::HardLocked { remaining_secs } => {
            return Err(format!(
                "terminal locked. Try again in {}.",
                super::mmss(remaining_secs)
            ));
        }
    }

    let roll = roll.unwrap_or_else(|| super::auto_roll(seed));
    let epoch = terminal
        .start(None, skill, roll, Utc::now())
        .map_err(|e| describe(&e))?;
    let run = terminal.run().ok_or("connection failed")?;

    println!(
        "  {} {} network ({n}x{n})",
        "Connecting to".bold(),
        run.difficulty(),
        n = run.grid().size()
    );
    let briefing = run.briefing();
    if run.check().tier.is_failure() {
        println!("  {}", briefing.as_str().red());
    } else {
        println!("  {}", briefing.as_str().green());
    }
    println!("{}", render_map(run.grid()));
    println!("  Reach E from S before the trace completes. Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();
    let mut clock = Instant::now();

    loop {
        if !super::read_command(&mut reader, &mut line)? {
            break;
        }

        let ticks = clock.elapsed().as_millis() / u128::from(TICK_MILLIS);
        clock += Duration::from_millis(TICK_MILLIS) * u32::try_from(ticks).unwrap_or(u32::MAX);
        for _ in 0..ticks {
            match terminal.tick(epoch, Utc::now()).map_err(|e| describe(&e))? {
                TraceOutcome::Tracing { severed, .. } if !severed.is_empty() => {
                    println!(
                        "  {} {} node(s) cut from your path.",
                        "ICE!".red().bold(),
                        severed.len()
                    );
                }
                TraceOutcome::Tracing { .. } => {}
                TraceOutcome::Traced | TraceOutcome::Ignored => break,
            }
        }
        if is_over(&terminal) {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            println!("  Connection dropped.");
            return Ok(());
        }

        match process(&mut terminal, input) {
            Ok(output) => println!("{output}\n"),
            Err(e) => println!("{}\n", e.as_str().yellow()),
        }

        if is_over(&terminal) {
            break;
        }
    }

    if let Some(run) = terminal.run() {
        println!("{}", verdict(run));
    }
    Ok(())
}

fn is_over<S: KeyValueStore>(terminal: &Terminal<S>) -> bool {
    terminal.run().is_none_or(|run| run.status().is_over())
}

/// Run one REPL command against the live intrusion.
fn process<S: KeyValueStore>(terminal: &mut Terminal<S>, input: &str) -> Result<String, String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let run = terminal.run().ok_or("not connected")?;

    match cmd.as_str() {
        "help" | "h" | "?" => Ok(HELP.to_string()),
        "map" | "m" => Ok(render_map(run.grid())),
        "status" | "s" => Ok(render_status(run)),
        "capture" | "c" => {
            let usage = "usage: capture <x> <y>";
            let x: usize = parts.next().ok_or(usage)?.parse().map_err(|_| usage)?;
            let y: usize = parts.next().ok_or(usage)?.parse().map_err(|_| usage)?;
            let outcome = terminal.capture(x, y).map_err(|e| describe(&e))?;
            Ok(match outcome {
                CaptureOutcome::Ignored => {
                    "  Node unreachable. Capture an uncaptured node next to your path."
                        .dimmed()
                        .to_string()
                }
                CaptureOutcome::Captured { firewall: false } => {
                    format!("  Node ({x}, {y}) captured.")
                }
                CaptureOutcome::Captured { firewall: true } => format!(
                    "  Node ({x}, {y}) captured. {} Trace +5%.",
                    "FIREWALL!".red().bold()
                ),
                CaptureOutcome::Breached => format!("  {}", "ACCESS GRANTED".green().bold()),
            })
        }
        other => Err(format!("unknown command '{other}'. Type 'help'.")),
    }
}

fn describe(err: &IntrusionError) -> String {
    match err {
        IntrusionError::Core(core) => super::lockout_message(core, "net"),
        other => other.to_string(),
    }
}

fn render_status(run: &Intrusion) -> String {
    let width: u32 = 20;
    let progress = run.trace_progress().clamp(0.0, 100.0);
    let filled = (progress / 100.0 * f64::from(width)).round() as usize;
    format!(
        "  TRACE [{}{}] {progress:.1}%  PATH {} node(s){}",
        "#".repeat(filled).as_str().red(),
        "-".repeat(width as usize - filled.min(width as usize)),
        run.grid().path().len(),
        if run.ice_active() { "  ICE ACTIVE" } else { "" }
    )
}

fn render_map(grid: &Grid) -> String {
    let mut out = String::from("    ");
    for x in 0..grid.size() {
        out.push_str(&format!("{x:>3}"));
    }
    out.push('\n');

    for row in grid.nodes().chunks(grid.size()) {
        if let Some(first) = row.first() {
            out.push_str(&format!("  {:>2}", first.y));
        }
        for node in row {
            let cell = match (node.kind, node.captured) {
                (NodeKind::Start, _) => "S".cyan().to_string(),
                (NodeKind::End, true) => "X".green().bold().to_string(),
                (NodeKind::End, false) => "E".yellow().bold().to_string(),
                (_, true) => "@".green().to_string(),
                (NodeKind::Firewall, false) => "#".red().to_string(),
                (NodeKind::Normal, false) => ".".dimmed().to_string(),
            };
            out.push_str("  ");
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}

fn verdict(run: &Intrusion) -> String {
    match run.status() {
        RunStatus::Breached => format!(
            "  {} Network breached at {:.1}% trace.",
            "STATUS: SUCCESS".green().bold(),
            run.trace_progress()
        ),
        RunStatus::Traced => format!(
            "  {} You have been traced.\n  The terminal is frozen. Run `fw reset --game net --code <code>`.",
            "STATUS: TRACED".red().bold()
        ),
        RunStatus::InProgress => String::new(),
    }
}
