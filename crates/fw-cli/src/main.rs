//! CLI frontend for the Feuerwerker training range.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "fw",
    about = "Feuerwerker - bomb disposal and network intrusion training range",
    version,
    propagate_version = true
)]
struct Cli {
    /// File holding lockout state between runs
    #[arg(long, global = true, default_value = ".feuerwerker.json")]
    state: PathBuf,

    /// RNG seed for reproducible devices and networks (default: random)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log engine events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the device series
    Series {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Defuse a device
    Eod {
        /// Device series id (e.g. M1-T, M4-S, M7-B)
        #[arg(default_value = "M1-T")]
        series: String,

        /// Your EOD skill rating
        #[arg(long, default_value = "50")]
        skill: u32,

        /// Your d100 roll (default: rolled for you)
        #[arg(long)]
        roll: Option<u32>,
    },

    /// Break into a network
    Intrusion {
        /// Network difficulty: easy, normal, hard
        #[arg(short, long, default_value = "normal")]
        difficulty: String,

        /// Your hacking skill rating
        #[arg(long, default_value = "50")]
        skill: u32,

        /// Your d100 roll (default: rolled for you)
        #[arg(long)]
        roll: Option<u32>,
    },

    /// Show the lockout state of every terminal
    Lock,

    /// Reset a terminal, entering the override code if it is frozen
    Reset {
        /// Which terminal to reset
        #[arg(long, value_enum, default_value = "eod")]
        game: Game,

        /// Override code
        #[arg(long)]
        code: Option<String>,
    },

    /// Toggle practice mode (lockouts are cleared on every start)
    Practice {
        #[arg(value_enum, default_value = "status")]
        mode: PracticeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Game {
    Eod,
    Net,
}

#[derive(Clone, Copy, ValueEnum)]
enum PracticeArg {
    On,
    Off,
    Status,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, "rng seeded");
    let state = cli.state.as_path();

    let result = match cli.command {
        Commands::Series { json } => commands::series::run(json),
        Commands::Eod {
            series,
            skill,
            roll,
        } => commands::eod::run(state, seed, &series, skill, roll),
        Commands::Intrusion {
            difficulty,
            skill,
            roll,
        } => commands::intrusion::run(state, seed, &difficulty, skill, roll),
        Commands::Lock => commands::lock::run(state),
        Commands::Reset { game, code } => match game {
            Game::Eod => commands::reset::eod(state, code.as_deref()),
            Game::Net => commands::reset::net(state, code.as_deref()),
        },
        Commands::Practice { mode } => match mode {
            PracticeArg::On => commands::practice::set(state, true),
            PracticeArg::Off => commands::practice::set(state, false),
            PracticeArg::Status => commands::practice::status(state),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
