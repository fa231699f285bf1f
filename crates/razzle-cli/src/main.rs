//! CLI frontend for the Razzle game engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use razzle_mechanics::PolicyKind;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "razzle",
    about = "Razzle: simulate, analyse and tune a dice wagering game",
    version,
    propagate_version = true
)]
struct Cli {
    /// Game configuration file (.json, otherwise key=value parameters)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Stopping policy names accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Heuristic,
    Optimal,
    Exhaust,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Heuristic => PolicyKind::Heuristic,
            PolicyArg::Optimal => PolicyKind::Optimal,
            PolicyArg::Exhaust => PolicyKind::Exhaust,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play many games and report the experimental outcome distribution
    Play {
        /// Number of games to play
        #[arg(short = 'n', long, default_value = "50")]
        games: u64,

        /// RNG seed (default: drawn from OS entropy)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stopping policy
        #[arg(short, long, value_enum, default_value = "heuristic")]
        policy: PolicyArg,
    },

    /// Show the exact profit distribution of a single roll
    OneRoll,

    /// Compute the exact profit distribution of a full game
    Exact {
        /// Stopping policy
        #[arg(short, long, value_enum, default_value = "heuristic")]
        policy: PolicyArg,
    },

    /// Solve for the optimal stopping policy
    Policy,

    /// Tune the game parameters towards a target house edge and win rate
    Tune {
        /// Games simulated per candidate
        #[arg(short, long, default_value = "50000")]
        games: u64,

        /// RNG seed shared by every candidate (default: drawn from OS entropy)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Score candidates with the exact distribution instead of simulating
        #[arg(long)]
        exact: bool,

        /// Maximum number of sweeps
        #[arg(long, default_value = "1000")]
        max_iterations: usize,

        /// Stopping policy used while scoring
        #[arg(short, long, value_enum, default_value = "heuristic")]
        policy: PolicyArg,

        /// Write the tuned parameters to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Print as JSON instead of key=value parameters
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Play {
                games,
                seed,
                policy,
            } => commands::play::run(&config, games, seed, policy.into()),
            Commands::OneRoll => commands::one_roll::run(&config),
            Commands::Exact { policy } => commands::exact::run(&config, policy.into()),
            Commands::Policy => commands::policy::run(&config),
            Commands::Tune {
                games,
                seed,
                exact,
                max_iterations,
                policy,
                output,
            } => commands::tune::run(
                &config,
                commands::tune::TuneArgs {
                    games,
                    seed,
                    exact,
                    max_iterations,
                    policy: policy.into(),
                    output,
                },
            ),
            Commands::Config { json } => commands::config::run(&config, json),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
