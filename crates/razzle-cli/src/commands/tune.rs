use std::path::PathBuf;

use colored::Colorize;
use razzle_mechanics::{Evaluation, GameConfig, PolicyKind, Tuner};

pub struct TuneArgs {
    pub games: u64,
    pub seed: Option<u64>,
    pub exact: bool,
    pub max_iterations: usize,
    pub policy: PolicyKind,
    pub output: Option<PathBuf>,
}

pub fn run(config: &GameConfig, args: TuneArgs) -> Result<(), String> {
    let evaluation = if args.exact {
        Evaluation::Exact
    } else {
        if args.games == 0 {
            return Err("number of games must be at least 1".into());
        }
        Evaluation::MonteCarlo {
            games: args.games,
            seed: super::resolve_seed(args.seed)?,
        }
    };
    let tuner = Tuner {
        evaluation,
        policy: args.policy,
        max_iterations: args.max_iterations,
        ..Tuner::default()
    };

    let method = match evaluation {
        Evaluation::Exact => "exact".to_string(),
        Evaluation::MonteCarlo { games, seed } => format!("{games} games, seed={seed}"),
    };
    println!(
        "  {} {}",
        "Tuning".bold(),
        format!("({method}, policy={})", args.policy).dimmed()
    );
    println!();

    let outcome = tuner.run(config);

    println!("  Iterations:     {}", outcome.iterations);
    println!("  Average profit: {:+.4}", outcome.score.avg_profit);
    println!("  Win rate:       {:.4}", outcome.score.win_rate);
    println!("  Loss:           {:.6}", outcome.loss);
    println!();

    super::heading("Final parameters");
    let params = outcome.config.to_flat_string();
    for line in params.lines() {
        println!("  {line}");
    }

    if let Some(path) = &args.output {
        let text = format!(
            "Final avgProfit={}\nFinal winRate={}\n{params}",
            outcome.score.avg_profit, outcome.score.win_rate
        );
        std::fs::write(path, text)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!();
        println!("  Wrote {}", path.display());
    }
    Ok(())
}
