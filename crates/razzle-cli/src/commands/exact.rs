use colored::Colorize;
use razzle_mechanics::{GameConfig, PolicyKind, session_distribution};

pub fn run(config: &GameConfig, policy: PolicyKind) -> Result<(), String> {
    let stopping = policy.build(config);
    let dist = session_distribution(config, &stopping);

    println!(
        "  {} {}",
        "Exact game distribution".bold(),
        format!("(policy={policy}, max rolls={})", config.max_rolls()).dimmed()
    );
    println!();

    super::heading("Profit distribution");
    super::print_distribution(&dist);
    Ok(())
}
