use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use razzle_mechanics::{GameConfig, PolicyKind, simulate};

pub fn run(config: &GameConfig, games: u64, seed: Option<u64>, policy: PolicyKind) -> Result<(), String> {
    if games == 0 {
        return Err("number of games must be at least 1".into());
    }
    let seed = super::resolve_seed(seed)?;
    let stopping = policy.build(config);
    let tally = simulate(config, &stopping, games, seed);

    println!(
        "  {} {}",
        "Razzle".bold(),
        format!("({games} games, policy={policy}, seed={seed})").dimmed()
    );
    println!();

    super::heading("Outcomes");
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Profit", "Games", "Probability"]);
    for (profit, count) in tally.iter() {
        table.add_row(vec![
            super::colour_profit(profit).to_string(),
            count.to_string(),
            format!("{:.4}", tally.probability(profit)),
        ]);
    }
    super::right_align(&mut table, 3);
    println!("{table}");
    println!();

    let rows: Vec<_> = tally.probabilities().into_iter().collect();
    super::print_bar_chart(&rows);

    println!("  Average return: {:+.4} per game", tally.mean());
    println!("  Win rate:       {:.4}", tally.win_rate());
    Ok(())
}
