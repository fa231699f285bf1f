use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use razzle_mechanics::optimal;
use razzle_mechanics::{GameConfig, Step};

pub fn run(config: &GameConfig) -> Result<(), String> {
    let solution = optimal::solve(config);

    println!(
        "  {} {}",
        "Optimal stopping".bold(),
        format!("({} value-iteration sweeps)", optimal::ITERATIONS).dimmed()
    );
    println!();

    super::heading("Decisions");
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Step", "Stop value", "Continue value", "Value", "Action"]);
    for s in 0..optimal::STATES {
        let cont = solution.continue_values[s]
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let action = if solution.table.should_stop(s as Step) {
            "STOP".yellow().bold()
        } else {
            "ROLL".cyan().bold()
        };
        table.add_row(vec![
            s.to_string(),
            format!("{:.4}", solution.stop_values[s]),
            cont,
            format!("{:.4}", solution.values[s]),
            action.to_string(),
        ]);
    }
    super::right_align(&mut table, 4);
    println!("{table}");
    Ok(())
}
