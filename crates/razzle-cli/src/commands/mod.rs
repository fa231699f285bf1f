pub mod config;
pub mod exact;
pub mod one_roll;
pub mod play;
pub mod policy;
pub mod tune;

use std::path::Path;

use colored::Colorize;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use razzle_mechanics::{GameConfig, ProfitDistribution, entropy_seed};

/// Width of the longest bar in a chart.
const BAR_WIDTH: usize = 40;

/// Load the configuration file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    match path {
        Some(path) => GameConfig::load(path)
            .map_err(|e| format!("cannot load config {}: {e}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Use the given seed or draw one from the OS.
fn resolve_seed(seed: Option<u64>) -> Result<u64, String> {
    match seed {
        Some(seed) => Ok(seed),
        None => entropy_seed().map_err(|e| e.to_string()),
    }
}

fn heading(title: &str) {
    println!("  {}", title.bold().underline());
    println!();
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn colour_profit(profit: i64) -> colored::ColoredString {
    let text = signed(profit);
    if profit > 0 {
        text.green()
    } else if profit < 0 {
        text.red()
    } else {
        text.normal()
    }
}

/// Horizontal bar chart of probabilities, scaled to the largest one.
fn print_bar_chart(rows: &[(i64, f64)]) {
    let max = rows.iter().map(|&(_, p)| p).fold(0.0_f64, f64::max);
    for &(profit, p) in rows {
        let len = if max > 0.0 {
            (p / max * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(len);
        let bar = if profit > 0 { bar.green() } else { bar.red() };
        println!("  {:>5} | {bar} {:.4}", signed(profit), p);
    }
    println!();
}

/// Table and chart for an exact profit distribution.
fn print_distribution(dist: &ProfitDistribution) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Profit", "Probability"]);
    for (profit, p) in dist.iter() {
        table.add_row(vec![colour_profit(profit).to_string(), format!("{p:.6}")]);
    }
    right_align(&mut table, 2);
    println!("{table}");
    println!();

    let rows: Vec<_> = dist.iter().collect();
    print_bar_chart(&rows);

    println!("  Expected value:    {:+.6}", dist.expected_value());
    println!("  Win probability:   {:.6}", dist.win_probability());
    println!("  Total probability: {:.6}", dist.total());
}

fn right_align(table: &mut Table, columns: usize) {
    for i in 0..columns {
        if let Some(column) = table.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}
