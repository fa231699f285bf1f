use colored::Colorize;
use razzle_mechanics::rules;
use razzle_mechanics::{GameConfig, SumDistribution, one_roll};

pub fn run(config: &GameConfig) -> Result<(), String> {
    let sums = SumDistribution::for_config(config);
    println!(
        "  {} {}",
        "Single roll".bold(),
        format!(
            "({}d{}, sums {}..={}, fail band {})",
            config.num_dice(),
            config.faces(),
            sums.min_sum(),
            sums.max_sum(),
            rules::fail_band(config)
        )
        .dimmed()
    );
    println!();

    super::heading("Profit distribution");
    super::print_distribution(&one_roll(config));
    Ok(())
}
