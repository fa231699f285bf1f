use razzle_mechanics::GameConfig;

pub fn run(config: &GameConfig, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| format!("cannot serialize config: {e}"))?;
        println!("{text}");
    } else {
        print!("{}", config.to_flat_string());
    }
    Ok(())
}
