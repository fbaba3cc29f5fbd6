//! Show the effective configuration.

use makeitmeme_common::config::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = AppConfig::path();
    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            config.save()?;
            println!("Wrote defaults to {}", path.display());
        }
    }

    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
