//! Show the effective configuration.

use echoscroll_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let path = config_file_path();
    let status = if path.exists() { "present" } else { "not found" };
    eprintln!("Config file: {} ({status})", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
