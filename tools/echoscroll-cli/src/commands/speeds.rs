//! Show the speed table.

use echoscroll_model::speed::{DEFAULT_SPEED_LEVEL, SPEED_TABLE};

pub fn run() -> anyhow::Result<()> {
    println!("Speed levels:");
    for (level, delay_ms, label) in SPEED_TABLE {
        let marker = if level == DEFAULT_SPEED_LEVEL { " (default)" } else { "" };
        println!("  {level}  {delay_ms:>5} ms  {label}{marker}");
    }
    Ok(())
}
