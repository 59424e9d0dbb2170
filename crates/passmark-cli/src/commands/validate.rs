//! The `passmark validate-config` command.

use std::path::PathBuf;

use anyhow::Result;

use passmark_core::config::read_config;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = read_config(config_path.as_deref())?;

    match config.validate() {
        Ok(()) => {
            let sum = config.ranking.weight_sum();
            if (sum - 1.0).abs() > 1e-9 {
                println!("  WARNING: ranking weights sum to {sum}, not 1.0");
            }
            println!("Configuration valid.");
            Ok(())
        }
        Err(errors) => {
            for e in &errors {
                println!("  ERROR: {e}");
            }
            anyhow::bail!("{} configuration error(s) found", errors.len())
        }
    }
}
