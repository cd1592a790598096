use std::path::Path;

use anyhow::{bail, Result};

use harana::state::Config;

pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Config {:?} already exists. Use 'harana init --force' to overwrite.",
            config_path
        );
    }

    Config::default().save(config_path)?;

    println!("Wrote default config to {:?}", config_path);
    Ok(())
}
