//! Config Command

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use stepscribe_core::GeneratorConfig;

use super::{config_path, load_config};
use crate::output::{print_success, print_warning};

#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration file
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Write the default configuration to the path if it does not exist
    #[arg(long)]
    pub init: bool,
}

pub async fn execute(args: ConfigArgs) -> Result<()> {
    let path = config_path(args.path.as_deref());

    if args.init {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            print_warning(&format!("{} already exists, leaving it unchanged", path.display()));
        } else {
            GeneratorConfig::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
        }
    }

    let config = load_config(Some(&path)).await?;
    print!("{}", config.to_toml()?);
    Ok(())
}
