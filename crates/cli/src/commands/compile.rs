//! Compile Command
//!
//! Runs a test case from `created` to `script_ready`, replaying a recorded
//! observations file in place of a live exploration, and emits the script.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use stepscribe_core::{
    GeneratorConfig, Observation, ResolutionTier, ScriptGenerator, TestCase,
};
use tracing::{info, warn};

use super::{load_config, read_observations, read_text};
use crate::output::print_success;

#[derive(Args)]
pub struct CompileArgs {
    /// Test name
    #[arg(short, long)]
    pub name: String,

    /// Target page url
    #[arg(short, long)]
    pub url: String,

    /// File with one natural-language step per line
    #[arg(short, long)]
    pub steps: PathBuf,

    /// JSON array of observations recorded during exploration
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Test description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Drive the lifecycle and return the finished test case
pub fn compile_test_case(
    name: &str,
    url: &str,
    steps_text: &str,
    description: Option<&str>,
    observations: &[Observation],
    config: GeneratorConfig,
) -> Result<(TestCase, ScriptGenerator)> {
    let synthesizer = config.synthesizer();
    let generator = ScriptGenerator::new(config);

    let mut test_case = TestCase::new(name, url, steps_text);
    if let Some(description) = description {
        test_case = test_case.with_description(description);
    }

    test_case.begin_exploration()?;
    for observation in observations {
        test_case.record_observation(observation, &synthesizer)?;
    }
    test_case.finish_exploration(&generator)?;

    Ok((test_case, generator))
}

pub async fn execute(args: CompileArgs) -> Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let steps_text = read_text(&args.steps).await?;
    let observations = match &args.observations {
        Some(path) => read_observations(path).await?,
        None => Vec::new(),
    };

    let (test_case, generator) = compile_test_case(
        &args.name,
        &args.url,
        &steps_text,
        args.description.as_deref(),
        &observations,
        config,
    )?;

    for entry in test_case.resolution_report(&generator) {
        match entry.tier {
            Some(ResolutionTier::Generic) => warn!(
                "Step {} ({:?}): no discovered element, using generic selector",
                entry.index, entry.raw
            ),
            Some(tier) => info!(
                "Step {} ({:?}): {} match on {:?}",
                entry.index,
                entry.raw,
                tier,
                entry.matched_description.as_deref().unwrap_or_default()
            ),
            None if entry.kind == "manual" => {
                warn!("Step {} ({:?}): left as a manual step", entry.index, entry.raw)
            }
            None => {}
        }
    }

    let script = test_case
        .script()
        .context("Test case has no script after exploration")?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(path, script)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!(
                "Wrote {} step(s) for {:?} to {}",
                test_case.steps().len(),
                test_case.name(),
                path.display()
            ));
        }
        None => print!("{}", script),
    }

    Ok(())
}
