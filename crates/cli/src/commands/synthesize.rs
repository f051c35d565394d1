//! Synthesize Command
//!
//! Builds the element catalog from a recorded observations file.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use stepscribe_core::{ActionCategory, ElementCatalog, Locator, Observation, SelectorSynthesizer};

use super::{load_config, read_observations};
use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct SynthesizeArgs {
    /// JSON array of observations
    pub file: PathBuf,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Catalog entry for display
#[derive(Serialize, Clone)]
pub struct CatalogRow {
    pub description: String,
    pub category: ActionCategory,
    pub locator: Locator,
}

impl TableDisplay for CatalogRow {
    fn headers() -> Vec<&'static str> {
        vec!["Element", "Category", "Primary", "Candidates"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.description.clone(),
            self.category.to_string(),
            self.locator.primary().to_string(),
            self.locator.candidates().join("\n"),
        ]
    }
}

pub fn catalog_rows(observations: &[Observation], synthesizer: &SelectorSynthesizer) -> Vec<CatalogRow> {
    let mut catalog = ElementCatalog::new();
    for observation in observations {
        catalog.record_observation(observation, synthesizer);
    }
    catalog
        .entries()
        .iter()
        .map(|entry| CatalogRow {
            description: entry.description.clone(),
            category: entry.category,
            locator: entry.locator.clone(),
        })
        .collect()
}

pub async fn execute(args: SynthesizeArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let observations = read_observations(&args.file).await?;
    let rows = catalog_rows(&observations, &config.synthesizer());
    print_list(&rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_observation_wins() {
        let observations: Vec<Observation> = serde_json::from_str(
            r##"[
                {"description": "login button", "category": "click", "target": "#login"},
                {"description": "login button", "category": "click", "target": {"stable_id": "login-button"}}
            ]"##,
        )
        .unwrap();
        let rows = catalog_rows(&observations, &SelectorSynthesizer::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].locator.primary(), r#"[data-testid="login-button"]"#);
    }
}
