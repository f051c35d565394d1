//! Parse Command
//!
//! Shows how each line of a steps file is understood.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use stepscribe_core::{Step, StepParser};
use tracing::warn;

use super::read_text;
use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ParseArgs {
    /// File with one natural-language step per line
    pub file: PathBuf,
}

/// Parsed step for display
#[derive(Serialize, Clone)]
pub struct StepRow {
    pub index: usize,
    #[serde(flatten)]
    pub step: Step,
}

impl TableDisplay for StepRow {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Kind", "Action", "Line"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.step.kind().to_string(),
            self.step.to_string(),
            self.step.raw.clone(),
        ]
    }
}

pub fn step_rows(text: &str) -> Vec<StepRow> {
    StepParser::parse_steps(text)
        .into_iter()
        .enumerate()
        .map(|(i, step)| StepRow { index: i + 1, step })
        .collect()
}

pub async fn execute(args: ParseArgs, format: OutputFormat) -> Result<()> {
    let text = read_text(&args.file).await?;
    let rows = step_rows(&text);
    let manual = rows.iter().filter(|r| r.step.is_manual()).count();
    if manual > 0 {
        warn!("{} line(s) did not match any step rule", manual);
    }
    print_list(&rows, format)
}
