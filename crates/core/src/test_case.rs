//! Test case aggregate and its lifecycle
//!
//! ```text
//! created ──▶ exploring ──▶ script_ready ──▶ test_running ──▶ completed
//!                 │   ▲           │                 │
//!                 │   └───────────┘                 │
//!                 └──────────▶ failed ◀─────────────┘
//! ```
//!
//! `failed` is terminal and nothing returns to `created`. The catalog only
//! changes while exploring; the script only changes when exploration
//! finishes or on an explicit regeneration in `script_ready`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{CatalogEntry, ElementCatalog, ResolutionTier};
use crate::error::{Error, Result};
use crate::parser::StepParser;
use crate::script::ScriptGenerator;
use crate::selector::SelectorSynthesizer;
use crate::step::Step;
use crate::types::Observation;

/// Lifecycle state of a test case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    #[default]
    Created,
    Exploring,
    ScriptReady,
    TestRunning,
    Completed,
    Failed,
}

impl TestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TestStatus::Completed | TestStatus::Failed)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Created => write!(f, "created"),
            TestStatus::Exploring => write!(f, "exploring"),
            TestStatus::ScriptReady => write!(f, "script_ready"),
            TestStatus::TestRunning => write!(f, "test_running"),
            TestStatus::Completed => write!(f, "completed"),
            TestStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-step resolution diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResolution {
    pub index: usize,
    pub raw: String,
    pub kind: String,
    /// `None` for steps that do not target an element
    pub tier: Option<ResolutionTier>,
    pub matched_description: Option<String>,
    pub primary_selector: Option<String>,
}

/// A natural-language test and everything derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    id: Uuid,
    name: String,
    #[serde(default)]
    description: String,
    url: String,
    steps: Vec<Step>,
    #[serde(default)]
    catalog: ElementCatalog,
    #[serde(default)]
    script: Option<String>,
    #[serde(default)]
    status: TestStatus,
    #[serde(default)]
    exploration_log: Vec<String>,
    #[serde(default)]
    execution_log: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TestCase {
    /// Create a test case from a multi-line step body
    pub fn new(name: impl Into<String>, url: impl Into<String>, steps_text: &str) -> Self {
        let now = Utc::now();
        let test_case = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            url: url.into(),
            steps: StepParser::parse_steps(steps_text),
            catalog: ElementCatalog::new(),
            script: None,
            status: TestStatus::Created,
            exploration_log: Vec::new(),
            execution_log: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        info!(
            "Created test case {} ({:?}) with {} step(s)",
            test_case.id,
            test_case.name,
            test_case.steps.len()
        );
        test_case
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn exploration_log(&self) -> &[String] {
        &self.exploration_log
    }

    pub fn execution_log(&self) -> &[String] {
        &self.execution_log
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Start (or restart) element discovery
    pub fn begin_exploration(&mut self) -> Result<()> {
        self.require("begin_exploration", &[TestStatus::Created, TestStatus::ScriptReady])?;
        self.catalog.clear();
        self.exploration_log.clear();
        self.transition(TestStatus::Exploring);
        Ok(())
    }

    /// Record one element observed by the exploration agent
    pub fn record_observation(
        &mut self,
        observation: &Observation,
        synthesizer: &SelectorSynthesizer,
    ) -> Result<&CatalogEntry> {
        self.require("record_observation", &[TestStatus::Exploring])?;
        self.updated_at = Utc::now();
        let entry = self.catalog.record_observation(observation, synthesizer);
        self.exploration_log.push(format!(
            "{} {:?} -> {}",
            entry.category, entry.description, entry.locator
        ));
        Ok(entry)
    }

    /// End exploration and generate the script from whatever was discovered.
    /// A timed-out exploration finishes the same way with a partial catalog.
    pub fn finish_exploration(&mut self, generator: &ScriptGenerator) -> Result<&str> {
        self.require("finish_exploration", &[TestStatus::Exploring])?;
        let script = generator.assemble(self);
        self.exploration_log.push(format!(
            "exploration finished: {} element(s) discovered",
            self.catalog.len()
        ));
        self.transition(TestStatus::ScriptReady);
        Ok(self.script.insert(script).as_str())
    }

    /// Abort exploration; the test case is not recoverable
    pub fn fail_exploration(&mut self, reason: impl Into<String>) -> Result<()> {
        self.require("fail_exploration", &[TestStatus::Exploring])?;
        let reason = reason.into();
        warn!("Exploration failed for {}: {}", self.id, reason);
        self.exploration_log.push(format!("exploration failed: {}", reason));
        self.transition(TestStatus::Failed);
        Ok(())
    }

    /// Rebuild the script from the current catalog, e.g. after a config change
    pub fn regenerate_script(&mut self, generator: &ScriptGenerator) -> Result<&str> {
        self.require("regenerate_script", &[TestStatus::ScriptReady])?;
        let script = generator.assemble(self);
        self.updated_at = Utc::now();
        info!("Regenerated script for {}", self.id);
        Ok(self.script.insert(script).as_str())
    }

    /// Hand the script to the runner
    pub fn begin_execution(&mut self) -> Result<()> {
        self.require("begin_execution", &[TestStatus::ScriptReady])?;
        self.execution_log.clear();
        self.transition(TestStatus::TestRunning);
        Ok(())
    }

    /// Append a line of runner output
    pub fn log_execution(&mut self, line: impl Into<String>) -> Result<()> {
        self.require("log_execution", &[TestStatus::TestRunning])?;
        self.execution_log.push(line.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record the runner's verdict and remaining output
    pub fn finish_execution(&mut self, success: bool, log: &str) -> Result<()> {
        self.require("finish_execution", &[TestStatus::TestRunning])?;
        self.execution_log
            .extend(log.lines().filter(|l| !l.trim().is_empty()).map(str::to_string));
        let next = if success {
            TestStatus::Completed
        } else {
            TestStatus::Failed
        };
        self.transition(next);
        Ok(())
    }

    /// Which resolution tier each step's element came from
    pub fn resolution_report(&self, generator: &ScriptGenerator) -> Vec<StepResolution> {
        generator
            .render_steps(&self.steps, &self.catalog, &self.url)
            .into_iter()
            .zip(&self.steps)
            .map(|(rendered, step)| StepResolution {
                index: rendered.index,
                raw: step.raw.clone(),
                kind: rendered.kind,
                tier: rendered.resolution.as_ref().map(|r| r.tier),
                matched_description: rendered
                    .resolution
                    .as_ref()
                    .and_then(|r| r.matched_description.clone()),
                primary_selector: rendered
                    .resolution
                    .as_ref()
                    .map(|r| r.locator.primary().to_string()),
            })
            .collect()
    }

    fn require(&self, operation: &'static str, allowed: &[TestStatus]) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            warn!(
                "Rejected {} on test case {} in state {}",
                operation, self.id, self.status
            );
            Err(Error::invalid_transition(operation, self.status))
        }
    }

    fn transition(&mut self, next: TestStatus) {
        info!("Test case {}: {} -> {}", self.id, self.status, next);
        self.status = next;
        self.updated_at = Utc::now();
    }
}
