//! Stepscribe core
//!
//! Compiles natural-language test steps into Playwright Test scripts:
//! - Parses step lines into structured actions
//! - Synthesizes ranked, fallback-terminated locators from observations
//! - Resolves step hints against the discovered element catalog
//! - Renders one script fragment per step
//! - Tracks each test case through its lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TestCase                                                   │
//! │    ├── StepParser: text lines -> [Step]                     │
//! │    ├── exploring: Observation -> SelectorSynthesizer        │
//! │    │                 -> Locator -> ElementCatalog           │
//! │    ├── ScriptGenerator: ([Step], ElementCatalog) -> script  │
//! │    └── runner verdict -> completed | failed                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Step                                                       │
//! │    ├── navigate { target_hint? }                            │
//! │    ├── type_text { field_hint, literal_text? }              │
//! │    ├── click { target_hint }                                │
//! │    ├── select { option_hint, field_hint? }                  │
//! │    ├── wait { duration_ms }                                 │
//! │    ├── verify_text { subject_hint?, expected_text? }        │
//! │    └── manual { raw_text }                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The crate performs no I/O apart from [`GeneratorConfig::load`] and
//! [`GeneratorConfig::save`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod hint;
pub mod parser;
pub mod script;
pub mod selector;
pub mod step;
pub mod test_case;
pub mod types;

pub use catalog::{CatalogEntry, ElementCatalog, Resolution, ResolutionTier};
pub use config::{GeneratorConfig, PlaceholderValues, Viewport};
pub use error::{Error, Result};
pub use hint::HintClass;
pub use parser::StepParser;
pub use script::{RenderedStep, ScriptGenerator};
pub use selector::{RankedSelector, SelectorStrategy, SelectorSynthesizer};
pub use step::{Step, StepAction};
pub use test_case::{StepResolution, TestCase, TestStatus};
pub use types::{ActionCategory, BoundingBox, ElementAttributes, Locator, Observation, ObservedTarget};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
