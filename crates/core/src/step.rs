//! Structured test steps

use serde::{Deserialize, Serialize};

use crate::hint::HintClass;
use crate::parser;
use crate::types::ActionCategory;

/// A single structured action derived from one natural-language line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// The line exactly as the author wrote it
    pub raw: String,

    #[serde(flatten)]
    pub action: StepAction,
}

/// The closed set of step kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Open a page. `None` means the test case's own url.
    Navigate { target_hint: Option<String> },

    /// Enter text into a field
    TypeText {
        field_hint: String,
        #[serde(default)]
        literal_text: Option<String>,
    },

    /// Click an element
    Click { target_hint: String },

    /// Pick an option from a dropdown
    Select {
        option_hint: String,
        #[serde(default)]
        field_hint: Option<String>,
    },

    /// Fixed pause
    Wait { duration_ms: u64 },

    /// Assert something is on the page
    VerifyText {
        #[serde(default)]
        subject_hint: Option<String>,
        #[serde(default)]
        expected_text: Option<String>,
    },

    /// Line that matched no rule
    Manual { raw_text: String },
}

impl Step {
    pub fn new(raw: impl Into<String>, action: StepAction) -> Self {
        Self {
            raw: raw.into(),
            action,
        }
    }

    /// Short snake_case name of the step kind
    pub fn kind(&self) -> &'static str {
        match &self.action {
            StepAction::Navigate { .. } => "navigate",
            StepAction::TypeText { .. } => "type_text",
            StepAction::Click { .. } => "click",
            StepAction::Select { .. } => "select",
            StepAction::Wait { .. } => "wait",
            StepAction::VerifyText { .. } => "verify_text",
            StepAction::Manual { .. } => "manual",
        }
    }

    /// Element category this step interacts with, if it targets an element
    pub fn category(&self) -> Option<ActionCategory> {
        match &self.action {
            StepAction::TypeText { .. } => Some(ActionCategory::Input),
            StepAction::Click { .. } => Some(ActionCategory::Click),
            StepAction::Select { .. } => Some(ActionCategory::Select),
            _ => None,
        }
    }

    /// Element phrase used for catalog resolution
    pub fn element_hint(&self) -> Option<&str> {
        match &self.action {
            StepAction::TypeText { field_hint, .. } => Some(field_hint),
            StepAction::Click { target_hint } => Some(target_hint),
            StepAction::Select {
                field_hint,
                option_hint,
            } => Some(field_hint.as_deref().unwrap_or(option_hint)),
            _ => None,
        }
    }

    /// Keyword family of this step. The element hint decides first; when it
    /// is generic the whole line (minus quoted literals) is scanned, so
    /// "Submit the form" still lands in the login family.
    pub fn hint_class(&self) -> HintClass {
        let from_hint = self
            .element_hint()
            .map(HintClass::classify)
            .unwrap_or(HintClass::Generic);
        if from_hint != HintClass::Generic {
            return from_hint;
        }
        HintClass::classify(&parser::strip_quoted(&self.raw))
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.action, StepAction::Manual { .. })
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.action {
            StepAction::Navigate { target_hint } => {
                write!(f, "navigate:{}", target_hint.as_deref().unwrap_or("<test url>"))
            }
            StepAction::TypeText { field_hint, .. } => write!(f, "type:{}", field_hint),
            StepAction::Click { target_hint } => write!(f, "click:{}", target_hint),
            StepAction::Select { option_hint, .. } => write!(f, "select:{}", option_hint),
            StepAction::Wait { duration_ms } => write!(f, "wait:{}ms", duration_ms),
            StepAction::VerifyText { expected_text, .. } => {
                write!(f, "verify:{}", expected_text.as_deref().unwrap_or("<visible>"))
            }
            StepAction::Manual { .. } => write!(f, "manual"),
        }
    }
}
