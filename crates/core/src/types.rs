//! Core types for Stepscribe

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of interaction an observed element took part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Click,
    Input,
    Select,
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionCategory::Click => write!(f, "click"),
            ActionCategory::Input => write!(f, "input"),
            ActionCategory::Select => write!(f, "select"),
        }
    }
}

/// On-screen rectangle reported by the exploring agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Attributes observed on a page element. Every field is optional because
/// the agent reports whatever it happened to see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementAttributes {
    /// Dedicated test hook such as `data-testid`
    #[serde(default)]
    pub stable_id: Option<String>,
    #[serde(default)]
    pub dom_id: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Visible text content
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

/// What the agent reported about the element it touched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservedTarget {
    /// A selector string the agent already considers authoritative
    Selector(String),
    Attributes(ElementAttributes),
}

/// A raw observation emitted after each simulated user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Human-readable element description supplied by the agent
    pub description: String,
    pub category: ActionCategory,
    pub target: ObservedTarget,
}

impl Observation {
    pub fn new(
        description: impl Into<String>,
        category: ActionCategory,
        attributes: ElementAttributes,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            target: ObservedTarget::Attributes(attributes),
        }
    }

    pub fn from_selector(
        description: impl Into<String>,
        category: ActionCategory,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            target: ObservedTarget::Selector(selector.into()),
        }
    }
}

/// Ranked candidate selectors for one element, most reliable first.
///
/// Never empty; the last candidate is always the generic fallback for the
/// element's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Locator {
    candidates: Vec<String>,
}

impl Locator {
    /// Build a locator from specific candidates and a fallback. Duplicates
    /// are dropped and the fallback is kept exactly once, in last position.
    pub fn new(specific: impl IntoIterator<Item = String>, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        let mut candidates: Vec<String> = Vec::new();
        for candidate in specific {
            let candidate = candidate.trim().to_string();
            if candidate.is_empty() || candidate == fallback || candidates.contains(&candidate) {
                continue;
            }
            candidates.push(candidate);
        }
        candidates.push(fallback);
        Self { candidates }
    }

    /// Locator holding only a generic fallback
    pub fn generic(fallback: impl Into<String>) -> Self {
        Self {
            candidates: vec![fallback.into()],
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn primary(&self) -> &str {
        &self.candidates[0]
    }

    pub fn fallback(&self) -> &str {
        &self.candidates[self.candidates.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false; provided for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// True when no observation-backed candidate exists
    pub fn is_generic(&self) -> bool {
        self.candidates.len() == 1
    }
}

impl TryFrom<Vec<String>> for Locator {
    type Error = Error;

    fn try_from(candidates: Vec<String>) -> Result<Self, Self::Error> {
        if candidates.is_empty() {
            return Err(Error::EmptyLocator);
        }
        Ok(Self { candidates })
    }
}

impl From<Locator> for Vec<String> {
    fn from(locator: Locator) -> Self {
        locator.candidates
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.candidates.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_keeps_fallback_last() {
        let locator = Locator::new(
            vec!["#a".to_string(), "button".to_string(), "#a".to_string()],
            "button",
        );
        assert_eq!(locator.candidates(), &["#a".to_string(), "button".to_string()]);
        assert_eq!(locator.fallback(), "button");
        assert_eq!(locator.primary(), "#a");
    }

    #[test]
    fn test_locator_rejects_empty_json() {
        let result: Result<Locator, _> = serde_json::from_str("[]");
        assert!(result.is_err());

        let locator: Locator = serde_json::from_str(r##"["#x", "input"]"##).unwrap();
        assert_eq!(locator.len(), 2);
    }

    #[test]
    fn test_observation_untagged_target() {
        let json = r##"{"description": "login button", "category": "click", "target": "#login-button"}"##;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.target, ObservedTarget::Selector("#login-button".to_string()));

        let json = r#"{"description": "user", "category": "input", "target": {"dom_id": "user-name", "name": "user-name"}}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        match obs.target {
            ObservedTarget::Attributes(attrs) => {
                assert_eq!(attrs.dom_id.as_deref(), Some("user-name"));
                assert!(attrs.classes.is_empty());
            }
            other => panic!("expected attributes, got {:?}", other),
        }
    }
}
