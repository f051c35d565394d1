//! Locator synthesis from raw observations
//!
//! Candidates are produced in a fixed reliability order:
//!
//! ```text
//! stable test id > dom id > aria-label > name > role > classes > short text > generic fallback
//! ```
//!
//! The order is static so identical observations always synthesize
//! byte-identical locators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hint::HintClass;
use crate::types::{ActionCategory, ElementAttributes, Locator, Observation, ObservedTarget};

/// Visible text at or above this many characters is not used as a selector
const MAX_TEXT_CHARS: usize = 50;

static GENERATED_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4,}").expect("valid digit-run pattern"));
static GENERATED_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)random|temp|auto").expect("valid generated-word pattern"));
static CSS_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").expect("valid identifier pattern"));

/// Selector strategies, most reliable first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorStrategy {
    StableId,
    DomId,
    AriaLabel,
    Name,
    Role,
    ClassList,
    Text,
    /// Selector string supplied verbatim by the agent
    Verbatim,
    Generic,
}

/// One synthesized candidate with the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSelector {
    pub strategy: SelectorStrategy,
    pub value: String,
}

/// Builds ranked locators from observations
#[derive(Debug, Clone)]
pub struct SelectorSynthesizer {
    /// Attribute carrying the stable test id
    test_id_attribute: String,
}

impl Default for SelectorSynthesizer {
    fn default() -> Self {
        Self::new("data-testid")
    }
}

impl SelectorSynthesizer {
    pub fn new(test_id_attribute: impl Into<String>) -> Self {
        Self {
            test_id_attribute: test_id_attribute.into(),
        }
    }

    pub fn test_id_attribute(&self) -> &str {
        &self.test_id_attribute
    }

    /// Synthesize a locator for an observation
    pub fn synthesize(&self, observation: &Observation) -> Locator {
        let ranked = self.rank(observation);
        let mut values: Vec<String> = ranked.into_iter().map(|r| r.value).collect();
        // rank() always ends with the generic entry
        let fallback = values.pop().unwrap_or_else(|| {
            generic_fallback(observation.category, &observation.description).to_string()
        });
        let locator = Locator::new(values, fallback);
        debug!(
            "Synthesized {} candidate(s) for {:?}: {}",
            locator.len(),
            observation.description,
            locator
        );
        locator
    }

    /// Every candidate with its strategy, in rank order, generic last
    pub fn rank(&self, observation: &Observation) -> Vec<RankedSelector> {
        let mut ranked = match &observation.target {
            ObservedTarget::Selector(selector) => {
                let selector = selector.trim();
                if selector.is_empty() {
                    Vec::new()
                } else {
                    vec![RankedSelector {
                        strategy: SelectorStrategy::Verbatim,
                        value: selector.to_string(),
                    }]
                }
            }
            ObservedTarget::Attributes(attrs) => self.attribute_candidates(attrs),
        };
        ranked.push(RankedSelector {
            strategy: SelectorStrategy::Generic,
            value: generic_fallback(observation.category, &observation.description).to_string(),
        });
        ranked
    }

    fn attribute_candidates(&self, attrs: &ElementAttributes) -> Vec<RankedSelector> {
        let mut out = Vec::new();
        let mut push = |strategy, value: String| out.push(RankedSelector { strategy, value });

        if let Some(id) = non_empty(&attrs.stable_id) {
            push(
                SelectorStrategy::StableId,
                attribute_selector(&self.test_id_attribute, id),
            );
        }
        if let Some(id) = non_empty(&attrs.dom_id) {
            if looks_generated(id) {
                debug!("Rejecting generated-looking id {:?}", id);
            } else if CSS_IDENT.is_match(id) {
                push(SelectorStrategy::DomId, format!("#{}", id));
            } else {
                push(SelectorStrategy::DomId, attribute_selector("id", id));
            }
        }
        if let Some(label) = non_empty(&attrs.aria_label) {
            push(SelectorStrategy::AriaLabel, attribute_selector("aria-label", label));
        }
        if let Some(name) = non_empty(&attrs.name) {
            push(SelectorStrategy::Name, attribute_selector("name", name));
        }
        if let Some(role) = non_empty(&attrs.role) {
            push(SelectorStrategy::Role, attribute_selector("role", role));
        }

        let classes: Vec<&str> = attrs
            .classes
            .iter()
            .flat_map(|c| c.split_whitespace())
            .filter(|c| CSS_IDENT.is_match(c) && !looks_generated(c))
            .collect();
        if !classes.is_empty() {
            push(SelectorStrategy::ClassList, format!(".{}", classes.join(".")));
        }

        if let Some(text) = non_empty(&attrs.text) {
            if text.chars().count() < MAX_TEXT_CHARS {
                push(SelectorStrategy::Text, text_selector(text));
            }
        }
        out
    }
}

/// Generic fallback for an element, chosen from its category and the
/// keyword family of its description
pub fn generic_fallback(category: ActionCategory, description: &str) -> &'static str {
    HintClass::classify(description).generic_selector(category)
}

/// True for ids and classes that are likely regenerated on every page load
pub fn looks_generated(value: &str) -> bool {
    GENERATED_DIGITS.is_match(value) || GENERATED_WORDS.is_match(value)
}

/// `[attr="value"]` with the value escaped for a double-quoted CSS string
pub fn attribute_selector(attribute: &str, value: &str) -> String {
    format!(r#"[{}="{}"]"#, attribute, escape_css_string(value))
}

/// Playwright text engine selector for exact-ish visible text
pub fn text_selector(text: &str) -> String {
    format!(r#"text="{}""#, escape_css_string(text))
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(description: &str, attrs: ElementAttributes) -> Observation {
        Observation::new(description, ActionCategory::Input, attrs)
    }

    #[test]
    fn test_full_priority_order() {
        let attrs = ElementAttributes {
            stable_id: Some("username".into()),
            dom_id: Some("user-name".into()),
            aria_label: Some("Username".into()),
            name: Some("user-name".into()),
            role: Some("textbox".into()),
            classes: vec!["form_input".into()],
            text: Some("Username".into()),
            bounds: None,
        };
        let locator = SelectorSynthesizer::default().synthesize(&input("username field", attrs));
        assert_eq!(
            locator.candidates(),
            &[
                r#"[data-testid="username"]"#.to_string(),
                "#user-name".to_string(),
                r#"[aria-label="Username"]"#.to_string(),
                r#"[name="user-name"]"#.to_string(),
                r#"[role="textbox"]"#.to_string(),
                ".form_input".to_string(),
                r#"text="Username""#.to_string(),
                HintClass::Username
                    .generic_selector(ActionCategory::Input)
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_generated_id_rejected() {
        let attrs = ElementAttributes {
            dom_id: Some("input-83421".into()),
            name: Some("q".into()),
            ..Default::default()
        };
        let locator = SelectorSynthesizer::default().synthesize(&input("search box", attrs));
        assert_eq!(locator.primary(), r#"[name="q"]"#);
        assert!(!locator.candidates().iter().any(|c| c.contains("83421")));
    }

    #[test]
    fn test_generated_classes_filtered() {
        let attrs = ElementAttributes {
            classes: vec!["btn btn-primary".into(), "css-18273ab".into(), "autofocus-ring".into()],
            ..Default::default()
        };
        let obs = Observation::new("add to cart", ActionCategory::Click, attrs);
        let locator = SelectorSynthesizer::default().synthesize(&obs);
        assert_eq!(locator.primary(), ".btn.btn-primary");
    }

    #[test]
    fn test_long_text_skipped() {
        let attrs = ElementAttributes {
            text: Some("x".repeat(60)),
            ..Default::default()
        };
        let obs = Observation::new("banner", ActionCategory::Click, attrs);
        let locator = SelectorSynthesizer::default().synthesize(&obs);
        assert!(locator.is_generic());
        assert_eq!(locator.fallback(), r#"button, [role="button"], [type="submit"], a"#);
    }

    #[test]
    fn test_unstructured_selector_is_authoritative() {
        let obs = Observation::from_selector("login button", ActionCategory::Click, "#login-button");
        let locator = SelectorSynthesizer::default().synthesize(&obs);
        assert_eq!(locator.len(), 2);
        assert_eq!(locator.primary(), "#login-button");
        assert_eq!(
            locator.fallback(),
            HintClass::Login.generic_selector(ActionCategory::Click)
        );
    }

    #[test]
    fn test_custom_test_id_attribute_and_escaping() {
        let attrs = ElementAttributes {
            stable_id: Some("login-\"btn\"".into()),
            dom_id: Some("1st".into()),
            ..Default::default()
        };
        let obs = Observation::new("login", ActionCategory::Click, attrs);
        let locator = SelectorSynthesizer::new("data-test").synthesize(&obs);
        assert_eq!(locator.primary(), r#"[data-test="login-\"btn\""]"#);
        assert_eq!(locator.candidates()[1], r#"[id="1st"]"#);
    }

    #[test]
    fn test_looks_generated() {
        assert!(looks_generated("ember1234"));
        assert!(looks_generated("tempField"));
        assert!(looks_generated("AutoId"));
        assert!(!looks_generated("login-button"));
        assert!(!looks_generated("item-42"));
    }
}
