//! Element catalog accumulated during exploration

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hint::{significant_words, HintClass};
use crate::selector::SelectorSynthesizer;
use crate::step::Step;
use crate::types::{ActionCategory, Locator, Observation};

/// Which resolution level produced a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    /// Description equal to the hint
    Exact,
    /// Description shares the hint's keywords
    Keyword,
    /// Nothing discovered; family fallback only
    Generic,
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionTier::Exact => write!(f, "exact"),
            ResolutionTier::Keyword => write!(f, "keyword"),
            ResolutionTier::Generic => write!(f, "generic"),
        }
    }
}

/// Outcome of resolving a hint against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub locator: Locator,
    pub tier: ResolutionTier,
    /// Catalog description that matched, for tiers other than `Generic`
    pub matched_description: Option<String>,
}

/// A discovered element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub description: String,
    pub category: ActionCategory,
    pub locator: Locator,
}

/// Map from element description to locator.
///
/// Descriptions are unique; recording an existing description replaces its
/// entry in place, so first-insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCatalog {
    entries: Vec<CatalogEntry>,
}

impl ElementCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a locator under a description (last write wins)
    pub fn record(
        &mut self,
        description: impl Into<String>,
        category: ActionCategory,
        locator: Locator,
    ) {
        let description = description.into();
        let entry = CatalogEntry {
            description: description.clone(),
            category,
            locator,
        };
        match self.position(&description) {
            Some(i) => {
                debug!("Replacing catalog entry {:?}", description);
                self.entries[i] = entry;
            }
            None => {
                debug!("Adding catalog entry {:?}", description);
                self.entries.push(entry);
            }
        }
    }

    /// Synthesize a locator for an observation and record it
    pub fn record_observation(
        &mut self,
        observation: &Observation,
        synthesizer: &SelectorSynthesizer,
    ) -> &CatalogEntry {
        let locator = synthesizer.synthesize(observation);
        self.record(observation.description.clone(), observation.category, locator);
        let index = self
            .position(&observation.description)
            .unwrap_or(self.entries.len() - 1);
        &self.entries[index]
    }

    pub fn get(&self, description: &str) -> Option<&CatalogEntry> {
        self.position(description).map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resolve a hint for an element of `category`. Never fails: a miss
    /// yields the family fallback for the hint.
    pub fn resolve(&self, hint: &str, category: ActionCategory) -> Resolution {
        self.resolve_classified(hint, HintClass::classify(hint), category)
    }

    /// Resolve the element a step targets; `None` for steps without one
    pub fn resolve_step(&self, step: &Step) -> Option<Resolution> {
        let category = step.category()?;
        let hint = step.element_hint()?;
        Some(self.resolve_classified(hint, step.hint_class(), category))
    }

    fn resolve_classified(&self, hint: &str, class: HintClass, category: ActionCategory) -> Resolution {
        if let Some(entry) = self.get(hint) {
            return Self::hit(entry, ResolutionTier::Exact, hint);
        }
        if let Some(entry) = self.keyword_match(hint, class, category) {
            return Self::hit(entry, ResolutionTier::Keyword, hint);
        }
        debug!("No catalog entry for {:?}; using {} fallback", hint, class);
        Resolution {
            locator: Locator::generic(class.generic_selector(category)),
            tier: ResolutionTier::Generic,
            matched_description: None,
        }
    }

    fn hit(entry: &CatalogEntry, tier: ResolutionTier, hint: &str) -> Resolution {
        debug!(
            "Resolved {:?} to {:?} ({} match)",
            hint, entry.description, tier
        );
        Resolution {
            locator: entry.locator.clone(),
            tier,
            matched_description: Some(entry.description.clone()),
        }
    }

    fn keyword_match(&self, hint: &str, class: HintClass, category: ActionCategory) -> Option<&CatalogEntry> {
        let mut candidates = self.entries.iter().filter(|e| e.category == category);

        if class != HintClass::Generic {
            let keywords = class.keywords();
            return candidates.find(|e| {
                let description = e.description.to_lowercase();
                keywords.iter().any(|k| description.contains(k))
            });
        }

        let hint_words = significant_words(hint);
        if hint_words.is_empty() {
            return None;
        }
        let mut best: Option<(&CatalogEntry, usize)> = None;
        for entry in candidates {
            let entry_words = significant_words(&entry.description);
            let overlap = hint_words.iter().filter(|w| entry_words.contains(w)).count();
            if overlap > 0 && best.map_or(true, |(_, score)| overlap > score) {
                best = Some((entry, overlap));
            }
        }
        best.map(|(entry, _)| entry)
    }

    fn position(&self, description: &str) -> Option<usize> {
        let key = description.trim();
        self.entries
            .iter()
            .position(|e| e.description.trim().eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementAttributes;

    fn locator(primary: &str, category: ActionCategory) -> Locator {
        Locator::new(
            vec![primary.to_string()],
            HintClass::Generic.generic_selector(category),
        )
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let mut catalog = ElementCatalog::new();
        catalog.record("Username Field", ActionCategory::Input, locator("#user-name", ActionCategory::Input));

        let resolution = catalog.resolve("username field", ActionCategory::Input);
        assert_eq!(resolution.tier, ResolutionTier::Exact);
        assert_eq!(resolution.locator.primary(), "#user-name");
    }

    #[test]
    fn test_keyword_tier_for_classified_hint() {
        let mut catalog = ElementCatalog::new();
        catalog.record("search box", ActionCategory::Input, locator("#q", ActionCategory::Input));
        catalog.record("the password input", ActionCategory::Input, locator("#password", ActionCategory::Input));

        let resolution = catalog.resolve("password", ActionCategory::Input);
        assert_eq!(resolution.tier, ResolutionTier::Keyword);
        assert_eq!(resolution.locator.primary(), "#password");
        assert_eq!(resolution.matched_description.as_deref(), Some("the password input"));
    }

    #[test]
    fn test_keyword_tier_respects_category() {
        let mut catalog = ElementCatalog::new();
        catalog.record("password reset link", ActionCategory::Click, locator("#reset", ActionCategory::Click));

        let resolution = catalog.resolve("password", ActionCategory::Input);
        assert_eq!(resolution.tier, ResolutionTier::Generic);
        assert_eq!(resolution.locator.candidates(), &[r#"input[type="password"]"#.to_string()]);
    }

    #[test]
    fn test_word_overlap_for_generic_hint() {
        let mut catalog = ElementCatalog::new();
        catalog.record("cart icon", ActionCategory::Click, locator(".cart", ActionCategory::Click));
        catalog.record("add to cart button", ActionCategory::Click, locator("#add-to-cart", ActionCategory::Click));

        let resolution = catalog.resolve("add to cart", ActionCategory::Click);
        assert_eq!(resolution.tier, ResolutionTier::Keyword);
        assert_eq!(resolution.locator.primary(), "#add-to-cart");
    }

    #[test]
    fn test_miss_yields_generic_login_family() {
        let catalog = ElementCatalog::new();
        let resolution = catalog.resolve("login", ActionCategory::Click);
        assert_eq!(resolution.tier, ResolutionTier::Generic);
        assert_eq!(resolution.matched_description, None);
        assert!(resolution.locator.is_generic());
        assert!(resolution.locator.primary().contains(r#"button[type="submit"]"#));
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let synthesizer = SelectorSynthesizer::default();
        let mut catalog = ElementCatalog::new();

        let first = Observation::new(
            "password field",
            ActionCategory::Input,
            ElementAttributes {
                dom_id: Some("password".into()),
                ..Default::default()
            },
        );
        let other = Observation::from_selector("login button", ActionCategory::Click, "#login-button");
        let second = Observation::new(
            "password field",
            ActionCategory::Input,
            ElementAttributes {
                stable_id: Some("password".into()),
                dom_id: Some("password".into()),
                ..Default::default()
            },
        );

        catalog.record_observation(&first, &synthesizer);
        catalog.record_observation(&other, &synthesizer);
        let entry = catalog.record_observation(&second, &synthesizer).clone();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].description, "password field");
        assert_eq!(entry.locator.primary(), r#"[data-testid="password"]"#);
        assert_eq!(entry.locator.candidates()[1], "#password");
    }
}
