//! Script generation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::hint::HintClass;
use crate::selector::SelectorSynthesizer;

/// Settings consumed by the synthesizer and the script generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Values typed when a step names a field but quotes no text
    pub placeholders: PlaceholderValues,

    /// Browser viewport set at the start of the test
    pub viewport: Viewport,

    /// Load state awaited after navigation and clicks
    pub load_state: String,

    /// Timeout for element visibility waits
    pub action_timeout_ms: u64,

    /// Take a screenshot after every step
    pub screenshot_each_step: bool,

    /// Take a full-page screenshot when the test finishes
    pub final_screenshot: bool,

    /// Attribute holding stable test ids on the target site
    pub test_id_attribute: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            placeholders: PlaceholderValues::default(),
            viewport: Viewport::default(),
            load_state: "networkidle".to_string(),
            action_timeout_ms: 10_000,
            screenshot_each_step: false,
            final_screenshot: true,
            test_id_attribute: "data-testid".to_string(),
        }
    }
}

/// Stand-in literals for text entry steps without quoted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderValues {
    pub username: String,
    pub password: String,
    pub email: String,
    pub generic: String,
}

impl Default for PlaceholderValues {
    fn default() -> Self {
        Self {
            username: "testuser".to_string(),
            password: "testpassword123".to_string(),
            email: "test@example.com".to_string(),
            generic: "test input".to_string(),
        }
    }
}

impl PlaceholderValues {
    pub fn for_class(&self, class: HintClass) -> &str {
        match class {
            HintClass::Username => &self.username,
            HintClass::Password => &self.password,
            HintClass::Email => &self.email,
            HintClass::Login | HintClass::Generic => &self.generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

const LOAD_STATES: &[&str] = &["load", "domcontentloaded", "networkidle"];

impl GeneratorConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !LOAD_STATES.contains(&self.load_state.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "load_state must be one of {}, got {:?}",
                LOAD_STATES.join(", "),
                self.load_state
            )));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::InvalidConfig("viewport dimensions must be non-zero".to_string()));
        }
        if self.test_id_attribute.trim().is_empty() {
            return Err(Error::InvalidConfig("test_id_attribute must not be empty".to_string()));
        }
        Ok(())
    }

    /// Synthesizer matching this configuration
    pub fn synthesizer(&self) -> SelectorSynthesizer {
        SelectorSynthesizer::new(self.test_id_attribute.clone())
    }
}
