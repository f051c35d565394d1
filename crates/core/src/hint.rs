//! Hint classification shared by the parser, synthesizer and catalog
//!
//! A hint is any human phrase naming an element ("username field", "the
//! login button"). Classification is a plain keyword scan so that the same
//! phrase always selects the same default literal and selector family.

use serde::{Deserialize, Serialize};

use crate::types::ActionCategory;

/// Keyword family of a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintClass {
    Username,
    Password,
    Email,
    Login,
    Generic,
}

/// Checked in order; the first family with a keyword present wins.
const FAMILIES: &[(HintClass, &[&str])] = &[
    (HintClass::Password, &["password", "passcode"]),
    (HintClass::Email, &["email", "e-mail"]),
    (
        HintClass::Username,
        &["username", "user name", "user-name", "user_name", "login id"],
    ),
    (
        HintClass::Login,
        &["login", "log in", "log-in", "sign in", "signin", "sign-in", "submit"],
    ),
];

const INPUT_USERNAME: &str = r#"input[name*="user" i], input[id*="user" i], input[type="text"]"#;
const INPUT_PASSWORD: &str = r#"input[type="password"]"#;
const INPUT_EMAIL: &str = r#"input[type="email"], input[name*="email" i]"#;
const INPUT_ANY: &str =
    r#"input[type="text"], input[type="email"], input[type="password"], textarea"#;
const CLICK_LOGIN: &str =
    r#"button[type="submit"], input[type="submit"], [id*="login" i], [name*="login" i]"#;
const CLICK_ANY: &str = r#"button, [role="button"], [type="submit"], a"#;
const SELECT_ANY: &str = r#"select, [role="listbox"], [role="combobox"]"#;

impl HintClass {
    /// Classify free text by scanning for family keywords
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        FAMILIES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(class, _)| *class)
            .unwrap_or(HintClass::Generic)
    }

    /// Keywords that identify this family; empty for `Generic`
    pub fn keywords(self) -> &'static [&'static str] {
        FAMILIES
            .iter()
            .find(|(class, _)| *class == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    /// Family fallback selector for an element of `category`
    pub fn generic_selector(self, category: ActionCategory) -> &'static str {
        match (category, self) {
            (ActionCategory::Input, HintClass::Username) => INPUT_USERNAME,
            (ActionCategory::Input, HintClass::Password) => INPUT_PASSWORD,
            (ActionCategory::Input, HintClass::Email) => INPUT_EMAIL,
            (ActionCategory::Input, HintClass::Login | HintClass::Generic) => INPUT_ANY,
            (ActionCategory::Click, HintClass::Login) => CLICK_LOGIN,
            (ActionCategory::Click, _) => CLICK_ANY,
            (ActionCategory::Select, _) => SELECT_ANY,
        }
    }
}

impl std::fmt::Display for HintClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HintClass::Username => write!(f, "username"),
            HintClass::Password => write!(f, "password"),
            HintClass::Email => write!(f, "email"),
            HintClass::Login => write!(f, "login"),
            HintClass::Generic => write!(f, "generic"),
        }
    }
}

/// Words that carry no identifying meaning in an element phrase
pub(crate) const STOPWORDS: &[&str] = &[
    "a", "an", "the", "on", "in", "into", "to", "of", "for", "with", "and", "at", "from", "that",
    "this", "is", "are", "be", "it", "its", "page", "field", "box", "input", "textbox", "button",
    "link", "element", "dropdown", "menu", "option", "text", "area",
];

/// Lowercased words of at least three characters that are not stopwords
pub(crate) fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}
