//! Natural-language step parsing
//!
//! Lines are matched against a fixed, ordered rule table. Each rule has a
//! keyword pattern and a builder; a builder may decline a line (for example
//! a selection with no option), in which case matching continues. Matching
//! runs two passes over the table: first only rules whose keyword is the
//! line's leading verb, then rules whose keyword appears anywhere. A line no
//! rule accepts becomes [`StepAction::Manual`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::hint::{HintClass, STOPWORDS};
use crate::step::{Step, StepAction};

const DEFAULT_WAIT_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Navigate,
    TypeText,
    Click,
    Select,
    Wait,
    Verify,
}

/// Declared evaluation order
const RULES: [Rule; 6] = [
    Rule::Navigate,
    Rule::TypeText,
    Rule::Click,
    Rule::Select,
    Rule::Wait,
    Rule::Verify,
];

/// Optional list markers and connective words before the leading verb
const LEAD: &str = r"(?i)^(?:\s*(?:\d+[.):]|[-*•]|step\s+\d+[.):]?|then|and|next|now|finally|please)\s*,?)*\s*";

fn keywords(rule: Rule) -> &'static str {
    match rule {
        Rule::Navigate => r"navigate|go\s+to",
        Rule::TypeText => r"type|enter|fill|input",
        Rule::Click => r"click|tap|press|submit|log\s?in|sign\s?in",
        Rule::Select => r"select|choose",
        Rule::Wait => r"wait",
        Rule::Verify => r"verify|check|validate|assert|ensure",
    }
}

struct RulePatterns {
    leading: Regex,
    anywhere: Regex,
}

static PATTERNS: Lazy<Vec<(Rule, RulePatterns)>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let kw = keywords(*rule);
            let patterns = RulePatterns {
                leading: Regex::new(&format!(r"{LEAD}(?:{kw})\b")).expect("valid leading pattern"),
                anywhere: Regex::new(&format!(r"(?i)\b(?:{kw})\b")).expect("valid keyword pattern"),
            };
            (*rule, patterns)
        })
        .collect()
});

static QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[^\w])'([^']+)'(?:[^\w]|$)|"([^"]+)"|“([^”]+)”"#).expect("valid quote pattern")
});
static FILL_WITH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:fill|enter|type|input)\s+(?:in\s+|out\s+)?(.+?)\s+with\b")
        .expect("valid fill pattern")
});
static INTO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:into|in|on|inside)\s+(.+)$").expect("valid into pattern")
});
static SELECT_REST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:select|choose)\b\s*(.*)$").expect("valid select pattern")
});
static SELECT_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)\s*\b(?:from|in|on)\b\s*(.*)$").expect("valid split pattern")
});
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(ms|milliseconds?|msecs?|minutes?|mins?|s|secs?|seconds?)?\b").expect("valid duration pattern")
});
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9-]+(?:\.[a-z0-9-]+)+(?::\d+)?(?:/\S*)?$").expect("valid domain pattern")
});

/// Words that only shape a verification sentence
const VERIFY_FILLER: &[&str] = &[
    "verify", "check", "validate", "assert", "ensure", "that", "there", "is", "are", "present",
    "visible", "displayed", "shown", "shows", "show", "contains", "contain", "has", "have",
    "appears", "appear", "exists", "exist", "should", "be", "being", "correctly", "text",
];

/// Parses natural-language lines into [`Step`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct StepParser;

impl StepParser {
    /// Parse one line. Never fails: unmatched input becomes a manual step.
    pub fn parse(line: &str) -> Step {
        let trimmed = line.trim();
        let action = Self::match_rules(trimmed).unwrap_or_else(|| StepAction::Manual {
            raw_text: trimmed.to_string(),
        });
        let step = Step::new(trimmed, action);
        debug!("Parsed step {:?} as {}", trimmed, step);
        step
    }

    /// Parse a multi-line body: one step per non-blank line
    pub fn parse_steps(text: &str) -> Vec<Step> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(Self::parse)
            .collect()
    }

    fn match_rules(line: &str) -> Option<StepAction> {
        let leading = PATTERNS
            .iter()
            .filter(|(_, p)| p.leading.is_match(line))
            .find_map(|(rule, _)| build(*rule, line));
        if leading.is_some() {
            return leading;
        }
        PATTERNS
            .iter()
            .filter(|(_, p)| p.anywhere.is_match(line))
            .find_map(|(rule, _)| build(*rule, line))
    }
}

fn build(rule: Rule, line: &str) -> Option<StepAction> {
    match rule {
        Rule::Navigate => Some(StepAction::Navigate {
            target_hint: url_token(line),
        }),
        Rule::TypeText => Some(build_type_text(line)),
        Rule::Click => Some(build_click(line)),
        Rule::Select => build_select(line),
        Rule::Wait => Some(StepAction::Wait {
            duration_ms: wait_duration(line),
        }),
        Rule::Verify => Some(build_verify(line)),
    }
}

fn build_type_text(line: &str) -> StepAction {
    let literal_text = first_quoted(line);
    let unquoted = strip_quoted(line);

    let phrase = FILL_WITH
        .captures(line)
        .map(|c| strip_quoted(&c[1]))
        .or_else(|| INTO.captures(&unquoted).map(|c| c[1].to_string()))
        .unwrap_or_else(|| after_keyword(Rule::TypeText, &unquoted));

    let mut field_hint = normalize_hint(&phrase);
    if field_hint.is_empty() {
        field_hint = match HintClass::classify(&unquoted) {
            HintClass::Generic => "input".to_string(),
            class => class.to_string(),
        };
    }

    StepAction::TypeText {
        field_hint,
        literal_text,
    }
}

fn build_click(line: &str) -> StepAction {
    let unquoted = strip_quoted(line);
    let mut target_hint = match first_quoted(line) {
        Some(quoted) => quoted.trim().to_lowercase(),
        None => normalize_hint(&after_keyword(Rule::Click, &unquoted)),
    };
    if target_hint.is_empty() {
        // "Submit", "Log in": the verb itself names the target
        target_hint = PATTERNS
            .iter()
            .find(|(r, _)| *r == Rule::Click)
            .and_then(|(_, p)| p.anywhere.find(line))
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| "element".to_string());
    }
    StepAction::Click { target_hint }
}

fn build_select(line: &str) -> Option<StepAction> {
    let rest = SELECT_REST.captures(line)?.get(1)?.as_str().trim().to_string();

    let (option, field) = match first_quoted(&rest) {
        Some(quoted) => {
            let remainder = strip_quoted(&rest);
            let field = SELECT_SPLIT
                .captures(&remainder)
                .map(|c| c[2].to_string())
                .unwrap_or_default();
            (quoted, field)
        }
        None => match SELECT_SPLIT.captures(&rest) {
            Some(c) => (c[1].to_string(), c[2].to_string()),
            None => (rest.clone(), String::new()),
        },
    };

    let option_hint = strip_leading_words(option.trim(), &["the", "option", "value"]);
    if option_hint.is_empty() {
        return None;
    }
    let field_hint = Some(normalize_hint(&field)).filter(|f| !f.is_empty());

    Some(StepAction::Select {
        option_hint,
        field_hint,
    })
}

fn build_verify(line: &str) -> StepAction {
    let expected_text = first_quoted(line);
    let unquoted = strip_quoted(line);
    let subject: Vec<String> = words(&unquoted)
        .filter(|w| !VERIFY_FILLER.contains(&w.as_str()) && !STOPWORDS.contains(&w.as_str()))
        .collect();
    let subject_hint = Some(subject.join(" ")).filter(|s| !s.is_empty());

    StepAction::VerifyText {
        subject_hint,
        expected_text,
    }
}

/// Milliseconds for a wait line: the first number after "wait", in seconds
/// unless a millisecond or minute unit follows it. Fractions round to the
/// nearest millisecond; amounts too large for a u64 saturate.
fn wait_duration(line: &str) -> u64 {
    let start = PATTERNS
        .iter()
        .find(|(r, _)| *r == Rule::Wait)
        .and_then(|(_, p)| p.anywhere.find(line))
        .map(|m| m.end())
        .unwrap_or(0);

    let Some(caps) = DURATION.captures(&line[start..]) else {
        return DEFAULT_WAIT_MS;
    };
    let amount = &caps[1];
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
    let factor: u64 = match unit.as_deref() {
        Some(u) if u.starts_with("min") => 60_000,
        Some(u) if u.starts_with('m') => 1,
        _ => 1000,
    };

    let millis = match amount.parse::<u64>() {
        Ok(whole) => whole.saturating_mul(factor),
        // fractional or oversized; float-to-int casts saturate
        Err(_) => (amount.parse::<f64>().unwrap_or(f64::MAX) * factor as f64).round() as u64,
    };
    if millis == u64::MAX {
        debug!("Wait amount {:?} overflows; saturating to {} ms", amount, millis);
    }
    millis
}

/// Last URL-like token on the line
fn url_token(line: &str) -> Option<String> {
    line.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| matches!(c, '\'' | '"' | '“' | '”' | '(' | ')' | '<' | '>'))
                .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
        })
        .filter(|t| is_url_like(t))
        .last()
        .map(str::to_string)
}

fn is_url_like(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("www.")
        || (token.starts_with('/') && token.len() > 1)
        || DOMAIN.is_match(token)
}

/// First non-empty single-, double- or curly-quoted substring
pub(crate) fn first_quoted(text: &str) -> Option<String> {
    QUOTED.captures_iter(text).find_map(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .or_else(|| c.get(3))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.trim().is_empty())
    })
}

/// The text with every quoted substring removed
pub(crate) fn strip_quoted(text: &str) -> String {
    QUOTED.replace_all(text, " ").into_owned()
}

/// Text after the rule's first keyword occurrence
fn after_keyword(rule: Rule, text: &str) -> String {
    PATTERNS
        .iter()
        .find(|(r, _)| *r == rule)
        .and_then(|(_, p)| p.anywhere.find(text))
        .map(|m| text[m.end()..].to_string())
        .unwrap_or_default()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '_')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Lowercase an element phrase and drop articles and generic element nouns:
/// "the Username field" becomes "username".
pub(crate) fn normalize_hint(phrase: &str) -> String {
    words(phrase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_leading_words(text: &str, leading: &[&str]) -> String {
    let mut rest = text.trim();
    loop {
        let next = leading.iter().find_map(|w| {
            let (head, tail) = rest.split_once(char::is_whitespace)?;
            head.eq_ignore_ascii_case(w).then_some(tail.trim_start())
        });
        match next {
            Some(tail) => rest = tail,
            None => return rest.to_string(),
        }
    }
}
