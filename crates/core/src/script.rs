//! Playwright Test script generation
//!
//! Every step renders to exactly one fragment, in order, and the same
//! inputs always produce the same script text. Fragments carry no step
//! number; `assemble` adds the `// Step N` header and any per-step
//! screenshot, so dropping one step leaves the other fragments untouched.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::catalog::{ElementCatalog, Resolution, ResolutionTier};
use crate::config::GeneratorConfig;
use crate::step::{Step, StepAction};
use crate::test_case::TestCase;
use crate::types::Locator;

const INDENT: &str = "    ";
const BLOCK_INDENT: &str = "      ";

/// One step rendered to JavaScript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStep {
    /// 1-based step number
    pub index: usize,
    pub kind: String,
    /// Step body, independent of the step's position
    pub fragment: String,
    /// Catalog resolution, for steps that target an element
    pub resolution: Option<Resolution>,
}

/// Renders steps and whole test files
#[derive(Debug, Clone, Default)]
pub struct ScriptGenerator {
    config: GeneratorConfig,
}

impl ScriptGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render a single step. `index` is the 1-based step number and `url`
    /// the test's target url, used by navigation steps.
    pub fn render(&self, step: &Step, index: usize, catalog: &ElementCatalog, url: &str) -> RenderedStep {
        let resolution = catalog.resolve_step(step);
        let mut out = String::new();

        match (&step.action, &resolution) {
            (StepAction::Navigate { target_hint }, _) => {
                let target = navigation_target(target_hint.as_deref(), url);
                out.push_str(&format!("{INDENT}await page.goto({});\n", js_string(&target)));
                self.push_load_wait(&mut out);
            }
            (StepAction::TypeText { field_hint, literal_text }, Some(resolution)) => {
                let value = match literal_text {
                    Some(text) => text.clone(),
                    None => {
                        let class = step.hint_class();
                        out.push_str(&format!(
                            "{INDENT}// placeholder value for {} field; replace with real test data\n",
                            class
                        ));
                        self.config.placeholders.for_class(class).to_string()
                    }
                };
                self.push_target_block(&mut out, field_hint, resolution, |block| {
                    block.push(format!("await target.fill({});", js_string(&value)));
                });
            }
            (StepAction::Click { target_hint }, Some(resolution)) => {
                let timeout = self.config.action_timeout_ms;
                self.push_target_block(&mut out, target_hint, resolution, |block| {
                    block.push(format!("await target.click({{ timeout: {} }});", timeout));
                });
                self.push_load_wait(&mut out);
            }
            (StepAction::Select { option_hint, field_hint }, Some(resolution)) => {
                let hint = field_hint.as_deref().unwrap_or(option_hint);
                self.push_target_block(&mut out, hint, resolution, |block| {
                    block.push(format!("await target.selectOption({});", js_string(option_hint)));
                });
            }
            (StepAction::Wait { duration_ms }, _) => {
                out.push_str(&format!("{INDENT}await page.waitForTimeout({});\n", duration_ms));
            }
            (StepAction::VerifyText { expected_text: Some(expected), .. }, _) => {
                // getByText matches on substring, so the message may carry more text
                out.push_str(&format!("{INDENT}{{\n"));
                out.push_str(&format!(
                    "{BLOCK_INDENT}const target = page.getByText({}).first();\n",
                    js_string(expected)
                ));
                out.push_str(&format!(
                    "{BLOCK_INDENT}await expect(target).toBeVisible({{ timeout: {} }});\n",
                    self.config.action_timeout_ms
                ));
                out.push_str(&format!(
                    "{BLOCK_INDENT}await expect(target).toContainText({});\n",
                    js_string(expected)
                ));
                out.push_str(&format!("{INDENT}}}\n"));
            }
            (StepAction::VerifyText { subject_hint, expected_text: None }, _) => {
                if let Some(subject) = subject_hint {
                    out.push_str(&format!(
                        "{INDENT}// no expected text given; checking the page rendered ({})\n",
                        comment_text(subject)
                    ));
                }
                out.push_str(&format!("{INDENT}await expect(page.locator('body')).toBeVisible();\n"));
            }
            (StepAction::Manual { raw_text }, _) => {
                out.push_str(&format!("{INDENT}// MANUAL STEP: no automated action matched\n"));
                out.push_str(&format!("{INDENT}// MANUAL STEP: {}\n", comment_text(raw_text)));
            }
            // Element steps always resolve; resolve_step only returns None
            // for steps without a category.
            (_, None) => {
                out.push_str(&format!("{INDENT}// MANUAL STEP: {}\n", comment_text(&step.raw)));
            }
        }

        debug!("Rendered step {} ({})", index, step.kind());
        RenderedStep {
            index,
            kind: step.kind().to_string(),
            fragment: out,
            resolution,
        }
    }

    /// Render every step of a sequence, numbering from 1
    pub fn render_steps(&self, steps: &[Step], catalog: &ElementCatalog, url: &str) -> Vec<RenderedStep> {
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.render(step, i + 1, catalog, url))
            .collect()
    }

    /// Assemble the complete test file for a test case
    pub fn assemble(&self, test_case: &TestCase) -> String {
        let rendered = self.render_steps(test_case.steps(), test_case.catalog(), test_case.url());
        let mut script = self.preamble(test_case);

        for (step, rendered) in test_case.steps().iter().zip(&rendered) {
            script.push('\n');
            script.push_str(&format!("{INDENT}// Step {}: {}\n", rendered.index, comment_text(&step.raw)));
            script.push_str(&rendered.fragment);
            if self.config.screenshot_each_step && !step.is_manual() {
                script.push_str(&format!(
                    "{INDENT}await page.screenshot({{ path: {} }});\n",
                    js_string(&format!("step-{}-{}.png", rendered.index, rendered.kind))
                ));
            }
        }

        script.push_str(&self.epilogue());
        debug!(
            "Assembled script for {:?}: {} step(s), {} bytes",
            test_case.name(),
            rendered.len(),
            script.len()
        );
        script
    }

    fn preamble(&self, test_case: &TestCase) -> String {
        let mut header = format!("// Test: {}\n", comment_text(test_case.name()));
        if !test_case.description().trim().is_empty() {
            header.push_str(&format!("// Description: {}\n", comment_text(test_case.description())));
        }
        header.push_str(&format!("// Target: {}\n", comment_text(test_case.url())));
        header.push_str("// Generated by stepscribe\n");

        let name = js_string(test_case.name());
        format!(
            r#"{header}
const {{ test, expect }} = require('@playwright/test');

test.describe({name}, () => {{
  test({name}, async ({{ page }}) => {{
    await page.setViewportSize({{ width: {width}, height: {height} }});
"#,
            width = self.config.viewport.width,
            height = self.config.viewport.height,
        )
    }

    fn epilogue(&self) -> String {
        let mut out = String::new();
        if self.config.final_screenshot {
            out.push_str(&format!("\n{INDENT}// Final screenshot\n"));
            out.push_str(&format!(
                "{INDENT}await page.screenshot({{ path: 'test-complete.png', fullPage: true }});\n"
            ));
        }
        out.push_str("  });\n});\n");
        out
    }

    fn push_load_wait(&self, out: &mut String) {
        out.push_str(&format!(
            "{INDENT}await page.waitForLoadState({});\n",
            js_string(&self.config.load_state)
        ));
    }

    fn push_target_block<F>(&self, out: &mut String, hint: &str, resolution: &Resolution, actions: F)
    where
        F: FnOnce(&mut Vec<String>),
    {
        if resolution.tier == ResolutionTier::Generic {
            out.push_str(&format!(
                "{INDENT}// no discovered element for \"{}\"; using generic selector\n",
                comment_text(hint)
            ));
        }
        let mut block = vec![format!(
            "await target.waitFor({{ state: 'visible', timeout: {} }});",
            self.config.action_timeout_ms
        )];
        actions(&mut block);

        out.push_str(&format!("{INDENT}{{\n"));
        out.push_str(&target_declaration(&resolution.locator));
        for line in block {
            out.push_str(BLOCK_INDENT);
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!("{INDENT}}}\n"));
    }
}

/// `const target = page.locator(a).or(page.locator(b))….first();`
fn target_declaration(locator: &Locator) -> String {
    let mut candidates = locator.candidates().iter();
    let mut out = format!(
        "{BLOCK_INDENT}const target = page.locator({})",
        js_string(candidates.next().map(String::as_str).unwrap_or("body"))
    );
    for candidate in candidates {
        out.push_str(&format!("\n{BLOCK_INDENT}  .or(page.locator({}))", js_string(candidate)));
    }
    out.push_str(&format!("\n{BLOCK_INDENT}  .first();\n"));
    out
}

/// Absolute url for a navigation step
fn navigation_target(hint: Option<&str>, test_url: &str) -> String {
    let test_url = test_url.trim();
    let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return test_url.to_string();
    };
    if hint.contains("://") {
        return hint.to_string();
    }
    if !hint.starts_with('/') {
        return format!("https://{}", hint);
    }
    // `/path` and `//host/path` resolve against the test url
    match Url::parse(test_url).and_then(|base| base.join(hint)) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            debug!("Cannot resolve {:?} against {:?}: {}", hint, test_url, e);
            hint.to_string()
        }
    }
}

/// Single-quoted JavaScript string literal
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Text safe to place after `//` on a single line
fn comment_text(value: &str) -> String {
    value
        .split(|c: char| c == '\n' || c == '\r' || c == '\u{2028}' || c == '\u{2029}')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::StepParser;
    use crate::types::ActionCategory;

    const URL: &str = "https://www.saucedemo.com/inventory.html";

    fn render(line: &str, catalog: &ElementCatalog) -> RenderedStep {
        ScriptGenerator::default().render(&StepParser::parse(line), 1, catalog, URL)
    }

    #[test]
    fn test_navigate_uses_test_url_and_load_state() {
        let rendered = render("Navigate to the website", &ElementCatalog::new());
        assert!(rendered.fragment.starts_with(&format!("    await page.goto('{}');", URL)));
        assert!(rendered.fragment.contains("await page.waitForLoadState('networkidle');"));
        assert!(rendered.resolution.is_none());
    }

    #[test]
    fn test_navigation_targets() {
        assert_eq!(navigation_target(Some("/cart.html"), URL), "https://www.saucedemo.com/cart.html");
        assert_eq!(navigation_target(Some("example.org/login"), URL), "https://example.org/login");
        assert_eq!(navigation_target(Some("http://localhost:3000"), URL), "http://localhost:3000");
        assert_eq!(navigation_target(None, URL), URL);
    }

    #[test]
    fn test_relative_navigation_ignores_query_and_fragment() {
        assert_eq!(
            navigation_target(Some("/cart.html"), "https://www.saucedemo.com?ref=1"),
            "https://www.saucedemo.com/cart.html"
        );
        assert_eq!(
            navigation_target(Some("/cart.html"), "https://www.saucedemo.com#top"),
            "https://www.saucedemo.com/cart.html"
        );
        assert_eq!(
            navigation_target(Some("/checkout?step=2#form"), "https://shop.test:8443/a/b?x=y"),
            "https://shop.test:8443/checkout?step=2#form"
        );
        assert_eq!(
            navigation_target(Some("//cdn.test/login"), "https://www.saucedemo.com/inventory.html"),
            "https://cdn.test/login"
        );
        // unparseable base keeps the hint as written
        assert_eq!(navigation_target(Some("/cart.html"), "saucedemo"), "/cart.html");
    }

    #[test]
    fn test_type_with_literal_uses_catalog_locator() {
        let mut catalog = ElementCatalog::new();
        catalog.record(
            "username field",
            ActionCategory::Input,
            Locator::new(vec!["#user-name".to_string()], "input[type=\"text\"]"),
        );
        let rendered = render("Type 'standard_user' into the username field", &catalog);

        assert!(rendered.fragment.contains("const target = page.locator('#user-name')"));
        assert!(rendered.fragment.contains(".or(page.locator('input[type=\"text\"]'))"));
        assert!(rendered.fragment.contains(".first();"));
        assert!(rendered.fragment.contains("await target.fill('standard_user');"));
        assert!(!rendered.fragment.contains("placeholder value"));
        assert_eq!(rendered.resolution.map(|r| r.tier), Some(ResolutionTier::Keyword));
    }

    #[test]
    fn test_type_without_literal_marks_placeholder() {
        let rendered = render("Enter password", &ElementCatalog::new());
        assert!(rendered.fragment.contains("// placeholder value for password field"));
        assert!(rendered.fragment.contains("await target.fill('testpassword123');"));
        assert!(rendered.fragment.contains("// no discovered element for \"password\""));
        assert!(rendered.fragment.contains("page.locator('input[type=\"password\"]')"));
    }

    #[test]
    fn test_click_waits_for_load_state() {
        let rendered = render("Click the login button", &ElementCatalog::new());
        let click = rendered.fragment.find("await target.click(").unwrap();
        let wait = rendered.fragment.find("waitForLoadState").unwrap();
        assert!(click < wait);
        assert!(rendered.fragment.contains("button[type=\"submit\"]"));
    }

    #[test]
    fn test_verify_with_and_without_text() {
        let with_text = render("Verify 'Products' is displayed", &ElementCatalog::new());
        assert!(with_text.fragment.contains("const target = page.getByText('Products').first();"));
        assert!(with_text.fragment.contains("await expect(target).toContainText('Products');"));

        let without = render("Verify the page loaded", &ElementCatalog::new());
        assert!(without.fragment.contains("await expect(page.locator('body')).toBeVisible();"));
    }

    #[test]
    fn test_verify_matches_partial_message() {
        let rendered = render("Verify 'Thank you' message is displayed", &ElementCatalog::new());
        assert!(rendered.fragment.contains("page.getByText('Thank you')"));
        assert!(!rendered.fragment.contains("text=\""));
        assert!(rendered.fragment.contains("await expect(target).toContainText('Thank you');"));
    }

    #[test]
    fn test_manual_step_is_comment_only() {
        let rendered = render("Admire the sunset", &ElementCatalog::new());
        for line in rendered.fragment.lines() {
            assert!(line.trim_start().starts_with("//"), "unexpected statement: {line}");
        }
        assert!(rendered.fragment.contains("MANUAL STEP"));
    }

    #[test]
    fn test_wait_and_per_step_screenshot() {
        let config = GeneratorConfig {
            screenshot_each_step: true,
            ..Default::default()
        };
        let generator = ScriptGenerator::new(config);
        let rendered = generator.render(&StepParser::parse("Wait 3 seconds"), 4, &ElementCatalog::new(), URL);
        assert_eq!(rendered.fragment, "    await page.waitForTimeout(3000);\n");

        let mut tc = TestCase::new("Shots", URL, "Click submit\nWait 3 seconds\nAdmire the sunset");
        tc.begin_exploration().unwrap();
        let script = tc.finish_exploration(&generator).unwrap();
        assert!(script.contains("// Step 2: Wait 3 seconds\n    await page.waitForTimeout(3000);\n"));
        assert!(script.contains("path: 'step-1-click.png'"));
        assert!(script.contains("path: 'step-2-wait.png'"));
        assert!(!script.contains("step-3-manual.png"));
    }

    #[test]
    fn test_fragment_is_independent_of_position() {
        let generator = ScriptGenerator::default();
        let catalog = ElementCatalog::new();
        let click = StepParser::parse("Click the login button");
        let alone = generator.render(&click, 1, &catalog, URL);
        let after_wait = generator.render_steps(&[StepParser::parse("Wait 1 second"), click], &catalog, URL);

        assert_eq!(after_wait[1].index, 2);
        assert_eq!(after_wait[1].fragment, alone.fragment);
    }

    #[test]
    fn test_js_string_escaping() {
        assert_eq!(js_string("it's"), r"'it\'s'");
        assert_eq!(js_string("a\\b\nc"), r"'a\\b\nc'");
        assert_eq!(comment_text("line one\nline two"), "line one line two");
    }
}
