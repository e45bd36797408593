//! Fixture-based pytest module rendering.

use std::fmt::Write as _;

use super::{first_url, DEFAULT_TARGET_URL};
use crate::model::TestCase;

/// Renders a test case as a pytest module.
///
/// Emits a webdriver fixture, one test class with one test method, and one
/// comment-plus-stabilization-delay block per step. The navigation target
/// comes from the first URL-shaped token in the raw generated content,
/// defaulting to [`DEFAULT_TARGET_URL`].
#[must_use]
pub fn render(case: &TestCase) -> String {
    let class_name = class_identifier(&case.title);
    let method_name = method_identifier(&case.title);
    let url = first_url(&case.content).unwrap_or(DEFAULT_TARGET_URL);

    let mut out = String::new();
    let _ = writeln!(out, "\"\"\"{}", case.title);
    if !case.description.is_empty() {
        let _ = writeln!(out, "\n{}", case.description);
    }
    out.push_str("\"\"\"\n\n");
    out.push_str("import time\n\nimport pytest\nfrom selenium import webdriver\n\n\n");
    out.push_str("@pytest.fixture\ndef driver():\n");
    out.push_str("    driver = webdriver.Chrome()\n");
    out.push_str("    yield driver\n");
    out.push_str("    driver.quit()\n\n\n");

    let _ = writeln!(out, "class {class_name}:");
    let _ = writeln!(out, "    def {method_name}(self, driver):");
    let _ = writeln!(out, "        driver.get(\"{url}\")");
    for (index, step) in case.steps.iter().enumerate() {
        let _ = writeln!(out, "        # Step {}: {}", index + 1, step.action);
        out.push_str("        time.sleep(1)\n");
    }
    if case.steps.is_empty() {
        out.push_str("        # No structured steps were derived; see the raw content below.\n");
        out.push_str("        time.sleep(1)\n");
    }
    out.push_str("        assert driver.current_url\n");
    out
}

/// `"Purchase flow"` → `TestPurchaseFlow`.
fn class_identifier(title: &str) -> String {
    let mut name = String::from("Test");
    for word in title.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.extend(chars.flat_map(char::to_lowercase));
        }
    }
    if name == "Test" {
        name.push_str("Case");
    }
    name
}

/// `"Purchase flow"` → `test_purchase_flow`.
fn method_identifier(title: &str) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        "test_case".into()
    } else {
        format!("test_{}", words.join("_"))
    }
}
