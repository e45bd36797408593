//! Deterministic rendering of structured test cases into artifact text.
//!
//! One render function per format, all driven by the shared [`TestCase`]
//! representation. Rendering is pure: the same case always produces
//! byte-identical output.

pub mod bdd;
pub mod gherkin;
pub mod pytest;

use std::fmt::Write as _;

use crate::model::{TestCase, TestFormat, TestStep};

/// Fallback navigation target when the generated content names no URL.
pub const DEFAULT_TARGET_URL: &str = "https://example.com";

/// Clause a step maps to in Given/When/Then dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepClause {
    /// A click action.
    WhenClick,
    /// A value-entry action.
    WhenEnter,
    /// A navigation action.
    GivenNavigate,
    /// Anything else.
    AndFallback,
}

/// Classifies a step action by keyword.
#[must_use]
pub fn classify_step(action: &str) -> StepClause {
    let lower = action.to_lowercase();
    if lower.contains("click") {
        StepClause::WhenClick
    } else if lower.contains("input") || lower.contains("type") || lower.contains("enter") {
        StepClause::WhenEnter
    } else if lower.contains("navigate") {
        StepClause::GivenNavigate
    } else {
        StepClause::AndFallback
    }
}

/// Renders a step as a Given/When/Then clause line.
///
/// A fallback step whose action already reads as a clause (starts with a
/// Gherkin keyword) is kept verbatim rather than prefixed with `And`.
#[must_use]
pub fn clause_line(step: &TestStep) -> String {
    match classify_step(&step.action) {
        StepClause::WhenClick => {
            let target = step.target.as_deref().unwrap_or("the element");
            format!("When I click on \"{target}\"")
        }
        StepClause::WhenEnter => {
            let value = step.value.as_deref().unwrap_or("");
            match step.target.as_deref() {
                Some(target) => format!("When I enter \"{value}\" into \"{target}\""),
                None => format!("When I enter \"{value}\""),
            }
        }
        StepClause::GivenNavigate => {
            let url = first_url(&step.action).unwrap_or(DEFAULT_TARGET_URL);
            format!("Given I navigate to \"{url}\"")
        }
        StepClause::AndFallback => {
            let lower = step.action.to_lowercase();
            if ["given ", "when ", "then ", "and "].iter().any(|k| lower.starts_with(k)) {
                step.action.clone()
            } else {
                format!("And {}", step.action)
            }
        }
    }
}

/// Renders a test case into artifact text for its target format.
#[must_use]
pub fn render(case: &TestCase) -> String {
    match case.format {
        TestFormat::Pytest => pytest::render(case),
        TestFormat::SeleniumBdd => bdd::render(case),
        TestFormat::Gherkin => gherkin::render(case),
    }
}

/// Derives a deterministic artifact filename for a test case.
///
/// Lower-cases the title, strips non-alphanumeric characters, maps spaces
/// to underscores, and appends the format extension.
#[must_use]
pub fn artifact_filename(title: &str, format: TestFormat) -> String {
    let mut stem = String::new();
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            stem.extend(ch.to_lowercase());
        } else if ch == ' ' && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "test_case" } else { stem };
    format!("{stem}.{}", format.extension())
}

/// A concatenated multi-artifact export.
///
/// Not a standard archive: artifacts are joined with delimiting headers
/// into a single text emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// Concatenated artifact text.
    pub content: String,
    /// Suggested download filename.
    pub filename: String,
    /// MIME type of the bundle.
    pub mime_type: &'static str,
}

/// Concatenates rendered artifacts for all cases into one bundle.
#[must_use]
pub fn export_bundle(cases: &[TestCase]) -> ExportBundle {
    let mut content = String::new();
    for case in cases {
        let _ = writeln!(content, "=== {} ===", artifact_filename(&case.title, case.format));
        content.push_str(&render(case));
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
    }
    ExportBundle {
        content,
        filename: "testloom_export.txt".into(),
        mime_type: "text/plain",
    }
}

/// First URL-shaped token in a text, trailing punctuation trimmed.
#[must_use]
pub fn first_url(text: &str) -> Option<&str> {
    text.split_whitespace()
        .find(|token| token.starts_with("http://") || token.starts_with("https://"))
        .map(|token| token.trim_end_matches(['.', ',', ')', '"', '\'']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn step(action: &str, target: Option<&str>, value: Option<&str>) -> TestStep {
        TestStep {
            id: "st-1".into(),
            action: action.into(),
            target: target.map(str::to_string),
            value: value.map(str::to_string),
            expected: None,
        }
    }

    fn case(format: TestFormat) -> TestCase {
        TestCase {
            id: "tc-1".into(),
            session_id: "s-1".into(),
            title: "Purchase flow".into(),
            description: "covers the buy button".into(),
            steps: vec![
                step("Navigate to https://shop.test/cart", None, None),
                step("Click on \"#buy\"", Some("#buy"), None),
                step("Enter \"42\" into \"#qty\"", Some("#qty"), Some("42")),
                step("Then the cart updates", None, None),
            ],
            format,
            content: "Test Case 1: Purchase flow\nvisit https://shop.test/cart".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn classification_follows_keyword_priority() {
        assert_eq!(classify_step("Click on \"#buy\""), StepClause::WhenClick);
        assert_eq!(classify_step("Type the password"), StepClause::WhenEnter);
        assert_eq!(classify_step("Enter \"42\""), StepClause::WhenEnter);
        assert_eq!(classify_step("Navigate to the cart"), StepClause::GivenNavigate);
        assert_eq!(classify_step("the banner appears"), StepClause::AndFallback);
        // click outranks navigate when both appear
        assert_eq!(classify_step("click to navigate home"), StepClause::WhenClick);
    }

    #[test]
    fn clause_lines_use_structured_fields() {
        assert_eq!(
            clause_line(&step("Click on \"#buy\"", Some("#buy"), None)),
            "When I click on \"#buy\""
        );
        assert_eq!(
            clause_line(&step("Enter \"42\" into \"#qty\"", Some("#qty"), Some("42"))),
            "When I enter \"42\" into \"#qty\""
        );
        assert_eq!(
            clause_line(&step("Navigate to https://shop.test", None, None)),
            "Given I navigate to \"https://shop.test\""
        );
        assert_eq!(
            clause_line(&step("Then the cart updates", None, None)),
            "Then the cart updates"
        );
        assert_eq!(
            clause_line(&step("the banner appears", None, None)),
            "And the banner appears"
        );
    }

    #[test]
    fn render_is_deterministic() {
        for format in [TestFormat::Pytest, TestFormat::SeleniumBdd, TestFormat::Gherkin] {
            let case = case(format);
            assert_eq!(render(&case), render(&case));
        }
    }

    #[test]
    fn filenames_are_normalized() {
        assert_eq!(artifact_filename("Purchase flow", TestFormat::Pytest), "purchase_flow.py");
        assert_eq!(
            artifact_filename("Add to cart (fast!)", TestFormat::Gherkin),
            "add_to_cart_fast.feature"
        );
        assert_eq!(artifact_filename("!!!", TestFormat::Gherkin), "test_case.feature");
    }

    #[test]
    fn export_bundle_delimits_each_artifact() {
        let cases = vec![case(TestFormat::Gherkin), case(TestFormat::Pytest)];
        let bundle = export_bundle(&cases);
        assert!(bundle.content.contains("=== purchase_flow.feature ==="));
        assert!(bundle.content.contains("=== purchase_flow.py ==="));
        assert_eq!(bundle.mime_type, "text/plain");
    }

    #[test]
    fn first_url_trims_trailing_punctuation() {
        assert_eq!(first_url("go to https://shop.test/cart."), Some("https://shop.test/cart"));
        assert_eq!(first_url("no links"), None);
    }
}
