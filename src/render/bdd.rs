//! Selenium BDD rendering: feature block, behave step-definition stubs,
//! and an empty page-object scaffold, concatenated into one artifact.

use std::fmt::Write as _;

use super::clause_line;
use crate::model::TestCase;

/// Renders a test case as three concatenated BDD artifacts.
#[must_use]
pub fn render(case: &TestCase) -> String {
    let clauses: Vec<String> = case.steps.iter().map(clause_line).collect();

    let mut out = String::new();
    let _ = writeln!(out, "Feature: {}", case.title);
    if !case.description.is_empty() {
        let _ = writeln!(out, "  {}", case.description);
    }
    out.push('\n');
    let _ = writeln!(out, "  Scenario: {}", case.title);
    for clause in &clauses {
        let _ = writeln!(out, "    {clause}");
    }

    out.push_str("\n# ---- step definitions ----\n\n");
    out.push_str("from behave import given, when, then\n");
    for (decorator, phrase) in distinct_phrases(&clauses) {
        out.push('\n');
        let _ = writeln!(out, "\n@{decorator}('{phrase}')");
        let _ = writeln!(out, "def step_{}(context):", identifier(&phrase));
        out.push_str("    raise NotImplementedError('step not yet implemented')\n");
    }

    out.push_str("\n# ---- page objects ----\n\n");
    let _ = writeln!(out, "class {}Page:", page_class(&case.title));
    let _ = writeln!(out, "    \"\"\"Page object scaffold for {}.\"\"\"", case.title);
    out.push('\n');
    out.push_str("    def __init__(self, driver):\n");
    out.push_str("        self.driver = driver\n");
    out
}

/// One stub per distinct step phrase, order preserved.
///
/// `And` clauses stub as `then` since behave resolves them to the
/// preceding keyword at runtime.
fn distinct_phrases(clauses: &[String]) -> Vec<(&'static str, String)> {
    let mut seen: Vec<(&'static str, String)> = Vec::new();
    for clause in clauses {
        let (keyword, phrase) = match clause.split_once(' ') {
            Some((first, rest)) => (first, rest.to_string()),
            None => ("And", clause.clone()),
        };
        let decorator = match keyword.to_lowercase().as_str() {
            "given" => "given",
            "when" => "when",
            _ => "then",
        };
        if !seen.iter().any(|(_, existing)| existing == &phrase) {
            seen.push((decorator, phrase));
        }
    }
    seen
}

/// Phrase → python identifier fragment.
fn identifier(phrase: &str) -> String {
    let words: Vec<String> = phrase
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        "unnamed".into()
    } else {
        words.join("_")
    }
}

/// Title → CamelCase page-object class stem.
fn page_class(title: &str) -> String {
    let mut name = String::new();
    for word in title.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.extend(chars.flat_map(char::to_lowercase));
        }
    }
    if name.is_empty() {
        name.push_str("Target");
    }
    name
}
