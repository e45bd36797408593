//! Gherkin feature rendering.

use std::fmt::Write as _;

use super::{classify_step, clause_line, StepClause};
use crate::model::TestCase;

/// Renders a test case as a Gherkin feature.
///
/// The feature always carries a fixed background, a primary scenario built
/// from the steps, a scenario-outline variant with a two-row examples
/// table, and a trailing error-handling scenario.
#[must_use]
pub fn render(case: &TestCase) -> String {
    let clauses: Vec<String> = case.steps.iter().map(clause_line).collect();

    let mut out = String::new();
    let _ = writeln!(out, "Feature: {}", case.title);
    if !case.description.is_empty() {
        let _ = writeln!(out, "  {}", case.description);
    }
    out.push('\n');
    out.push_str("  Background:\n");
    out.push_str("    Given the application is available\n");
    out.push_str("    And I am on the starting page\n\n");

    let _ = writeln!(out, "  Scenario: {}", case.title);
    for clause in &clauses {
        let _ = writeln!(out, "    {clause}");
    }
    if !clauses.iter().any(|c| c.starts_with("Then ")) {
        out.push_str("    Then the expected outcome is observed\n");
    }
    out.push('\n');

    let _ = writeln!(out, "  Scenario Outline: {} with variations", case.title);
    let entered_value = case.steps.iter().find_map(|s| {
        (classify_step(&s.action) == StepClause::WhenEnter).then(|| s.value.clone()).flatten()
    });
    for (clause, step) in clauses.iter().zip(&case.steps) {
        if classify_step(&step.action) == StepClause::WhenEnter {
            let parameterized = match step.target.as_deref() {
                Some(target) => format!("When I enter \"<value>\" into \"{target}\""),
                None => "When I enter \"<value>\"".to_string(),
            };
            let _ = writeln!(out, "    {parameterized}");
        } else {
            let _ = writeln!(out, "    {clause}");
        }
    }
    out.push_str("    Then the expected outcome is observed\n\n");
    out.push_str("    Examples:\n");
    match entered_value {
        Some(value) => {
            out.push_str("      | value |\n");
            let _ = writeln!(out, "      | {value} |");
            out.push_str("      | alternative input |\n");
        }
        None => {
            out.push_str("      | attempt |\n");
            out.push_str("      | first |\n");
            out.push_str("      | repeat |\n");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "  Scenario: {} handles unexpected errors", case.title);
    out.push_str("    Given I am on the starting page\n");
    out.push_str("    When the service responds with an error\n");
    out.push_str("    Then I see a clear error message\n");
    out
}
