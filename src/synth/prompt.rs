//! Prompt construction for test-case synthesis.
//!
//! Pure functions from a finished session to a bounded textual context.
//! Screenshots and raw request/response bodies never enter the prompt, and
//! both record lists are capped, so prompt size stays bounded regardless of
//! how long the recording ran.

use std::fmt::Write as _;

use crate::model::{RecordingSession, TestFormat};

/// Maximum number of interactions summarized into the prompt.
const MAX_INTERACTIONS: usize = 60;

/// Maximum number of api calls summarized into the prompt.
const MAX_API_CALLS: usize = 30;

/// Maximum length of a single summarized value.
const VALUE_LIMIT: usize = 80;

/// Builds the full completion prompt for a session.
#[must_use]
pub fn build_prompt(
    session: &RecordingSession,
    format: TestFormat,
    specifications: Option<&str>,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are generating automated test cases from a recorded browsing session.\n\n");
    let _ = writeln!(prompt, "Target URL: {}", session.target_url);
    let _ = writeln!(prompt, "Recording duration: {}s", session.duration_secs());
    let _ = writeln!(
        prompt,
        "Captured: {} interactions, {} api calls\n",
        session.interactions.len(),
        session.api_calls.len()
    );

    prompt.push_str("## Interactions\n");
    for interaction in session.interactions.iter().take(MAX_INTERACTIONS) {
        let value = interaction.value.as_deref().map_or(String::new(), |v| {
            format!(" value={:?}", clip(v, VALUE_LIMIT))
        });
        let _ = writeln!(
            prompt,
            "- {:?} on {} ({}){value}",
            interaction.kind, interaction.selector, interaction.element_tag
        );
    }
    if session.interactions.len() > MAX_INTERACTIONS {
        let _ = writeln!(prompt, "- ... {} more omitted", session.interactions.len() - MAX_INTERACTIONS);
    }

    prompt.push_str("\n## Api calls\n");
    for call in session.api_calls.iter().take(MAX_API_CALLS) {
        let _ = writeln!(prompt, "- {} {} -> {}", call.method, call.url, call.status_code);
    }
    if session.api_calls.len() > MAX_API_CALLS {
        let _ = writeln!(prompt, "- ... {} more omitted", session.api_calls.len() - MAX_API_CALLS);
    }

    prompt.push('\n');
    prompt.push_str(format_instructions(format));

    if let Some(spec) = specifications.filter(|s| !s.trim().is_empty()) {
        prompt.push_str("\n## Additional requirements\n");
        prompt.push_str(spec);
        prompt.push('\n');
    }

    prompt
}

/// Format-specific instruction block appended to every prompt.
#[must_use]
pub fn format_instructions(format: TestFormat) -> &'static str {
    match format {
        TestFormat::Pytest => {
            "## Output format\n\
             Produce one or more test cases. Start each with a line\n\
             `Test Case N: <title>`, follow with a `Description:` line, then\n\
             numbered steps describing user actions (click, enter, navigate)\n\
             and the expected outcomes. Steps should be concrete enough to\n\
             translate into selenium calls.\n"
        }
        TestFormat::SeleniumBdd => {
            "## Output format\n\
             Produce behave-style scenarios. Start each with a line\n\
             `Scenario: <title>`, follow with a `Purpose:` line, then\n\
             Given/When/Then steps quoting element selectors and entered\n\
             values exactly as captured.\n"
        }
        TestFormat::Gherkin => {
            "## Output format\n\
             Produce Gherkin scenarios. Start each with `Scenario: <title>`,\n\
             follow with a `Description:` line, then Given/When/Then/And\n\
             steps. Quote selectors and values in double quotes.\n"
        }
    }
}

fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(limit).collect();
        format!("{clipped}…")
    }
}
