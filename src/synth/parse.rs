//! Heuristic parsing of generated text into structured test cases.
//!
//! Generated output is natural language; this module is the one place its
//! shape is interpreted. Everything here is pure so the heuristics can be
//! golden-tested without a completion service. An empty parse result is not
//! an error — the synthesizer degrades to a single fallback case.

/// A test-case section recognized in generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCase {
    /// Title taken from the section marker line.
    pub title: String,
    /// First description/purpose line found in the section, if any.
    pub description: String,
    /// Step action texts in order of appearance.
    pub steps: Vec<String>,
    /// The full section text, marker line included.
    pub body: String,
}

/// Splits generated text into test-case sections.
///
/// Recognized section markers: `Test Case N:`, `Scenario:`, `Feature:`
/// (case-insensitive, leading markdown decoration ignored). Returns an
/// empty vec when no marker is found.
#[must_use]
pub fn parse_test_cases(text: &str) -> Vec<ParsedCase> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in text.lines() {
        if let Some(title) = section_title(line) {
            sections.push((title, vec![line]));
        } else if let Some((_, lines)) = sections.last_mut() {
            lines.push(line);
        }
    }

    sections
        .into_iter()
        .filter_map(|(title, lines)| build_case(title, &lines))
        .collect()
}

/// Extracts the text inside each pair of double quotes.
#[must_use]
pub fn quoted_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('"') else { break };
        tokens.push(&after[..end]);
        rest = &after[end + 1..];
    }
    tokens
}

/// Returns the section title when the line is a recognized marker.
fn section_title(line: &str) -> Option<String> {
    let stripped = line.trim().trim_start_matches(['#', '*', '>', ' ']).trim();
    let lower = stripped.to_lowercase();

    let marker_len = if lower.starts_with("test case") && stripped.contains(':') {
        stripped.find(':').map(|idx| idx + 1)
    } else if lower.starts_with("scenario:") {
        Some("scenario:".len())
    } else if lower.starts_with("feature:") {
        Some("feature:".len())
    } else {
        None
    }?;

    let title = stripped[marker_len..].trim();
    if title.is_empty() {
        Some(stripped[..marker_len].trim_end_matches(':').trim().to_string())
    } else {
        Some(title.to_string())
    }
}

fn build_case(title: String, lines: &[&str]) -> Option<ParsedCase> {
    let content_lines = &lines[1..];
    let has_content = content_lines.iter().any(|l| !l.trim().is_empty());
    if title.is_empty() && !has_content {
        return None;
    }

    let description = content_lines
        .iter()
        .map(|l| l.trim())
        .find(|l| {
            let lower = l.to_lowercase();
            lower.contains("description") || lower.contains("purpose")
        })
        .map(|l| l.split_once(':').map_or(l, |(_, rest)| rest).trim().to_string())
        .unwrap_or_default();

    let steps = content_lines.iter().filter_map(|l| step_action(l)).collect();

    Some(ParsedCase { title, description, steps, body: lines.join("\n") })
}

/// Extracts a step action from a list or Given/When/Then line.
fn step_action(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return Some(rest.trim().to_string());
    }

    // Numbered list: "1. ..." or "2) ..."
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let after = &trimmed[digits..];
        if let Some(rest) = after.strip_prefix(". ").or_else(|| after.strip_prefix(") ")) {
            return Some(rest.trim().to_string());
        }
    }

    let lower = trimmed.to_lowercase();
    for keyword in ["given ", "when ", "then ", "and "] {
        if lower.starts_with(keyword) {
            return Some(trimmed.to_string());
        }
    }
    None
}
