//! Stable locator derivation for event target elements.

use serde::{Deserialize, Serialize};

/// A single element as seen by the surface: tag plus id/class attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Lowercase tag name (e.g. `"button"`).
    pub tag: String,
    /// The `id` attribute, if present and non-empty.
    pub id: Option<String>,
    /// Class tokens in document order.
    pub classes: Vec<String>,
}

impl ElementNode {
    /// Convenience constructor for a bare tag.
    #[must_use]
    pub fn tag(tag: &str) -> Self {
        Self { tag: tag.to_string(), id: None, classes: Vec::new() }
    }
}

/// An event target element together with its ancestor chain, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// The target element itself.
    pub element: ElementNode,
    /// Ancestors from the document root down to the direct parent.
    pub ancestors: Vec<ElementNode>,
}

/// Derives a stable locator string for an event target.
///
/// Preference order: the element's own `#id`; else its first class token as
/// `.class`; else a ` > `-joined path of `tag#id` / `tag.class` / `tag`
/// segments from the root. An id anywhere in the ancestor chain anchors the
/// path there, discarding less specific segments above it.
#[must_use]
pub fn resolve_selector(handle: &ElementHandle) -> String {
    if let Some(id) = non_empty(handle.element.id.as_deref()) {
        return format!("#{id}");
    }
    if let Some(class) = handle.element.classes.first().filter(|c| !c.is_empty()) {
        return format!(".{class}");
    }

    let mut segments: Vec<String> = Vec::new();
    for node in &handle.ancestors {
        if non_empty(node.id.as_deref()).is_some() {
            segments.clear();
        }
        segments.push(segment(node));
    }
    segments.push(handle.element.tag.clone());
    segments.join(" > ")
}

fn segment(node: &ElementNode) -> String {
    if let Some(id) = non_empty(node.id.as_deref()) {
        return format!("{}#{id}", node.tag);
    }
    if let Some(class) = node.classes.first().filter(|c| !c.is_empty()) {
        return format!("{}.{class}", node.tag);
    }
    node.tag.clone()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(element: ElementNode, ancestors: Vec<ElementNode>) -> ElementHandle {
        ElementHandle { element, ancestors }
    }

    #[test]
    fn id_wins_outright() {
        let element = ElementNode {
            tag: "button".into(),
            id: Some("search-button".into()),
            classes: vec!["btn".into()],
        };
        let resolved = resolve_selector(&handle(element, vec![ElementNode::tag("body")]));
        assert_eq!(resolved, "#search-button");
    }

    #[test]
    fn first_class_token_when_no_id() {
        let element = ElementNode {
            tag: "button".into(),
            id: None,
            classes: vec!["btn".into(), "primary".into()],
        };
        let resolved = resolve_selector(&handle(element, Vec::new()));
        assert_eq!(resolved, ".btn");
    }

    #[test]
    fn bare_element_walks_ancestor_chain() {
        let ancestors = vec![
            ElementNode::tag("html"),
            ElementNode::tag("body"),
            ElementNode { tag: "div".into(), id: None, classes: vec!["content".into()] },
        ];
        let resolved = resolve_selector(&handle(ElementNode::tag("span"), ancestors));
        assert_eq!(resolved, "html > body > div.content > span");
    }

    #[test]
    fn ancestor_id_anchors_the_path() {
        let ancestors = vec![
            ElementNode::tag("html"),
            ElementNode::tag("body"),
            ElementNode { tag: "form".into(), id: Some("checkout".into()), classes: Vec::new() },
            ElementNode::tag("fieldset"),
        ];
        let resolved = resolve_selector(&handle(ElementNode::tag("input"), ancestors));
        assert_eq!(resolved, "form#checkout > fieldset > input");
    }

    #[test]
    fn empty_id_attribute_is_ignored() {
        let element = ElementNode {
            tag: "a".into(),
            id: Some(String::new()),
            classes: vec!["nav-link".into()],
        };
        let resolved = resolve_selector(&handle(element, Vec::new()));
        assert_eq!(resolved, ".nav-link");
    }
}
