//! Text extraction helpers over `scraper` documents.

pub mod traverse;

use html_scraper::{ElementRef, Node, Selector};

/// Concatenated text of every text node under `element`, in document order.
///
/// Whitespace is kept as-is; callers decide how to trim.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    traverse::depth_first(*element, |node| {
        if let Node::Text(t) = node.value() {
            text.push_str(t);
        }
        true
    });
    text
}

/// Trimmed text of the first descendant of `element` matching `selector`.
///
/// Returns an empty string when nothing matches.
pub fn child_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|child| element_text(child).trim().to_string())
        .unwrap_or_default()
}

/// Value of `attr` on the first descendant of `element` matching `selector`.
pub fn child_attr<'a>(element: ElementRef<'a>, selector: &Selector, attr: &str) -> Option<&'a str> {
    element
        .select(selector)
        .next()
        .and_then(|child| child.value().attr(attr))
}
