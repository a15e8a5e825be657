//! `highlight`: wrap matching page text in marker spans.

use pagepilot_dom::{Document, ElementData, NodeId};
use tracing::{debug, warn};

use super::{in_chat_panel, ActionContext, ActionOutcome};

/// Class of the marker element wrapped around each match.
pub const HIGHLIGHT_CLASS: &str = "ai-highlighted-text";

/// Text inside these elements is never shown as page text.
const SKIPPED_PARENTS: &[&str] = &[
    "script", "style", "noscript", "template", "textarea", "select", "option", "title",
];

/// Foreign-content roots. An HTML marker inside them does not survive a
/// re-parse in place.
const FOREIGN_ROOTS: &[&str] = &["svg", "math"];

pub async fn highlight(ctx: &mut ActionContext<'_>, target: &str) -> ActionOutcome {
    if target.trim().is_empty() {
        ctx.say("What text would you like me to highlight on the page?")
            .await;
        return ActionOutcome::Clarification;
    }

    let count = highlight_matches(ctx.document, target);
    debug!(target, count, "Highlight pass complete");
    if count > 0 {
        ctx.say(format!(
            "I've highlighted {} instances of \"{}\" on the page.",
            count, target
        ))
        .await;
        ActionOutcome::Highlighted { count }
    } else {
        ctx.say(format!(
            "I couldn't find any instances of \"{}\" on the page.",
            target
        ))
        .await;
        ActionOutcome::NoMatch
    }
}

/// Wrap the first case-insensitive match in every eligible body text node.
/// Returns the number of nodes split.
fn highlight_matches(doc: &mut Document, needle: &str) -> usize {
    let candidates: Vec<NodeId> = doc
        .text_nodes(doc.body())
        .into_iter()
        .filter(|&n| is_candidate(&*doc, n))
        .collect();

    let mut count = 0;
    for node in candidates {
        let Some((start, end)) = doc.text(node).and_then(|t| find_ignore_case(t, needle)) else {
            continue;
        };
        let marker = ElementData::new("span").with_attr("class", HIGHLIGHT_CLASS);
        match doc.split_text_and_wrap(node, start, end, marker) {
            Ok(_) => count += 1,
            Err(e) => warn!("Failed to wrap highlight: {}", e),
        }
    }
    count
}

fn is_candidate(doc: &Document, node: NodeId) -> bool {
    if !doc.text(node).is_some_and(|t| !t.trim().is_empty()) {
        return false;
    }
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    !in_chat_panel(doc, parent)
        && !doc
            .ancestors_inclusive(parent)
            .into_iter()
            .any(|n| {
                doc.tag(n).is_some_and(|t| {
                    SKIPPED_PARENTS.contains(&t) || FOREIGN_ROOTS.contains(&t)
                })
            })
}

/// Byte range of the first case-insensitive occurrence of `needle`.
pub(crate) fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    for (start, _) in haystack.char_indices() {
        let mut matched = 0;
        for (offset, c) in haystack[start..].char_indices() {
            let lower: Vec<char> = c.to_lowercase().collect();
            if !needle[matched..].starts_with(&lower) {
                break;
            }
            matched += lower.len();
            if matched == needle.len() {
                return Some((start, start + offset + c.len_utf8()));
            }
        }
    }
    None
}
