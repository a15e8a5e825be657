//! `click`: resolve a described element, flag it, then click it.

use pagepilot_dom::{Document, NodeId};
use tracing::{debug, info};

use super::{trimmed_text, ActionContext, ActionOutcome};

const FLAG_BACKGROUND: &str = "rgba(66, 133, 244, 0.3)";
const FLAG_OUTLINE: &str = "2px solid #4285f4";

pub async fn click(ctx: &mut ActionContext<'_>, target: &str) -> ActionOutcome {
    if target.trim().is_empty() {
        ctx.say("What element would you like me to click?").await;
        return ActionOutcome::Clarification;
    }

    let Some(element) = find_click_target(ctx.document, target) else {
        ctx.say(format!(
            "I couldn't find any clickable elements matching \"{}\".",
            target
        ))
        .await;
        return ActionOutcome::NoMatch;
    };

    let doc = &mut *ctx.document;
    let original_background = doc.style_property(element, "background-color");
    let original_outline = doc.style_property(element, "outline");
    doc.set_style_property(element, "background-color", FLAG_BACKGROUND);
    doc.set_style_property(element, "outline", FLAG_OUTLINE);
    doc.scroll_into_view(element);

    let cancelled = tokio::select! {
        _ = ctx.cancel.cancelled() => true,
        _ = tokio::time::sleep(ctx.settings.click_delay) => false,
    };

    let doc = &mut *ctx.document;
    doc.set_style_property(element, "background-color", &original_background);
    doc.set_style_property(element, "outline", &original_outline);
    if cancelled {
        debug!(target, "Click cancelled before firing");
        return ActionOutcome::Cancelled;
    }

    doc.click(element);
    let text = trimmed_text(doc, element);
    let label = if text.is_empty() { target } else { text.as_str() };
    info!(target, node = element.index(), "Clicked element");
    ctx.say(format!("I clicked the \"{}\" element.", label)).await;
    ActionOutcome::Clicked { node: element }
}

/// Resolve `target` to a visible clickable element.
///
/// Stages, in priority order: exact (case-insensitive) text, text
/// substring, then `id`/`class`/`name` substring. Each stage keeps only
/// visible elements and the first non-empty stage wins; the first element
/// in document order is chosen.
pub fn find_click_target(doc: &Document, target: &str) -> Option<NodeId> {
    let wanted = target.to_lowercase();
    let clickable: Vec<NodeId> = doc
        .elements()
        .into_iter()
        .filter(|&n| is_clickable(doc, n))
        .collect();
    let texts: Vec<String> = clickable
        .iter()
        .map(|&n| trimmed_text(doc, n).to_lowercase())
        .collect();

    let exact = clickable
        .iter()
        .zip(&texts)
        .filter(|(_, text)| **text == wanted)
        .map(|(&n, _)| n);
    if let Some(found) = first_visible(doc, exact) {
        return Some(found);
    }

    let partial = clickable
        .iter()
        .zip(&texts)
        .filter(|(_, text)| text.contains(&wanted))
        .map(|(&n, _)| n);
    if let Some(found) = first_visible(doc, partial) {
        return Some(found);
    }

    let by_attribute = doc
        .elements()
        .into_iter()
        .filter(|&n| matches_attribute(doc, n, target));
    first_visible(doc, by_attribute)
}

fn first_visible(doc: &Document, mut candidates: impl Iterator<Item = NodeId>) -> Option<NodeId> {
    candidates.find(|&n| doc.is_visible(n))
}

/// `button, a, [role=button], input[type=submit], input[type=button]`
fn is_clickable(doc: &Document, id: NodeId) -> bool {
    match doc.tag(id) {
        Some("button") | Some("a") => true,
        Some("input") => doc
            .attr(id, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("submit") || t.eq_ignore_ascii_case("button")),
        Some(_) => is_role_button(doc, id),
        None => false,
    }
}

fn is_role_button(doc: &Document, id: NodeId) -> bool {
    doc.attr(id, "role") == Some("button")
}

/// Case-sensitive attribute substring match: `id` and `class` on buttons,
/// links and `[role=button]`, `name` on buttons and links.
fn matches_attribute(doc: &Document, id: NodeId, target: &str) -> bool {
    let contains = |attr: &str| doc.attr(id, attr).is_some_and(|v| v.contains(target));
    let button_or_link = matches!(doc.tag(id), Some("button") | Some("a"));
    let role_button = is_role_button(doc, id);
    ((button_or_link || role_button) && (contains("id") || contains("class")))
        || (button_or_link && contains("name"))
}
