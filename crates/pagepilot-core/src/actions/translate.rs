//! `translate`: replace element text with provider translations.

use pagepilot_dom::{Document, DomError, NodeId};
use tracing::warn;

use super::{in_chat_panel, ActionContext, ActionOutcome};
use crate::task::TranslationTask;

/// Targets that mean "the whole page" rather than a selector.
const PAGE_TARGETS: &[&str] = &["page", "this page"];

/// Descriptive phrases models send instead of a selector.
const NON_SELECTOR_PHRASES: &[&str] = &[
    "textcontent",
    "all text",
    "the content",
    "page content",
    "entire page",
    "text content",
];

/// Elements translated when the target names the whole page.
const PAGE_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "p", "li", "span", "div", "article", "section", "main",
];

/// Minimum trimmed text length for whole-page elements.
const MIN_PAGE_TEXT_LEN: usize = 10;

/// Result of resolving a translate target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationTargets {
    /// Elements to translate, in document order.
    Elements(Vec<NodeId>),
    /// A page phrase matched no meaningful content.
    EmptyPage,
    /// A selector matched nothing visible.
    NoMatch,
    /// The target is not valid selector syntax.
    InvalidSelector,
}

fn normalize(target: &str) -> String {
    target.trim().to_lowercase()
}

/// Whether `target` asks for the whole page.
fn is_page_request(target: &str) -> bool {
    let normalized = normalize(target);
    normalized.is_empty()
        || PAGE_TARGETS.contains(&normalized.as_str())
        || NON_SELECTOR_PHRASES.contains(&normalized.as_str())
}

/// Resolve `target` to the elements a translation would touch.
pub fn resolve_translation_targets(doc: &Document, target: &str) -> TranslationTargets {
    if is_page_request(target) {
        let elements: Vec<NodeId> = doc
            .elements_by_tag(doc.root(), PAGE_TAGS)
            .into_iter()
            .filter(|&n| {
                doc.has_offset_parent(n)
                    && doc.text_content(n).trim().chars().count() > MIN_PAGE_TEXT_LEN
                    && !in_chat_panel(doc, n)
            })
            .collect();
        let phrase = NON_SELECTOR_PHRASES.contains(&normalize(target).as_str());
        return if elements.is_empty() && phrase {
            TranslationTargets::EmptyPage
        } else {
            TranslationTargets::Elements(elements)
        };
    }

    match doc.select(target) {
        Ok(found) => {
            let elements: Vec<NodeId> = found
                .into_iter()
                .filter(|&n| doc.has_offset_parent(n) && !in_chat_panel(doc, n))
                .collect();
            if elements.is_empty() {
                TranslationTargets::NoMatch
            } else {
                TranslationTargets::Elements(elements)
            }
        }
        Err(DomError::InvalidSelector { reason, .. }) => {
            warn!(selector = target, "Invalid selector for translation: {}", reason);
            TranslationTargets::InvalidSelector
        }
        Err(e) => {
            warn!(selector = target, "Selection failed: {}", e);
            TranslationTargets::Elements(Vec::new())
        }
    }
}

pub async fn translate(ctx: &mut ActionContext<'_>, target: &str) -> ActionOutcome {
    ctx.say("Preparing to translate content...").await;

    let Some(provider) = ctx.provider else {
        ctx.say("Please set up your API key in the extension settings to use translation.")
            .await;
        return ActionOutcome::NotConfigured;
    };

    let elements = match resolve_translation_targets(ctx.document, target) {
        TranslationTargets::Elements(elements) => elements,
        TranslationTargets::EmptyPage => {
            ctx.say(format!(
                "Interpreted \"{}\" as a request to translate the page, but found no meaningful content.",
                target
            ))
            .await;
            return ActionOutcome::NoMatch;
        }
        TranslationTargets::NoMatch => {
            ctx.say(format!(
                "No elements found for selector \"{}\". Please try a different selector or ask to translate \"this page\".",
                target
            ))
            .await;
            return ActionOutcome::NoMatch;
        }
        TranslationTargets::InvalidSelector => {
            ctx.say(format!(
                "\"{}\" is not a valid CSS selector. Ask to translate \"this page\" or provide a valid selector.",
                target
            ))
            .await;
            return ActionOutcome::InvalidInput;
        }
    };

    if elements.is_empty() {
        ctx.say("No content found to translate with the given criteria.")
            .await;
        return ActionOutcome::NoMatch;
    }

    let language = ctx.settings.target_language.clone();
    ctx.say(format!(
        "Translating {} element(s) to {}... This may take a moment.",
        elements.len(),
        language
    ))
    .await;

    let task = TranslationTask::new(
        elements,
        language.clone(),
        ctx.settings.translate_delay,
        ctx.cancel,
    );
    let report = task.run(ctx.document, ctx.transcript, provider).await;

    if report.cancelled {
        return ActionOutcome::Cancelled;
    }
    if report.translated > 0 {
        ctx.say(format!(
            "Translation complete! {} element(s) translated to {}.",
            report.translated, language
        ))
        .await;
        ActionOutcome::Translated {
            count: report.translated,
        }
    } else {
        ctx.say("No text was translated. Content might already be in the target language or could not be translated.")
            .await;
        if report.failed > 0 {
            ActionOutcome::UpstreamFailure
        } else {
            ActionOutcome::NoMatch
        }
    }
}
