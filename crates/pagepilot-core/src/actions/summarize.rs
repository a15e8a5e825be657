//! `summarize`: ask the provider for a summary of the main content.

use tracing::warn;

use super::{trimmed_text, ActionContext, ActionOutcome};
use crate::context::content_region;
use crate::prompt;

const MAX_HEADINGS: usize = 5;
const MAX_PARAGRAPHS: usize = 10;
/// Paragraphs this short are navigation crumbs, not content.
const MIN_PARAGRAPH_LEN: usize = 15;

pub async fn summarize(ctx: &mut ActionContext<'_>) -> ActionOutcome {
    let analyzing = ctx.say("Analyzing the page to create a summary...").await;

    let doc = &*ctx.document;
    let region = content_region(doc);
    let headings: Vec<String> = doc
        .elements_by_tag(region, &["h1", "h2", "h3"])
        .into_iter()
        .map(|h| trimmed_text(doc, h))
        .filter(|t| !t.is_empty())
        .take(MAX_HEADINGS)
        .collect();
    let paragraphs: Vec<String> = doc
        .elements_by_tag(region, &["p"])
        .into_iter()
        .map(|p| trimmed_text(doc, p))
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_LEN)
        .take(MAX_PARAGRAPHS)
        .collect();
    let title = doc.title();
    let url = doc.url().to_string();

    let Some(provider) = ctx.provider else {
        ctx.say("Please set up your API key in the extension settings to use the summarization feature.")
            .await;
        return ActionOutcome::NotConfigured;
    };

    let request = prompt::summary_request(
        &title,
        &url,
        &headings,
        &paragraphs,
        ctx.settings.max_tokens,
    );
    match provider.complete(request).await {
        Ok(summary) => {
            ctx.transcript.remove(analyzing).await;
            ctx.say(format!("📝 Summary of \"{}\":\n\n{}", title, summary))
                .await;
            ActionOutcome::Summarized
        }
        Err(e) => {
            warn!(provider = provider.id(), "Summary failed: {}", e);
            ctx.say("Sorry, I encountered an error while trying to summarize this page. Please try again later.")
                .await;
            ActionOutcome::UpstreamFailure
        }
    }
}
