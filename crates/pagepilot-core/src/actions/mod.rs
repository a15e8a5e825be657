//! Page action handlers.
//!
//! Each handler reports progress and results to the chat transcript and
//! returns an [`ActionOutcome`]. Handlers never fail: empty targets, missing
//! matches, bad selectors and provider errors are all outcomes.

mod click;
mod extract;
mod highlight;
mod summarize;
mod translate;

pub use click::{click, find_click_target};
pub use extract::{extract, extract_data, format_extraction, ExtractedData};
pub use highlight::highlight;
pub use summarize::summarize;
pub use translate::{resolve_translation_targets, translate, TranslationTargets};

use pagepilot_dom::{Document, NodeId};
use pagepilot_protocols::CompletionProvider;
use tokio_util::sync::CancellationToken;

use crate::settings::Settings;
use crate::transcript::Transcript;

/// Class of the assistant's own panel. Its content is never acted on.
pub const CHAT_PANEL_CLASS: &str = "ai-chat-panel";

/// Everything a handler may touch.
pub struct ActionContext<'a> {
    pub document: &'a mut Document,
    pub transcript: &'a mut Transcript,
    pub provider: Option<&'a dyn CompletionProvider>,
    pub settings: &'a Settings,
    pub cancel: &'a CancellationToken,
}

impl ActionContext<'_> {
    /// Post an assistant message; returns its transcript index.
    pub async fn say(&mut self, text: impl Into<String>) -> usize {
        self.transcript.say(text).await
    }
}

/// How a handler finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The target was empty; the user was asked what to do.
    Clarification,
    /// Nothing on the page matched.
    NoMatch,
    /// The target could not be interpreted (for example a bad selector).
    InvalidInput,
    /// No completion provider is configured.
    NotConfigured,
    /// The completion provider failed.
    UpstreamFailure,
    /// The session closed before the action finished.
    Cancelled,
    Highlighted { count: usize },
    Clicked { node: NodeId },
    Translated { count: usize },
    Summarized,
    Extracted(ExtractedData),
}

impl ActionOutcome {
    /// Whether the action changed the page or produced data.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Highlighted { .. }
                | ActionOutcome::Clicked { .. }
                | ActionOutcome::Translated { .. }
                | ActionOutcome::Summarized
                | ActionOutcome::Extracted(_)
        )
    }
}

/// Whether `id` sits inside the assistant panel.
pub(crate) fn in_chat_panel(doc: &Document, id: NodeId) -> bool {
    doc.closest_with_class(id, CHAT_PANEL_CLASS).is_some()
}

/// Trimmed `textContent`.
pub(crate) fn trimmed_text(doc: &Document, id: NodeId) -> String {
    doc.text_content(id).trim().to_string()
}
