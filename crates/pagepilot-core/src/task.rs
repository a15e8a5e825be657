//! Cancellable multi-element translation.

use std::time::Duration;

use pagepilot_dom::{Document, NodeId};
use pagepilot_protocols::CompletionProvider;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompt;
use crate::transcript::Transcript;

/// Attribute marking an element as translated, valued with the language.
pub const TRANSLATED_ATTR: &str = "data-ai-translated";

/// How a translation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationReport {
    /// Elements whose text was replaced.
    pub translated: usize,
    /// Provider calls that failed.
    pub failed: usize,
    /// Whether the run stopped early because its token was cancelled.
    pub cancelled: bool,
}

/// Serial translation of a list of elements.
///
/// Elements are processed strictly in order, one provider call at a time,
/// with a fixed pause after each call. The task's token is a child of the
/// session token and is checked between elements and during the pause.
#[derive(Debug)]
pub struct TranslationTask {
    elements: Vec<NodeId>,
    language: String,
    delay: Duration,
    token: CancellationToken,
}

impl TranslationTask {
    pub fn new(
        elements: Vec<NodeId>,
        language: impl Into<String>,
        delay: Duration,
        parent: &CancellationToken,
    ) -> Self {
        Self {
            elements,
            language: language.into(),
            delay,
            token: parent.child_token(),
        }
    }

    /// Token that stops this task without affecting the session.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub async fn run(
        self,
        document: &mut Document,
        transcript: &mut Transcript,
        provider: &dyn CompletionProvider,
    ) -> TranslationReport {
        let mut report = TranslationReport {
            translated: 0,
            failed: 0,
            cancelled: false,
        };

        for element in &self.elements {
            if self.token.is_cancelled() {
                report.cancelled = true;
                break;
            }
            // An earlier element's new text may have replaced this one.
            if !document.is_connected(*element) {
                continue;
            }
            let original = document.text_content(*element).trim().to_string();
            if original.is_empty() {
                continue;
            }
            if document.attr(*element, TRANSLATED_ATTR) == Some(self.language.as_str()) {
                continue;
            }

            let request = prompt::translation_request(&original, &self.language);
            match provider.complete(request).await {
                Ok(translated) if !translated.is_empty() && translated != original => {
                    document.set_text_content(*element, &translated);
                    document.set_attribute(*element, TRANSLATED_ATTR, &self.language);
                    report.translated += 1;
                }
                Ok(_) => debug!(node = element.index(), "Translation left text unchanged"),
                Err(e) => {
                    warn!(provider = provider.id(), "Translation failed: {}", e);
                    report.failed += 1;
                    transcript
                        .say(format!("Error translating text using {}.", provider.id()))
                        .await;
                }
            }

            tokio::select! {
                _ = self.token.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(self.delay) => {}
            }
        }

        info!(
            translated = report.translated,
            failed = report.failed,
            cancelled = report.cancelled,
            "Translation run finished"
        );
        report
    }
}
