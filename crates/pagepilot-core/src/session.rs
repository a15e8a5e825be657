//! Chat session over one loaded page.

use std::sync::Arc;

use pagepilot_dom::Document;
use pagepilot_protocols::{ChatMessage, CompletionProvider, HistoryEvent, KeyValueStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{ActionContext, ActionOutcome};
use crate::command::{extract_commands, Command, Segment};
use crate::context::{infer_page_topic, PageContext};
use crate::dispatch::Dispatcher;
use crate::history::ActionHistory;
use crate::prompt;
use crate::settings::Settings;
use crate::transcript::Transcript;

const GREETING: &str = "Hello! I'm your AI assistant. I can help you with this page. Try asking me to translate content, highlight information, click elements, or perform other tasks.";
const THINKING: &str = "Thinking...";
const NO_PROVIDER: &str = "Please set up your API key in the extension popup.";
const CLEARED: &str = "Chat history has been cleared. How can I help you now?";
const RESET: &str = "Settings have been reset. Let me know if you need anything else!";

/// One user message and what came of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The assistant reply as posted to the transcript.
    pub reply: String,
    /// Outcomes of the commands the reply contained, in order.
    pub outcomes: Vec<ActionOutcome>,
}

/// The assistant attached to one page.
///
/// Owns the document, the transcript scoped to the page URL, the action
/// history and the session's cancellation token. [`Session::close`]
/// cancels the token, which stops an in-flight translation between
/// elements and an in-flight click before it fires.
pub struct Session {
    document: Document,
    transcript: Transcript,
    history: ActionHistory,
    provider: Option<Arc<dyn CompletionProvider>>,
    store: Arc<dyn KeyValueStore>,
    settings: Settings,
    cancel: CancellationToken,
}

impl Session {
    /// Attach to `document`, restoring the stored transcript (if it belongs
    /// to this page) and the action history. A fresh transcript opens with
    /// a greeting and, when one can be inferred, the page topic.
    pub async fn open(
        document: Document,
        store: Arc<dyn KeyValueStore>,
        provider: Option<Arc<dyn CompletionProvider>>,
        settings: Settings,
    ) -> Self {
        let url = document.url().to_string();
        let transcript = Transcript::restore(store.clone(), url.as_str()).await;
        let history = ActionHistory::restore(store.clone()).await;
        info!(
            url = %url,
            restored = transcript.len(),
            history = history.entries().len(),
            provider = provider.as_ref().map(|p| p.id()).unwrap_or("none"),
            "Session opened"
        );

        let mut session = Self {
            document,
            transcript,
            history,
            provider,
            store,
            settings,
            cancel: CancellationToken::new(),
        };
        if session.transcript.is_empty() {
            session.transcript.say(GREETING).await;
            if let Some(topic) = infer_page_topic(&session.document) {
                session
                    .transcript
                    .say(format!(
                        "This page seems to be about {}. Would you like me to summarize it or highlight key points?",
                        topic
                    ))
                    .await;
            }
        }
        session
    }

    /// Cancel in-flight work. The session stays readable.
    pub fn close(&self) {
        debug!(url = %self.transcript.page_url(), "Closing session");
        self.cancel.cancel();
    }

    /// A handle that cancels this session's work when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Send a user message: ask the provider and act on its reply.
    ///
    /// Blank messages are ignored and return `None`.
    pub async fn send_message(&mut self, text: &str) -> Option<Exchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text)).await;
        self.history
            .record(HistoryEvent::Message {
                content: text.to_string(),
            })
            .await;
        let thinking = self.transcript.say(THINKING).await;

        let Some(provider) = self.provider.clone() else {
            self.transcript.replace(thinking, NO_PROVIDER).await;
            return Some(Exchange {
                reply: NO_PROVIDER.to_string(),
                outcomes: Vec::new(),
            });
        };

        let context = PageContext::build(&self.document, self.settings.context_text_limit);
        let context_json = context.to_json().unwrap_or_else(|e| {
            warn!("Failed to serialize page context: {}", e);
            "{}".to_string()
        });
        let request = prompt::chat_request(
            text,
            &context.title,
            &context.url,
            &context_json,
            self.history.recent(self.settings.history_window),
            self.settings.max_tokens,
        );

        info!(provider = provider.id(), "Sending chat request");
        match provider.complete(request).await {
            Ok(reply) => {
                self.transcript.replace(thinking, reply.as_str()).await;
                let outcomes = self.process_response(&reply).await;
                Some(Exchange { reply, outcomes })
            }
            Err(e) => {
                warn!(provider = provider.id(), "Chat request failed: {}", e);
                let reply = format!(
                    "Sorry, there was an error contacting the AI ({}). Please check your API key and network connection.",
                    provider.id()
                );
                self.transcript.replace(thinking, reply.as_str()).await;
                Some(Exchange {
                    reply,
                    outcomes: Vec::new(),
                })
            }
        }
    }

    /// Extract the commands in a model reply and run them in order.
    pub async fn process_response(&mut self, reply: &str) -> Vec<ActionOutcome> {
        let extraction = extract_commands(reply);
        debug!(commands = extraction.commands.len(), "Processing model reply");
        self.dispatcher().run(&extraction.commands).await
    }

    /// Run a single command.
    pub async fn dispatch(&mut self, command: &Command) -> ActionOutcome {
        self.dispatcher().dispatch(command).await
    }

    /// Activate a rendered segment. Text segments do nothing.
    pub async fn trigger(&mut self, segment: &Segment) -> Option<ActionOutcome> {
        match segment {
            Segment::Text(_) => None,
            Segment::Trigger(command) => Some(self.dispatch(command).await),
        }
    }

    /// Empty the transcript and post a fresh-start message.
    pub async fn clear_chat(&mut self) {
        self.transcript.clear().await;
        self.transcript.say(CLEARED).await;
    }

    /// Empty the transcript and the action history.
    pub async fn reset(&mut self) {
        self.transcript.clear().await;
        self.history.clear().await;
        self.transcript.say(RESET).await;
    }

    fn dispatcher(&mut self) -> Dispatcher<'_> {
        let ctx = ActionContext {
            document: &mut self.document,
            transcript: &mut self.transcript,
            provider: self.provider.as_deref(),
            settings: &self.settings,
            cancel: &self.cancel,
        };
        Dispatcher::new(ctx, &mut self.history)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Give back the (possibly mutated) document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.document.url())
            .field("messages", &self.transcript.len())
            .field("history", &self.history.entries().len())
            .field("provider", &self.provider.as_ref().map(|p| p.id().to_string()))
            .field("closed", &self.cancel.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
