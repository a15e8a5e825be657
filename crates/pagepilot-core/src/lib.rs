//! # PagePilot Core
//!
//! The assistant itself: it reads model replies for `[[action:target]]`
//! commands and carries them out against a loaded page.
//!
//! ## Pieces
//!
//! - [`command`] - command scanning, extraction and trigger rendering
//! - [`Dispatcher`] - routes commands to the [`actions`] handlers
//! - [`PageContext`] - the page snapshot sent with every chat request
//! - [`Session`] - transcript, history and provider over one page
//! - [`TranslationTask`] - serial, cancellable multi-element translation
//! - [`load_page`] - page loading from disk or HTTP
//! - [`ScriptedProvider`] - canned completions for the CLI and tests

pub mod actions;
pub mod command;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod loader;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod settings;
pub mod task;
pub mod transcript;

pub use actions::{ActionContext, ActionOutcome, ExtractedData};
pub use command::{
    extract_commands, render_html, render_segments, scan, ActionKind, Command, Extraction,
    Segment, Token,
};
pub use context::{infer_page_topic, PageContext};
pub use dispatch::Dispatcher;
pub use error::{AssistantError, LoadError};
pub use history::ActionHistory;
pub use loader::load_page;
pub use provider::{ScriptedProvider, ScriptedReply};
pub use session::{Exchange, Session};
pub use settings::Settings;
pub use task::{TranslationReport, TranslationTask};
pub use transcript::Transcript;
