//! Subcommand handlers for PagePilot.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use pagepilot_config::Config;
use pagepilot_core::{
    extract_commands, infer_page_topic, load_page, render_html, render_segments, ActionOutcome,
    PageContext, ScriptedProvider, Segment, Session, Settings,
};
use pagepilot_protocols::{CompletionProvider, KeyValueStore, Sender};
use pagepilot_store_sqlite::{MemoryStore, SqliteStore};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Print the page context and inferred topic.
pub(crate) async fn context(config: &Config, page: &str) -> CmdResult {
    let document = load_page(page).await?;
    let context = PageContext::build(&document, config.assistant.context_text_limit);
    println!("{}", context.to_json()?);
    match infer_page_topic(&document) {
        Some(topic) => println!("\nTopic: {}", topic),
        None => println!("\nTopic: (none)"),
    }
    Ok(())
}

/// Print the commands found in a response and its rendered form.
pub(crate) async fn parse(file: &Path) -> CmdResult {
    let response = tokio::fs::read_to_string(file).await?;
    let extraction = extract_commands(&response);

    if extraction.commands.is_empty() {
        println!("No commands found.");
    } else {
        println!("{:<12} {}", "ACTION", "TARGET");
        println!("{}", "-".repeat(40));
        for command in &extraction.commands {
            println!("{:<12} {}", command.action, command.target);
        }
    }
    println!("\nRemainder:\n{}", extraction.remainder);
    println!("\nRendered:\n{}", render_html(&response));
    Ok(())
}

/// Run a saved model response against a page.
pub(crate) async fn apply(
    config: &Config,
    page: &str,
    response: &Path,
    completions: Option<&Path>,
    output: Option<&Path>,
) -> CmdResult {
    let reply = tokio::fs::read_to_string(response).await?;
    let provider = match completions {
        Some(path) => scripted_provider(path).await?,
        None => ScriptedProvider::new("scripted"),
    };
    let mut session = open_session(config, page, provider).await?;
    let seen = session.transcript().len();

    let outcomes = session.process_response(&reply).await;
    print_messages(&session, seen);
    print_outcomes(&outcomes);
    write_output(session, output).await
}

/// Line-by-line chat over stdin.
///
/// `/clear` and `/reset` map to the session operations of the same name.
pub(crate) async fn chat(
    config: &Config,
    page: &str,
    completions: &Path,
    output: Option<&Path>,
) -> CmdResult {
    let provider = scripted_provider(completions).await?;
    let mut session = open_session(config, page, provider).await?;
    print_messages(&session, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let from = chat_line(&mut session, &line).await;
        print_messages(&session, from);
    }

    session.close();
    write_output(session, output).await
}

/// Handle one chat input line. Returns the index of the first transcript
/// message the line produced.
async fn chat_line(session: &mut Session, line: &str) -> usize {
    match line.trim() {
        // Both rebuild the transcript from scratch.
        "/clear" => {
            session.clear_chat().await;
            0
        }
        "/reset" => {
            session.reset().await;
            0
        }
        text => {
            let seen = session.transcript().len();
            if let Some(exchange) = session.send_message(text).await {
                debug!(commands = exchange.outcomes.len(), "Exchange complete");
            }
            seen
        }
    }
}

async fn scripted_provider(path: &Path) -> Result<ScriptedProvider, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    let replies: Vec<String> = serde_json::from_str(&content)?;
    info!(count = replies.len(), path = %path.display(), "Loaded canned completions");
    Ok(ScriptedProvider::with_replies("scripted", replies))
}

async fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = match config.storage.backend.as_str() {
        "memory" => Arc::new(MemoryStore::new()),
        _ => Arc::new(SqliteStore::open(config.storage.resolved_path()).await?),
    };
    debug!(store = store.id(), "Store ready");
    Ok(store)
}

async fn open_session(
    config: &Config,
    page: &str,
    provider: ScriptedProvider,
) -> Result<Session, Box<dyn std::error::Error>> {
    let document = load_page(page).await?;
    let store = open_store(config).await?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(provider);
    let settings = Settings::from(&config.assistant);
    Ok(Session::open(document, store, Some(provider), settings).await)
}

/// Print transcript messages from index `from` on, with triggers shown
/// as `<target>`.
fn print_messages(session: &Session, from: usize) {
    for message in session.transcript().messages().iter().skip(from) {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Ai => "ai",
        };
        let rendered: String = render_segments(&message.text)
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.clone(),
                Segment::Trigger(command) => format!("<{}>", command.target),
            })
            .collect();
        println!("[{}] {}", who, rendered);
    }
}

fn print_outcomes(outcomes: &[ActionOutcome]) {
    for (i, outcome) in outcomes.iter().enumerate() {
        let status = if outcome.is_success() { "ok" } else { "--" };
        println!("{:>3}. [{}] {:?}", i + 1, status, outcome);
    }
}

async fn write_output(session: Session, output: Option<&Path>) -> CmdResult {
    if let Some(path) = output {
        let html = session.into_document().to_html();
        tokio::fs::write(path, html).await?;
        info!(path = %path.display(), "Wrote page");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepilot_dom::Document;

    async fn session(replies: &[&str]) -> Session {
        let provider: Arc<dyn CompletionProvider> = Arc::new(ScriptedProvider::with_replies(
            "scripted",
            replies.iter().copied(),
        ));
        Session::open(
            Document::parse(
                "<html><head><title>Pruning Roses</title></head><body><p>Cut above a bud.</p></body></html>",
                "https://garden.example/roses",
            ),
            Arc::new(MemoryStore::new()),
            Some(provider),
            Settings::default(),
        )
        .await
    }

    fn texts_from(session: &Session, from: usize) -> Vec<String> {
        session.transcript().messages()[from..]
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_chat_line_starts_at_user_message() {
        let mut session = session(&["Prune in late winter."]).await;
        let before = session.transcript().len();

        let from = chat_line(&mut session, "when should I prune?").await;

        assert_eq!(from, before);
        assert_eq!(
            texts_from(&session, from),
            vec!["when should I prune?", "Prune in late winter."]
        );
    }

    #[tokio::test]
    async fn test_chat_line_clear_shows_confirmation() {
        let mut session = session(&["Sure."]).await;
        chat_line(&mut session, "hello").await;

        let from = chat_line(&mut session, "/clear").await;

        assert_eq!(
            texts_from(&session, from),
            vec!["Chat history has been cleared. How can I help you now?"]
        );
    }

    #[tokio::test]
    async fn test_chat_line_reset_shows_confirmation() {
        let mut session = session(&["Sure."]).await;
        chat_line(&mut session, "hello").await;

        let from = chat_line(&mut session, "  /reset ").await;

        assert_eq!(
            texts_from(&session, from),
            vec!["Settings have been reset. Let me know if you need anything else!"]
        );
        assert!(session.history().entries().is_empty());
    }
}
