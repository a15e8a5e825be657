use std::sync::Arc;

use pagepilot_dom::Document;
use pagepilot_protocols::{CompletionProvider, HistoryEvent, KeyValueStore, Sender};
use pagepilot_store_sqlite::MemoryStore;
use serde_json::json;

use super::*;
use crate::command::{render_segments, ActionKind};
use crate::history::HISTORY_KEY;
use crate::provider::{ScriptedProvider, ScriptedReply};
use crate::transcript::{CHAT_MESSAGES_KEY, PAGE_URL_KEY};

const URL: &str = "https://blog.example/roses";
const PAGE: &str = r#"<html><head><title>Growing Roses</title></head>
<body><main><h1>Growing roses</h1><p>Roses like sun and well drained soil.</p>
<button id="subscribe">Subscribe</button></main></body></html>"#;

fn texts(session: &Session) -> Vec<String> {
    session
        .transcript()
        .messages()
        .iter()
        .map(|m| m.text.clone())
        .collect()
}

async fn open_with(
    store: Arc<dyn KeyValueStore>,
    provider: Option<Arc<ScriptedProvider>>,
) -> Session {
    let provider = provider.map(|p| p as Arc<dyn CompletionProvider>);
    Session::open(Document::parse(PAGE, URL), store, provider, Settings::default()).await
}

#[tokio::test]
async fn test_open_greets_with_topic() {
    let session = open_with(Arc::new(MemoryStore::new()), None).await;
    let messages = texts(&session);

    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Hello! I'm your AI assistant."));
    assert_eq!(
        messages[1],
        "This page seems to be about growing, roses. Would you like me to summarize it or highlight key points?"
    );
}

#[tokio::test]
async fn test_open_restores_transcript_for_same_url() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(CHAT_MESSAGES_KEY, json!([{"text": "earlier", "sender": "user"}]))
        .await
        .unwrap();
    store.set(PAGE_URL_KEY, json!(URL)).await.unwrap();

    let session = open_with(store, None).await;
    assert_eq!(texts(&session), vec!["earlier"]);
}

#[tokio::test]
async fn test_open_discards_transcript_for_other_url() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(CHAT_MESSAGES_KEY, json!([{"text": "earlier", "sender": "user"}]))
        .await
        .unwrap();
    store
        .set(PAGE_URL_KEY, json!("https://other.example/"))
        .await
        .unwrap();

    let session = open_with(store, None).await;
    assert!(texts(&session)[0].starts_with("Hello!"));
}

#[tokio::test]
async fn test_send_without_provider() {
    let mut session = open_with(Arc::new(MemoryStore::new()), None).await;
    let exchange = session.send_message("translate this").await.unwrap();

    assert_eq!(exchange.reply, "Please set up your API key in the extension popup.");
    let messages = session.transcript().messages();
    let last_two = &messages[messages.len() - 2..];
    assert_eq!(last_two[0].sender, Sender::User);
    assert_eq!(last_two[1].text, exchange.reply);
    assert!(!texts(&session).iter().any(|t| t == "Thinking..."));
}

#[tokio::test]
async fn test_send_blank_message_is_ignored() {
    let mut session = open_with(Arc::new(MemoryStore::new()), None).await;
    let before = session.transcript().len();

    assert!(session.send_message("   ").await.is_none());
    assert_eq!(session.transcript().len(), before);
    assert!(session.history().entries().is_empty());
}

#[tokio::test]
async fn test_send_runs_reply_commands() {
    let provider = Arc::new(ScriptedProvider::with_replies(
        "scripted",
        ["Sure! [[highlight:sun]] and [[dance:now]]"],
    ));
    let mut session = open_with(Arc::new(MemoryStore::new()), Some(provider.clone())).await;

    let exchange = session.send_message("find sun").await.unwrap();

    assert_eq!(exchange.outcomes, vec![ActionOutcome::Highlighted { count: 1 }]);
    let calls = provider.calls();
    let request = &calls[0].request;
    assert_eq!(request.max_tokens, 500);
    assert!(request.prompt.contains("USER REQUEST: find sun"));
    assert!(request.prompt.contains("\"title\": \"Growing Roses\""));

    let kinds: Vec<&str> = session.history().entries().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["message", "action", "ai_actions"]);
    assert!(texts(&session).contains(&"Sure! [[highlight:sun]] and [[dance:now]]".to_string()));
}

#[tokio::test]
async fn test_send_provider_error_becomes_reply() {
    let provider = Arc::new(ScriptedProvider::new("openai"));
    provider.push(ScriptedReply::Fail("quota".to_string()));
    let mut session = open_with(Arc::new(MemoryStore::new()), Some(provider)).await;

    let exchange = session.send_message("hi").await.unwrap();

    assert_eq!(
        exchange.reply,
        "Sorry, there was an error contacting the AI (openai). Please check your API key and network connection."
    );
    assert!(exchange.outcomes.is_empty());
    assert_eq!(session.transcript().last().unwrap().text, exchange.reply);
}

#[tokio::test]
async fn test_reply_without_commands_records_no_ai_actions() {
    let provider = Arc::new(ScriptedProvider::with_replies("scripted", ["Just chatting."]));
    let mut session = open_with(Arc::new(MemoryStore::new()), Some(provider)).await;

    session.send_message("hello").await.unwrap();
    let kinds: Vec<&str> = session.history().entries().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["message"]);
}

#[tokio::test]
async fn test_trigger_dispatches_carried_command() {
    let mut session = open_with(Arc::new(MemoryStore::new()), None).await;
    let segments = render_segments("Try [[extract:links]] or [[highlight:soil]]");
    assert_eq!(segments.len(), 4);

    assert_eq!(session.trigger(&segments[0]).await, None);
    let outcome = session.trigger(&segments[3]).await;
    assert_eq!(outcome, Some(ActionOutcome::Highlighted { count: 1 }));

    let last = session.history().entries().last().unwrap();
    assert_eq!(
        last.event,
        HistoryEvent::Action {
            action: "highlight".to_string(),
            target: "soil".to_string(),
        }
    );
}

#[tokio::test]
async fn test_dispatch_logs_even_without_match() {
    let mut session = open_with(Arc::new(MemoryStore::new()), None).await;
    let outcome = session
        .dispatch(&Command::new(ActionKind::Click, "nonexistent"))
        .await;

    assert_eq!(outcome, ActionOutcome::NoMatch);
    assert_eq!(session.history().entries().len(), 1);
}

#[tokio::test]
async fn test_closed_session_skips_reply_commands() {
    let mut session = open_with(Arc::new(MemoryStore::new()), None).await;
    session.close();

    let outcomes = session
        .process_response("[[highlight:sun]] [[click:Subscribe]]")
        .await;
    assert_eq!(outcomes, vec![ActionOutcome::Cancelled, ActionOutcome::Cancelled]);
    assert!(session.cancellation_token().is_cancelled());
}

#[tokio::test]
async fn test_clear_chat() {
    let store = Arc::new(MemoryStore::new());
    let mut session = open_with(store.clone(), None).await;

    session.clear_chat().await;

    assert_eq!(
        texts(&session),
        vec!["Chat history has been cleared. How can I help you now?"]
    );
    let stored = store.get(CHAT_MESSAGES_KEY).await.unwrap().unwrap();
    assert_eq!(stored.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_reset_persists_empty_history() {
    let store = Arc::new(MemoryStore::new());
    let mut session = open_with(store.clone(), None).await;
    session.send_message("hello").await.unwrap();
    assert!(!session.history().entries().is_empty());

    session.reset().await;

    assert!(session.history().entries().is_empty());
    assert_eq!(store.get(HISTORY_KEY).await.unwrap(), Some(json!([])));
    assert_eq!(
        texts(&session),
        vec!["Settings have been reset. Let me know if you need anything else!"]
    );
}

#[tokio::test]
async fn test_history_survives_reopen() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut session = open_with(store.clone(), None).await;
        session.send_message("remember me").await.unwrap();
    }

    let session = open_with(store, None).await;
    assert_eq!(
        session.history().entries()[0].event,
        HistoryEvent::Message {
            content: "remember me".to_string(),
        }
    );
}
