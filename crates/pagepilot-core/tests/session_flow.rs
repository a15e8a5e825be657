//! End-to-end sessions against realistic pages with a scripted provider.

use std::sync::Arc;
use std::time::Duration;

use pagepilot_core::task::TRANSLATED_ATTR;
use pagepilot_core::{
    extract_commands, render_html, ActionKind, ActionOutcome, Command, ScriptedProvider, Session,
    Settings,
};
use pagepilot_dom::Document;
use pagepilot_protocols::{CompletionProvider, KeyValueStore};
use pagepilot_store_sqlite::{MemoryStore, SqliteStore};

const URL: &str = "https://news.example/article/42";

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Le jardin en automne</title>
  <meta name="description" content="Conseils de jardinage pour l'automne">
</head>
<body>
  <nav><a href="/">Accueil</a> <a href="javascript:void(0)">Menu</a></nav>
  <main>
    <h1>Le jardin en automne</h1>
    <p class="lead">Les feuilles tombent doucement sur la pelouse.</p>
    <p class="lead">Il est temps de planter les bulbes de printemps.</p>
    <p class="lead">Pensez aussi à protéger les plantes fragiles.</p>
    <p>Contact: redaction@news.example</p>
    <form id="newsletter" action="/subscribe" method="post">
      <input type="email" name="email" placeholder="Votre email">
      <button type="submit" style="display:none">Submit</button>
      <button type="submit" id="send">Submit</button>
    </form>
  </main>
  <div class="ai-chat-panel"><p>Panneau de discussion de l'assistant</p></div>
</body>
</html>"#;

fn as_provider(provider: &Arc<ScriptedProvider>) -> Option<Arc<dyn CompletionProvider>> {
    Some(provider.clone() as Arc<dyn CompletionProvider>)
}

async fn open(provider: &Arc<ScriptedProvider>) -> Session {
    Session::open(
        Document::parse(ARTICLE, URL),
        Arc::new(MemoryStore::new()),
        as_provider(provider),
        Settings::default(),
    )
    .await
}

#[tokio::test(start_paused = true)]
async fn test_translation_is_serial_with_fixed_gaps() {
    let provider = Arc::new(ScriptedProvider::with_replies(
        "scripted",
        [
            "I'll translate the lead paragraphs. [[translate:p.lead]]",
            "The leaves fall gently on the lawn.",
            "It is time to plant spring bulbs.",
            "Also remember to protect fragile plants.",
        ],
    ));
    let mut session = open(&provider).await;

    let exchange = session.send_message("translate the intro").await.unwrap();
    assert_eq!(exchange.outcomes, vec![ActionOutcome::Translated { count: 3 }]);

    let calls = provider.calls();
    assert_eq!(calls.len(), 4);
    for pair in calls[1..].windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(100));
    }
    assert!(calls[1].request.prompt.contains("Les feuilles tombent doucement"));
    assert_eq!(
        calls[1].request.system,
        "You are a precise translation engine. Output ONLY the translated text."
    );

    let doc = session.document();
    let leads = doc.select("p.lead").unwrap();
    assert_eq!(doc.text_content(leads[1]), "It is time to plant spring bulbs.");
    assert!(leads
        .iter()
        .all(|&p| doc.attr(p, TRANSLATED_ATTR) == Some("English")));
    assert!(doc.to_html().contains(r#"data-ai-translated="English""#));
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_translation_between_elements() {
    let provider = Arc::new(ScriptedProvider::with_replies(
        "scripted",
        ["[[translate:p.lead]]", "one", "two", "three"],
    ));
    let mut session = open(&provider).await;

    let token = session.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        token.cancel();
    });

    let exchange = session.send_message("translate").await.unwrap();
    assert_eq!(exchange.outcomes, vec![ActionOutcome::Cancelled]);
    // The chat call plus the first two elements.
    assert_eq!(provider.call_count(), 3);

    let doc = session.document();
    let leads = doc.select("p.lead").unwrap();
    assert_eq!(doc.attr(leads[2], TRANSLATED_ATTR), None);
}

#[tokio::test]
async fn test_missing_selector_makes_no_translation_calls() {
    let provider = Arc::new(ScriptedProvider::with_replies(
        "scripted",
        ["[[translate:#missing-selector]]"],
    ));
    let mut session = open(&provider).await;

    let exchange = session.send_message("translate it").await.unwrap();

    assert_eq!(exchange.outcomes, vec![ActionOutcome::NoMatch]);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_click_picks_visible_submit() {
    let provider = Arc::new(ScriptedProvider::with_replies(
        "scripted",
        ["Subscribing you now. [[click:Submit]]"],
    ));
    let mut session = open(&provider).await;

    let exchange = session.send_message("subscribe me").await.unwrap();

    let doc = session.document();
    let visible = doc.select("#send").unwrap()[0];
    let hidden = doc.select("button[style]").unwrap()[0];
    assert_eq!(exchange.outcomes, vec![ActionOutcome::Clicked { node: visible }]);
    assert_eq!(doc.click_count(visible), 1);
    assert_eq!(doc.click_count(hidden), 0);
}

#[tokio::test]
async fn test_reply_with_mixed_commands() {
    let reply = "Here you go: [[highlight:bulbes]] [[extract:emails]] [[explode:page]]";
    let provider = Arc::new(ScriptedProvider::with_replies("scripted", [reply]));
    let mut session = open(&provider).await;

    let exchange = session.send_message("help").await.unwrap();

    assert_eq!(exchange.outcomes.len(), 2);
    assert_eq!(exchange.outcomes[0], ActionOutcome::Highlighted { count: 1 });
    let ActionOutcome::Extracted(data) = &exchange.outcomes[1] else {
        panic!("expected extracted data");
    };
    assert_eq!(data.items, vec!["redaction@news.example"]);

    let html = render_html(reply);
    assert!(html.contains(r#"data-action="highlight" data-target="bulbes">bulbes</button>"#));
    assert!(html.contains("[[explode:page]]"));
}

#[tokio::test]
async fn test_highlight_ignores_chat_panel() {
    let provider = Arc::new(ScriptedProvider::new("scripted"));
    let mut session = open(&provider).await;

    let outcome = session
        .dispatch(&Command::new(ActionKind::Highlight, "assistant"))
        .await;
    assert_eq!(outcome, ActionOutcome::NoMatch);
}

#[tokio::test]
async fn test_page_context_reaches_prompt() {
    let provider = Arc::new(ScriptedProvider::with_replies("scripted", ["Bonjour!"]));
    let mut session = open(&provider).await;

    session.send_message("what is this page?").await.unwrap();

    let calls = provider.calls();
    let prompt = &calls[0].request.prompt;
    assert!(prompt.contains("Current page: Le jardin en automne - https://news.example/article/42"));
    assert!(prompt.contains("\"metaDescription\": \"Conseils de jardinage pour l'automne\""));
    assert!(prompt.contains("\"action\": \"https://news.example/subscribe\""));
    assert!(!prompt.contains("Panneau de discussion"));
}

#[test]
fn test_extraction_is_idempotent_on_remainder() {
    let reply = "A [[click:Go]] B [[unknown:x]] [[summarize:page]] C";
    let first = extract_commands(reply);
    let second = extract_commands(&first.remainder);

    assert_eq!(first.commands.len(), 2);
    assert!(second.commands.is_empty());
    assert_eq!(second.remainder, first.remainder);
}

#[tokio::test]
async fn test_sqlite_store_restores_transcript_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let provider = Arc::new(ScriptedProvider::with_replies("scripted", ["Noted."]));

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path).await.unwrap());
        let mut session = Session::open(
            Document::parse(ARTICLE, URL),
            store,
            as_provider(&provider),
            Settings::default(),
        )
        .await;
        session.send_message("remember this page").await.unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path).await.unwrap());
    let session = Session::open(Document::parse(ARTICLE, URL), store, None, Settings::default()).await;
    let texts: Vec<&str> = session
        .transcript()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert!(texts.contains(&"remember this page"));
    assert_eq!(texts.last(), Some(&"Noted."));
    assert_eq!(session.history().entries().len(), 1);
}
