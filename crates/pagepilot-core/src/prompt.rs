//! Prompt builders for chat, translation and summary completions.

use pagepilot_protocols::{CompletionRequest, HistoryEntry};

/// System message for chat completions.
pub const CHAT_SYSTEM: &str = "You are an AI assistant that helps users interact with web pages.";

/// System message for translation completions.
pub const TRANSLATION_SYSTEM: &str =
    "You are a precise translation engine. Output ONLY the translated text.";

/// The command grammar as documented to the model.
const COMMAND_GUIDE: &str = "\
You can perform actions on the page using special commands:
- To highlight text: Use [[highlight:text to find]]
- To click a button or link: Use [[click:element description or text]]
- To translate content: Use [[translate:VALID_CSS_SELECTOR]] (e.g., [[translate:p]] or [[translate:#main-article p]]). Do not use descriptive phrases like \"textContent\" as a selector.
- To summarize the page: Use [[summarize:page]]
- To extract data: Use [[extract:what to extract]] (links, images, tables, emails, prices, or a description)

Include these commands in your response when you can help with the request.";

/// Build the chat prompt for `message` on the current page.
pub fn chat_request(
    message: &str,
    title: &str,
    url: &str,
    context_json: &str,
    history: &[HistoryEntry],
    max_tokens: u32,
) -> CompletionRequest {
    let history_json = serde_json::to_string(history).unwrap_or_else(|_| "[]".to_string());
    let prompt = format!(
        "You are an AI assistant embedded in a web page.
Current page: {title} - {url}

USER REQUEST: {message}

PAGE CONTEXT:
{context_json}

{COMMAND_GUIDE}

Consider the user's recent actions:
{history_json}

If you understand the request and can map it to one of the special commands, perform the action directly by including the command in your response.
If the request is ambiguous, or you need more information to use a command (e.g., a more specific selector), ask for clarification.
Otherwise, respond conversationally."
    );
    CompletionRequest::new(CHAT_SYSTEM, prompt, max_tokens)
}

/// Token budget for translating `text`: 1.5 tokens per character plus
/// headroom, never below 100.
pub fn translation_max_tokens(text: &str) -> u32 {
    let len = text.encode_utf16().count() as u64;
    let estimate = len * 3 / 2 + 50;
    estimate.max(100).min(u32::MAX as u64) as u32
}

/// Build the translation request for one element's text.
pub fn translation_request(text: &str, language: &str) -> CompletionRequest {
    let prompt = format!(
        "Translate the following text to {language}. Output ONLY the translated text, without any additional explanations or conversation.\n\nText to translate:\n\"{text}\""
    );
    CompletionRequest::new(TRANSLATION_SYSTEM, prompt, translation_max_tokens(text))
}

/// Build the summary request from the page's title, URL, headings and
/// paragraphs.
pub fn summary_request(
    title: &str,
    url: &str,
    headings: &[String],
    paragraphs: &[String],
    max_tokens: u32,
) -> CompletionRequest {
    let prompt = format!(
        "Please summarize the following webpage content concisely:

Title: {title}
URL: {url}
Main Headings: {}

Content to Summarize:
{}

Provide a 3-5 sentence summary that captures the main points.
Then list 3-5 key takeaways in bullet point format.",
        headings.join(" | "),
        paragraphs.join("\n\n"),
    );
    CompletionRequest::new(CHAT_SYSTEM, prompt, max_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepilot_protocols::HistoryEvent;

    #[test]
    fn test_translation_max_tokens() {
        assert_eq!(translation_max_tokens(""), 100);
        assert_eq!(translation_max_tokens(&"a".repeat(33)), 100);
        assert_eq!(translation_max_tokens(&"a".repeat(100)), 200);
        assert_eq!(translation_max_tokens(&"a".repeat(101)), 201);
    }

    #[test]
    fn test_translation_request() {
        let request = translation_request("Bonjour", "English");
        assert_eq!(request.system, TRANSLATION_SYSTEM);
        assert!(request.prompt.starts_with("Translate the following text to English."));
        assert!(request.prompt.ends_with("Text to translate:\n\"Bonjour\""));
        assert_eq!(request.max_tokens, 100);
    }

    #[test]
    fn test_chat_request_includes_context_and_history() {
        let history = vec![HistoryEntry::now(HistoryEvent::Message {
            content: "hi".to_string(),
        })];
        let request = chat_request("Find prices", "Shop", "https://shop.test/", "{}", &history, 500);
        assert_eq!(request.system, CHAT_SYSTEM);
        assert_eq!(request.max_tokens, 500);
        assert!(request.prompt.contains("USER REQUEST: Find prices"));
        assert!(request.prompt.contains("Current page: Shop - https://shop.test/"));
        assert!(request.prompt.contains("[[highlight:text to find]]"));
        assert!(request.prompt.contains(r#""type":"message""#));
    }

    #[test]
    fn test_summary_request_layout() {
        let request = summary_request(
            "Title",
            "https://x.test/",
            &["A".to_string(), "B".to_string()],
            &["p1 text".to_string(), "p2 text".to_string()],
            500,
        );
        assert!(request.prompt.contains("Main Headings: A | B"));
        assert!(request.prompt.contains("p1 text\n\np2 text"));
        assert!(request.prompt.contains("3-5 key takeaways"));
    }
}
