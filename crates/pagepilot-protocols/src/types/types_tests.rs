use super::*;

#[test]
fn test_chat_message_constructors() {
    let user = ChatMessage::user("hi");
    assert_eq!(user.sender, Sender::User);
    let ai = ChatMessage::ai("hello");
    assert_eq!(ai.sender, Sender::Ai);
    assert_eq!(ai.text, "hello");
}

#[test]
fn test_sender_serializes_lowercase() {
    let json = serde_json::to_string(&ChatMessage::ai("x")).unwrap();
    assert!(json.contains("\"sender\":\"ai\""));
}

#[test]
fn test_history_entry_serializes_with_type_tag() {
    let entry = HistoryEntry::now(HistoryEvent::Action {
        action: "highlight".to_string(),
        target: "price".to_string(),
    });
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["type"], "action");
    assert_eq!(json["action"], "highlight");
    assert_eq!(json["target"], "price");
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_history_entry_ai_actions_roundtrip() {
    let entry = HistoryEntry::now(HistoryEvent::AiActions {
        actions: vec![ActionRecord {
            action: "click".to_string(),
            target: "Login".to_string(),
        }],
    });
    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"type\":\"ai_actions\""));
    let back: HistoryEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
    assert_eq!(back.kind(), "ai_actions");
}

#[test]
fn test_history_entry_kind() {
    let entry = HistoryEntry::now(HistoryEvent::Message {
        content: "translate this".to_string(),
    });
    assert_eq!(entry.kind(), "message");
}
