use super::*;

#[test]
fn test_request_new() {
    let req = CompletionRequest::new("system", "hello", 500);
    assert_eq!(req.system, "system");
    assert_eq!(req.prompt, "hello");
    assert_eq!(req.max_tokens, 500);
}

#[test]
fn test_request_serialization() {
    let req = CompletionRequest::new("sys", "prompt", 120);
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["system"], "sys");
    assert_eq!(json["max_tokens"], 120);

    let back: CompletionRequest = serde_json::from_value(json).unwrap();
    assert_eq!(back, req);
}
