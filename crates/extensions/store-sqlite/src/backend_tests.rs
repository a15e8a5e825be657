use super::*;
use serde_json::json;

#[tokio::test]
async fn test_store_id() {
    let store = SqliteStore::in_memory().await.unwrap();
    assert_eq!(store.id(), "sqlite");
}

#[tokio::test]
async fn test_set_and_get() {
    let store = SqliteStore::in_memory().await.unwrap();
    store
        .set("chatMessages", json!([{"text": "hi", "sender": "user"}]))
        .await
        .unwrap();

    let value = store.get("chatMessages").await.unwrap().unwrap();
    assert_eq!(value[0]["text"], "hi");
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let store = SqliteStore::in_memory().await.unwrap();
    assert!(store.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_last_write_wins() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.set("pageUrl", json!("https://a.example/")).await.unwrap();
    store.set("pageUrl", json!("https://b.example/")).await.unwrap();

    assert_eq!(
        store.get("pageUrl").await.unwrap(),
        Some(json!("https://b.example/"))
    );
    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_ignores_missing() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.set("a", json!(1)).await.unwrap();
    store.set("b", json!(2)).await.unwrap();

    store.remove(&["a", "missing"]).await.unwrap();
    assert!(store.get("a").await.unwrap().is_none());
    assert_eq!(store.get("b").await.unwrap(), Some(json!(2)));
}

#[tokio::test]
async fn test_clear() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.set("a", json!(1)).await.unwrap();
    store.set("b", json!(2)).await.unwrap();

    store.clear().await.unwrap();
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_file_backed_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.db");

    {
        let store = SqliteStore::open(&path).await.unwrap();
        store.set("userActionHistory", json!([])).await.unwrap();
    }

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(store.get("userActionHistory").await.unwrap(), Some(json!([])));
}
