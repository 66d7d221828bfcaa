//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GOOD_TOKEN: &str = "good-token";

/// A user as returned by `i`.
pub fn user() -> Value {
    json!({
        "id": "9user",
        "username": "alice",
        "host": null,
        "name": "Alice",
        "createdAt": "2023-04-01T00:00:00.000Z",
        "followersCount": 12,
        "followingCount": 3,
        "notesCount": 42,
        "isLocked": false,
        "pinnedNoteIds": [],
        "fields": [],
        "twoFactorEnabled": false
    })
}

pub fn note(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "createdAt": "2024-02-03T04:05:06.789Z",
        "userId": "9user",
        "user": {"id": "9user", "username": "alice", "host": null},
        "text": text,
        "visibility": "public",
        "localOnly": false,
        "reactionAcceptance": null,
        "renoteCount": 0,
        "repliesCount": 0,
        "reactions": {},
        "reactionEmojis": {},
        "fileIds": [],
        "files": []
    })
}

pub fn error_body(code: &str, id: &str) -> Value {
    json!({"error": {"code": code, "message": "test error", "id": id, "kind": "client"}})
}

/// Start a server that accepts `GOOD_TOKEN` on `i` and rejects anything else.
pub async fn start() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/i"))
        .and(body_partial_json(json!({"i": GOOD_TOKEN})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/i"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            "CREDENTIAL_REQUIRED",
            "1384574d-a912-4b81-8601-c7b1c4085df1",
        )))
        .mount(&server)
        .await;

    server
}

/// Bodies of all requests the server received for `endpoint`.
pub async fn bodies_for(server: &MockServer, endpoint: &str) -> Vec<Value> {
    let wanted = format!("/api/{endpoint}");
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == wanted)
        .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
        .collect()
}
