//! HTTP API integration tests over in-memory stores.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn rejects_missing_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/conversations", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejects_garbage_token() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/conversations", Some("not-a-jwt"), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn conversation_resolution_is_symmetric() {
    let app = TestApp::new();
    let (alice_id, alice) = app.create_user("alice").await;
    let (bob_id, bob) = app.create_user("bob").await;

    let first = app
        .request(
            "POST",
            "/api/conversations",
            Some(&alice),
            Some(json!({ "other_id": bob_id })),
        )
        .await;
    let second = app
        .request(
            "POST",
            "/api/conversations",
            Some(&bob),
            Some(json!({ "other_id": alice_id })),
        )
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body["data"]["id"], second.body["data"]["id"]);
}

#[tokio::test]
async fn self_conversation_is_rejected() {
    let app = TestApp::new();
    let (alice_id, alice) = app.create_user("alice").await;

    let response = app
        .request(
            "POST",
            "/api/conversations",
            Some(&alice),
            Some(json!({ "other_id": alice_id })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message_flow_updates_unread_counts() {
    let app = TestApp::new();
    let (alice_id, alice) = app.create_user("alice").await;
    let (bob_id, bob) = app.create_user("bob").await;

    let conversation = app
        .request(
            "POST",
            "/api/conversations",
            Some(&alice),
            Some(json!({ "other_id": bob_id })),
        )
        .await;
    let conv_id = conversation.body["data"]["id"]
        .as_str()
        .expect("conversation id")
        .to_string();

    let sent = app
        .request(
            "POST",
            &format!("/api/conversations/{conv_id}/messages"),
            Some(&alice),
            Some(json!({ "content": "Practice moved to 6pm" })),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);

    let unread = app
        .request(
            "GET",
            &format!("/api/friends/{alice_id}/unread"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(unread.body["data"]["count"], 1);

    let read = app
        .request(
            "PUT",
            &format!("/api/conversations/{conv_id}/read"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(read.body["data"]["affected"], 1);

    let unread = app
        .request(
            "GET",
            &format!("/api/friends/{alice_id}/unread"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(unread.body["data"]["count"], 0);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;
    let (bob_id, _) = app.create_user("bob").await;

    let conversation = app
        .request(
            "POST",
            "/api/conversations",
            Some(&alice),
            Some(json!({ "other_id": bob_id })),
        )
        .await;
    let conv_id = conversation.body["data"]["id"].as_str().expect("id");

    let response = app
        .request(
            "POST",
            &format!("/api/conversations/{conv_id}/messages"),
            Some(&alice),
            Some(json!({ "content": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn friend_accept_creates_both_edges() {
    let app = TestApp::new();
    let (alice_id, alice) = app.create_user("alice").await;
    let (bob_id, bob) = app.create_user("bob").await;

    let sent = app
        .request(
            "POST",
            "/api/friends/requests",
            Some(&alice),
            Some(json!({ "requested_id": bob_id, "role": "viewer" })),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    let request_id = sent.body["data"]["id"].as_str().expect("request id");

    let pending = app
        .request("GET", "/api/friends/requests", Some(&bob), None)
        .await;
    assert_eq!(pending.body["data"].as_array().map(|a| a.len()), Some(1));

    let accepted = app
        .request(
            "PUT",
            &format!("/api/friends/requests/{request_id}/accept"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);

    let alice_friends = app.request("GET", "/api/friends", Some(&alice), None).await;
    let bob_friends = app.request("GET", "/api/friends", Some(&bob), None).await;
    assert_eq!(
        alice_friends.body["data"][0]["friend_id"],
        json!(bob_id.to_string())
    );
    assert_eq!(
        bob_friends.body["data"][0]["friend_id"],
        json!(alice_id.to_string())
    );
}

#[tokio::test]
async fn only_requested_user_may_accept() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;
    let (bob_id, _) = app.create_user("bob").await;

    let sent = app
        .request(
            "POST",
            "/api/friends/requests",
            Some(&alice),
            Some(json!({ "requested_id": bob_id, "role": "viewer" })),
        )
        .await;
    let request_id = sent.body["data"]["id"].as_str().expect("request id");

    // The requester cannot accept their own request.
    let response = app
        .request(
            "PUT",
            &format!("/api/friends/requests/{request_id}/accept"),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn new_event_notifies_followers() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;
    let (bob_id, bob) = app.create_user("bob").await;

    let sent = app
        .request(
            "POST",
            "/api/friends/requests",
            Some(&alice),
            Some(json!({ "requested_id": bob_id, "role": "viewer" })),
        )
        .await;
    let request_id = sent.body["data"]["id"].as_str().expect("request id");
    app.request(
        "PUT",
        &format!("/api/friends/requests/{request_id}/accept"),
        Some(&bob),
        None,
    )
    .await;

    let created = app
        .request(
            "POST",
            "/api/events",
            Some(&alice),
            Some(json!({
                "team_name": "U12 Tigers",
                "title": "Saturday match",
                "starts_at": (Utc::now() + Duration::days(2)).to_rfc3339(),
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);

    let notifications = app
        .request("GET", "/api/notifications", Some(&bob), None)
        .await;
    let kinds: Vec<String> = notifications.body["data"]
        .as_array()
        .expect("notification list")
        .iter()
        .filter_map(|n| n["kind"].as_str().map(|s| s.to_string()))
        .collect();
    assert!(kinds.contains(&"new_event".to_string()));
}

#[tokio::test]
async fn stranger_cannot_read_schedule() {
    let app = TestApp::new();
    let (alice_id, alice) = app.create_user("alice").await;
    let (_, mallory) = app.create_user("mallory").await;

    app.request(
        "POST",
        "/api/events",
        Some(&alice),
        Some(json!({
            "team_name": "U12 Tigers",
            "title": "Closed practice",
            "starts_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
        })),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/events?owner_id={alice_id}"),
            Some(&mallory),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feed_serves_calendar_and_rotation_invalidates() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;

    app.request(
        "POST",
        "/api/events",
        Some(&alice),
        Some(json!({
            "team_name": "U12 Tigers",
            "title": "Season opener",
            "starts_at": (Utc::now() + Duration::days(3)).to_rfc3339(),
        })),
    )
    .await;

    let links = app.request("GET", "/api/feed", Some(&alice), None).await;
    let token = links.body["data"]["token"].as_str().expect("feed token");

    let (status, body, content_type) = app.request_text(&format!("/feed/{token}.ics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("text/calendar; charset=utf-8")
    );
    assert!(body.contains("BEGIN:VCALENDAR"));
    assert!(body.contains("SUMMARY:Season opener"));

    let rotated = app
        .request("POST", "/api/feed/rotate", Some(&alice), None)
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_ne!(rotated.body["data"]["token"].as_str(), Some(token));

    let (status, _, _) = app.request_text(&format!("/feed/{token}.ics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reminder_sweep_marks_due_reminders_sent() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;

    let event = app
        .request(
            "POST",
            "/api/events",
            Some(&alice),
            Some(json!({
                "team_name": "U12 Tigers",
                "title": "Away game",
                "starts_at": (Utc::now() + Duration::hours(1)).to_rfc3339(),
            })),
        )
        .await;
    let event_id = event.body["data"]["id"].as_str().expect("event id");

    let scheduled = app
        .request(
            "POST",
            "/api/reminders",
            Some(&alice),
            Some(json!({
                "event_id": event_id,
                "title": "Away game soon",
                "body": "Leaves in an hour",
                "trigger_time": (Utc::now() - Duration::minutes(5)).to_rfc3339(),
            })),
        )
        .await;
    assert_eq!(scheduled.status, StatusCode::OK);

    let swept = app
        .request("POST", "/api/reminders/sweep", Some(&alice), None)
        .await;
    assert_eq!(swept.body["data"]["marked_sent"], 1);

    // A second sweep finds nothing left to deliver.
    let swept = app
        .request("POST", "/api/reminders/sweep", Some(&alice), None)
        .await;
    assert_eq!(swept.body["data"]["marked_sent"], 0);
}

#[tokio::test]
async fn device_registration_is_idempotent() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;

    let body = json!({
        "device_id": "pixel-9",
        "device_name": "Pixel 9",
        "platform": "android",
        "push_token": "tok-123",
    });
    let first = app
        .request("POST", "/api/devices", Some(&alice), Some(body.clone()))
        .await;
    let second = app
        .request("POST", "/api/devices", Some(&alice), Some(body))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);

    let devices = app.request("GET", "/api/devices", Some(&alice), None).await;
    assert_eq!(devices.body["data"].as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn platform_connect_disabled_reports_error() {
    let app = TestApp::new();
    let (_, alice) = app.create_user("alice").await;

    let response = app
        .request("POST", "/api/platform/connect", Some(&alice), None)
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
