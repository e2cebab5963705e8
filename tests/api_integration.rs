//! Integration tests for the Matchbook HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use matchbook::{create_app, AppState, Config, Database};
use serde_json::json;
use tempfile::TempDir;

fn test_config(db_path: &std::path::Path, match_cursor_enabled: bool) -> Config {
    Config {
        port: 0, // Let OS assign port
        db_path: db_path.to_str().unwrap().to_string(),
        max_request_size: 1024 * 1024,
        match_cursor_enabled,
    }
}

fn setup_test_server_with(match_cursor_enabled: bool) -> (TestServer, TempDir, AppState) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let config = test_config(&db_path, match_cursor_enabled);
    let db = Database::new(&config.db_path).unwrap();
    let state = AppState::new(config, db);
    let app = create_app(state.clone(), false);
    let server = TestServer::new(app).unwrap();
    (server, temp_dir, state)
}

fn setup_test_server() -> (TestServer, TempDir, AppState) {
    setup_test_server_with(false)
}

async fn post_profile(server: &TestServer, body: serde_json::Value) {
    let response = server.post("/user").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_lifecycle() {
    let (server, _temp, _state) = setup_test_server();

    post_profile(
        &server,
        json!({ "uid": "u1", "fullName": "Ann", "gender": "female" }),
    )
    .await;

    let get_response = server.get("/user/u1").await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let profile: serde_json::Value = get_response.json();
    assert_eq!(profile["uid"], json!("u1"));
    assert_eq!(profile["fullName"], json!("Ann"));

    let delete_response = server.delete("/user/u1").await;
    assert_eq!(delete_response.status_code(), StatusCode::OK);
    let deleted: serde_json::Value = delete_response.json();
    assert_eq!(deleted["deleted"], json!(true));

    // Gone afterwards, with a clean envelope rather than store internals
    let get_deleted = server.get("/user/u1").await;
    assert_eq!(get_deleted.status_code(), StatusCode::NOT_FOUND);
    let envelope: serde_json::Value = get_deleted.json();
    assert_eq!(envelope["error"], json!("Not found"));
    assert!(envelope["err"]["message"].is_string());
}

#[tokio::test]
async fn test_profile_posts_merge_fields() {
    let (server, _temp, _state) = setup_test_server();

    post_profile(&server, json!({ "uid": "u1", "fullName": "Ann" })).await;
    post_profile(&server, json!({ "uid": "u1", "profession": "baker" })).await;

    let profile: serde_json::Value = server.get("/user/u1").await.json();
    assert_eq!(profile["fullName"], json!("Ann"));
    assert_eq!(profile["profession"], json!("baker"));
}

#[tokio::test]
async fn test_user_post_without_uid_is_rejected() {
    let (server, _temp, _state) = setup_test_server();

    let response = server.post("/user").json(&json!({ "fullName": "Ann" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let envelope: serde_json::Value = response.json();
    assert!(envelope["error"].as_str().unwrap().contains("uid"));
}

#[tokio::test]
async fn test_delete_absent_user_is_not_found() {
    let (server, _temp, _state) = setup_test_server();
    let response = server.delete("/user/nobody").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_post_get_delete() {
    let (server, _temp, _state) = setup_test_server();

    let post_response = server
        .post("/user/u1/likes")
        .json(&json!({ "uid": "u2", "fullName": "Bea" }))
        .await;
    assert_eq!(post_response.status_code(), StatusCode::OK);
    let posted: serde_json::Value = post_response.json();
    assert_eq!(posted["isAMatch"], json!(false));
    assert_eq!(posted["listingType"], json!("likes"));

    let likes: serde_json::Value = server.get("/user/u1/likes").await.json();
    assert_eq!(likes["u2"]["fullName"], json!("Bea"));

    let all: serde_json::Value = server.get("/user/u1/listing").await.json();
    assert_eq!(all["likes"]["u2"]["uid"], json!("u2"));

    let delete_response = server.delete("/user/u1/likes/u2").await;
    assert_eq!(delete_response.status_code(), StatusCode::OK);

    // Second delete of the same entry must not silently succeed
    let delete_again = server.delete("/user/u1/likes/u2").await;
    assert_eq!(delete_again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_listing_type_is_rejected() {
    let (server, _temp, _state) = setup_test_server();

    let response = server
        .post("/user/u1/friends")
        .json(&json!({ "uid": "u2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let get_response = server.get("/user/u1/friends").await;
    assert_eq!(get_response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invite_requires_invitation_info() {
    let (server, _temp, _state) = setup_test_server();

    let response = server
        .post("/user/u1/invites")
        .json(&json!({ "uid": "u2", "fullName": "Bea" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Nothing was written
    let invites: serde_json::Value = server.get("/user/u1/invites").await.json();
    assert_eq!(invites, json!({}));

    let with_invitation = server
        .post("/user/u1/invites")
        .json(&json!({
            "uid": "u2",
            "fullName": "Bea",
            "invitationInfo": {
                "bookingType": "dinner",
                "proposedDate": "2024-06-01T19:00:00Z"
            }
        }))
        .await;
    assert_eq!(with_invitation.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_mutual_like_promotes_to_match() {
    let (server, _temp, _state) = setup_test_server();

    let first = server
        .post("/user/a/likes")
        .json(&json!({ "uid": "b", "fullName": "Bea" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first_body: serde_json::Value = first.json();
    assert_eq!(first_body["isAMatch"], json!(false));

    let second = server
        .post("/user/b/likes")
        .json(&json!({ "uid": "a", "fullName": "Ann" }))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second_body: serde_json::Value = second.json();
    assert_eq!(second_body["isAMatch"], json!(true));
    assert_eq!(second_body["listingType"], json!("matches"));

    // a's likes entry for b moved into matches
    let a_likes: serde_json::Value = server.get("/user/a/likes").await.json();
    assert!(a_likes.as_object().unwrap().is_empty());
    let a_matches: serde_json::Value = server.get("/user/a/matches").await.json();
    assert_eq!(a_matches["b"]["fullName"], json!("Bea"));

    // b's side recorded directly under matches
    let b_matches: serde_json::Value = server.get("/user/b/matches").await.json();
    assert_eq!(b_matches["a"]["fullName"], json!("Ann"));
}

#[tokio::test]
async fn test_direct_matches_post_is_allowed() {
    let (server, _temp, _state) = setup_test_server();

    let response = server
        .post("/user/u1/matches")
        .json(&json!({ "uid": "u2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    // An explicit matches post is an escape hatch, not a mutual match
    assert_eq!(body["isAMatch"], json!(false));
}

#[tokio::test]
async fn test_match_making_query() {
    let (server, _temp, _state) = setup_test_server();

    post_profile(
        &server,
        json!({ "uid": "u1", "gender": "female", "interests": ["jazz", "chess"] }),
    )
    .await;
    post_profile(
        &server,
        json!({ "uid": "u2", "gender": "male", "interests": ["jazz"] }),
    )
    .await;
    post_profile(
        &server,
        json!({ "uid": "u3", "gender": "female", "interests": ["surfing"] }),
    )
    .await;

    let response = server
        .post("/match-making")
        .json(&json!({
            "uid": "u9",
            "gender": "male",
            "orientation": "straight",
            "interests": ["jazz"]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let matches: serde_json::Value = response.json();
    let uids: Vec<&str> = matches
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["uid"].as_str().unwrap())
        .collect();
    // u2 is male, u3 has no shared interest
    assert_eq!(uids, vec!["u1"]);
}

#[tokio::test]
async fn test_match_making_excludes_requester() {
    let (server, _temp, _state) = setup_test_server();

    post_profile(&server, json!({ "uid": "u1", "gender": "male" })).await;
    post_profile(&server, json!({ "uid": "u2", "gender": "male" })).await;

    let response = server
        .post("/match-making")
        .json(&json!({ "uid": "u1", "orientation": "bisexual" }))
        .await;
    let matches: serde_json::Value = response.json();
    let uids: Vec<&str> = matches
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["uid"].as_str().unwrap())
        .collect();
    assert_eq!(uids, vec!["u2"]);
}

#[tokio::test]
async fn test_match_making_without_query_fields_is_rejected() {
    let (server, _temp, _state) = setup_test_server();
    let response = server.post("/match-making").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_making_scalar_interest_and_empty_result() {
    let (server, _temp, _state) = setup_test_server();

    post_profile(
        &server,
        json!({ "uid": "u1", "gender": "female", "interests": ["chess"] }),
    )
    .await;

    let response = server
        .post("/match-making")
        .json(&json!({
            "uid": "u9",
            "gender": "male",
            "orientation": "straight",
            "interests": "surfing"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let matches: serde_json::Value = response.json();
    assert_eq!(matches, json!([]));
}

#[tokio::test]
async fn test_match_cursor_written_when_enabled() {
    let (server, _temp, state) = setup_test_server_with(true);

    post_profile(&server, json!({ "uid": "u1", "gender": "female" })).await;

    let response = server
        .post("/match-making")
        .json(&json!({ "uid": "u9", "gender": "male", "orientation": "straight" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let cursor = state
        .db
        .docs
        .get("match-cursors", "u9")
        .unwrap()
        .expect("cursor written");
    assert_eq!(cursor.get("lastUid"), Some(&json!("u1")));
}

#[tokio::test]
async fn test_learnings_and_interests() {
    let (server, _temp, state) = setup_test_server();

    let empty: serde_json::Value = server.get("/learnings").await.json();
    assert_eq!(empty, json!([]));

    let learning = json!({ "title": "First date ideas" });
    let id = state
        .db
        .content
        .add_learning(learning.as_object().unwrap().clone())
        .unwrap();

    let listed: serde_json::Value = server.get("/learnings").await.json();
    assert_eq!(listed[0]["id"], json!(id));

    let item: serde_json::Value = server.get(&format!("/learnings/{}", id)).await.json();
    assert_eq!(item["title"], json!("First date ideas"));

    let missing = server.get("/learnings/nope").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    state
        .db
        .content
        .set_interest_catalog(&["jazz".to_string(), "chess".to_string()])
        .unwrap();
    let interests: serde_json::Value = server.get("/interests").await.json();
    assert_eq!(interests, json!(["jazz", "chess"]));
}

#[tokio::test]
async fn test_send_email_is_persisted_not_delivered() {
    let (server, _temp, state) = setup_test_server();

    let response = server
        .post("/send-email")
        .json(&json!({ "toUser": "u2", "fromUser": "u1", "message": "hi" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();

    let stored = state.db.docs.get("mail", id).unwrap().unwrap();
    assert_eq!(stored.get("message"), Some(&json!("hi")));
    assert!(stored.contains_key("queuedAt"));
}

#[tokio::test]
async fn test_send_email_requires_recipient() {
    let (server, _temp, state) = setup_test_server();

    let response = server
        .post("/send-email")
        .json(&json!({ "fromUser": "u1", "message": "hi" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(state.db.docs.list("mail").unwrap().is_empty());
}
