//! User Tests
//!
//! Covers registration, listing with viewer-relative flags, and profiles.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

// ===========================================================================
// Registration
// ===========================================================================

#[tokio::test]
async fn register_returns_created_user_without_password() {
    let app = app().await;

    let resp = app
        .post_json(
            "/api/users/",
            json!({
                "username": "reg_alice",
                "password": "pw-alice",
                "email": "alice@example.com",
                "first_name": "Alice",
                "last_name": "Liddell"
            }),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["username"], "reg_alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["first_name"], "Alice");
    assert!(body["id"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_duplicate_username_is_rejected() {
    let app = app().await;
    let payload = json!({
        "username": "reg_dup",
        "password": "pw",
        "email": "dup@example.com"
    });

    let resp = app.post_json("/api/users/", payload.clone(), None).await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app.post_json("/api/users/", payload, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["fields"]["username"][0],
        "A user with that username already exists."
    );

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'reg_dup'")
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn register_validates_fields() {
    let app = app().await;

    let resp = app
        .post_json(
            "/api/users/",
            json!({
                "username": "bad name!",
                "password": "",
                "email": "not-an-email"
            }),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let fields = &resp.json()["fields"];
    assert!(fields["username"].is_array());
    assert!(fields["password"].is_array());
    assert!(fields["email"].is_array());
}

// ===========================================================================
// Listing and profiles
// ===========================================================================

#[tokio::test]
async fn list_users_requires_auth() {
    let app = app().await;

    let resp = app.get("/api/users/", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_flags_friends_for_viewer() {
    let app = app().await;
    let viewer = app.create_user("list_viewer").await;
    let friend = app.create_user("list_friend").await;

    let resp = app
        .post_json(
            &format!("/api/users/{}/add/", friend.id),
            json!({}),
            Some(&viewer.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    // Newest accounts come first, so both fresh users are on page 1
    let resp = app.get("/api/users/", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert!(body["count"].as_i64().unwrap() >= 2);

    let results = body["results"].as_array().unwrap();
    let friend_row = results
        .iter()
        .find(|row| row["id"] == friend.id.to_string())
        .expect("friend listed");
    assert_eq!(friend_row["is_friend"], true);
    assert_eq!(friend_row["username"], friend.username);

    let self_row = results
        .iter()
        .find(|row| row["id"] == viewer.id.to_string())
        .expect("viewer listed");
    assert_eq!(self_row["is_friend"], false);
}

#[tokio::test]
async fn invalid_page_is_not_found() {
    let app = app().await;
    let viewer = app.create_user("page_viewer").await;

    let resp = app.get("/api/users/?page=9999", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "invalid page");

    let resp = app.get("/api/users/?page=0", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn myself_profile_includes_posts_and_friends() {
    let app = app().await;
    let me = app.create_user("profile_me").await;
    let friend = app.create_user("profile_friend").await;
    app.create_post(me.id, "Hello", "first post").await;

    app.post_json(
        &format!("/api/users/{}/add/", friend.id),
        json!({}),
        Some(&me.access_token),
    )
    .await;

    let resp = app.get("/api/users/myself/", Some(&me.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["username"], me.username);
    assert_eq!(body["friend_count"], 1);
    assert_eq!(body["friends"][0]["id"], friend.id.to_string());
    assert_eq!(body["posts"][0]["title"], "Hello");
    assert!(body["posts"][0]["created_at"].is_string());
}

#[tokio::test]
async fn profile_of_other_user_shows_is_friend() {
    let app = app().await;
    let me = app.create_user("profile_other_me").await;
    let other = app.create_user("profile_other").await;

    let resp = app
        .get(&format!("/api/users/{}/", other.id), Some(&me.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["is_friend"], false);

    app.post_json(
        &format!("/api/users/{}/add/", other.id),
        json!({}),
        Some(&me.access_token),
    )
    .await;

    let resp = app
        .get(&format!("/api/users/{}/", other.id), Some(&me.access_token))
        .await;
    assert_eq!(resp.json()["is_friend"], true);
}

#[tokio::test]
async fn unknown_user_profile_is_not_found() {
    let app = app().await;
    let me = app.create_user("profile_unknown").await;

    let resp = app
        .get(
            &format!("/api/users/{}/", uuid::Uuid::new_v4()),
            Some(&me.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ===========================================================================
// Account deletion
// ===========================================================================

async fn count(app: &common::TestApp, sql: &str, id: uuid::Uuid) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(app.pool())
        .await
        .expect("count query failed")
}

#[tokio::test]
async fn deleting_account_removes_everything_it_owns() {
    let app = app().await;
    let leaver = app.create_user("cascade_leaver").await;
    let stayer = app.create_user("cascade_stayer").await;

    let own_post = app.create_post(leaver.id, "mine", "leaving soon").await;
    let other_post = app.create_post(stayer.id, "theirs", "staying").await;

    // Rows on the leaver's post by someone else, and rows by the leaver elsewhere.
    for (post, token) in [
        (own_post, &stayer.access_token),
        (other_post, &leaver.access_token),
    ] {
        let resp = app
            .post_json("/api/comments/", json!({ "post": post, "body": "hey" }), Some(token))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        let resp = app
            .post_json("/api/reactions/", json!({ "post": post, "value": "heart" }), Some(token))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let resp = app
        .post_json(
            &format!("/api/users/{}/add/", stayer.id),
            json!({}),
            Some(&leaver.access_token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app
        .post_json("/api/chats/", json!({ "user_2": stayer.id }), Some(&leaver.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let chat_id = uuid::Uuid::parse_str(resp.json()["id"].as_str().unwrap()).unwrap();
    for token in [&leaver.access_token, &stayer.access_token] {
        let resp = app
            .post_json("/api/messages/", json!({ "chat": chat_id, "content": "hi" }), Some(token))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let resp = app.delete("/api/users/myself/", Some(&leaver.access_token)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let checks = [
        ("SELECT COUNT(*) FROM users WHERE id = $1", leaver.id),
        ("SELECT COUNT(*) FROM posts WHERE author_id = $1", leaver.id),
        ("SELECT COUNT(*) FROM comments WHERE author_id = $1", leaver.id),
        ("SELECT COUNT(*) FROM comments WHERE post_id = $1", own_post),
        ("SELECT COUNT(*) FROM reactions WHERE author_id = $1", leaver.id),
        ("SELECT COUNT(*) FROM reactions WHERE post_id = $1", own_post),
        (
            "SELECT COUNT(*) FROM friendships WHERE user_low = $1 OR user_high = $1",
            leaver.id,
        ),
        ("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = $1", leaver.id),
        ("SELECT COUNT(*) FROM chats WHERE id = $1", chat_id),
        ("SELECT COUNT(*) FROM messages WHERE chat_id = $1", chat_id),
    ];
    for (sql, id) in checks {
        assert_eq!(count(app, sql, id).await, 0, "{} left rows behind", sql);
    }

    // The other account and its post survive, minus the leaver's engagement.
    assert_eq!(count(app, "SELECT COUNT(*) FROM users WHERE id = $1", stayer.id).await, 1);
    assert_eq!(count(app, "SELECT COUNT(*) FROM posts WHERE id = $1", other_post).await, 1);
    assert_eq!(
        count(app, "SELECT COUNT(*) FROM comments WHERE post_id = $1", other_post).await,
        0
    );

    let resp = app.get("/api/users/myself/", Some(&stayer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["friend_count"], 0);
}
