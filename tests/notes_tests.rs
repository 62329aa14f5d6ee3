// SPDX-License-Identifier: MIT

//! Notes CRUD and ownership tests against the Firestore emulator.

use axum::http::StatusCode;
use serde_json::json;

mod common;

/// Provision a verified user and return their session token.
async fn verified_session(
    app: &axum::Router,
    mailer: &common::RecordingMailer,
    name: &str,
) -> String {
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4());

    common::post_json(
        app,
        "/auth/signup",
        json!({"name": name, "email": email, "date_of_birth": "2000-01-01"}),
    )
    .await;

    let code = mailer.last_otp_for(&email).expect("OTP should be delivered");
    let (status, body) = common::post_json(
        app,
        "/auth/verify-otp",
        json!({"email": email, "otp": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {body}");

    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_and_list_notes() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token = verified_session(&app, &mailer, "Ann").await;

    let (status, body) = common::post_json_with_token(
        &app,
        "/api/notes",
        &token,
        json!({"title": "Groceries", "content": "milk, eggs"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["data"]["title"], "Groceries");
    assert!(body["data"]["id"].as_str().is_some());

    common::post_json_with_token(
        &app,
        "/api/notes",
        &token,
        json!({"title": "Ideas", "content": "write more tests"}),
    )
    .await;

    let (status, body) = common::get_with_token(&app, "/api/notes", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let notes = body["data"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    // Newest first.
    assert_eq!(notes[0]["title"], "Ideas");
    assert_eq!(notes[1]["title"], "Groceries");
}

#[tokio::test]
async fn test_notes_are_scoped_to_owner() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token_a = verified_session(&app, &mailer, "Ann").await;
    let token_b = verified_session(&app, &mailer, "Ben").await;

    common::post_json_with_token(
        &app,
        "/api/notes",
        &token_a,
        json!({"title": "Private", "content": "Ann's note"}),
    )
    .await;

    let (status, body) = common::get_with_token(&app, "/api/notes", Some(&token_b)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_own_note() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token = verified_session(&app, &mailer, "Ann").await;

    let (_, body) = common::post_json_with_token(
        &app,
        "/api/notes",
        &token,
        json!({"title": "Temp", "content": "delete me"}),
    )
    .await;
    let note_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) =
        common::delete_with_token(&app, &format!("/api/notes/{note_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Note deleted successfully");

    let (_, body) = common::get_with_token(&app, "/api/notes", Some(&token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_other_users_note_is_not_found() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token_a = verified_session(&app, &mailer, "Ann").await;
    let token_b = verified_session(&app, &mailer, "Ben").await;

    let (_, body) = common::post_json_with_token(
        &app,
        "/api/notes",
        &token_a,
        json!({"title": "Private", "content": "Ann's note"}),
    )
    .await;
    let note_id = body["data"]["id"].as_str().unwrap().to_string();

    // Ownership mismatch reads as absence, not forbidden.
    let (status, body) =
        common::delete_with_token(&app, &format!("/api/notes/{note_id}"), &token_b).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");

    // The note is still there for its owner.
    let (_, body) = common::get_with_token(&app, "/api/notes", Some(&token_a)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_note() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token = verified_session(&app, &mailer, "Ann").await;

    let (status, _) =
        common::delete_with_token(&app, "/api/notes/no-such-note", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_note_validation() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token = verified_session(&app, &mailer, "Ann").await;

    let (status, body) = common::post_json_with_token(
        &app,
        "/api/notes",
        &token,
        json!({"title": "", "content": "body"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "Title must be between 1-200 characters"));

    let long_content = "x".repeat(5001);
    let (status, body) = common::post_json_with_token(
        &app,
        "/api/notes",
        &token,
        json!({"title": "ok", "content": long_content}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "Content must be between 1-5000 characters"));
}

#[tokio::test]
async fn test_profile_reflects_stored_user() {
    require_emulator!();
    let (app, _, mailer) = common::create_emulator_app().await;
    let token = verified_session(&app, &mailer, "Ann").await;

    let (status, body) = common::get_with_token(&app, "/api/profile", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ann");
    assert_eq!(body["data"]["is_verified"], true);
    assert_eq!(body["data"]["date_of_birth"], "2000-01-01");
    assert!(body["data"].get("otp").is_none());
}
