// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use hd_notes::config::Config;
use hd_notes::db::Db;
use hd_notes::error::AppError;
use hd_notes::routes::create_router;
use hd_notes::services::{AuthService, GoogleVerifier, OtpMailer};
use hd_notes::AppState;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// One delivered OTP, captured instead of sent.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SentOtp {
    pub email: String,
    pub name: String,
    pub otp: String,
}

/// Mailer that records deliveries instead of talking to SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentOtp>>,
}

#[allow(dead_code)]
impl RecordingMailer {
    /// The most recently delivered code for an address.
    pub fn last_otp_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.email == email)
            .map(|s| s.otp.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentOtp {
            email: email.to_string(),
            name: name.to_string(),
            otp: otp.to_string(),
        });
        Ok(())
    }
}

/// Mailer whose every delivery fails, for dependency-failure tests.
#[allow(dead_code)]
pub struct FailingMailer;

#[async_trait]
impl OtpMailer for FailingMailer {
    async fn send_otp(&self, _email: &str, _name: &str, _otp: &str) -> Result<(), AppError> {
        Err(AppError::Dependency("SMTP relay unreachable".to_string()))
    }
}

/// Assemble the app around a database and mailer.
pub fn build_app(db: Db, mailer: Arc<dyn OtpMailer>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let google = Arc::new(GoogleVerifier::new(&config).expect("verifier"));
    build_app_with_verifier(db, mailer, google)
}

/// Assemble the app with an explicit Google verifier, for tests that sign
/// their own ID tokens against a static key.
#[allow(dead_code)]
pub fn build_app_with_verifier(
    db: Db,
    mailer: Arc<dyn OtpMailer>,
    google: Arc<GoogleVerifier>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();

    let auth = AuthService::new(
        db.clone(),
        mailer,
        google,
        config.jwt_signing_key.clone(),
        config.session_ttl_days,
    );

    let state = Arc::new(AppState { config, db, auth });
    (create_router(state.clone()), state)
}

/// Test app with an offline mock database and a recording mailer.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let (app, state) = build_app(Db::new_mock(), mailer.clone());
    (app, state, mailer)
}

/// Test app against the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>, Arc<RecordingMailer>) {
    let db = Db::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator");
    let mailer = Arc::new(RecordingMailer::default());
    let (app, state) = build_app(db, mailer.clone());
    (app, state, mailer)
}

/// POST a JSON body and return status plus parsed response body.
#[allow(dead_code)]
pub async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// POST a JSON body with a bearer token.
#[allow(dead_code)]
pub async fn post_json_with_token(
    app: &axum::Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// DELETE with a bearer token.
#[allow(dead_code)]
pub async fn delete_with_token(
    app: &axum::Router,
    uri: &str,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// GET with an optional bearer token.
#[allow(dead_code)]
pub async fn get_with_token(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
