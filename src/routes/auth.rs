// SPDX-License-Identifier: MIT

//! Authentication routes: email/OTP flows and Google sign-in.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::routes::ApiResponse;
use crate::services::AuthSession;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/signin", post(signin))
        .route("/auth/request-login-otp", post(request_login_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/google", post(google_auth))
}

/// Run field validation, collecting messages into a single Validation error.
/// Rejected before any store access.
pub(crate) fn validated<T: Validate>(req: &T) -> Result<()> {
    req.validate().map_err(|errs| {
        let mut messages: Vec<String> = Vec::new();
        for (field, errors) in errs.field_errors() {
            for error in errors {
                messages.push(match &error.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for '{}'", field),
                });
            }
        }
        messages.sort();
        AppError::Validation(messages)
    })
}

fn parse_date_of_birth(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(vec!["Please provide a valid date of birth".to_string()])
    })
}

// ─── Signup ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2-100 characters"))]
    name: String,
    #[validate(email(message = "Please provide a valid email"))]
    email: String,
    date_of_birth: String,
}

#[derive(Serialize)]
pub struct SignupData {
    pub email: String,
    pub otp_sent: bool,
}

/// Register an email and dispatch a verification OTP. The code is never
/// returned in the response.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    validated(&req)?;
    let date_of_birth = parse_date_of_birth(&req.date_of_birth)?;

    state
        .auth
        .signup(req.name.trim().to_string(), &req.email, date_of_birth)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(
            "OTP sent to your email. Please verify to complete registration.",
            SignupData {
                email: req.email.trim().to_lowercase(),
                otp_sent: true,
            },
        ),
    ))
}

// ─── OTP Verification & Sign-in ──────────────────────────────

#[derive(Deserialize, Validate)]
pub struct OtpRequest {
    #[validate(email(message = "Please provide a valid email"))]
    email: String,
    #[validate(length(min = 6, max = 6, message = "OTP must be 6 digits"))]
    otp: String,
}

/// Complete registration with the emailed code; returns a session token.
async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<ApiResponse<AuthSession>>> {
    validated(&req)?;

    let session = state.auth.verify_otp(&req.email, &req.otp).await?;

    Ok(ApiResponse::new("Account verified successfully", session))
}

/// Sign in a verified user with a freshly requested login code.
async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<ApiResponse<AuthSession>>> {
    validated(&req)?;

    let session = state.auth.signin(&req.email, &req.otp).await?;

    Ok(ApiResponse::new("Signed in successfully", session))
}

// ─── Challenge Reissue ───────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Please provide a valid email"))]
    email: String,
}

/// Request a login OTP for a verified user.
async fn request_login_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<ApiResponse<()>>> {
    validated(&req)?;

    state.auth.reissue_challenge(&req.email).await?;

    Ok(ApiResponse::message("Login OTP sent to your email"))
}

/// Resend a code, overwriting the outstanding challenge.
async fn resend_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<ApiResponse<()>>> {
    validated(&req)?;

    state.auth.reissue_challenge(&req.email).await?;

    Ok(ApiResponse::message("New OTP sent to your email"))
}

// ─── Google Sign-in ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct GoogleAuthRequest {
    #[validate(length(min = 1, message = "Google credential is required"))]
    credential: String,
}

/// Sign in with a Google ID token.
async fn google_auth(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GoogleAuthRequest>,
) -> Result<Json<ApiResponse<AuthSession>>> {
    validated(&req)?;

    let session = state.auth.google_sign_in(&req.credential).await?;

    Ok(ApiResponse::new("Google authentication successful", session))
}
