// SPDX-License-Identifier: MIT

//! Authentication flows: signup, OTP verification, sign-in, resend, and
//! Google sign-in.
//!
//! Per user the lifecycle is Unregistered -> PendingVerification -> Verified,
//! with PendingVerification reentrant: re-signup or resend before
//! verification overwrites the outstanding challenge (last-write-wins, no
//! challenge history).

use crate::db::Db;
use crate::error::AppError;
use crate::middleware::auth::create_session_token;
use crate::models::{User, UserProfile};
use crate::services::email::OtpMailer;
use crate::services::google::{GoogleAuthError, GoogleVerifier};
use crate::services::otp;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Placeholder birth date for accounts created via Google, which does not
/// supply one.
const GOOGLE_SENTINEL_DOB: (i32, u32, u32) = (1990, 1, 1);

/// Successful authentication: a session token plus the sanitized user.
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Orchestrates the auth state machine against the store, the mailer, and
/// the Google verifier. Collaborators are injected once at startup.
pub struct AuthService {
    db: Db,
    mailer: Arc<dyn OtpMailer>,
    google: Arc<GoogleVerifier>,
    jwt_signing_key: Vec<u8>,
    session_ttl_days: i64,
}

impl AuthService {
    pub fn new(
        db: Db,
        mailer: Arc<dyn OtpMailer>,
        google: Arc<GoogleVerifier>,
        jwt_signing_key: Vec<u8>,
        session_ttl_days: i64,
    ) -> Self {
        Self {
            db,
            mailer,
            google,
            jwt_signing_key,
            session_ttl_days,
        }
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, AppError> {
        let token = create_session_token(&user.id, &self.jwt_signing_key, self.session_ttl_days)?;
        Ok(AuthSession {
            token,
            user: UserProfile::from(user),
        })
    }

    /// Register (or re-register) an email and dispatch a verification OTP.
    ///
    /// Decision table: no user -> insert; unverified user exists -> update
    /// name/DOB and reissue the challenge; verified user exists -> Conflict.
    /// This is the only path that updates name/DOB after creation.
    ///
    /// If delivery fails the operation fails, but the user row stays in place
    /// with an undelivered code; the caller recovers via signup or resend.
    pub async fn signup(
        &self,
        name: String,
        email: &str,
        date_of_birth: NaiveDate,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);

        let mut user = match self.db.find_user_by_email(&email).await? {
            Some(existing) if existing.is_verified => return Err(AppError::Conflict),
            Some(mut existing) => {
                existing.name = name;
                existing.date_of_birth = date_of_birth;
                existing
            }
            None => User::new(name, email.clone(), date_of_birth),
        };

        let code = otp::generate()?;
        user.issue_challenge(code.clone(), Utc::now());
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Signup challenge issued");

        self.mailer.send_otp(&user.email, &user.name, &code).await
    }

    /// Complete registration by verifying the outstanding challenge.
    ///
    /// On success the user becomes verified and the challenge is cleared in
    /// the same document write, so a replay of the same code fails.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);

        let mut user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.challenge_matches(code) {
            return Err(AppError::InvalidChallenge);
        }

        if user.challenge_expired(Utc::now()) {
            return Err(AppError::ChallengeExpired);
        }

        user.is_verified = true;
        user.clear_challenge();
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Account verified");

        self.issue_session(user)
    }

    /// Sign in a verified user with a previously requested login OTP.
    ///
    /// Every miss (no verified user, absent/mismatched/expired challenge)
    /// collapses to InvalidCredential so nothing is leaked about which check
    /// failed.
    pub async fn signin(&self, email: &str, code: &str) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);

        let user = self
            .db
            .find_user_by_email(&email)
            .await?
            .filter(|u| u.is_verified)
            .ok_or(AppError::InvalidCredential)?;

        if !user.challenge_matches(code) || user.challenge_expired(Utc::now()) {
            return Err(AppError::InvalidCredential);
        }

        tracing::info!(user_id = %user.id, "User signed in");

        self.issue_session(user)
    }

    /// Issue a fresh login challenge for a verified user, overwriting any
    /// outstanding one, and dispatch it. Serves both the request-login-otp
    /// and resend-otp entry points.
    pub async fn reissue_challenge(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);

        let mut user = self
            .db
            .find_user_by_email(&email)
            .await?
            .filter(|u| u.is_verified)
            .ok_or_else(|| AppError::NotFound("User not found or not verified".to_string()))?;

        let code = otp::generate()?;
        user.issue_challenge(code.clone(), Utc::now());
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Login challenge reissued");

        self.mailer.send_otp(&user.email, &user.name, &code).await
    }

    /// Sign in with a Google ID token.
    ///
    /// A new user is created already verified with a sentinel birth date; an
    /// existing unlinked account is linked and force-verified. Control of the
    /// email at Google is treated as sufficient proof of email ownership.
    pub async fn google_sign_in(&self, credential: &str) -> Result<AuthSession, AppError> {
        let info = self
            .google
            .verify_id_token(credential)
            .await
            .map_err(|e| match e {
                GoogleAuthError::Rejected(reason) => {
                    tracing::warn!(reason = %reason, "Google sign-in rejected");
                    AppError::InvalidCredential
                }
                GoogleAuthError::Transient(reason) => AppError::Dependency(reason),
            })?;

        let email = normalize_email(&info.email);

        let user = match self.db.find_user_by_email(&email).await? {
            None => {
                let (y, m, d) = GOOGLE_SENTINEL_DOB;
                let dob = NaiveDate::from_ymd_opt(y, m, d)
                    .ok_or_else(|| anyhow::anyhow!("invalid sentinel birth date"))?;
                let mut user = User::new(info.name, email, dob);
                user.is_verified = true;
                user.google_id = Some(info.sub);
                self.db.upsert_user(&user).await?;

                tracing::info!(user_id = %user.id, "User created via Google sign-in");
                user
            }
            Some(mut existing) if existing.google_id.is_none() => {
                existing.google_id = Some(info.sub);
                existing.is_verified = true;
                self.db.upsert_user(&existing).await?;

                tracing::info!(user_id = %existing.id, "Linked existing account to Google");
                existing
            }
            Some(existing) => existing,
        };

        self.issue_session(user)
    }
}

/// Case-normalize an email for lookup and storage.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
