// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is fetched once at startup; a missing secret (JWT signing key,
//! SMTP credentials, Google client ID) is a fatal configuration error, never
//! a per-request error.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Google OAuth client ID (audience for Google sign-in tokens)
    pub google_client_id: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime in days
    pub session_ttl_days: i64,
    /// SMTP relay host for OTP delivery
    pub smtp_host: String,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: String,
    /// From address for OTP mail
    pub email_from: String,
}

const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, secrets can be set via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            smtp_host: env::var("SMTP_HOST").map_err(|_| ConfigError::Missing("SMTP_HOST"))?,
            smtp_username: env::var("SMTP_USERNAME")
                .map_err(|_| ConfigError::Missing("SMTP_USERNAME"))?,
            smtp_password: env::var("SMTP_PASSWORD")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SMTP_PASSWORD"))?,
            email_from: env::var("EMAIL_FROM").map_err(|_| ConfigError::Missing("EMAIL_FROM"))?,
        })
    }

    /// Fixed config for tests. Not read from the environment.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            smtp_host: "smtp.example.com".to_string(),
            smtp_username: "test@example.com".to_string(),
            smtp_password: "test_password".to_string(),
            email_from: "HD Notes <test@example.com>".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
