// SPDX-License-Identifier: MIT

//! HD Notes API Server
//!
//! Personal note-taking service: users register via email/OTP or Google
//! sign-in, then create and delete short text notes tied to their account.

use hd_notes::{
    config::Config,
    db::Db,
    services::{AuthService, GoogleVerifier, SmtpMailer},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment; missing secrets are fatal here.
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting HD Notes API");

    // Initialize Firestore database
    let db = Db::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // SMTP transport for OTP delivery, built once and shared
    let mailer = Arc::new(SmtpMailer::new(&config).expect("Failed to initialize SMTP mailer"));
    tracing::info!(host = %config.smtp_host, "SMTP mailer initialized");

    // Google sign-in verifier (JWKS discovered and cached lazily)
    let google_verifier =
        Arc::new(GoogleVerifier::new(&config).expect("Failed to initialize Google verifier"));

    let auth = AuthService::new(
        db.clone(),
        mailer,
        google_verifier,
        config.jwt_signing_key.clone(),
        config.session_ttl_days,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth,
    });

    // Build router
    let app = hd_notes::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hd_notes=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
