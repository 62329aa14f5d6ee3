// SPDX-License-Identifier: MIT

//! HD Notes: personal note-taking backend with email/OTP and Google sign-in.
//!
//! This crate provides the backend API: OTP-based registration and login,
//! Google sign-in, stateless session tokens, and owner-scoped notes.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::AuthService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub auth: AuthService,
}
