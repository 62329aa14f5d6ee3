// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod auth;
pub mod email;
pub mod google;
pub mod otp;

pub use auth::{AuthService, AuthSession};
pub use email::{OtpMailer, SmtpMailer};
pub use google::{GoogleAuthError, GoogleUserInfo, GoogleVerifier};
