// SPDX-License-Identifier: MIT

//! User model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Validity window for an outstanding OTP challenge.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Namespace for deriving user IDs from email addresses.
const USER_ID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x8f3c1d2e_a4b5_4c6d_9e7f_102132435465);

/// User record stored in Firestore (document ID = `id`).
///
/// The ID is derived deterministically from the normalized email, so two
/// writers racing to create the same email target the same document and
/// resolve last-write-wins instead of producing duplicates. Email uniqueness
/// is structural: one email maps to exactly one document ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable unique ID, derived from the email at creation
    pub id: String,
    /// Unique, lowercased email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Date of birth (ISO 8601 date)
    pub date_of_birth: NaiveDate,
    /// Set exactly once, by OTP verification or Google sign-in
    pub is_verified: bool,
    /// Outstanding OTP code, present only while a challenge is live
    pub otp: Option<String>,
    /// Challenge expiry (RFC 3339); absent or past means the code is invalid
    pub otp_expires: Option<String>,
    /// Google subject ID, set at most once when the account is linked
    pub google_id: Option<String>,
    /// When the user was first created (RFC 3339)
    pub created_at: String,
}

impl User {
    /// The document ID for a normalized email.
    pub fn id_for_email(email: &str) -> String {
        uuid::Uuid::new_v5(&USER_ID_NAMESPACE, email.as_bytes()).to_string()
    }

    /// Create a new, unverified user with no outstanding challenge.
    pub fn new(name: String, email: String, date_of_birth: NaiveDate) -> Self {
        Self {
            id: Self::id_for_email(&email),
            email,
            name,
            date_of_birth,
            is_verified: false,
            otp: None,
            otp_expires: None,
            google_id: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Install a fresh OTP challenge, overwriting any outstanding one.
    pub fn issue_challenge(&mut self, code: String, now: DateTime<Utc>) {
        self.otp = Some(code);
        self.otp_expires = Some((now + chrono::Duration::minutes(OTP_TTL_MINUTES)).to_rfc3339());
    }

    /// Clear the outstanding challenge (code and expiry together).
    pub fn clear_challenge(&mut self) {
        self.otp = None;
        self.otp_expires = None;
    }

    /// Exact string match against the stored code. No challenge means no match.
    pub fn challenge_matches(&self, code: &str) -> bool {
        self.otp.as_deref().is_some_and(|stored| stored == code)
    }

    /// Whether the outstanding challenge is past its window.
    ///
    /// A missing or unparseable expiry counts as expired.
    pub fn challenge_expired(&self, now: DateTime<Utc>) -> bool {
        match self
            .otp_expires
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            Some(expires) => expires.with_timezone(&Utc) < now,
            None => true,
        }
    }
}

/// Sanitized user view returned to clients. Never carries OTP state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}
