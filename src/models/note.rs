// SPDX-License-Identifier: MIT

//! Note model for storage and API.

use serde::{Deserialize, Serialize};

/// Owner-scoped note record in Firestore (document ID = `id`).
///
/// Notes are immutable once created; there is no edit operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique ID, assigned at creation
    pub id: String,
    /// Title, 1-200 characters
    pub title: String,
    /// Body, 1-5000 characters
    pub content: String,
    /// Owning user's ID
    pub owner_id: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Note {
    pub fn new(owner_id: String, title: String, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            content,
            owner_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
