// SPDX-License-Identifier: MIT

//! API routes for authenticated users (profile and notes).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Note, UserProfile};
use crate::routes::auth::validated;
use crate::routes::ApiResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication).
/// The session guard is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/{id}", delete(delete_note))
}

// ─── Profile ─────────────────────────────────────────────────

/// Get the current user's sanitized profile.
///
/// The guard already re-fetched the user from the store for this request.
async fn get_profile(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    Ok(ApiResponse::new("Profile retrieved successfully", auth.user))
}

// ─── Notes ───────────────────────────────────────────────────

/// List the caller's notes, most-recently-created first.
async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Note>>>> {
    let notes = state.db.notes_for_owner(&auth.user_id).await?;

    Ok(ApiResponse::new("Notes retrieved successfully", notes))
}

#[derive(Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    title: String,
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Content must be between 1-5000 characters"
    ))]
    content: String,
}

/// Create a note owned by the caller.
async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse> {
    validated(&req)?;

    let note = Note::new(
        auth.user_id,
        req.title.trim().to_string(),
        req.content.trim().to_string(),
    );
    state.db.set_note(&note).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::new("Note created successfully", note),
    ))
}

/// Delete a note owned by the caller.
///
/// A note owned by someone else reads as NotFound, indistinguishable from a
/// missing note, so existence is not leaked across owners.
async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let note = state
        .db
        .get_note(&id)
        .await?
        .filter(|n| n.owner_id == auth.user_id)
        .ok_or_else(|| AppError::NotFound("Note not found".to_string()))?;

    state.db.delete_note(&note.id).await?;

    Ok(ApiResponse::message("Note deleted successfully"))
}
