// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod note;
pub mod user;

pub use note::Note;
pub use user::{User, UserProfile};
