// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::Db;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const NOTES: &str = "notes";
}
