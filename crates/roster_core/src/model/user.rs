//! User domain model.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another user.
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user row.
pub type UserId = Uuid;

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable global ID used for linking and auditing.
    pub uuid: UserId,
    pub name: String,
    pub age: i32,
    /// Epoch milliseconds; zero until persisted and reloaded.
    pub created_at: i64,
    /// Epoch milliseconds; refreshed by the full-entity save path only.
    pub updated_at: i64,
    /// Soft delete tombstone; rows are never physically removed.
    pub is_deleted: bool,
}

impl User {
    pub const TABLE: &'static str = "users";

    /// Creates a new user draft with a generated stable ID.
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self::with_id(Uuid::new_v4(), name, age)
    }

    /// Creates a user draft with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: UserId, name: impl Into<String>, age: i32) -> Self {
        Self {
            uuid,
            name: name.into(),
            age,
            created_at: 0,
            updated_at: 0,
            is_deleted: false,
        }
    }

    /// Marks this user as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }
}

impl Record for User {
    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}
