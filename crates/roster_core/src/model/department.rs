//! Department domain model.

use crate::model::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a department row.
pub type DepartmentId = Uuid;

/// Persisted department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub uuid: DepartmentId,
    pub name: String,
    /// Epoch milliseconds; zero until persisted and reloaded.
    pub created_at: i64,
    /// Epoch milliseconds; refreshed by the full-entity save path only.
    pub updated_at: i64,
    pub is_deleted: bool,
}

impl Department {
    pub const TABLE: &'static str = "departments";

    /// Creates a new department draft with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(uuid: DepartmentId, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            created_at: 0,
            updated_at: 0,
            is_deleted: false,
        }
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    pub fn restore(&mut self) {
        self.is_deleted = false;
    }
}

impl Record for Department {
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
