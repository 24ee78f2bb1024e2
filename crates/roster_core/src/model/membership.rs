//! User/department membership association model.
//!
//! A membership is a plain record whose only payload is the two owning ids.
//! Modeling the relation as its own table keeps many-to-many open even where
//! the current product need looks one-to-many.

use crate::model::department::DepartmentId;
use crate::model::user::UserId;
use crate::model::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a membership row.
pub type MembershipId = Uuid;

/// Persisted membership record linking one user to one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub uuid: MembershipId,
    pub user_uuid: UserId,
    pub department_uuid: DepartmentId,
    /// Epoch milliseconds; zero until persisted and reloaded.
    pub created_at: i64,
    /// Epoch milliseconds; zero until persisted and reloaded.
    pub updated_at: i64,
    pub is_deleted: bool,
}

impl Membership {
    pub const TABLE: &'static str = "department_users";

    /// Creates a new membership draft with a generated stable ID.
    pub fn new(user_uuid: UserId, department_uuid: DepartmentId) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            user_uuid,
            department_uuid,
            created_at: 0,
            updated_at: 0,
            is_deleted: false,
        }
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }
}

impl Record for Membership {
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
