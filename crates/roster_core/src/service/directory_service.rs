//! Directory use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for user/department/membership writes.
//! - Wrap dependent multi-step writes in one transaction boundary.
//!
//! # Invariants
//! - `create_user_in_department` leaves no partial state behind on failure.
//! - Service APIs never bypass repository persistence contracts.

use crate::db::with_immediate_tx;
use crate::model::department::{Department, DepartmentId};
use crate::model::membership::Membership;
use crate::model::user::{User, UserId};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::membership_repo::{MembershipRepository, SqliteMembershipRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

/// Use-case service for directory writes.
pub struct DirectoryService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> DirectoryService<'conn> {
    /// Creates a service over a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates one user.
    pub fn create_user(&self, name: &str, age: i32) -> RepoResult<UserId> {
        let repo = SqliteUserRepository::try_new(&*self.conn)?;
        let user_id = repo.create(&User::new(name, age))?;
        info!("event=create_user module=service status=ok user={user_id}");
        Ok(user_id)
    }

    /// Creates one department.
    pub fn register_department(&self, name: &str) -> RepoResult<DepartmentId> {
        let repo = SqliteDepartmentRepository::try_new(&*self.conn)?;
        let department_id = repo.create(&Department::new(name))?;
        info!("event=register_department module=service status=ok department={department_id}");
        Ok(department_id)
    }

    /// Attaches an existing user to a department.
    pub fn add_member(&self, user_id: UserId, department_id: DepartmentId) -> RepoResult<()> {
        let repo = SqliteMembershipRepository::try_new(&*self.conn)?;
        repo.create(&Membership::new(user_id, department_id))?;
        info!(
            "event=add_member module=service status=ok user={user_id} department={department_id}"
        );
        Ok(())
    }

    /// Creates a user and their department membership as one atomic write.
    ///
    /// Either both rows exist afterwards or neither does; the triggering
    /// failure (e.g. an unknown department id hitting the foreign key)
    /// propagates unchanged.
    pub fn create_user_in_department(
        &mut self,
        name: &str,
        age: i32,
        department_id: DepartmentId,
    ) -> RepoResult<UserId> {
        let user = User::new(name, age);
        let user_id = with_immediate_tx(self.conn, |tx| {
            let users = SqliteUserRepository::try_new(tx)?;
            let user_id = users.create(&user)?;

            let memberships = SqliteMembershipRepository::try_new(tx)?;
            memberships.create(&Membership::new(user_id, department_id))?;

            Ok::<UserId, RepoError>(user_id)
        })?;

        info!(
            "event=create_user_in_department module=service status=ok user={user_id} department={department_id}"
        );
        Ok(user_id)
    }
}
