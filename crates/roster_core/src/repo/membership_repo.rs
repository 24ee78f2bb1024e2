//! Membership repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and query user/department association rows.
//! - Provide the flat user-id projection used by two-step relation lookups.
//!
//! # Invariants
//! - Scoped reads never return rows with `is_deleted = 1`.
//! - Foreign-key validity is enforced by SQLite, not re-checked here.

use crate::model::membership::{Membership, MembershipId};
use crate::model::user::UserId;
use crate::query::{Predicate, Scope};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MEMBERSHIP_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    department_uuid,
    created_at,
    updated_at,
    is_deleted
FROM department_users";

const MEMBERSHIP_REQUIRED_COLUMNS: &[&str] = &[
    "uuid",
    "user_uuid",
    "department_uuid",
    "created_at",
    "updated_at",
    "is_deleted",
];

/// Repository interface for membership persistence and queries.
pub trait MembershipRepository {
    fn create(&self, membership: &Membership) -> RepoResult<MembershipId>;
    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<Membership>>;
    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<Membership>>;
    fn first(&self, predicate: &Predicate) -> RepoResult<Option<Membership>>;
    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<Membership>>;
    fn soft_delete(&self, id: MembershipId) -> RepoResult<()>;
    /// Flat projection of `user_uuid` for active matches.
    ///
    /// Feeds `Predicate::in_ids` for relation lookups split into two queries.
    fn user_ids(&self, predicate: &Predicate) -> RepoResult<Vec<UserId>>;
}

/// SQLite-backed membership repository.
pub struct SqliteMembershipRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMembershipRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, Membership::TABLE, MEMBERSHIP_REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query(
        &self,
        scope: Scope,
        predicate: &Predicate,
        limit_one: bool,
    ) -> RepoResult<Vec<Membership>> {
        let mut sql = format!("{MEMBERSHIP_SELECT_SQL} WHERE ");
        let mut binds: Vec<Value> = Vec::new();
        scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push_str(" ORDER BY created_at ASC, uuid ASC");
        if limit_one {
            sql.push_str(" LIMIT 1");
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(parse_membership_row(row)?);
        }

        Ok(memberships)
    }
}

impl MembershipRepository for SqliteMembershipRepository<'_> {
    fn create(&self, membership: &Membership) -> RepoResult<MembershipId> {
        self.conn.execute(
            "INSERT INTO department_users (uuid, user_uuid, department_uuid, is_deleted)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                membership.uuid.to_string(),
                membership.user_uuid.to_string(),
                membership.department_uuid.to_string(),
                bool_to_int(membership.is_deleted),
            ],
        )?;

        Ok(membership.uuid)
    }

    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<Membership>> {
        self.query(Scope::Active, predicate, false)
    }

    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<Membership>> {
        self.query(Scope::All, predicate, false)
    }

    fn first(&self, predicate: &Predicate) -> RepoResult<Option<Membership>> {
        Ok(self.query(Scope::Active, predicate, true)?.into_iter().next())
    }

    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<Membership>> {
        Ok(self.query(Scope::All, predicate, true)?.into_iter().next())
    }

    fn soft_delete(&self, id: MembershipId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE department_users
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn user_ids(&self, predicate: &Predicate) -> RepoResult<Vec<UserId>> {
        let mut sql = String::from("SELECT user_uuid FROM department_users WHERE ");
        let mut binds: Vec<Value> = Vec::new();
        Scope::Active.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push_str(" ORDER BY created_at ASC, uuid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get("user_uuid")?;
            ids.push(parse_uuid(&text, "department_users.user_uuid")?);
        }

        Ok(ids)
    }
}

fn parse_membership_row(row: &Row<'_>) -> RepoResult<Membership> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let department_text: String = row.get("department_uuid")?;

    Ok(Membership {
        uuid: parse_uuid(&uuid_text, "department_users.uuid")?,
        user_uuid: parse_uuid(&user_text, "department_users.user_uuid")?,
        department_uuid: parse_uuid(&department_text, "department_users.department_uuid")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted: int_to_bool(row.get("is_deleted")?, "department_users.is_deleted")?,
    })
}
