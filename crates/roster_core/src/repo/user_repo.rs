//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide scoped and unscoped query entry points over `users`.
//! - Keep the updated_at write rules inside one persistence boundary.
//!
//! # Invariants
//! - Scoped reads never return rows with `is_deleted = 1`.
//! - `save` and `soft_delete` refresh `updated_at`; the bulk `update` path
//!   deliberately leaves it untouched.

use crate::model::user::{User, UserId};
use crate::query::{Predicate, Scope};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    age,
    created_at,
    updated_at,
    is_deleted
FROM users";

const USER_REQUIRED_COLUMNS: &[&str] = &[
    "uuid",
    "name",
    "age",
    "created_at",
    "updated_at",
    "is_deleted",
];

/// Partial-update payload for the bulk `update` path.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
}

/// Repository interface for user persistence and queries.
pub trait UserRepository {
    /// Inserts one user; column defaults fill the lifecycle timestamps.
    fn create(&self, user: &User) -> RepoResult<UserId>;
    /// Inserts many users through one prepared statement.
    fn bulk_create(&self, users: &[User]) -> RepoResult<usize>;
    /// Lists active users matching the predicate.
    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<User>>;
    /// Lists users matching the predicate, tombstoned rows included.
    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<User>>;
    /// Returns the first active match, or `None`.
    fn first(&self, predicate: &Predicate) -> RepoResult<Option<User>>;
    /// Returns the first match regardless of tombstone state, or `None`.
    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<User>>;
    /// Bulk partial update over active rows; does not touch `updated_at`.
    fn update(&self, predicate: &Predicate, changes: &UserChanges) -> RepoResult<usize>;
    /// Full-entity update by uuid; refreshes `updated_at`.
    fn save(&self, user: &User) -> RepoResult<()>;
    /// Sets the tombstone flag; idempotent for already-deleted rows.
    fn soft_delete(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, User::TABLE, USER_REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query(&self, scope: Scope, predicate: &Predicate, limit_one: bool) -> RepoResult<Vec<User>> {
        let mut sql = format!("{USER_SELECT_SQL} WHERE ");
        let mut binds: Vec<Value> = Vec::new();
        scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push_str(" ORDER BY created_at ASC, uuid ASC");
        if limit_one {
            sql.push_str(" LIMIT 1");
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, name, age, is_deleted)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.uuid.to_string(),
                user.name.as_str(),
                user.age,
                bool_to_int(user.is_deleted),
            ],
        )?;

        Ok(user.uuid)
    }

    fn bulk_create(&self, users: &[User]) -> RepoResult<usize> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO users (uuid, name, age, is_deleted)
             VALUES (?1, ?2, ?3, ?4);",
        )?;

        for user in users {
            stmt.execute(params![
                user.uuid.to_string(),
                user.name.as_str(),
                user.age,
                bool_to_int(user.is_deleted),
            ])?;
        }

        Ok(users.len())
    }

    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<User>> {
        self.query(Scope::Active, predicate, false)
    }

    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<User>> {
        self.query(Scope::All, predicate, false)
    }

    fn first(&self, predicate: &Predicate) -> RepoResult<Option<User>> {
        Ok(self.query(Scope::Active, predicate, true)?.into_iter().next())
    }

    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<User>> {
        Ok(self.query(Scope::All, predicate, true)?.into_iter().next())
    }

    fn update(&self, predicate: &Predicate, changes: &UserChanges) -> RepoResult<usize> {
        let mut assignments: Vec<&str> = Vec::new();
        let mut binds: Vec<Value> = Vec::new();

        if let Some(name) = changes.name.as_ref() {
            assignments.push("name = ?");
            binds.push(Value::Text(name.clone()));
        }
        if let Some(age) = changes.age {
            assignments.push("age = ?");
            binds.push(Value::Integer(i64::from(age)));
        }
        if assignments.is_empty() {
            return Err(RepoError::EmptyUpdate);
        }

        // updated_at is deliberately left untouched here; only the
        // full-entity save path refreshes it.
        let mut sql = format!("UPDATE users SET {} WHERE ", assignments.join(", "));
        Scope::Active.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push(';');

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(changed)
    }

    fn save(&self, user: &User) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users
             SET
                name = ?1,
                age = ?2,
                is_deleted = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                user.name.as_str(),
                user.age,
                bool_to_int(user.is_deleted),
                user.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(user.uuid));
        }

        Ok(())
    }

    fn soft_delete(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users
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
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "users.uuid")?;
    let is_deleted = int_to_bool(row.get("is_deleted")?, "users.is_deleted")?;

    Ok(User {
        uuid,
        name: row.get("name")?,
        age: row.get("age")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
    })
}
