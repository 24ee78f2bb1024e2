//! Department repository contract and SQLite implementation.
//!
//! Mirrors the user repository; see `user_repo` for the scoped-read and
//! updated_at write rules shared by every entity table.

use crate::model::department::{Department, DepartmentId};
use crate::query::{Predicate, Scope};
use crate::repo::{
    bool_to_int, ensure_connection_ready, int_to_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    created_at,
    updated_at,
    is_deleted
FROM departments";

const DEPARTMENT_REQUIRED_COLUMNS: &[&str] =
    &["uuid", "name", "created_at", "updated_at", "is_deleted"];

/// Partial-update payload for the bulk `update` path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentChanges {
    pub name: Option<String>,
}

/// Repository interface for department persistence and queries.
pub trait DepartmentRepository {
    fn create(&self, department: &Department) -> RepoResult<DepartmentId>;
    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<Department>>;
    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<Department>>;
    fn first(&self, predicate: &Predicate) -> RepoResult<Option<Department>>;
    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<Department>>;
    /// Bulk partial update over active rows; does not touch `updated_at`.
    fn update(&self, predicate: &Predicate, changes: &DepartmentChanges) -> RepoResult<usize>;
    /// Full-entity update by uuid; refreshes `updated_at`.
    fn save(&self, department: &Department) -> RepoResult<()>;
    fn soft_delete(&self, id: DepartmentId) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, Department::TABLE, DEPARTMENT_REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }

    fn query(
        &self,
        scope: Scope,
        predicate: &Predicate,
        limit_one: bool,
    ) -> RepoResult<Vec<Department>> {
        let mut sql = format!("{DEPARTMENT_SELECT_SQL} WHERE ");
        let mut binds: Vec<Value> = Vec::new();
        scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push_str(" ORDER BY created_at ASC, uuid ASC");
        if limit_one {
            sql.push_str(" LIMIT 1");
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }

        Ok(departments)
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create(&self, department: &Department) -> RepoResult<DepartmentId> {
        self.conn.execute(
            "INSERT INTO departments (uuid, name, is_deleted)
             VALUES (?1, ?2, ?3);",
            params![
                department.uuid.to_string(),
                department.name.as_str(),
                bool_to_int(department.is_deleted),
            ],
        )?;

        Ok(department.uuid)
    }

    fn find(&self, predicate: &Predicate) -> RepoResult<Vec<Department>> {
        self.query(Scope::Active, predicate, false)
    }

    fn find_unscoped(&self, predicate: &Predicate) -> RepoResult<Vec<Department>> {
        self.query(Scope::All, predicate, false)
    }

    fn first(&self, predicate: &Predicate) -> RepoResult<Option<Department>> {
        Ok(self.query(Scope::Active, predicate, true)?.into_iter().next())
    }

    fn first_unscoped(&self, predicate: &Predicate) -> RepoResult<Option<Department>> {
        Ok(self.query(Scope::All, predicate, true)?.into_iter().next())
    }

    fn update(&self, predicate: &Predicate, changes: &DepartmentChanges) -> RepoResult<usize> {
        let Some(name) = changes.name.as_ref() else {
            return Err(RepoError::EmptyUpdate);
        };

        let mut binds: Vec<Value> = vec![Value::Text(name.clone())];
        let mut sql = String::from("UPDATE departments SET name = ? WHERE ");
        Scope::Active.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
        sql.push(';');

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(changed)
    }

    fn save(&self, department: &Department) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE departments
             SET
                name = ?1,
                is_deleted = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                department.name.as_str(),
                bool_to_int(department.is_deleted),
                department.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(department.uuid));
        }

        Ok(())
    }

    fn soft_delete(&self, id: DepartmentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE departments
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

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "departments.uuid")?;
    let is_deleted = int_to_bool(row.get("is_deleted")?, "departments.is_deleted")?;

    Ok(Department {
        uuid,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
    })
}
