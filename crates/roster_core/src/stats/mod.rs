//! Aggregation queries: counts, sums, grouped and date-bucketed counts.
//!
//! # Responsibility
//! - Run aggregate SELECTs over any entity table with predicate filtering.
//! - Truncate epoch-millisecond timestamps to day/month buckets, with an
//!   optional fixed UTC offset applied before truncation.
//!
//! # Invariants
//! - `Scope::Active` aggregation never counts tombstoned rows.
//! - Group and bucket output ordering is deterministic (key ascending).

use crate::db::DbError;
use crate::query::{Predicate, Scope};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for aggregation APIs.
pub type StatsResult<T> = Result<T, StatsError>;

/// Aggregation-layer error.
#[derive(Debug)]
pub enum StatsError {
    Db(DbError),
}

impl Display for StatsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StatsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StatsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StatsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Granularity for timestamp truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Day,
    Month,
}

impl DateUnit {
    fn strftime_format(self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
        }
    }
}

/// One output row of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    /// Group key rendered as text.
    pub key: String,
    pub count: i64,
}

/// One output row of a date-bucketed count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBucket {
    /// `%Y-%m-%d` for day buckets, `%Y-%m` for month buckets.
    pub bucket: String,
    pub count: i64,
}

/// Counts rows matching the predicate under the given scope.
pub fn count(
    conn: &Connection,
    table: &str,
    scope: Scope,
    predicate: &Predicate,
) -> StatsResult<i64> {
    let mut sql = format!("SELECT COUNT(*) FROM {table} WHERE ");
    let mut binds: Vec<Value> = Vec::new();
    scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
    sql.push(';');

    let total = conn.query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
    Ok(total)
}

/// Sums an integer column over matching rows. An empty match sums to 0.
pub fn sum(
    conn: &Connection,
    table: &str,
    column: &str,
    scope: Scope,
    predicate: &Predicate,
) -> StatsResult<i64> {
    let mut sql = format!("SELECT COALESCE(SUM({column}), 0) FROM {table} WHERE ");
    let mut binds: Vec<Value> = Vec::new();
    scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
    sql.push(';');

    let total = conn.query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
    Ok(total)
}

/// Counts matching rows per distinct value of `group_column`.
///
/// Keys are cast to text so uuid and integer group columns share one shape.
pub fn count_by(
    conn: &Connection,
    table: &str,
    group_column: &str,
    scope: Scope,
    predicate: &Predicate,
) -> StatsResult<Vec<GroupCount>> {
    let mut sql = format!(
        "SELECT CAST({group_column} AS TEXT) AS group_key, COUNT(*) AS total
         FROM {table}
         WHERE "
    );
    let mut binds: Vec<Value> = Vec::new();
    scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
    sql.push_str(" GROUP BY group_key ORDER BY group_key ASC;");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;
    let mut groups = Vec::new();
    while let Some(row) = rows.next()? {
        groups.push(GroupCount {
            key: row.get("group_key")?,
            count: row.get("total")?,
        });
    }

    Ok(groups)
}

/// Counts matching rows per day or month of an epoch-millisecond column.
///
/// `utc_offset_hours` shifts timestamps before truncation, so callers whose
/// wall clock is a fixed offset from UTC get local-day buckets.
pub fn count_by_date(
    conn: &Connection,
    table: &str,
    timestamp_column: &str,
    unit: DateUnit,
    utc_offset_hours: i32,
    scope: Scope,
    predicate: &Predicate,
) -> StatsResult<Vec<DateBucket>> {
    let format = unit.strftime_format();
    let mut sql = format!(
        "SELECT strftime('{format}', ({timestamp_column} / 1000) + ?, 'unixepoch') AS bucket,
                COUNT(*) AS total
         FROM {table}
         WHERE "
    );
    let offset_seconds = i64::from(utc_offset_hours) * 3600;
    let mut binds: Vec<Value> = vec![Value::Integer(offset_seconds)];
    scope.narrow(predicate.clone()).push_sql(&mut sql, &mut binds);
    sql.push_str(" GROUP BY bucket ORDER BY bucket ASC;");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;
    let mut buckets = Vec::new();
    while let Some(row) = rows.next()? {
        buckets.push(DateBucket {
            bucket: row.get("bucket")?,
            count: row.get("total")?,
        });
    }

    Ok(buckets)
}
