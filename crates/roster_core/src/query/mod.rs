//! Composable filter predicates and the soft-delete query scope.
//!
//! # Responsibility
//! - Build boolean filter expressions as owned trees.
//! - Render expressions to SQL fragments plus positional binds.
//! - Conjoin the `is_deleted = 0` term for scoped query paths.
//!
//! # Invariants
//! - Rendering never inlines caller values; everything binds positionally.
//! - `Scope::Active` narrowing is the only place the soft-delete condition
//!   is spelled out for reads.

use rusqlite::types::Value;
use uuid::Uuid;

/// Query scope selecting between default (active-only) and audit visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Excludes soft-deleted rows. The default for every caller-facing path.
    Active,
    /// Sees every row, tombstoned or not. Audit/admin paths only.
    All,
}

impl Scope {
    /// Conjoins the soft-delete condition when the scope demands it.
    pub fn narrow(self, predicate: Predicate) -> Predicate {
        match self {
            Self::Active => predicate.and(Predicate::eq("is_deleted", 0i64)),
            Self::All => predicate,
        }
    }
}

/// Comparison applied to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum CmpOp {
    Eq(Value),
    /// Case-sensitive containment, rendered with `instr`.
    Contains(String),
    /// Case-insensitive containment.
    IContains(String),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// Set membership. The empty set matches nothing.
    In(Vec<Value>),
}

/// Boolean filter expression over one table's columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    All,
    Cmp { column: &'static str, op: CmpOp },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Returns the predicate matching every row.
    pub fn all() -> Self {
        Self::All
    }

    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Eq(value.into()),
        }
    }

    /// Case-sensitive substring match.
    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Contains(needle.into()),
        }
    }

    /// Case-insensitive substring match (ASCII folding, per SQLite `lower`).
    pub fn icontains(column: &'static str, needle: impl Into<String>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::IContains(needle.into()),
        }
    }

    pub fn gt(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Gt(value.into()),
        }
    }

    pub fn gte(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Gte(value.into()),
        }
    }

    pub fn lt(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Lt(value.into()),
        }
    }

    pub fn lte(column: &'static str, value: impl Into<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::Lte(value.into()),
        }
    }

    pub fn is_in(column: &'static str, values: Vec<Value>) -> Self {
        Self::Cmp {
            column,
            op: CmpOp::In(values),
        }
    }

    /// Set membership over uuid columns.
    pub fn in_ids(column: &'static str, ids: &[Uuid]) -> Self {
        Self::is_in(
            column,
            ids.iter().map(|id| Value::Text(id.to_string())).collect(),
        )
    }

    /// Conjunction. `Predicate::All` is the identity element.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Self::All, other) => other,
            (this, Self::All) => this,
            (Self::And(mut parts), Self::And(others)) => {
                parts.extend(others);
                Self::And(parts)
            }
            (Self::And(mut parts), other) => {
                parts.push(other);
                Self::And(parts)
            }
            (this, Self::And(mut others)) => {
                others.insert(0, this);
                Self::And(others)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }

    /// Disjunction. `Predicate::All` absorbs the other side.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Self::All, _) | (_, Self::All) => Self::All,
            (Self::Or(mut parts), Self::Or(others)) => {
                parts.extend(others);
                Self::Or(parts)
            }
            (Self::Or(mut parts), other) => {
                parts.push(other);
                Self::Or(parts)
            }
            (this, Self::Or(mut others)) => {
                others.insert(0, this);
                Self::Or(others)
            }
            (this, other) => Self::Or(vec![this, other]),
        }
    }

    /// Negation. Double negation collapses.
    pub fn negate(self) -> Predicate {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Appends this expression as a SQL fragment and collects its binds.
    ///
    /// Composite nodes are parenthesized, so the fragment can be embedded
    /// into any `WHERE`/`AND` position without precedence surprises.
    pub fn push_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::All => sql.push_str("1 = 1"),
            Self::Cmp { column, op } => push_cmp_sql(column, op, sql, binds),
            Self::And(parts) => push_joined(parts, " AND ", sql, binds),
            Self::Or(parts) => push_joined(parts, " OR ", sql, binds),
            Self::Not(inner) => {
                sql.push_str("NOT (");
                inner.push_sql(sql, binds);
                sql.push(')');
            }
        }
    }
}

fn push_cmp_sql(column: &str, op: &CmpOp, sql: &mut String, binds: &mut Vec<Value>) {
    match op {
        CmpOp::Eq(value) => {
            sql.push_str(column);
            sql.push_str(" = ?");
            binds.push(value.clone());
        }
        CmpOp::Contains(needle) => {
            // instr is byte-wise and case-sensitive, and needs no wildcard
            // escaping, unlike LIKE.
            sql.push_str("instr(");
            sql.push_str(column);
            sql.push_str(", ?) > 0");
            binds.push(Value::Text(needle.clone()));
        }
        CmpOp::IContains(needle) => {
            sql.push_str("instr(lower(");
            sql.push_str(column);
            sql.push_str("), lower(?)) > 0");
            binds.push(Value::Text(needle.clone()));
        }
        CmpOp::Gt(value) => push_binary(column, ">", value, sql, binds),
        CmpOp::Gte(value) => push_binary(column, ">=", value, sql, binds),
        CmpOp::Lt(value) => push_binary(column, "<", value, sql, binds),
        CmpOp::Lte(value) => push_binary(column, "<=", value, sql, binds),
        CmpOp::In(values) => {
            if values.is_empty() {
                sql.push_str("0 = 1");
                return;
            }
            sql.push_str(column);
            sql.push_str(" IN (");
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    sql.push_str(", ");
                }
                sql.push('?');
                binds.push(value.clone());
            }
            sql.push(')');
        }
    }
}

fn push_binary(column: &str, operator: &str, value: &Value, sql: &mut String, binds: &mut Vec<Value>) {
    sql.push_str(column);
    sql.push(' ');
    sql.push_str(operator);
    sql.push_str(" ?");
    binds.push(value.clone());
}

fn push_joined(parts: &[Predicate], separator: &str, sql: &mut String, binds: &mut Vec<Value>) {
    match parts {
        [] => sql.push_str("1 = 1"),
        [single] => single.push_sql(sql, binds),
        _ => {
            sql.push('(');
            for (index, part) in parts.iter().enumerate() {
                if index > 0 {
                    sql.push_str(separator);
                }
                part.push_sql(sql, binds);
            }
            sql.push(')');
        }
    }
}
