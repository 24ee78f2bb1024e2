//! Domain models for the roster directory.
//!
//! # Responsibility
//! - Define the persisted entity shapes shared by repositories and services.
//! - Expose the lifecycle columns every table carries through one trait.
//!
//! # Invariants
//! - Every entity is identified by a stable uuid.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - `updated_at >= created_at` holds for every persisted row.

pub mod department;
pub mod membership;
pub mod user;

/// Lifecycle columns shared by every persisted entity.
///
/// `created_at`/`updated_at` are epoch milliseconds filled by the storage
/// layer; in-memory drafts carry zero until persisted and reloaded.
pub trait Record {
    fn created_at(&self) -> i64;
    fn updated_at(&self) -> i64;
    fn is_deleted(&self) -> bool;

    /// Returns whether this record should be considered visible/active.
    fn is_active(&self) -> bool {
        !self.is_deleted()
    }
}
