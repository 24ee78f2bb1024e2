//! Core persistence logic for the roster directory.
//! This crate is the single source of truth for record lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod stats;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId};
pub use model::membership::{Membership, MembershipId};
pub use model::user::{User, UserId};
pub use model::Record;
pub use query::{Predicate, Scope};
pub use repo::department_repo::{
    DepartmentChanges, DepartmentRepository, SqliteDepartmentRepository,
};
pub use repo::membership_repo::{MembershipRepository, SqliteMembershipRepository};
pub use repo::user_repo::{SqliteUserRepository, UserChanges, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::directory_service::DirectoryService;
pub use stats::{DateBucket, DateUnit, GroupCount, StatsError, StatsResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
