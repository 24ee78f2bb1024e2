use roster_core::db::migrations::latest_version;
use roster_core::db::open_db_in_memory;
use roster_core::{
    Predicate, Record, RepoError, SqliteUserRepository, User, UserChanges, UserRepository,
};
use rusqlite::{params, Connection};

#[test]
fn create_and_first_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = User::new("ada", 36);
    let id = repo.create(&user).unwrap();

    let loaded = repo
        .first(&Predicate::eq("name", "ada".to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.uuid, id);
    assert_eq!(loaded.name, "ada");
    assert_eq!(loaded.age, 36);
    assert!(!loaded.is_deleted);
    assert!(loaded.created_at > 0);
    assert!(loaded.updated_at >= loaded.created_at);
}

#[test]
fn first_returns_none_when_nothing_matches() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let missing = repo
        .first(&Predicate::eq("name", "nobody".to_string()))
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn bulk_create_inserts_all_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let users = vec![User::new("zhang", 101), User::new("li", 121)];
    let inserted = repo.bulk_create(&users).unwrap();
    assert_eq!(inserted, 2);

    let all = repo.find(&Predicate::all()).unwrap();
    assert_eq!(all.len(), 2);
    for user in &all {
        assert!(user.updated_at() >= user.created_at());
    }
}

#[test]
fn save_refreshes_updated_at_but_bulk_update_does_not() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut user = User::new("star", 30);
    repo.create(&user).unwrap();

    // Pin the timestamps to a known past value so refreshes are observable.
    conn.execute(
        "UPDATE users SET created_at = 1000, updated_at = 1000 WHERE uuid = ?1;",
        params![user.uuid.to_string()],
    )
    .unwrap();

    let changes = UserChanges {
        name: Some("star-renamed".to_string()),
        ..UserChanges::default()
    };
    let changed = repo
        .update(&Predicate::eq("name", "star".to_string()), &changes)
        .unwrap();
    assert_eq!(changed, 1);

    let after_bulk = repo
        .first(&Predicate::eq("name", "star-renamed".to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(after_bulk.updated_at, 1000, "bulk update must not refresh updated_at");

    user.name = "star-saved".to_string();
    repo.save(&user).unwrap();

    let after_save = repo
        .first(&Predicate::eq("name", "star-saved".to_string()))
        .unwrap()
        .unwrap();
    assert!(after_save.updated_at > 1000, "save must refresh updated_at");
    assert_eq!(after_save.created_at, 1000);
}

#[test]
fn save_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = User::new("ghost", 1);
    let err = repo.save(&user).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == user.uuid));
}

#[test]
fn update_with_no_changes_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let err = repo
        .update(&Predicate::all(), &UserChanges::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::EmptyUpdate));
}

#[test]
fn bulk_update_only_touches_active_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let active = User::new("dup", 10);
    let deleted = User::new("dup", 20);
    repo.create(&active).unwrap();
    repo.create(&deleted).unwrap();
    repo.soft_delete(deleted.uuid).unwrap();

    let changes = UserChanges {
        age: Some(99),
        ..UserChanges::default()
    };
    let changed = repo
        .update(&Predicate::eq("name", "dup".to_string()), &changes)
        .unwrap();
    assert_eq!(changed, 1);

    let untouched = repo
        .first_unscoped(&Predicate::eq("uuid", deleted.uuid.to_string()))
        .unwrap()
        .unwrap();
    assert_eq!(untouched.age, 20);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_users_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("users"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_users_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            uuid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "users",
            column: "age"
        })
    ));
}
