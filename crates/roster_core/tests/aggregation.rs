use roster_core::db::open_db_in_memory;
use roster_core::{
    stats, DateUnit, Department, DepartmentRepository, Membership, MembershipRepository,
    Predicate, Scope, SqliteDepartmentRepository, SqliteMembershipRepository,
    SqliteUserRepository, User, UserRepository,
};
use rusqlite::params;

// 2026-01-01T00:00:00Z in epoch seconds.
const JAN_FIRST_2026: i64 = 1_767_225_600;

#[test]
fn count_and_sum_over_two_users() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create(&User::new("zhang", 101)).unwrap();
    repo.create(&User::new("li", 121)).unwrap();

    let total = stats::count(&conn, User::TABLE, Scope::Active, &Predicate::all()).unwrap();
    assert_eq!(total, 2);

    let age_sum = stats::sum(&conn, User::TABLE, "age", Scope::Active, &Predicate::all()).unwrap();
    assert_eq!(age_sum, 222);
}

#[test]
fn sum_of_empty_match_is_zero() {
    let conn = open_db_in_memory().unwrap();
    SqliteUserRepository::try_new(&conn).unwrap();

    let age_sum = stats::sum(&conn, User::TABLE, "age", Scope::Active, &Predicate::all()).unwrap();
    assert_eq!(age_sum, 0);
}

#[test]
fn scoped_count_skips_tombstones_and_unscoped_sees_them() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let keep = User::new("keep", 1);
    let gone = User::new("gone", 2);
    repo.create(&keep).unwrap();
    repo.create(&gone).unwrap();
    repo.soft_delete(gone.uuid).unwrap();

    let active = stats::count(&conn, User::TABLE, Scope::Active, &Predicate::all()).unwrap();
    assert_eq!(active, 1);

    let all = stats::count(&conn, User::TABLE, Scope::All, &Predicate::all()).unwrap();
    assert_eq!(all, 2);
}

#[test]
fn filtered_count_composes_with_predicates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create(&User::new("starlord", 30)).unwrap();
    repo.create(&User::new("moon", 40)).unwrap();

    let matching = stats::count(
        &conn,
        User::TABLE,
        Scope::Active,
        &Predicate::icontains("name", "star"),
    )
    .unwrap();
    assert_eq!(matching, 1);
}

#[test]
fn grouped_count_yields_one_row_per_department() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let departments = SqliteDepartmentRepository::try_new(&conn).unwrap();
    let memberships = SqliteMembershipRepository::try_new(&conn).unwrap();

    let a = User::new("a", 1);
    let b = User::new("b", 2);
    let c = User::new("c", 3);
    users.create(&a).unwrap();
    users.create(&b).unwrap();
    users.create(&c).unwrap();

    let g = Department::new("G");
    let h = Department::new("H");
    departments.create(&g).unwrap();
    departments.create(&h).unwrap();

    memberships.create(&Membership::new(a.uuid, g.uuid)).unwrap();
    memberships.create(&Membership::new(b.uuid, g.uuid)).unwrap();
    memberships.create(&Membership::new(c.uuid, h.uuid)).unwrap();

    let groups = stats::count_by(
        &conn,
        Membership::TABLE,
        "department_uuid",
        Scope::Active,
        &Predicate::all(),
    )
    .unwrap();

    assert_eq!(groups.len(), 2);
    let g_row = groups
        .iter()
        .find(|group| group.key == g.uuid.to_string())
        .unwrap();
    assert_eq!(g_row.count, 2);
    let h_row = groups
        .iter()
        .find(|group| group.key == h.uuid.to_string())
        .unwrap();
    assert_eq!(h_row.count, 1);
}

#[test]
fn date_buckets_truncate_to_day_and_month() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    // 23:00 Jan 1, 01:00 Jan 2, 00:00 Feb 10 (all UTC).
    let stamps = [
        (JAN_FIRST_2026 + 23 * 3600) * 1000,
        (JAN_FIRST_2026 + 25 * 3600) * 1000,
        (JAN_FIRST_2026 + 40 * 86_400) * 1000,
    ];
    for (index, stamp) in stamps.iter().enumerate() {
        let user = User::new(format!("u{index}"), 1);
        repo.create(&user).unwrap();
        conn.execute(
            "UPDATE users SET created_at = ?1, updated_at = ?1 WHERE uuid = ?2;",
            params![stamp, user.uuid.to_string()],
        )
        .unwrap();
    }

    let days = stats::count_by_date(
        &conn,
        User::TABLE,
        "created_at",
        DateUnit::Day,
        0,
        Scope::Active,
        &Predicate::all(),
    )
    .unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0].bucket, "2026-01-01");
    assert_eq!(days[0].count, 1);
    assert_eq!(days[1].bucket, "2026-01-02");
    assert_eq!(days[2].bucket, "2026-02-10");

    let months = stats::count_by_date(
        &conn,
        User::TABLE,
        "created_at",
        DateUnit::Month,
        0,
        Scope::Active,
        &Predicate::all(),
    )
    .unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].bucket, "2026-01");
    assert_eq!(months[0].count, 2);
    assert_eq!(months[1].bucket, "2026-02");
    assert_eq!(months[1].count, 1);
}

#[test]
fn utc_offset_shifts_day_buckets() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    // 23:00 Jan 1 and 01:00 Jan 2 UTC fall on the same local day at UTC+8.
    let stamps = [
        (JAN_FIRST_2026 + 23 * 3600) * 1000,
        (JAN_FIRST_2026 + 25 * 3600) * 1000,
    ];
    for (index, stamp) in stamps.iter().enumerate() {
        let user = User::new(format!("u{index}"), 1);
        repo.create(&user).unwrap();
        conn.execute(
            "UPDATE users SET created_at = ?1, updated_at = ?1 WHERE uuid = ?2;",
            params![stamp, user.uuid.to_string()],
        )
        .unwrap();
    }

    let days = stats::count_by_date(
        &conn,
        User::TABLE,
        "created_at",
        DateUnit::Day,
        8,
        Scope::Active,
        &Predicate::all(),
    )
    .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].bucket, "2026-01-02");
    assert_eq!(days[0].count, 2);
}
