use roster_core::{Department, Membership, Record, User};
use uuid::Uuid;

#[test]
fn user_serialization_uses_expected_wire_fields() {
    let user_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut user = User::with_id(user_id, "ada", 36);
    user.created_at = 1_700_000_000_000;
    user.updated_at = 1_700_000_360_000;

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["uuid"], user_id.to_string());
    assert_eq!(json["name"], "ada");
    assert_eq!(json["age"], 36);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["updated_at"], 1_700_000_360_000_i64);
    assert_eq!(json["is_deleted"], false);

    let decoded: User = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, user);
}

#[test]
fn membership_links_two_owning_ids() {
    let user_id = Uuid::new_v4();
    let department_id = Uuid::new_v4();
    let membership = Membership::new(user_id, department_id);

    assert_eq!(membership.user_uuid, user_id);
    assert_eq!(membership.department_uuid, department_id);
    assert!(membership.is_active());

    let json = serde_json::to_value(&membership).unwrap();
    assert_eq!(json["user_uuid"], user_id.to_string());
    assert_eq!(json["department_uuid"], department_id.to_string());
}

#[test]
fn department_lifecycle_helpers_flip_the_tombstone() {
    let mut department = Department::new("platform");
    assert!(department.is_active());

    department.soft_delete();
    assert!(!department.is_active());

    department.restore();
    assert!(department.is_active());
}
