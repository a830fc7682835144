//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn jane() -> User {
    User::new(
        UserId::new(7).expect("positive id"),
        EmailAddress::new("jane@x.com").expect("email"),
        Role::Citizen,
        FullName::new("Jane Doe").expect("name"),
    )
}

#[rstest]
#[case::zero(0)]
#[case::negative(-3)]
fn user_id_rejects_non_positive_values(#[case] raw: i64) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::NonPositiveId));
}

#[rstest]
#[case::word("abc", UserValidationError::InvalidId)]
#[case::empty("", UserValidationError::InvalidId)]
#[case::overflow("99999999999999999999", UserValidationError::InvalidId)]
#[case::zero("0", UserValidationError::NonPositiveId)]
fn user_id_parse_failures(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(raw.parse::<UserId>(), Err(expected));
}

#[rstest]
fn user_id_parses_decimal_text() {
    let id: UserId = "42".parse().expect("valid id");
    assert_eq!(id.as_i64(), 42);
}

#[rstest]
#[case::email_blank(EmailAddress::new("   ").err(), UserValidationError::EmptyEmail)]
#[case::name_blank(FullName::new("").err(), UserValidationError::EmptyFullName)]
fn blank_values_are_rejected(
    #[case] actual: Option<UserValidationError>,
    #[case] expected: UserValidationError,
) {
    assert_eq!(actual, Some(expected));
}

#[rstest]
fn email_is_trimmed_but_not_case_folded() {
    let email = EmailAddress::new("  Jane@X.com ").expect("email");
    assert_eq!(email.as_ref(), "Jane@X.com");
}

#[rstest]
#[case("citizen", Role::Citizen)]
#[case("official", Role::Official)]
#[case("admin", Role::Admin)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>(), Ok(expected));
    assert_eq!(expected.as_str(), raw);
}

#[rstest]
fn unknown_stored_role_degrades_to_citizen() {
    assert_eq!(Role::from_stored("superuser"), Role::Citizen);
    assert!("superuser".parse::<Role>().is_err());
}

#[rstest]
#[case(Role::Citizen, false)]
#[case(Role::Official, true)]
#[case(Role::Admin, true)]
fn only_staff_roles_view_any_applications(#[case] role: Role, #[case] expected: bool) {
    assert_eq!(role.can_view_any_applications(), expected);
}

#[rstest]
fn user_serialises_wire_contract(jane: User) {
    let value = serde_json::to_value(&jane).expect("serialise");
    assert_eq!(
        value,
        json!({
            "id": 7,
            "email": "jane@x.com",
            "role": "citizen",
            "fullName": "Jane Doe"
        })
    );
}

#[rstest]
fn user_deserialisation_validates_fields() {
    let payload = json!({"id": 0, "email": "a@b.c", "role": "admin", "fullName": "A"});
    assert!(serde_json::from_value::<User>(payload).is_err());
}

#[rstest]
fn stored_credentials_release_only_the_user(jane: User) {
    let stored = StoredCredentials::new(jane.clone(), PasswordHash::new("$argon2id$stub"));
    assert_eq!(stored.password_hash().as_str(), "$argon2id$stub");
    assert_eq!(stored.into_user(), jane);
}

#[rstest]
fn new_users_start_as_citizens() {
    let new_user = NewUser::citizen(
        FullName::new("Jane Doe").expect("name"),
        EmailAddress::new("jane@x.com").expect("email"),
        PasswordHash::new("$argon2id$stub"),
    );
    assert_eq!(new_user.role(), Role::Citizen);
}
