//! Authentication primitives: login credentials, registration input, stored
//! password hashes, and the verified caller identity carried in the session.
//!
//! Inbound adapters build these from raw strings before calling a port, so
//! services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, FullName, Role, User, UserId, UserValidationError};

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Full name was missing or blank once trimmed.
    EmptyFullName,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was empty.
    EmptyPassword,
}

impl CredentialsValidationError {
    /// Name of the offending request field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyFullName => "fullName",
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn email_from(raw: &str) -> Result<EmailAddress, CredentialsValidationError> {
    EmailAddress::new(raw).map_err(|_| CredentialsValidationError::EmptyEmail)
}

fn password_from(raw: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if raw.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim, surrounding whitespace
///   included.
///
/// # Examples
/// ```
/// use darpan_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" jane@x.com ", "pw1").unwrap();
/// assert_eq!(creds.email().as_ref(), "jane@x.com");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns the first blank field as a [`CredentialsValidationError`].
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: email_from(email)?,
            password: password_from(password)?,
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    full_name: FullName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns the first blank field as a [`CredentialsValidationError`],
    /// checking full name, then email, then password.
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let full_name =
            FullName::new(full_name).map_err(|_| CredentialsValidationError::EmptyFullName)?;
        Ok(Self {
            full_name,
            email: email_from(email)?,
            password: password_from(password)?,
        })
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Encoded password hash as stored alongside the account.
///
/// Opaque to everything except the password hasher. `Debug` never prints the
/// value.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form for storage or verification.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Identity of a logged-in caller as recovered from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    user_id: UserId,
    role: Role,
}

impl AuthenticatedCaller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Rebuild a caller from raw session values.
    ///
    /// # Errors
    ///
    /// Returns a [`UserValidationError`] when either value fails validation.
    pub fn try_from_parts(user_id: i64, role: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            user_id: UserId::new(user_id)?,
            role: role.parse()?,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this caller may read applications owned by `owner`.
    pub fn may_view_applications_of(&self, owner: UserId) -> bool {
        self.role.can_view_any_applications() || self.user_id == owner
    }
}

impl From<&User> for AuthenticatedCaller {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("jane@x.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_login_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts("jane@x.com", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case(" ", "jane@x.com", "pw", CredentialsValidationError::EmptyFullName)]
    #[case("Jane", "", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("Jane", "jane@x.com", "", CredentialsValidationError::EmptyPassword)]
    #[case("", "", "", CredentialsValidationError::EmptyFullName)]
    fn invalid_registrations(
        #[case] full_name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Registration::try_from_parts(full_name, email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(CredentialsValidationError::EmptyFullName, "fullName")]
    #[case(CredentialsValidationError::EmptyEmail, "email")]
    #[case(CredentialsValidationError::EmptyPassword, "password")]
    fn validation_errors_name_wire_fields(
        #[case] error: CredentialsValidationError,
        #[case] field: &str,
    ) {
        assert_eq!(error.field(), field);
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert!(!format!("{hash:?}").contains("secret"));
    }

    #[rstest]
    #[case(Role::Citizen, 5, true)]
    #[case(Role::Citizen, 6, false)]
    #[case(Role::Official, 6, true)]
    #[case(Role::Admin, 6, true)]
    fn caller_visibility(#[case] role: Role, #[case] owner: i64, #[case] expected: bool) {
        let caller = AuthenticatedCaller::new(UserId::new(5).expect("id"), role);
        let owner = UserId::new(owner).expect("id");
        assert_eq!(caller.may_view_applications_of(owner), expected);
    }

    #[rstest]
    #[case(0, "citizen")]
    #[case(5, "root")]
    fn caller_rejects_tampered_parts(#[case] user_id: i64, #[case] role: &str) {
        assert!(AuthenticatedCaller::try_from_parts(user_id, role).is_err());
    }
}
