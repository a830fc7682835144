//! Portal account model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::PasswordHash;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NonPositiveId,
    InvalidId,
    EmptyEmail,
    EmptyFullName,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::InvalidId => write!(f, "user id must be an integer"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::NonPositiveId`] for zero or negative ids.
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Underlying integer value.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .parse::<i64>()
            .map_err(|_| UserValidationError::InvalidId)?;
        Self::new(id)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Email address used as the login identifier.
///
/// Surrounding whitespace is trimmed; no other normalisation is applied, so
/// lookups are exact matches on the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyEmail`] for blank input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// The account holder's full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyFullName`] for blank input.
    pub fn new(full_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = full_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

/// Account role controlling which applications a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Self-registered member of the public.
    Citizen,
    /// Staff member handling applications.
    Official,
    /// Portal operator.
    Admin,
}

impl Role {
    /// Stable lowercase name as stored and serialised.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Official => "official",
            Self::Admin => "admin",
        }
    }

    /// Whether this role may read applications owned by other users.
    pub fn can_view_any_applications(self) -> bool {
        matches!(self, Self::Official | Self::Admin)
    }

    /// Interpret a stored role, degrading unknown values to
    /// [`Role::Citizen`].
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            warn!(%err, "stored role not recognised; treating account as citizen");
            Self::Citizen
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Self::Citizen),
            "official" => Ok(Self::Official),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Portal account as returned to clients.
///
/// The credential is deliberately absent; see [`StoredCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 42)]
    id: UserId,
    #[schema(value_type = String, example = "jane@example.com")]
    email: EmailAddress,
    role: Role,
    #[schema(value_type = String, example = "Jane Doe")]
    full_name: FullName,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, email: EmailAddress, role: Role, full_name: FullName) -> Self {
        Self {
            id,
            email,
            role,
            full_name,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Full name.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }
}

/// A user together with their stored password hash.
///
/// Only the login service sees this; the hash never reaches a response.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    user: User,
    password_hash: PasswordHash,
}

impl StoredCredentials {
    /// Pair a user with their stored hash.
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Stored hash to verify against.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Discard the hash and keep the user.
    pub fn into_user(self) -> User {
        self.user
    }
}

/// Row to insert when registering an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    full_name: FullName,
    email: EmailAddress,
    password_hash: PasswordHash,
    role: Role,
}

impl NewUser {
    /// Self-registered accounts always start as citizens.
    pub fn citizen(full_name: FullName, email: EmailAddress, password_hash: PasswordHash) -> Self {
        Self {
            full_name,
            email,
            password_hash,
            role: Role::Citizen,
        }
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests;
