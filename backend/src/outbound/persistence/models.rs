//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Account row including the stored credential.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable account row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// One application joined with its service name and handling official.
///
/// Field order matches the select clause in the application repository.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct ApplicationRow {
    pub id: i64,
    pub user_id: i64,
    pub service_name: Option<String>,
    pub status: String,
    pub submitted_on: DateTime<Utc>,
    pub last_update: Option<DateTime<Utc>>,
    pub current_official: Option<String>,
}
