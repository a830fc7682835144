//! Read model for a citizen's service applications.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::UserId;

/// One application as listed for its owner.
///
/// Serialised keys follow the portal's existing wire contract, which mixes
/// camelCase and snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApplicationSummary {
    #[schema(example = 101)]
    id: i64,
    #[serde(skip)]
    owner: UserId,
    #[serde(rename = "serviceName")]
    #[schema(example = "Passport renewal")]
    service_name: Option<String>,
    #[schema(example = "pending")]
    status: String,
    submitted_on: DateTime<Utc>,
    last_update: Option<DateTime<Utc>>,
    #[serde(rename = "currentOfficial")]
    #[schema(example = "Ravi Kumar")]
    current_official: Option<String>,
}

/// Column values for an [`ApplicationSummary`].
#[derive(Debug, Clone)]
pub struct ApplicationSummaryParts {
    pub id: i64,
    pub owner: UserId,
    pub service_name: Option<String>,
    pub status: String,
    pub submitted_on: DateTime<Utc>,
    pub last_update: Option<DateTime<Utc>>,
    pub current_official: Option<String>,
}

impl From<ApplicationSummaryParts> for ApplicationSummary {
    fn from(parts: ApplicationSummaryParts) -> Self {
        let ApplicationSummaryParts {
            id,
            owner,
            service_name,
            status,
            submitted_on,
            last_update,
            current_official,
        } = parts;
        Self {
            id,
            owner,
            service_name,
            status,
            submitted_on,
            last_update,
            current_official,
        }
    }
}

impl ApplicationSummary {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// User who submitted the application. Not serialised.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn submitted_on(&self) -> DateTime<Utc> {
        self.submitted_on
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn current_official(&self) -> Option<&str> {
        self.current_official.as_deref()
    }
}
