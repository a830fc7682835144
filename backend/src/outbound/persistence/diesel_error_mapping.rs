//! Shared classification of pool and Diesel failures.
//!
//! Repositories turn the classification into their own port error, so the
//! driver's wording is logged here and never reaches a client.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure category for a Diesel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Any other query failure.
    Query,
}

impl DieselFailure {
    /// Short client-safe description.
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::Connection => "database connection error",
            Self::UniqueViolation => "unique constraint violated",
            Self::Query => "database error",
        }
    }
}

/// Classify a Diesel error, logging the driver detail at `debug`.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        _ => DieselFailure::Query,
    }
}

/// Extract the checkout message from a pool error, logging it at `debug`.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    let PoolError::Checkout { message } = error;
    debug!(%message, "connection checkout failed");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo("driver detail")))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), DieselFailure::Connection)]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation),
        DieselFailure::UniqueViolation
    )]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation), DieselFailure::Query)]
    #[case(DieselError::NotFound, DieselFailure::Query)]
    fn classifies_diesel_errors(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(&error), expected);
    }

    #[rstest]
    fn messages_do_not_echo_driver_detail() {
        let failure = classify_diesel_error(&database_error(DatabaseErrorKind::Unknown));
        assert!(!failure.message().contains("driver detail"));
    }

    #[rstest]
    fn pool_errors_yield_their_message() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
    }
}
