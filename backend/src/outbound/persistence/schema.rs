//! Diesel table definitions for the portal's PostgreSQL schema.
//!
//! The schema is owned and migrated outside this service; these definitions
//! must mirror it. `diesel print-schema` against a live database regenerates
//! them.

diesel::table! {
    /// Portal accounts. `email` carries a unique constraint.
    users (id) {
        id -> Int8,
        full_name -> Text,
        email -> Text,
        /// PHC-encoded Argon2id hash.
        password_hash -> Text,
        /// One of `citizen`, `official`, `admin`.
        role -> Text,
    }
}

diesel::table! {
    /// Government services an application can be filed against.
    services (id) {
        id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    /// Service requests submitted by citizens.
    applications (id) {
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        service_id -> Nullable<Int8>,
        status -> Text,
        submitted_on -> Timestamptz,
        last_update -> Nullable<Timestamptz>,
        /// Official currently handling the application, a `users` row.
        current_official_id -> Nullable<Int8>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(applications, services, users);
