//! Diesel table definitions generated from `backend/migrations`.

diesel::table! {
    /// Registered accounts with their password hashes and audit timestamps.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login name, unique across all rows.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
