//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{PasswordHash, StoredUser, User, UserId};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_stored(self) -> StoredUser {
        StoredUser {
            user: User::new(
                UserId::from_uuid(self.id),
                self.username,
                self.created_at,
                self.updated_at,
            ),
            password_hash: PasswordHash::new(self.password_hash),
        }
    }

    pub(crate) fn into_user(self) -> User {
        self.into_stored().user
    }
}

/// Insertable struct for creating new user records.
///
/// Timestamps are left to the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}
