//! Account use-cases: session lookup, registration, login and logout.
//!
//! The service owns input validation and the branching over storage, hashing
//! and session outcomes. Expected failures (short credentials, taken
//! usernames, unknown accounts, wrong passwords) are returned as field errors
//! inside [`UserResponse`]; infrastructure failures surface as [`Error`].

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::ports::{
    AccountSession, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{Credentials, Error, FieldError, NewUser, User, UserId, UserResponse};

/// Account service shared by every request.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Resolve the user bound to `session`.
    ///
    /// Anonymous sessions and sessions pointing at a deleted account both
    /// yield `Ok(None)`.
    pub async fn current_user(&self, session: &dyn AccountSession) -> Result<Option<User>, Error> {
        let Some(user_id) = session.user_id() else {
            return Ok(None);
        };
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_persistence_error)?;
        if user.is_none() {
            debug!(user_id = %user_id, "session refers to a missing user; treating as anonymous");
        }
        Ok(user)
    }

    /// Create an account and sign the caller in.
    pub async fn register(
        &self,
        credentials: Credentials,
        session: &dyn AccountSession,
    ) -> Result<UserResponse, Error> {
        if let Err(invalid) = credentials.validate_for_registration() {
            return Ok(UserResponse::rejected(invalid.into()));
        }

        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let new_user = NewUser {
            id: UserId::random(),
            username: credentials.username().to_owned(),
            password_hash,
        };

        let user = match self.users.insert(&new_user).await {
            Ok(user) => user,
            Err(UserPersistenceError::DuplicateUsername) => {
                return Ok(UserResponse::rejected(FieldError::username_taken()));
            }
            Err(err) => {
                error!(error = %err, "failed to insert user");
                return Err(map_persistence_error(err));
            }
        };

        establish(session, user.id()).await?;
        Ok(UserResponse::User(user))
    }

    /// Check credentials and sign the caller in.
    pub async fn login(
        &self,
        credentials: Credentials,
        session: &dyn AccountSession,
    ) -> Result<UserResponse, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?;
        let Some(stored) = stored else {
            return Ok(UserResponse::rejected(FieldError::unknown_username()));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Ok(UserResponse::rejected(FieldError::incorrect_password()));
        }

        establish(session, stored.user.id()).await?;
        Ok(UserResponse::User(stored.user))
    }

    /// Destroy the session and clear the cookie.
    ///
    /// The cookie is cleared whatever the store reports; the return value is
    /// `false` only when destroying the stored state failed.
    pub async fn logout(&self, session: &dyn AccountSession) -> bool {
        let outcome = session.destroy().await;
        session.clear_cookie();
        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to destroy session during logout");
                false
            }
        }
    }
}

async fn establish(session: &dyn AccountSession, user_id: &UserId) -> Result<(), Error> {
    session.establish(user_id).await.map_err(|err| {
        error!(error = %err, user_id = %user_id, "failed to establish session");
        Error::internal(format!("failed to establish session: {err}"))
    })
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            // Connection detail may name hosts; keep it out of client errors.
            warn!(%message, "user repository unreachable");
            Error::service_unavailable("user repository unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => Error::conflict("username already exists"),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal(error.to_string())
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
