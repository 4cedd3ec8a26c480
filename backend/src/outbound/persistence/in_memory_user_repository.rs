//! Process-local `UserRepository` used when no database is configured and in
//! tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, StoredUser, User, UserId};

/// Mutex-guarded map of accounts keyed by id.
///
/// The uniqueness check and the insert happen under one lock, matching the
/// atomicity of a unique index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, StoredUser>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an account, returning whether it existed.
    pub fn remove(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.remove(id).is_some())
    }

    /// Number of stored accounts.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.len())
    }

    /// Whether no accounts are stored.
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, StoredUser>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if users
            .values()
            .any(|existing| existing.user.username() == user.username)
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        let now = Utc::now();
        let created = User::new(user.id.clone(), user.username.clone(), now, now);
        users.insert(
            user.id.clone(),
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            id: UserId::random(),
            username: username.to_owned(),
            password_hash: PasswordHash::new("$argon2id$hash"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn insert_then_find_by_both_keys(repo: InMemoryUserRepository) {
        let created = repo.insert(&new_user("alice")).await.expect("insert");

        let by_id = repo.find_by_id(created.id()).await.expect("find by id");
        assert_eq!(by_id.as_ref(), Some(&created));

        let by_name = repo
            .find_by_username("alice")
            .await
            .expect("find by username")
            .expect("present");
        assert_eq!(by_name.user, created);
        assert_eq!(by_name.password_hash.as_ref(), "$argon2id$hash");
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_usernames(repo: InMemoryUserRepository) {
        repo.insert(&new_user("alice")).await.expect("first insert");
        let err = repo
            .insert(&new_user("alice"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::DuplicateUsername);
        assert_eq!(repo.len().expect("len"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn usernames_are_case_sensitive(repo: InMemoryUserRepository) {
        repo.insert(&new_user("alice")).await.expect("lower");
        repo.insert(&new_user("Alice")).await.expect("upper");
        assert!(
            repo.find_by_username("ALICE")
                .await
                .expect("lookup")
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn remove_forgets_account(repo: InMemoryUserRepository) {
        let created = repo.insert(&new_user("alice")).await.expect("insert");
        assert!(repo.remove(created.id()).expect("remove"));
        assert!(repo.find_by_id(created.id()).await.expect("find").is_none());
        assert!(repo.is_empty().expect("is_empty"));
    }
}
