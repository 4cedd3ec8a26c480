//! Request-scoped session handle consumed by the account service.

use async_trait::async_trait;

use crate::domain::UserId;

use super::SessionStoreError;

/// The caller's session as seen by one request.
///
/// Implementations record cookie changes for the inbound adapter to apply to
/// the response; the domain never touches transport headers directly.
#[async_trait]
pub trait AccountSession: Send + Sync {
    /// Identity stored in the session, if authenticated.
    fn user_id(&self) -> Option<UserId>;

    /// Bind the session to `user_id`, creating a key when none exists.
    async fn establish(&self, user_id: &UserId) -> Result<(), SessionStoreError>;

    /// Delete the stored session state and forget the identity.
    async fn destroy(&self) -> Result<(), SessionStoreError>;

    /// Schedule removal of the client-side session cookie.
    fn clear_cookie(&self);
}
