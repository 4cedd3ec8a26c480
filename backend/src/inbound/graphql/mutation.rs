//! Mutation root.

use async_graphql::{Context, Object};

use super::types::{UserResponseObject, UsernamePasswordInput};
use super::{account_service, account_session, to_graphql_error};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create an account and sign in.
    async fn register(
        &self,
        ctx: &Context<'_>,
        options: UsernamePasswordInput,
    ) -> async_graphql::Result<UserResponseObject> {
        let service = account_service(ctx)?;
        let session = account_session(ctx)?;
        service
            .register(options.into(), session.as_ref())
            .await
            .map(UserResponseObject::from)
            .map_err(|err| to_graphql_error(&err))
    }

    /// Sign in with existing credentials.
    async fn login(
        &self,
        ctx: &Context<'_>,
        options: UsernamePasswordInput,
    ) -> async_graphql::Result<UserResponseObject> {
        let service = account_service(ctx)?;
        let session = account_session(ctx)?;
        service
            .login(options.into(), session.as_ref())
            .await
            .map(UserResponseObject::from)
            .map_err(|err| to_graphql_error(&err))
    }

    /// End the session. Returns false when the stored session could not be
    /// destroyed; the cookie is cleared either way.
    async fn logout(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let service = account_service(ctx)?;
        let session = account_session(ctx)?;
        Ok(service.logout(session.as_ref()).await)
    }
}
