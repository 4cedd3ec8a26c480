//! Query root.

use async_graphql::{Context, Object};

use super::types::UserObject;
use super::{account_service, account_session, to_graphql_error};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The signed-in user, or null for anonymous callers.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<UserObject>> {
        let service = account_service(ctx)?;
        let session = account_session(ctx)?;
        let user = service
            .current_user(session.as_ref())
            .await
            .map_err(|err| to_graphql_error(&err))?;
        Ok(user.as_ref().map(UserObject::from))
    }
}
