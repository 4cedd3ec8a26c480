//! GraphQL adapter exposing the account use-cases.
//!
//! The schema carries the shared [`AccountService`]; each request must carry
//! its own `Arc<dyn AccountSession>` as request data so resolvers operate on
//! the caller's session only.

mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};
use tracing::error;

use crate::domain::ports::AccountSession;
use crate::domain::{AccountService, Error};

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{FieldErrorObject, UserObject, UserResponseObject, UsernamePasswordInput};

/// Schema served at `/graphql`.
pub type AccountSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around `service`.
pub fn build_schema(service: AccountService) -> AccountSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// Translate a domain error into a GraphQL error.
///
/// Internal messages are redacted; the error code and trace id travel as
/// `extensions.code` and `extensions.traceId`.
pub(crate) fn to_graphql_error(error: &Error) -> async_graphql::Error {
    let redacted = error.redacted();
    let code = redacted.code().as_extension_code();
    let trace_id = redacted.trace_id().map(str::to_owned);
    async_graphql::Error::new(redacted.message()).extend_with(|_, extensions| {
        extensions.set("code", code);
        if let Some(trace_id) = trace_id {
            extensions.set("traceId", trace_id);
        }
    })
}

pub(crate) fn account_service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a AccountService> {
    ctx.data::<AccountService>().map_err(|_| {
        error!("account service missing from schema data");
        to_graphql_error(&Error::internal("account service not configured"))
    })
}

pub(crate) fn account_session<'a>(
    ctx: &Context<'a>,
) -> async_graphql::Result<&'a Arc<dyn AccountSession>> {
    ctx.data::<Arc<dyn AccountSession>>().map_err(|_| {
        error!("session missing from GraphQL request data");
        to_graphql_error(&Error::internal("session not attached to request"))
    })
}

#[cfg(test)]
mod tests;
