//! Actix endpoint executing GraphQL requests against the account schema.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Responder, http::header, web};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::domain::ports::AccountSession;
use crate::inbound::graphql::AccountSchema;

use super::session::SessionContext;

/// Path the schema is served on.
pub const GRAPHQL_PATH: &str = "/graphql";

/// Execute one GraphQL request in the caller's session.
///
/// Cookie changes requested by resolvers are written once execution has
/// finished, so the response reflects the final session state.
pub async fn graphql(
    schema: web::Data<AccountSchema>,
    session: SessionContext,
    req: HttpRequest,
    request: GraphQLRequest,
) -> HttpResponse {
    let handle: Arc<dyn AccountSession> = Arc::new(session.clone());
    let response = schema.execute(request.into_inner().data(handle)).await;
    let mut http = GraphQLResponse::from(response).respond_to(&req);
    session.apply_to(&mut http);
    http
}

/// Interactive GraphiQL page; only mounted in debug builds.
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .body(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
