//! Shared helpers for account integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module wires the real Actix handlers over in-memory adapters and offers a
//! small cookie-carrying GraphQL client.

use std::sync::Arc;
use std::time::Duration;

use accounts::Trace;
use accounts::domain::AccountService;
use accounts::domain::ports::SessionStore;
use accounts::inbound::graphql::{AccountSchema, build_schema};
use accounts::inbound::http::graphql::{GRAPHQL_PATH, graphql};
use accounts::inbound::http::session::{SESSION_COOKIE_NAME, SessionBackend};
use accounts::inbound::http::session_config::SessionSettings;
use accounts::outbound::password::Argon2PasswordHasher;
use accounts::outbound::persistence::InMemoryUserRepository;
use accounts::outbound::session::InMemorySessionStore;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

/// Session lifetime used by the test server.
pub const SESSION_TTL: Duration = Duration::from_secs(900);

/// In-memory adapters shared between the app under test and assertions.
pub struct Harness {
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub backend: SessionBackend,
    schema: web::Data<AccountSchema>,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let store: Arc<dyn SessionStore> = sessions.clone();
        let settings = SessionSettings::new(Key::generate(), false, SameSite::Lax, SESSION_TTL);
        let schema = build_schema(AccountService::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::reduced_cost()),
        ));
        Self {
            users,
            sessions,
            backend: SessionBackend::new(store, settings),
            schema: web::Data::new(schema),
        }
    }

    /// Start the app under test.
    pub async fn service(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(self.schema.clone())
                .app_data(web::Data::new(self.backend.clone()))
                .wrap(Trace)
                .route(GRAPHQL_PATH, web::post().to(graphql)),
        )
        .await
    }
}

/// Outcome of one GraphQL round trip.
pub struct Exchange {
    pub body: Value,
    pub set_cookie: Option<Cookie<'static>>,
}

/// POST `query` with an optional session cookie.
pub async fn execute<S>(app: &S, query: &str, cookie: Option<&Cookie<'static>>) -> Exchange
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::post()
        .uri(GRAPHQL_PATH)
        .set_json(json!({ "query": query }));
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let res = test::call_service(app, request.to_request()).await;
    assert!(res.status().is_success(), "unexpected status {}", res.status());
    let set_cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned);
    let body = test::read_body_json(res).await;
    Exchange { body, set_cookie }
}

pub fn register_mutation(username: &str, password: &str) -> String {
    credentials_mutation("register", username, password)
}

pub fn login_mutation(username: &str, password: &str) -> String {
    credentials_mutation("login", username, password)
}

fn credentials_mutation(field: &str, username: &str, password: &str) -> String {
    format!(
        r#"mutation {{ {field}(options: {{ username: "{username}", password: "{password}" }}) {{
            errors {{ field message }}
            user {{ id username createdAt updatedAt }}
        }} }}"#
    )
}

pub const ME_QUERY: &str = "{ me { id username } }";
pub const LOGOUT_MUTATION: &str = "mutation { logout }";
