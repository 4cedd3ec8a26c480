//! Resolver tests executed against the schema without HTTP.

use std::sync::{Arc, Mutex};

use async_graphql::{Request, Response, Value};
use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::UserId;
use crate::domain::ports::{MockUserRepository, SessionStoreError, UserPersistenceError};
use crate::outbound::password::Argon2PasswordHasher;
use crate::outbound::persistence::InMemoryUserRepository;

#[derive(Default)]
struct StubSession {
    user_id: Mutex<Option<UserId>>,
    cleared: Mutex<bool>,
    fail_destroy: bool,
}

impl StubSession {
    fn failing_destroy() -> Self {
        Self {
            fail_destroy: true,
            ..Self::default()
        }
    }

    fn cleared(&self) -> bool {
        *self.cleared.lock().expect("cleared lock")
    }
}

#[async_trait]
impl AccountSession for StubSession {
    fn user_id(&self) -> Option<UserId> {
        self.user_id.lock().expect("user lock").clone()
    }

    async fn establish(&self, user_id: &UserId) -> Result<(), SessionStoreError> {
        *self.user_id.lock().expect("user lock") = Some(user_id.clone());
        Ok(())
    }

    async fn destroy(&self) -> Result<(), SessionStoreError> {
        *self.user_id.lock().expect("user lock") = None;
        if self.fail_destroy {
            return Err(SessionStoreError::connection("redis down"));
        }
        Ok(())
    }

    fn clear_cookie(&self) {
        *self.cleared.lock().expect("cleared lock") = true;
    }
}

const REGISTER: &str = r#"mutation {
    register(options: { username: "alice", password: "wonderland" }) {
        errors { field message }
        user { id username createdAt updatedAt }
    }
}"#;

const ME: &str = "{ me { id username } }";

#[fixture]
fn schema() -> AccountSchema {
    build_schema(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2PasswordHasher::reduced_cost()),
    ))
}

async fn run(schema: &AccountSchema, query: &str, session: Arc<StubSession>) -> Response {
    let session: Arc<dyn AccountSession> = session;
    schema.execute(Request::new(query).data(session)).await
}

fn data(response: Response) -> serde_json::Value {
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().expect("data JSON")
}

#[rstest]
#[tokio::test]
async fn me_is_null_for_anonymous_session(schema: AccountSchema) {
    let body = data(run(&schema, ME, Arc::new(StubSession::default())).await);
    assert_eq!(body, json!({ "me": null }));
}

#[rstest]
#[tokio::test]
async fn register_returns_user_and_signs_in(schema: AccountSchema) {
    let session = Arc::new(StubSession::default());

    let body = data(run(&schema, REGISTER, session.clone()).await);
    let register = &body["register"];
    assert_eq!(register["errors"], serde_json::Value::Null);
    assert_eq!(register["user"]["username"], "alice");
    assert!(register["user"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(register["user"]["createdAt"].is_string());

    let body = data(run(&schema, ME, session).await);
    assert_eq!(body["me"]["username"], "alice");
    assert_eq!(body["me"]["id"], register["user"]["id"]);
}

#[rstest]
#[case("ab", "wonderland", "username")]
#[case("alice", "ab", "password")]
#[tokio::test]
async fn short_fields_are_reported_as_field_errors(
    schema: AccountSchema,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let query = format!(
        r#"mutation {{ register(options: {{ username: "{username}", password: "{password}" }}) {{
            errors {{ field message }} user {{ id }}
        }} }}"#
    );
    let session = Arc::new(StubSession::default());
    let body = data(run(&schema, &query, session.clone()).await);
    assert_eq!(
        body["register"],
        json!({
            "errors": [{ "field": field, "message": "length must be greater than 2" }],
            "user": null,
        })
    );
    assert!(session.user_id().is_none());
}

#[rstest]
#[tokio::test]
async fn login_reports_wrong_password(schema: AccountSchema) {
    data(run(&schema, REGISTER, Arc::new(StubSession::default())).await);

    let session = Arc::new(StubSession::default());
    let body = data(
        run(
            &schema,
            r#"mutation { login(options: { username: "alice", password: "nope!" }) {
                errors { field } user { id }
            } }"#,
            session.clone(),
        )
        .await,
    );
    assert_eq!(body["login"]["errors"], json!([{ "field": "password" }]));
    assert_eq!(body["login"]["user"], serde_json::Value::Null);
    assert!(session.user_id().is_none());
}

#[rstest]
#[case(false, true)]
#[case(true, false)]
#[tokio::test]
async fn logout_reports_destroy_outcome_and_clears_cookie(
    schema: AccountSchema,
    #[case] fail_destroy: bool,
    #[case] expected: bool,
) {
    let session = Arc::new(if fail_destroy {
        StubSession::failing_destroy()
    } else {
        StubSession::default()
    });
    let body = data(run(&schema, "mutation { logout }", session.clone()).await);
    assert_eq!(body, json!({ "logout": expected }));
    assert!(session.cleared());
}

#[rstest]
#[tokio::test]
async fn storage_failures_surface_as_redacted_errors() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::query("relation \"users\" does not exist")));
    let schema = build_schema(AccountService::new(
        Arc::new(users),
        Arc::new(Argon2PasswordHasher::reduced_cost()),
    ));
    let session = Arc::new(StubSession::default());

    let response = run(&schema, REGISTER, session.clone()).await;
    let error = response.errors.first().expect("graphql error");
    assert_eq!(error.message, "Internal server error");
    let code = error
        .extensions
        .as_ref()
        .and_then(|extensions| extensions.get("code"))
        .cloned();
    assert_eq!(code, Some(Value::from("INTERNAL_ERROR")));
    assert!(session.user_id().is_none());
}

#[rstest]
#[tokio::test]
async fn connection_failures_keep_their_code() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .returning(|_| Err(UserPersistenceError::connection("pool timed out")));
    let schema = build_schema(AccountService::new(
        Arc::new(users),
        Arc::new(Argon2PasswordHasher::reduced_cost()),
    ));

    let response = run(
        &schema,
        r#"mutation { login(options: { username: "alice", password: "secret" }) { user { id } } }"#,
        Arc::new(StubSession::default()),
    )
    .await;
    let error = response.errors.first().expect("graphql error");
    let code = error
        .extensions
        .as_ref()
        .and_then(|extensions| extensions.get("code"))
        .cloned();
    assert_eq!(code, Some(Value::from("SERVICE_UNAVAILABLE")));
}

#[rstest]
#[tokio::test]
async fn missing_session_data_is_an_internal_error(schema: AccountSchema) {
    let response = schema.execute(Request::new(ME)).await;
    let error = response.errors.first().expect("graphql error");
    assert_eq!(error.message, "Internal server error");
}

#[rstest]
fn sdl_matches_public_contract(schema: AccountSchema) {
    let sdl = schema.sdl();
    for fragment in [
        "me: User",
        "register(options: UsernamePasswordInput!): UserResponse!",
        "login(options: UsernamePasswordInput!): UserResponse!",
        "logout: Boolean!",
        "errors: [FieldError!]",
        "createdAt: DateTime!",
    ] {
        assert!(sdl.contains(fragment), "missing `{fragment}` in:\n{sdl}");
    }
    assert!(!sdl.contains("passwordHash"));
}
