//! GraphQL object and input types.

use async_graphql::{ID, InputObject, SimpleObject};
use chrono::{DateTime, Utc};

use crate::domain::{Credentials, FieldError, User, UserResponse};

/// Public account fields.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserObject {
    fn from(user: &User) -> Self {
        Self {
            id: ID(user.id().to_string()),
            username: user.username().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "FieldError")]
pub struct FieldErrorObject {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldErrorObject {
    fn from(error: &FieldError) -> Self {
        Self {
            field: error.field().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

/// Register/login outcome; exactly one of `errors` or `user` is set.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "UserResponse")]
pub struct UserResponseObject {
    pub errors: Option<Vec<FieldErrorObject>>,
    pub user: Option<UserObject>,
}

impl From<UserResponse> for UserResponseObject {
    fn from(response: UserResponse) -> Self {
        match response {
            UserResponse::Errors(errors) => Self {
                errors: Some(errors.iter().map(FieldErrorObject::from).collect()),
                user: None,
            },
            UserResponse::User(user) => Self {
                errors: None,
                user: Some(UserObject::from(&user)),
            },
        }
    }
}

/// Credentials argument shared by `register` and `login`.
///
/// No `Debug` derive: the password must not reach logs.
#[derive(InputObject)]
pub struct UsernamePasswordInput {
    pub username: String,
    pub password: String,
}

impl From<UsernamePasswordInput> for Credentials {
    fn from(input: UsernamePasswordInput) -> Self {
        Self::new(input.username, input.password)
    }
}
