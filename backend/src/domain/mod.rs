//! Domain primitives, the account service and its ports.
//!
//! Purpose: keep account rules independent of GraphQL, HTTP, Diesel and
//! Redis. Inbound adapters call [`AccountService`]; outbound adapters
//! implement the traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - User (alias to `user::User`): registered account without its hash.
//! - UserResponse (alias to `auth::UserResponse`): field errors or a user.
//! - AccountService: current user, register, login and logout.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    CREDENTIAL_MIN_EXCLUSIVE, Credentials, CredentialsValidationError, FieldError, PASSWORD_FIELD,
    Password, PasswordHash, USERNAME_FIELD, UserResponse,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, StoredUser, User, UserId, UserValidationError};
