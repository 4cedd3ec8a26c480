//! Account service: registration, login, logout and "who am I" over GraphQL.
//!
//! Layout follows ports and adapters: [`domain`] holds the use-cases and the
//! port traits, [`outbound`] implements those ports (PostgreSQL via Diesel,
//! Redis or memory for sessions, Argon2 for passwords) and [`inbound`] exposes
//! them over Actix and async-graphql.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
