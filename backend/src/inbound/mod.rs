//! Inbound adapters translating external requests into account service calls
//! while keeping framework details at the edge.
//!
//! The GraphQL schema lives under [`graphql`]; [`http`] mounts it on Actix
//! together with session cookie handling.

pub mod graphql;
pub mod http;
