//! HTTP inbound adapter: GraphQL endpoint, health probes and session cookies.

pub mod error;
pub mod graphql;
pub mod health;
pub mod session;
pub mod session_config;
#[cfg(test)]
pub mod test_utils;
