//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL user repository via Diesel, plus an
//!   in-memory fallback
//! - **password**: Argon2id password hashing
//! - **session**: in-memory and Redis session stores
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod password;
pub mod persistence;
pub mod session;
