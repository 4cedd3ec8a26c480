//! User persistence adapters.
//!
//! [`DieselUserRepository`] stores accounts in PostgreSQL via `diesel-async`
//! and a `bb8` pool; [`InMemoryUserRepository`] keeps them in process for
//! development and tests. Diesel row structs and the schema stay private to
//! this module.

mod diesel_user_repository;
mod in_memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
