//! Builders turning server configuration into adapters and shared state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use accounts::domain::AccountService;
use accounts::domain::ports::{SessionStore, UserRepository};
use accounts::inbound::graphql::{AccountSchema, build_schema};
use accounts::inbound::http::session::SessionBackend;
use accounts::outbound::password::Argon2PasswordHasher;
use accounts::outbound::persistence::{DieselUserRepository, InMemoryUserRepository};
use accounts::outbound::session::InMemorySessionStore;

use super::ServerConfig;

fn build_user_repository(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            warn!("no database configured; accounts are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

fn build_session_store(config: &ServerConfig) -> Arc<dyn SessionStore> {
    match &config.session_store {
        Some(store) => store.clone(),
        None => {
            warn!("no session store configured; sessions are kept in memory");
            Arc::new(InMemorySessionStore::new())
        }
    }
}

/// Build the GraphQL schema over the configured repository.
pub(super) fn build_schema_data(config: &ServerConfig) -> web::Data<AccountSchema> {
    let service = AccountService::new(
        build_user_repository(config),
        Arc::new(Argon2PasswordHasher::new()),
    );
    web::Data::new(build_schema(service))
}

/// Pair the configured session store with cookie settings.
pub(super) fn build_session_backend(config: &ServerConfig) -> web::Data<SessionBackend> {
    web::Data::new(SessionBackend::new(
        build_session_store(config),
        config.session.clone(),
    ))
}
