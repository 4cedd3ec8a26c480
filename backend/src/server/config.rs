//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use accounts::domain::ports::SessionStore;
use accounts::inbound::http::session_config::SessionSettings;
use accounts::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) session_store: Option<Arc<dyn SessionStore>>,
}

impl ServerConfig {
    /// Construct a server configuration from cookie settings and a listener address.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            session_store: None,
        }
    }

    /// Attach a database connection pool for the user repository.
    ///
    /// Without one, accounts live in process memory and vanish on restart.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the store holding server-side session records.
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }
}
