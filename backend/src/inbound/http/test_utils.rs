//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};

use crate::domain::ports::SessionStore;

use super::session::SessionBackend;
use super::session_config::SessionSettings;

/// Session lifetime used by HTTP tests.
pub const TEST_SESSION_TTL: Duration = Duration::from_secs(600);

/// Build a session backend configured for tests.
///
/// - Generates a fresh signing key per invocation.
/// - Disables the `Secure` flag for local HTTP tests.
pub fn test_session_backend(store: Arc<dyn SessionStore>) -> SessionBackend {
    let settings = SessionSettings::new(Key::generate(), false, SameSite::Lax, TEST_SESSION_TTL);
    SessionBackend::new(store, settings)
}
