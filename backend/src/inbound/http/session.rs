//! Cookie-keyed server-side sessions.
//!
//! The client holds only a signed opaque [`SessionKey`] in the
//! [`SESSION_COOKIE_NAME`] cookie; the record it points at lives in a
//! [`SessionStore`]. [`SessionContext`] is extracted per request, handed to the
//! domain as an [`AccountSession`], and afterwards applies any pending cookie
//! change to the response.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::cookie::{Cookie, CookieJar, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, warn};

use crate::domain::{Error, UserId};
use crate::domain::ports::{
    AccountSession, SessionKey, SessionRecord, SessionStore, SessionStoreError,
};

use super::session_config::SessionSettings;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "qid";

/// Store and cookie settings shared by every request.
#[derive(Clone)]
pub struct SessionBackend {
    store: Arc<dyn SessionStore>,
    settings: SessionSettings,
}

impl SessionBackend {
    /// Combine a store with cookie settings.
    pub fn new(store: Arc<dyn SessionStore>, settings: SessionSettings) -> Self {
        Self { store, settings }
    }

    /// Cookie settings in effect.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Build the signed `Set-Cookie` value for `key`.
    pub fn session_cookie(&self, key: &SessionKey) -> Option<Cookie<'static>> {
        let max_age = i64::try_from(self.settings.ttl().as_secs()).unwrap_or(i64::MAX);
        let cookie = Cookie::build(SESSION_COOKIE_NAME, key.as_str().to_owned())
            .path("/")
            .http_only(true)
            .secure(self.settings.cookie_secure())
            .same_site(self.settings.same_site())
            .max_age(CookieDuration::seconds(max_age))
            .finish();
        let mut jar = CookieJar::new();
        jar.signed_mut(self.settings.key()).add(cookie);
        jar.get(SESSION_COOKIE_NAME).cloned()
    }

    /// Recover the session key from a request cookie, verifying its signature.
    fn verified_key(&self, cookie: Cookie<'static>) -> Option<SessionKey> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        let Some(verified) = jar.signed(self.settings.key()).get(SESSION_COOKIE_NAME) else {
            warn!("session cookie failed signature verification; treating as anonymous");
            return None;
        };
        let key = SessionKey::parse(verified.value());
        if key.is_none() {
            warn!("session cookie carried a malformed key; treating as anonymous");
        }
        key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CookieChange {
    Unchanged,
    Set(SessionKey),
    Remove,
}

#[derive(Debug)]
struct ContextState {
    key: Option<SessionKey>,
    user_id: Option<UserId>,
    cookie: CookieChange,
}

struct ContextInner {
    backend: SessionBackend,
    state: Mutex<ContextState>,
}

/// Request-scoped session handle.
///
/// Clones share state, so the handle given to GraphQL resolvers and the one
/// kept by the HTTP handler observe the same changes.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<ContextInner>,
}

impl SessionContext {
    fn with_state(backend: SessionBackend, key: Option<SessionKey>, user_id: Option<UserId>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                backend,
                state: Mutex::new(ContextState {
                    key,
                    user_id,
                    cookie: CookieChange::Unchanged,
                }),
            }),
        }
    }

    /// Session for a request without a cookie.
    pub fn anonymous(backend: SessionBackend) -> Self {
        Self::with_state(backend, None, None)
    }

    /// Resolve the session referenced by the request's cookie, if any.
    ///
    /// Invalid signatures and unreadable records yield an anonymous session;
    /// the key is retained on read failures so logout can still destroy it.
    pub async fn load(req: &HttpRequest, backend: SessionBackend) -> Self {
        let Some(key) = req
            .cookie(SESSION_COOKIE_NAME)
            .and_then(|cookie| backend.verified_key(cookie))
        else {
            return Self::anonymous(backend);
        };

        let user_id = match backend.store.load(&key).await {
            Ok(Some(record)) => Some(record.user_id),
            Ok(None) => {
                debug!("session record missing or expired; treating as anonymous");
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to read session record; treating as anonymous");
                None
            }
        };
        Self::with_state(backend, Some(key), user_id)
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn backend(&self) -> &SessionBackend {
        &self.inner.backend
    }

    /// Write the pending cookie change, if any, to `response`.
    pub fn apply_to(&self, response: &mut HttpResponse) {
        let change = std::mem::replace(&mut self.state().cookie, CookieChange::Unchanged);
        let outcome = match change {
            CookieChange::Unchanged => return,
            CookieChange::Set(key) => match self.backend().session_cookie(&key) {
                Some(cookie) => response.add_cookie(&cookie),
                None => {
                    error!("signed session cookie missing from jar");
                    return;
                }
            },
            CookieChange::Remove => {
                let cookie = Cookie::build(SESSION_COOKIE_NAME, "").path("/").finish();
                response.add_removal_cookie(&cookie)
            }
        };
        if let Err(err) = outcome {
            error!(error = %err, "failed to write session cookie header");
        }
    }
}

#[async_trait]
impl AccountSession for SessionContext {
    fn user_id(&self) -> Option<UserId> {
        self.state().user_id.clone()
    }

    /// Bind `user_id` to a freshly generated key.
    ///
    /// A key the client arrived with is never promoted to an authenticated
    /// session; its record is destroyed once the new one is saved.
    async fn establish(&self, user_id: &UserId) -> Result<(), SessionStoreError> {
        let key = SessionKey::generate();
        let record = SessionRecord::for_user(user_id.clone());
        let backend = self.backend();
        backend
            .store
            .save(&key, &record, backend.settings.ttl())
            .await?;

        let previous = {
            let mut state = self.state();
            state.user_id = Some(user_id.clone());
            state.cookie = CookieChange::Set(key.clone());
            state.key.replace(key)
        };
        if let Some(previous) = previous {
            if let Err(err) = backend.store.destroy(&previous).await {
                warn!(error = %err, "failed to destroy replaced session record");
            }
        }
        Ok(())
    }

    async fn destroy(&self) -> Result<(), SessionStoreError> {
        let key = {
            let mut state = self.state();
            state.user_id = None;
            state.key.take()
        };
        match key {
            Some(key) => self.backend().store.destroy(&key).await,
            None => Ok(()),
        }
    }

    fn clear_cookie(&self) {
        self.state().cookie = CookieChange::Remove;
    }
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let backend = req
                .app_data::<web::Data<SessionBackend>>()
                .map(|data| data.get_ref().clone())
                .ok_or_else(|| {
                    error!("session backend missing from application data");
                    Error::internal("session backend not configured")
                })?;
            Ok(SessionContext::load(&req, backend).await)
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
