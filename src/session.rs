//! Cookie-identified, server-side sessions and flash messages.
//!
//! [`SessionLayer`] runs as a global middleware: it resolves the session id
//! from the request cookie, exposes a [`Session`] handle in the request
//! extensions, and after the handler ran persists whatever the handler left
//! in it. A cookie is only issued once the session holds data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use biscotti::{Processor, ProcessorConfig, RemovalCookie, RequestCookies, ResponseCookie, ResponseCookies, SameSite};
use serde::Serialize;
use jiff::{SignedDuration, Timestamp};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::model::UserId;
use crate::request::Request;
use crate::response::Response;

/// A one-shot notification shown on the next rendered page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
struct SessionData {
    uid: Option<UserId>,
    flash: Vec<Flash>,
}

impl SessionData {
    fn is_empty(&self) -> bool {
        self.uid.is_none() && self.flash.is_empty()
    }
}

struct Record {
    data: SessionData,
    deadline: Timestamp,
}

impl Record {
    fn is_stale(&self, now: Timestamp) -> bool {
        self.deadline <= now
    }
}

/// Where session records live between requests.
///
/// Every record carries a deadline, pushed back each time the session is
/// used. Stale records are never loaded and are dropped by
/// [`SessionStore::delete_expired`].
#[derive(Default)]
pub struct SessionStore {
    records: RwLock<HashMap<Uuid, Record>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn load(&self, id: Uuid) -> Option<SessionData> {
        let records = self.records.read().await;
        records
            .get(&id)
            .filter(|record| !record.is_stale(Timestamp::now()))
            .map(|record| record.data.clone())
    }

    #[tracing::instrument(name = "Store session record", level = tracing::Level::TRACE, skip_all)]
    async fn store(&self, id: Uuid, data: SessionData, ttl: SignedDuration) {
        let deadline = Timestamp::now().checked_add(ttl).unwrap_or(Timestamp::MAX);
        self.records.write().await.insert(id, Record { data, deadline });
    }

    async fn delete(&self, id: Uuid) {
        self.records.write().await.remove(&id);
    }

    /// Drops every expired record and returns how many went.
    #[tracing::instrument(name = "Delete expired session records", level = tracing::Level::TRACE, skip_all)]
    pub async fn delete_expired(&self) -> usize {
        let now = Timestamp::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_stale(now));
        before - records.len()
    }

    /// Number of records held, expired ones included until the next sweep.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Runs [`SessionStore::delete_expired`] every `period` until the
    /// returned task is aborted.
    pub fn spawn_cleanup(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let removed = self.delete_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "expired sessions deleted");
                }
            }
        })
    }
}

// ── Session handle ────────────────────────────────────────────────────────────

#[derive(Default)]
struct SessionState {
    data: SessionData,
    /// Set when the logged-in user changes; the record moves to a fresh id.
    renew: bool,
}

/// The current request's session.
///
/// Cheap to clone; all clones share the same state. The lock is never held
/// across an `.await`.
#[derive(Clone, Default)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    fn with_data(data: SessionData) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState { data, renew: false })),
        }
    }

    /// The handle [`SessionLayer`] attached to `req`.
    pub fn from_request(req: &Request) -> Result<Session, Error> {
        req.extension::<Session>()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("the session middleware is not installed").into())
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Id of the logged-in user, if any.
    pub fn uid(&self) -> Option<UserId> {
        self.lock().data.uid
    }

    /// Logs `uid` in. The session id is rotated when the response goes out.
    pub fn set_uid(&self, uid: UserId) {
        let mut state = self.lock();
        state.data.uid = Some(uid);
        state.renew = true;
    }

    /// Queues a flash message of the given kind (`"error"`, `"info"`, ...).
    pub fn flash(&self, kind: &str, message: impl Into<String>) {
        self.lock().data.flash.push(Flash {
            kind: kind.to_owned(),
            message: message.into(),
        });
    }

    /// Drains every pending flash message.
    pub fn take_flash(&self) -> Vec<Flash> {
        std::mem::take(&mut self.lock().data.flash)
    }

    /// Logs out and forgets everything. The record and its cookie are removed.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.data = SessionData::default();
        state.renew = false;
    }

    fn snapshot(&self) -> (SessionData, bool) {
        let state = self.lock();
        (state.data.clone(), state.renew)
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Global middleware loading and persisting [`Session`]s.
#[derive(Clone)]
pub struct SessionLayer {
    shared: Arc<Shared>,
}

struct Shared {
    store: Arc<SessionStore>,
    config: SessionConfig,
    processor: Processor,
}

impl SessionLayer {
    pub fn new(store: Arc<SessionStore>, config: SessionConfig) -> Self {
        let processor: Processor = ProcessorConfig::default().into();
        Self {
            shared: Arc::new(Shared { store, config, processor }),
        }
    }
}

impl Shared {
    fn incoming_id(&self, req: &Request) -> Option<Uuid> {
        let mut cookies = RequestCookies::new();
        for header in req.headers().get_all(http::header::COOKIE) {
            let Ok(header) = header.to_str() else { continue };
            if let Err(e) = cookies.extend_from_header(header, &self.processor) {
                tracing::warn!(error = %e, "ignoring malformed cookie header");
                return None;
            }
        }
        let cookie = cookies.get(&self.config.cookie_name)?;
        Uuid::parse_str(cookie.value()).ok()
    }

    fn set_cookie(&self, response: &mut Response, cookie: ResponseCookie<'static>) {
        let mut cookies = ResponseCookies::new();
        cookies.insert(cookie);
        for value in cookies.header_values(&self.processor) {
            response.append_header("set-cookie", &value);
        }
    }

    fn session_cookie(&self, id: Uuid) -> ResponseCookie<'static> {
        ResponseCookie::new(self.config.cookie_name.clone(), id.to_string())
            .set_path("/")
            .set_http_only(true)
            .set_same_site(SameSite::Lax)
            .set_secure(self.config.secure)
    }

    fn removal_cookie(&self) -> ResponseCookie<'static> {
        RemovalCookie::new(self.config.cookie_name.clone())
            .set_path("/")
            .into()
    }

    async fn handle(&self, mut req: Request, next: Next) -> Response {
        let incoming = match self.incoming_id(&req) {
            Some(id) => self.store.load(id).await.map(|data| (id, data)),
            None => None,
        };
        let session = match &incoming {
            Some((_, data)) => Session::with_data(data.clone()),
            None => Session::default(),
        };
        req.extensions_mut().insert(session.clone());

        let mut response = next.run(req).await;

        let (data, renew) = session.snapshot();
        match incoming {
            Some((id, _)) if data.is_empty() => {
                self.store.delete(id).await;
                self.set_cookie(&mut response, self.removal_cookie());
            }
            Some((id, _)) if !renew => self.store.store(id, data, self.config.ttl()).await,
            _ if data.is_empty() => {}
            incoming => {
                if let Some((old, _)) = incoming {
                    self.store.delete(old).await;
                }
                let id = Uuid::new_v4();
                self.store.store(id, data, self.config.ttl()).await;
                self.set_cookie(&mut response, self.session_cookie(id));
            }
        }
        response
    }
}

impl Middleware for SessionLayer {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let shared = Arc::clone(&self.shared);
        Box::pin(async move { shared.handle(req, next).await })
    }
}
