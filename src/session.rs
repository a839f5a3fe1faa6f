use std::{
    collections::HashMap,
    hash::{BuildHasher, RandomState},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use axum_extra::extract::cookie::CookieJar;
use cookie::{Cookie, SameSite};
use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    models::LanguageFilter,
    pages::{admin::AdminPage, home::HomePage},
};

pub const SESSION_COOKIE: &str = "cinehub_session";

/// View state of one browser. At most one page is alive at a time.
#[derive(Debug, Default)]
pub struct Session {
    home: Option<HomePage>,
    admin: Option<AdminPage>,
}

impl Session {
    /// Navigation always builds a fresh page; whatever was shown before is
    /// dropped together with its in-flight tickets.
    pub fn navigate_home(&mut self, filter: LanguageFilter) {
        self.admin = None;
        self.home = Some(HomePage::new(filter));
    }

    pub fn navigate_admin(&mut self) {
        self.home = None;
        self.admin = Some(AdminPage::new());
    }

    /// The current home page, or a fresh one if the browser is elsewhere.
    pub fn home_or_navigate(&mut self, filter: LanguageFilter) -> &mut HomePage {
        if self.home.is_none() {
            self.admin = None;
        }
        self.home.get_or_insert_with(|| HomePage::new(filter))
    }

    pub fn admin_or_navigate(&mut self) -> &mut AdminPage {
        if self.admin.is_none() {
            self.home = None;
        }
        self.admin.get_or_insert_with(AdminPage::new)
    }

    pub fn home_mut(&mut self) -> Option<&mut HomePage> {
        self.home.as_mut()
    }

    pub fn admin(&self) -> Option<&AdminPage> {
        self.admin.as_ref()
    }

    pub fn admin_mut(&mut self) -> Option<&mut AdminPage> {
        self.admin.as_mut()
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_seen: Timestamp,
}

/// Browser sessions keyed by cookie. Idle sessions are evicted lazily.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    idle_ttl: SignedDuration,
    hasher: RandomState,
    counter: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new(idle_minutes: i64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl: SignedDuration::from_mins(idle_minutes),
            hasher: RandomState::new(),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Looks up the session named by the cookie, creating one (and the
    /// cookie) when it is missing or expired.
    pub async fn resolve(&self, jar: CookieJar) -> (CookieJar, SessionHandle) {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_ttl);
        if entries.len() != before {
            debug!(evicted = before - entries.len(), "evicted idle sessions");
        }

        if let Some(id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
            if let Some(entry) = entries.get_mut(&id) {
                entry.last_seen = now;
                return (jar, entry.session.clone());
            }
        }

        let id = self.new_id(now);
        let session = SessionHandle::default();
        entries.insert(id.clone(), Entry { session: session.clone(), last_seen: now });
        debug!(sessions = entries.len(), "session started");

        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::minutes(self.idle_ttl.as_mins()));
        (jar.add(cookie), session)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn new_id(&self, now: Timestamp) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let hi = self.hasher.hash_one((n, now.as_nanosecond()));
        let lo = self.hasher.hash_one((hi, n));
        format!("{hi:016x}{lo:016x}")
    }
}
