//! In-process session store.
//!
//! Each session sits behind its own async mutex. A turn locks its session for
//! its whole duration, so two turns of the same session never interleave while
//! unrelated sessions proceed independently.

use super::Session;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Default idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Shared handle to a single session.
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    handle: SessionHandle,
    last_used: Instant,
}

/// Holds all live sessions keyed by id.
///
/// Sessions idle for longer than the TTL are dropped whenever a new session
/// is created, and the least recently used one is evicted once the store is
/// at capacity. A turn already holding an evicted handle finishes normally.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    max_history: usize,
    max_sessions: usize,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions keep `max_history` turns.
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history,
            max_sessions: DEFAULT_MAX_SESSIONS,
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Set the maximum number of live sessions (at least 1).
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Set how long a session may stay unused before it is dropped.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Start a new, empty session.
    pub fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::with_max_history(self.max_history)));
        let now = Instant::now();

        let mut sessions = self.sessions.write().unwrap();

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) <= self.ttl);
        if sessions.len() < before {
            debug!("Dropped {} idle sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    debug!("Evicted least recently used session {}", oldest);
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_used: now,
            },
        );
        debug!("Created session {}", id);

        (id, handle)
    }

    /// Look up a session by id and mark it as used.
    ///
    /// A session idle past the TTL counts as gone.
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap();

        let expired = match sessions.get_mut(id) {
            Some(entry) if now.duration_since(entry.last_used) <= self.ttl => {
                entry.last_used = now;
                return Some(entry.handle.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(id);
            debug!("Session {} expired", id);
        }
        None
    }

    /// Return the session for `id`, creating one when the id is absent or unknown.
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        match id.and_then(|id| self.get(&id).map(|handle| (id, handle))) {
            Some(found) => found,
            None => self.create(),
        }
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(id).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(super::MAX_HISTORY)
    }
}
