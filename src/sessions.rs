// Session Store
// Each web client gets its own page cursor instead of one process-wide counter

use crate::navigation::{Direction, PageCursor};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub cursor: PageCursor,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    max_page: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(max_page: usize, ttl: Duration) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            max_page,
            ttl,
        }
    }

    // A panic while holding the lock cannot leave a cursor out of bounds, so keep serving
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a session on page 0. Idle sessions are pruned on the way in.
    pub fn create(&self) -> (Uuid, PageCursor) {
        self.create_at(Utc::now())
    }

    pub fn create_at(&self, now: DateTime<Utc>) -> (Uuid, PageCursor) {
        let id = Uuid::new_v4();
        let cursor = PageCursor::new(self.max_page);

        let mut sessions = self.lock();
        prune_locked(&mut sessions, now, self.ttl);
        sessions.insert(
            id,
            Session {
                cursor,
                created_at: now,
                last_seen: now,
            },
        );
        debug!("Session {} created ({} active)", id, sessions.len());

        (id, cursor)
    }

    pub fn current(&self, id: &Uuid) -> Option<PageCursor> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id)?;
        session.last_seen = Utc::now();
        Some(session.cursor)
    }

    pub fn navigate(&self, id: &Uuid, direction: Direction) -> Option<PageCursor> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id)?;
        session.cursor.step(direction);
        session.last_seen = Utc::now();
        Some(session.cursor)
    }

    /// Drop sessions idle for longer than the TTL; returns how many were removed
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        prune_locked(&mut self.lock(), now, self.ttl)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn prune_locked(sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| now - s.last_seen <= ttl);
    before - sessions.len()
}
