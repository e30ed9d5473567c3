//! In-memory session store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::session::{Session, SessionId};
use crate::store::{SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
struct StoredSession {
    data: Map<String, JsonValue>,
    expires_at: DateTime<Utc>,
}

/// Process-local session store with per-session expiry.
///
/// Expired records behave exactly like absent ones and are purged lazily on
/// access (or eagerly via [`InMemorySessionStore::purge_expired`]).
#[derive(Debug)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionId, StoredSession>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    /// Two weeks, the conventional session cookie age.
    pub const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24 * 14;

    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(Self::DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live (unexpired) sessions.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        match self.inner.read() {
            Ok(map) => map.values().filter(|s| s.expires_at > now).count(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired record. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize, SessionStoreError> {
        let now = Utc::now();
        let mut map = self.inner.write().map_err(|_| SessionStoreError::Poisoned)?;
        let before = map.len();
        map.retain(|_, s| s.expires_at > now);
        Ok(before - map.len())
    }

    /// Remove `id` only if it is still expired as of `now`. A save that landed
    /// after the caller's check keeps its record.
    fn evict_if_expired(&self, id: &SessionId, now: DateTime<Utc>) -> Result<(), SessionStoreError> {
        let mut map = self.inner.write().map_err(|_| SessionStoreError::Poisoned)?;
        if map.get(id).is_some_and(|s| s.expires_at <= now) {
            map.remove(id);
        }
        Ok(())
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        let now = Utc::now();
        {
            let map = self.inner.read().map_err(|_| SessionStoreError::Poisoned)?;
            match map.get(id) {
                Some(stored) if stored.expires_at > now => {
                    return Ok(Session::from_data(id.clone(), stored.data.clone()));
                }
                Some(_) => {}
                None => return Ok(Session::new(id.clone())),
            }
        }

        tracing::debug!(session_id = %id, "session expired; starting fresh");
        self.evict_if_expired(id, now)?;
        Ok(Session::new(id.clone()))
    }

    fn save(&self, session: &mut Session) -> Result<(), SessionStoreError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionStoreError::Backend(format!("session ttl {} is out of range", self.ttl)))?;
        let mut map = self.inner.write().map_err(|_| SessionStoreError::Poisoned)?;
        map.insert(
            session.id().clone(),
            StoredSession {
                data: session.data().clone(),
                expires_at,
            },
        );
        session.mark_saved();
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut map = self.inner.write().map_err(|_| SessionStoreError::Poisoned)?;
        map.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn unknown_session_loads_empty() {
        let store = InMemorySessionStore::new();
        let id = SessionId::generate();
        let session = store.load(&id).unwrap();
        assert_eq!(session.id(), &id);
        assert!(session.is_empty());
        assert!(!session.is_modified());
    }

    #[test]
    fn save_then_load_round_trips_data() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(SessionId::generate());
        session.insert("greeting", json!("namaste"));

        assert!(store.save_if_modified(&mut session).unwrap());
        assert!(!session.is_modified());
        assert!(!store.save_if_modified(&mut session).unwrap());

        let loaded = store.load(session.id()).unwrap();
        assert_eq!(loaded.get("greeting"), Some(&json!("namaste")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn expired_sessions_are_treated_as_absent() {
        let store = InMemorySessionStore::with_ttl(Duration::seconds(-1));
        let mut session = Session::new(SessionId::generate());
        session.insert("k", json!(1));
        store.save(&mut session).unwrap();

        let loaded = store.load(session.id()).unwrap();
        assert!(loaded.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn expiry_eviction_keeps_a_record_saved_after_the_check() {
        let store = InMemorySessionStore::new();
        let checked_at = Utc::now();
        let mut session = Session::new(SessionId::generate());
        session.insert("k", json!(1));
        store.save(&mut session).unwrap();

        store.evict_if_expired(session.id(), checked_at).unwrap();
        assert_eq!(store.load(session.id()).unwrap().get("k"), Some(&json!(1)));

        let later = Utc::now() + Duration::days(15);
        store.evict_if_expired(session.id(), later).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn unrepresentable_ttl_fails_the_save() {
        let store = InMemorySessionStore::with_ttl(Duration::max_value());
        let mut session = Session::new(SessionId::generate());
        session.insert("k", json!(1));

        match store.save(&mut session) {
            Err(SessionStoreError::Backend(_)) => {}
            other => panic!("Expected Backend error, got {other:?}"),
        }
        assert!(session.is_modified());
        assert!(store.is_empty());
    }

    #[test]
    fn purge_removes_expired_records() {
        let store = InMemorySessionStore::with_ttl(Duration::seconds(-1));
        for _ in 0..3 {
            let mut session = Session::new(SessionId::generate());
            store.save(&mut session).unwrap();
        }
        assert_eq!(store.purge_expired().unwrap(), 3);
    }

    #[test]
    fn delete_and_arc_delegation() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = Session::new(SessionId::generate());
        session.insert("k", json!(true));
        store.save(&mut session).unwrap();

        store.delete(session.id()).unwrap();
        assert!(store.load(session.id()).unwrap().is_empty());
    }
}
