//! Redis-backed session store (optional).
//!
//! Each session is one string key `<prefix><session id>` holding the session's
//! JSON object, written with `SETEX` so Redis expires idle sessions.
//! Connections are opened per call; there is no pooling or retry.

use redis::Commands;
use serde_json::{Map, Value as JsonValue};

use krishna_session::{Session, SessionId, SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    prefix: String,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(
        redis_url: impl AsRef<str>,
        prefix: impl Into<String>,
        ttl_secs: u64,
    ) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            prefix: prefix.into(),
            ttl_secs,
        })
    }

    fn key(&self, id: &SessionId) -> String {
        format!("{}{}", self.prefix, id)
    }

    fn connection(&self) -> Result<redis::Connection, SessionStoreError> {
        self.client
            .get_connection()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))
    }
}

impl SessionStore for RedisSessionStore {
    fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        let mut conn = self.connection()?;
        let raw: Option<String> = conn
            .get(self.key(id))
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(Session::new(id.clone()));
        };

        let data: Map<String, JsonValue> = serde_json::from_str(&raw)
            .map_err(|e| SessionStoreError::Serialize(e.to_string()))?;
        Ok(Session::from_data(id.clone(), data))
    }

    fn save(&self, session: &mut Session) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_string(session.data())
            .map_err(|e| SessionStoreError::Serialize(e.to_string()))?;

        let mut conn = self.connection()?;
        let _: () = conn
            .set_ex(self.key(session.id()), payload, self.ttl_secs)
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;

        session.mark_saved();
        tracing::debug!(session_id = %session.id(), "session saved to redis");
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.connection()?;
        let _: i64 = conn
            .del(self.key(id))
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
