use std::sync::Arc;

use thiserror::Error;

use crate::session::{Session, SessionId};

#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The backing service failed (connection, command error, ...).
    #[error("session backend error: {0}")]
    Backend(String),

    /// Session data could not be encoded or decoded.
    #[error("session serialization error: {0}")]
    Serialize(String),

    /// Internal lock poisoning (in-process stores).
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Persistence for whole sessions.
///
/// Stores are assumed reliable: errors are surfaced to the caller and never
/// retried here. Concurrent requests for the same session race on
/// load/modify/save with last write wins.
pub trait SessionStore: Send + Sync {
    /// Load a session. An unknown or expired id yields a fresh empty session
    /// with that id.
    fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError>;

    /// Persist the session's current data and clear its `modified` flag.
    fn save(&self, session: &mut Session) -> Result<(), SessionStoreError>;

    /// Drop the session entirely.
    fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Save only when something changed. Returns whether a write happened.
    fn save_if_modified(&self, session: &mut Session) -> Result<bool, SessionStoreError> {
        if !session.is_modified() {
            return Ok(false);
        }
        self.save(session)?;
        Ok(true)
    }
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn load(&self, id: &SessionId) -> Result<Session, SessionStoreError> {
        (**self).load(id)
    }

    fn save(&self, session: &mut Session) -> Result<(), SessionStoreError> {
        (**self).save(session)
    }

    fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        (**self).delete(id)
    }
}
