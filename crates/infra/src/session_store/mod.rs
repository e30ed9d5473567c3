//! Session store implementations backed by external services.
//!
//! The store contract and the in-process store live in `krishna-session`.
//! This module adds network-backed stores and the config-driven factory.

use std::sync::Arc;

use chrono::Duration;

use krishna_session::{InMemorySessionStore, SessionStore, SessionStoreError};

use crate::config::{AppConfig, SessionBackend};

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use self::redis::RedisSessionStore;

/// Build the session store selected by configuration.
pub fn open_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, SessionStoreError> {
    match &config.session_backend {
        SessionBackend::Memory => {
            tracing::info!(ttl_secs = config.session_ttl_secs, "using in-memory session store");
            let ttl = i64::try_from(config.session_ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or_else(|| {
                    SessionStoreError::Backend(format!("session ttl {}s is out of range", config.session_ttl_secs))
                })?;
            Ok(Arc::new(InMemorySessionStore::with_ttl(ttl)))
        }
        #[cfg(feature = "redis")]
        SessionBackend::Redis { url } => {
            tracing::info!(prefix = %config.session_key_prefix, "using redis session store");
            let store = RedisSessionStore::new(url, config.session_key_prefix.clone(), config.session_ttl_secs)?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        SessionBackend::Redis { .. } => Err(SessionStoreError::Backend(
            "redis session backend requested but the `redis` feature is disabled".to_string(),
        )),
    }
}
