//! Configuration loading and representation.
//!
//! Values come from the process environment, with a `.env` file (if present)
//! loaded first. Every setting except the Redis URL has a default.

use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_CART_SESSION_ID: &str = "cart";
const DEFAULT_SESSION_KEY_PREFIX: &str = "session:";
/// Two weeks.
const DEFAULT_SESSION_TTL_SECS: u64 = 1_209_600;
/// Ten years; keeps the TTL representable by every backend.
const MAX_SESSION_TTL_SECS: u64 = 315_360_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("invalid value for '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which session store to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis { url: String },
}

impl SessionBackend {
    pub fn name(&self) -> &'static str {
        match self {
            SessionBackend::Memory => "memory",
            SessionBackend::Redis { .. } => "redis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Session key the cart mapping is stored under (`CART_SESSION_ID`).
    pub cart_session_key: String,
    pub session_backend: SessionBackend,
    pub session_key_prefix: String,
    pub session_ttl_secs: u64,
    /// JSON catalog fixture (`CATALOG_PATH`).
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real deployments set variables directly.
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        let config = Self::from_lookup(|name| std::env::var(name).ok())?;
        tracing::info!(
            cart_session_key = %config.cart_session_key,
            backend = config.session_backend.name(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let cart_session_key = get("CART_SESSION_ID").unwrap_or_else(|| DEFAULT_CART_SESSION_ID.to_string());

        let backend = get("SESSION_BACKEND").map(|v| v.trim().to_ascii_lowercase());
        let session_backend = match backend.as_deref() {
            None | Some("memory") => SessionBackend::Memory,
            Some("redis") => SessionBackend::Redis {
                url: get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "SESSION_BACKEND",
                    reason: format!("expected 'memory' or 'redis', got '{other}'"),
                });
            }
        };

        let session_key_prefix =
            get("SESSION_KEY_PREFIX").unwrap_or_else(|| DEFAULT_SESSION_KEY_PREFIX.to_string());

        let session_ttl_secs = match get("SESSION_TTL_SECS") {
            None => DEFAULT_SESSION_TTL_SECS,
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "SESSION_TTL_SECS",
                    reason: e.to_string(),
                })?;
                if secs == 0 || secs > MAX_SESSION_TTL_SECS {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_SECS",
                        reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS}"),
                    });
                }
                secs
            }
        };

        let catalog_path = get("CATALOG_PATH").map(PathBuf::from);

        Ok(Self {
            cart_session_key,
            session_backend,
            session_key_prefix,
            session_ttl_secs,
            catalog_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> = pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.cart_session_key, "cart");
        assert_eq!(config.session_backend, SessionBackend::Memory);
        assert_eq!(config.session_key_prefix, "session:");
        assert_eq!(config.session_ttl_secs, 1_209_600);
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn redis_backend_requires_url() {
        let err = AppConfig::from_lookup(lookup(&[("SESSION_BACKEND", "redis")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("REDIS_URL"));

        let config = AppConfig::from_lookup(lookup(&[
            ("SESSION_BACKEND", "Redis"),
            ("REDIS_URL", "redis://localhost:6379"),
        ]))
        .unwrap();
        assert_eq!(
            config.session_backend,
            SessionBackend::Redis { url: "redis://localhost:6379".to_string() }
        );
    }

    #[test]
    fn rejects_unknown_backend_and_bad_ttl() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("SESSION_BACKEND", "files")])),
            Err(ConfigError::Invalid { name: "SESSION_BACKEND", .. })
        ));
        for bad in ["0", "-5", "soon", "999999999999"] {
            assert!(matches!(
                AppConfig::from_lookup(lookup(&[("SESSION_TTL_SECS", bad)])),
                Err(ConfigError::Invalid { name: "SESSION_TTL_SECS", .. })
            ));
        }
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CART_SESSION_ID", "basket"),
            ("SESSION_TTL_SECS", "3600"),
            ("CATALOG_PATH", "fixtures/catalog.json"),
        ]))
        .unwrap();
        assert_eq!(config.cart_session_key, "basket");
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.catalog_path, Some(PathBuf::from("fixtures/catalog.json")));
    }
}
