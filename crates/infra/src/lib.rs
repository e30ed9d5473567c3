//! Infrastructure layer: session backends, configuration, catalog fixtures.

pub mod config;
pub mod fixtures;
pub mod session_store;

pub use config::{AppConfig, ConfigError, SessionBackend};
pub use fixtures::{FixtureError, load_catalog, load_catalog_file};
pub use session_store::open_session_store;
