//! Web session records and the store contract that persists them.
//!
//! A [`Session`] is the per-request, in-memory view of one browser session's
//! key/value data. A [`SessionStore`] loads and saves whole sessions; concrete
//! network-backed stores live in `krishna-infra`.

pub mod in_memory;
pub mod session;
pub mod store;

pub use in_memory::InMemorySessionStore;
pub use session::{Session, SessionId};
pub use store::{SessionStore, SessionStoreError};
