use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Opaque session key (the value carried by the session cookie).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random key (UUIDv7, simple form).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Wrap an existing key. Returns `None` for an empty key.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One session's data, as seen by a single request.
///
/// Mutations through [`Session::insert`] / [`Session::remove`] set the
/// `modified` flag; stores use it to decide whether a save is needed. Code that
/// mutates a value in place (via [`Session::get_mut`]) must call
/// [`Session::mark_modified`] itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    data: Map<String, JsonValue>,
    modified: bool,
}

impl Session {
    /// New empty session. Not marked modified until something is stored.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            data: Map::new(),
            modified: false,
        }
    }

    /// Rehydrate a session from stored data.
    pub fn from_data(id: SessionId, data: Map<String, JsonValue>) -> Self {
        Self {
            id,
            data,
            modified: false,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn data(&self) -> &Map<String, JsonValue> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.data.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.modified = true;
        self.data.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Called by stores once the current data has been persisted.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}
