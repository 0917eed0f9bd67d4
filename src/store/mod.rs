//! Store client contract: keys, filters, errors, and the `StoreClient` trait.
//!
//! The store is an external collaborator reached through put, get, and query.
//! It is always injected explicitly (constructor or parameter), never held as
//! process-global state, so runs stay independent and tests can substitute
//! their own implementations.
//!
//! Two implementations are provided:
//! - [`keydb::KeydbStore`] — KeyDB/Redis, the production target
//! - [`sqlite::SqliteStore`] — in-memory SQLite for local runs, tests, benches

pub mod keydb;
pub mod sqlite;

use thiserror::Error;

/// Fully-qualified record key: a kind, a name, and an optional parent key
/// scoping the record into an entity group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: &'static str,
    name: String,
    parent: Option<Box<Key>>,
}

impl Key {
    /// A root-level key with no parent.
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: None,
        }
    }

    /// A key scoped under `parent`, forming an entity group.
    pub fn with_parent(kind: &'static str, name: impl Into<String>, parent: Key) -> Self {
        Self {
            kind,
            name: name.into(),
            parent: Some(Box::new(parent)),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Physical key path: `Kind:name` segments, ancestors first, joined
    /// with `/`. Distinct keys always render distinct paths.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}:{}", parent.path(), self.kind, self.name),
            None => format!("{}:{}", self.kind, self.name),
        }
    }

    /// Path of the parent key, if any.
    pub fn parent_path(&self) -> Option<String> {
        self.parent.as_ref().map(|parent| parent.path())
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A property the store should maintain a lookup structure for.
///
/// Payload content that is not listed here is invisible to queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub value: String,
}

impl Property {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Equality filter over an indexed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Errors surfaced by a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists at the requested key.
    #[error("no record at {0}")]
    NotFound(String),
    /// The underlying store rejected or failed the operation.
    #[error("store backend: {0}")]
    Backend(String),
    /// A payload could not be encoded or decoded.
    #[error("payload codec: {0}")]
    Codec(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for StoreError {
    fn from(err: bincode::error::EncodeError) -> Self {
        StoreError::Codec(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for StoreError {
    fn from(err: bincode::error::DecodeError) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// The put/get/query contract the benchmark consumes.
pub trait StoreClient {
    /// Upsert `payload` at `key`, maintaining lookup structures for every
    /// property in `indexed`.
    fn put(&mut self, key: &Key, payload: &[u8], indexed: &[Property]) -> Result<(), StoreError>;

    /// Fetch the payload stored at exactly `key`.
    fn get(&mut self, key: &Key) -> Result<Vec<u8>, StoreError>;

    /// Fetch all payloads of `kind`, optionally scoped to records whose
    /// parent is `ancestor`, matching every equality filter.
    fn query(
        &mut self,
        kind: &str,
        ancestor: Option<&Key>,
        filters: &[Filter],
    ) -> Result<Vec<Vec<u8>>, StoreError>;
}

/// Encode a record into the payload bytes a store accepts.
pub fn encode_payload<T: bincode::Encode>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
}

/// Decode payload bytes fetched from a store back into a record.
pub fn decode_payload<T: bincode::Decode<()>>(bytes: &[u8]) -> Result<T, StoreError> {
    let (value, _consumed) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_key_path_is_kind_and_name() {
        let key = Key::new("UserPracticeTestIndexed", "TestKey12");
        assert_eq!(key.path(), "UserPracticeTestIndexed:TestKey12");
        assert_eq!(key.parent_path(), None);
    }

    #[test]
    fn child_key_path_includes_ancestors() {
        let parent = Key::new("UserPracticeTestParent", "ParentKey0002");
        let key = Key::with_parent("UserPracticeTestGroup", "TestKey0005", parent);
        assert_eq!(
            key.path(),
            "UserPracticeTestParent:ParentKey0002/UserPracticeTestGroup:TestKey0005"
        );
        assert_eq!(
            key.parent_path().as_deref(),
            Some("UserPracticeTestParent:ParentKey0002")
        );
    }

    #[test]
    fn same_name_under_different_parents_renders_distinct_paths() {
        let a = Key::with_parent(
            "UserPracticeTestGroup",
            "TestKey0000",
            Key::new("UserPracticeTestParent", "ParentKey0000"),
        );
        let b = Key::with_parent(
            "UserPracticeTestGroup",
            "TestKey0000",
            Key::new("UserPracticeTestParent", "ParentKey0001"),
        );
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn payload_round_trips_through_codec() {
        let record = crate::records::PracticeTest {
            admin_year: 2007,
            owner_id: "kaid_0007".to_string(),
        };
        let bytes = encode_payload(&record).unwrap();
        let back: crate::records::PracticeTest = decode_payload(&bytes).unwrap();
        assert_eq!(back, record);
    }
}
