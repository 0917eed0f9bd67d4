//! KeyDB-backed store client.
//!
//! Payloads are opaque bytes stored per record; membership and index sets let
//! queries resolve without scanning. Key schema, all under the `bench:`
//! namespace:
//!
//! - `bench:rec:{path}`                 — payload bytes for one record
//! - `bench:kind:{kind}`                — set of record paths of a kind
//! - `bench:grp:{kind}:{ancestor_path}` — set of paths in one entity group
//! - `bench:idx:{kind}:{field}:{value}` — set of paths carrying an indexed value
//!
//! Records in this benchmark are write-once, so index sets are only ever
//! added to; a re-put with different indexed values would leave stale
//! members behind.

use redis::{pipe, Commands, Connection};

use super::{Filter, Key, Property, StoreClient, StoreError};

/// Number of record fetches batched into a single pipeline round-trip.
const PIPELINE_BATCH_SIZE: usize = 1024;

pub struct KeydbStore {
    con: Connection,
}

impl KeydbStore {
    /// Connect to the KeyDB instance at `url`.
    pub fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let con = client.get_connection()?;
        Ok(Self { con })
    }

    fn record_key(path: &str) -> String {
        format!("bench:rec:{path}")
    }

    fn kind_key(kind: &str) -> String {
        format!("bench:kind:{kind}")
    }

    fn group_key(kind: &str, ancestor: &str) -> String {
        format!("bench:grp:{kind}:{ancestor}")
    }

    fn index_key(kind: &str, field: &str, value: &str) -> String {
        format!("bench:idx:{kind}:{field}:{value}")
    }

    /// Fetch the payloads behind a resolved set of record paths, in batched
    /// pipelines.
    fn fetch_paths(&mut self, mut paths: Vec<String>) -> Result<Vec<Vec<u8>>, StoreError> {
        // Deterministic result order regardless of set iteration order.
        paths.sort();

        let mut payloads = Vec::with_capacity(paths.len());
        for batch in paths.chunks(PIPELINE_BATCH_SIZE) {
            let mut pipeline = pipe();
            for path in batch {
                pipeline.cmd("GET").arg(Self::record_key(path));
            }
            let batch_bytes: Vec<Option<Vec<u8>>> = pipeline.query(&mut self.con)?;
            for (path, bytes) in batch.iter().zip(batch_bytes) {
                match bytes {
                    Some(payload) => payloads.push(payload),
                    None => {
                        return Err(StoreError::Backend(format!(
                            "index entry without record at {path}"
                        )))
                    }
                }
            }
        }
        Ok(payloads)
    }
}

impl StoreClient for KeydbStore {
    fn put(&mut self, key: &Key, payload: &[u8], indexed: &[Property]) -> Result<(), StoreError> {
        let path = key.path();

        let mut pipeline = pipe();
        pipeline.cmd("SET").arg(Self::record_key(&path)).arg(payload);
        pipeline
            .cmd("SADD")
            .arg(Self::kind_key(key.kind()))
            .arg(&path);
        if let Some(ancestor) = key.parent_path() {
            pipeline
                .cmd("SADD")
                .arg(Self::group_key(key.kind(), &ancestor))
                .arg(&path);
        }
        for property in indexed {
            pipeline
                .cmd("SADD")
                .arg(Self::index_key(key.kind(), property.name, &property.value))
                .arg(&path);
        }
        pipeline.query::<()>(&mut self.con)?;
        Ok(())
    }

    fn get(&mut self, key: &Key) -> Result<Vec<u8>, StoreError> {
        let path = key.path();
        let bytes: Option<Vec<u8>> = self.con.get(Self::record_key(&path))?;
        bytes.ok_or(StoreError::NotFound(path))
    }

    fn query(
        &mut self,
        kind: &str,
        ancestor: Option<&Key>,
        filters: &[Filter],
    ) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut sets: Vec<String> = Vec::new();
        if let Some(ancestor) = ancestor {
            sets.push(Self::group_key(kind, &ancestor.path()));
        }
        for filter in filters {
            sets.push(Self::index_key(kind, filter.field, &filter.value));
        }
        if sets.is_empty() {
            sets.push(Self::kind_key(kind));
        }

        let paths: Vec<String> = if sets.len() == 1 {
            self.con.smembers(&sets[0])?
        } else {
            self.con.sinter(&sets)?
        };
        self.fetch_paths(paths)
    }
}
