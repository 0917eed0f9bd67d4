//! SQLite-backed store client.
//!
//! Backs local runs, integration tests, and the criterion benches with a real
//! index-capable store so no external service is needed. Records live in a
//! single `records` table keyed by path; indexed properties live in `props`
//! with a covering lookup index, so equality filters and ancestor scopes
//! execute as indexed SQL rather than scans.

use rusqlite::{params, Connection};

use super::{Filter, Key, Property, StoreClient, StoreError};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a fresh in-memory store with the schema created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = OFF;
             PRAGMA temp_store = MEMORY;

             CREATE TABLE IF NOT EXISTS records (
                 path     TEXT PRIMARY KEY,
                 kind     TEXT NOT NULL,
                 ancestor TEXT,
                 payload  BLOB NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind);
             CREATE INDEX IF NOT EXISTS idx_records_group ON records(kind, ancestor);

             CREATE TABLE IF NOT EXISTS props (
                 path  TEXT NOT NULL,
                 kind  TEXT NOT NULL,
                 field TEXT NOT NULL,
                 value TEXT NOT NULL,
                 PRIMARY KEY (path, field)
             );
             CREATE INDEX IF NOT EXISTS idx_props_lookup ON props(kind, field, value, path);",
        )?;
        Ok(Self { conn })
    }
}

impl StoreClient for SqliteStore {
    fn put(&mut self, key: &Key, payload: &[u8], indexed: &[Property]) -> Result<(), StoreError> {
        let path = key.path();
        let ancestor = key.parent_path();

        let mut upsert = self.conn.prepare_cached(
            "INSERT INTO records (path, kind, ancestor, payload) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(path) DO UPDATE SET payload = excluded.payload",
        )?;
        upsert.execute(params![path, key.kind(), ancestor, payload])?;

        let mut clear = self
            .conn
            .prepare_cached("DELETE FROM props WHERE path = ?1")?;
        clear.execute(params![path])?;

        let mut insert = self.conn.prepare_cached(
            "INSERT INTO props (path, kind, field, value) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for property in indexed {
            insert.execute(params![path, key.kind(), property.name, property.value])?;
        }
        Ok(())
    }

    fn get(&mut self, key: &Key) -> Result<Vec<u8>, StoreError> {
        let path = key.path();
        let mut stmt = self
            .conn
            .prepare_cached("SELECT payload FROM records WHERE path = ?1")?;
        match stmt.query_row(params![path], |row| row.get::<_, Vec<u8>>(0)) {
            Ok(payload) => Ok(payload),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(path)),
            Err(err) => Err(err.into()),
        }
    }

    fn query(
        &mut self,
        kind: &str,
        ancestor: Option<&Key>,
        filters: &[Filter],
    ) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut sql = String::from("SELECT payload FROM records WHERE kind = ?1");
        let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(kind.to_string())];

        if let Some(ancestor) = ancestor {
            args.push(Box::new(ancestor.path()));
            sql.push_str(&format!(" AND ancestor = ?{}", args.len()));
        }
        for filter in filters {
            args.push(Box::new(filter.field.to_string()));
            let field_param = args.len();
            args.push(Box::new(filter.value.clone()));
            let value_param = args.len();
            sql.push_str(&format!(
                " AND path IN (SELECT path FROM props \
                 WHERE kind = ?1 AND field = ?{field_param} AND value = ?{value_param})"
            ));
        }
        sql.push_str(" ORDER BY path");

        let mut stmt = self.conn.prepare(&sql)?;
        let arg_refs: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(|arg| &**arg).collect();
        let rows = stmt.query_map(arg_refs.as_slice(), |row| row.get::<_, Vec<u8>>(0))?;

        let mut payloads = Vec::new();
        for row in rows {
            payloads.push(row?);
        }
        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_bytes(tag: u8) -> Vec<u8> {
        vec![tag, tag, tag]
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let key = Key::new("UserPracticeTestRepeated", "TestRepeatedKey0000");
        store.put(&key, &record_bytes(1), &[]).unwrap();
        assert_eq!(store.get(&key).unwrap(), record_bytes(1));
    }

    #[test]
    fn get_missing_key_is_not_found() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let key = Key::new("UserPracticeTestRepeated", "TestRepeatedKey0099");
        match store.get(&key) {
            Err(StoreError::NotFound(path)) => assert_eq!(path, key.path()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn put_overwrites_existing_payload() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let key = Key::new("UserPracticeTestRepeated", "TestRepeatedKey0001");
        store.put(&key, &record_bytes(1), &[]).unwrap();
        store.put(&key, &record_bytes(2), &[]).unwrap();
        assert_eq!(store.get(&key).unwrap(), record_bytes(2));
    }

    #[test]
    fn ancestor_query_scopes_to_one_group() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let parent_a = Key::new("UserPracticeTestParent", "ParentKey0000");
        let parent_b = Key::new("UserPracticeTestParent", "ParentKey0001");
        for slot in 0..3 {
            let key = Key::with_parent(
                "UserPracticeTestGroup",
                format!("TestKey{slot:04}"),
                parent_a.clone(),
            );
            store.put(&key, &record_bytes(slot as u8), &[]).unwrap();
        }
        let stray = Key::with_parent("UserPracticeTestGroup", "TestKey0000", parent_b.clone());
        store.put(&stray, &record_bytes(9), &[]).unwrap();

        let group_a = store
            .query("UserPracticeTestGroup", Some(&parent_a), &[])
            .unwrap();
        assert_eq!(group_a.len(), 3);
        let group_b = store
            .query("UserPracticeTestGroup", Some(&parent_b), &[])
            .unwrap();
        assert_eq!(group_b.len(), 1);
    }

    #[test]
    fn equality_filter_matches_only_indexed_values() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for (name, owner) in [("TestKey0", "kaid_0000"), ("TestKey1", "kaid_0001")] {
            let key = Key::new("UserPracticeTestIndexed", name);
            store
                .put(&key, &record_bytes(0), &[Property::new("owner_id", owner)])
                .unwrap();
        }
        // Present in the payload but unindexed: invisible to the filter.
        let unindexed = Key::new("UserPracticeTestIndexed", "TestKey2");
        store.put(&unindexed, &record_bytes(0), &[]).unwrap();

        let hits = store
            .query(
                "UserPracticeTestIndexed",
                None,
                &[Filter::eq("owner_id", "kaid_0000")],
            )
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = store
            .query(
                "UserPracticeTestIndexed",
                None,
                &[Filter::eq("owner_id", "kaid_9999")],
            )
            .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn ancestor_and_filter_compose() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let parent = Key::new("UserPracticeTestParentIndexed", "ParentKey0");
        for slot in 0..2 {
            let key = Key::with_parent(
                "UserPracticeTestIndexedGroup",
                format!("TestKey{slot}"),
                parent.clone(),
            );
            store
                .put(
                    &key,
                    &record_bytes(slot as u8),
                    &[Property::new("owner_id", "kaid_0000")],
                )
                .unwrap();
        }

        let hits = store
            .query(
                "UserPracticeTestIndexedGroup",
                Some(&parent),
                &[Filter::eq("owner_id", "kaid_0000")],
            )
            .unwrap();
        assert_eq!(hits.len(), 2);

        let wrong_owner = store
            .query(
                "UserPracticeTestIndexedGroup",
                Some(&parent),
                &[Filter::eq("owner_id", "kaid_0001")],
            )
            .unwrap();
        assert!(wrong_owner.is_empty());
    }

    #[test]
    fn kind_query_ignores_other_kinds() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .put(&Key::new("UserPracticeTestIndexed", "TestKey0"), &record_bytes(1), &[])
            .unwrap();
        store
            .put(&Key::new("UserPracticeTestRepeated", "TestRepeatedKey0000"), &record_bytes(2), &[])
            .unwrap();

        let hits = store.query("UserPracticeTestIndexed", None, &[]).unwrap();
        assert_eq!(hits.len(), 1);
    }
}
