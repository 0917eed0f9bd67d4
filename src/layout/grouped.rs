//! Grouped layout: discrete records per user, co-located in an entity group
//! under a shared parent key.
//!
//! Record names repeat across users (`TestKey{slot:04}`); the parent key is
//! what disambiguates them. Reads are ancestor-scoped queries with no
//! filter — group locality stands in for a secondary index.

use super::{BenchParams, Layout};
use crate::records::{self, BASE_ADMIN_YEAR, OWNER_FIELD};
use crate::store::{self, Key, Property, StoreClient, StoreError};

const KIND: &str = "UserPracticeTestGroup";
const PARENT_KIND: &str = "UserPracticeTestParent";

pub struct GroupedLayout;

impl GroupedLayout {
    fn parent_key(user: usize) -> Key {
        Key::new(PARENT_KIND, format!("ParentKey{user:04}"))
    }

    fn record_key(user: usize, slot: usize) -> Key {
        Key::with_parent(KIND, format!("TestKey{slot:04}"), Self::parent_key(user))
    }
}

impl Layout for GroupedLayout {
    fn name(&self) -> &'static str {
        "grouped"
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn write_user(
        &self,
        store: &mut dyn StoreClient,
        params: &BenchParams,
        user: usize,
    ) -> Vec<StoreError> {
        let owner = records::owner_id(user);
        let base_year = BASE_ADMIN_YEAR + (params.records_per_user * user) as i32;
        let tests = records::practice_tests(&owner, params.records_per_user, base_year);

        let mut failures = Vec::new();
        for (slot, test) in tests.iter().enumerate() {
            let key = Self::record_key(user, slot);
            // Owner id is indexed like in the other discrete layouts; grouped
            // reads just never filter on it.
            let outcome = store::encode_payload(test).and_then(|payload| {
                store.put(&key, &payload, &[Property::new(OWNER_FIELD, owner.clone())])
            });
            if let Err(err) = outcome {
                failures.push(err);
            }
        }
        failures
    }

    fn read_user(
        &self,
        store: &mut dyn StoreClient,
        _params: &BenchParams,
        user: usize,
    ) -> Result<usize, StoreError> {
        let results = store.query(KIND, Some(&Self::parent_key(user)), &[])?;
        Ok(results.len())
    }
}
