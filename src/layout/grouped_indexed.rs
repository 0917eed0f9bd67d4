//! Grouped + indexed layout: entity-group records that are additionally
//! filtered by the indexed owner field at read time.
//!
//! The ancestor scope and the equality filter both narrow to the same set of
//! records; the point of the variant is measuring what the redundant filter
//! costs on top of group locality.

use super::{BenchParams, Layout};
use crate::records::{self, BASE_ADMIN_YEAR, OWNER_FIELD};
use crate::store::{self, Filter, Key, Property, StoreClient, StoreError};

const KIND: &str = "UserPracticeTestIndexedGroup";
const PARENT_KIND: &str = "UserPracticeTestParentIndexed";

pub struct GroupedIndexedLayout;

impl GroupedIndexedLayout {
    fn parent_key(user: usize) -> Key {
        Key::new(PARENT_KIND, format!("ParentKey{user}"))
    }

    fn record_key(user: usize, slot: usize, records_per_user: usize) -> Key {
        let name = format!("TestKey{}", user * records_per_user + slot);
        Key::with_parent(KIND, name, Self::parent_key(user))
    }
}

impl Layout for GroupedIndexedLayout {
    fn name(&self) -> &'static str {
        "grouped-indexed"
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
            let key = Self::record_key(user, slot, params.records_per_user);
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
        let results = store.query(
            KIND,
            Some(&Self::parent_key(user)),
            &[Filter::eq(OWNER_FIELD, records::owner_id(user))],
        )?;
        Ok(results.len())
    }
}
