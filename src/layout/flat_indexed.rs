//! Flat + indexed layout: discrete records with no parent grouping, reached
//! only through the indexed owner field.
//!
//! This is the plain secondary-index access pattern the grouped variants are
//! measured against.

use super::{BenchParams, Layout};
use crate::records::{self, BASE_ADMIN_YEAR, OWNER_FIELD};
use crate::store::{self, Filter, Key, Property, StoreClient, StoreError};

const KIND: &str = "UserPracticeTestIndexed";

pub struct FlatIndexedLayout;

impl FlatIndexedLayout {
    fn record_key(user: usize, slot: usize, records_per_user: usize) -> Key {
        Key::new(KIND, format!("TestKey{}", user * records_per_user + slot))
    }
}

impl Layout for FlatIndexedLayout {
    fn name(&self) -> &'static str {
        "flat-indexed"
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
            None,
            &[Filter::eq(OWNER_FIELD, records::owner_id(user))],
        )?;
        Ok(results.len())
    }
}
