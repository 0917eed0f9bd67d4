//! Embedded layout: one container record per user holding the whole record
//! sequence inline.
//!
//! Writes are a single put of a [`PracticeTestSet`]; reads are a single get
//! by key. The owner id sits inside the payload but is deliberately left
//! unindexed — key locality does all the work here.

use super::{BenchParams, Layout};
use crate::records::{self, PracticeTestSet};
use crate::store::{self, Key, StoreClient, StoreError};

const KIND: &str = "UserPracticeTestRepeated";

pub struct EmbeddedLayout;

impl EmbeddedLayout {
    fn key(user: usize) -> Key {
        Key::new(KIND, format!("TestRepeatedKey{user:04}"))
    }
}

impl Layout for EmbeddedLayout {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn read_op(&self) -> &'static str {
        "get"
    }

    fn write_user(
        &self,
        store: &mut dyn StoreClient,
        params: &BenchParams,
        user: usize,
    ) -> Vec<StoreError> {
        let set = records::practice_test_set(&records::owner_id(user), params.records_per_user);
        let outcome = store::encode_payload(&set)
            .and_then(|payload| store.put(&Self::key(user), &payload, &[]));
        match outcome {
            Ok(()) => Vec::new(),
            Err(err) => vec![err],
        }
    }

    fn read_user(
        &self,
        store: &mut dyn StoreClient,
        _params: &BenchParams,
        user: usize,
    ) -> Result<usize, StoreError> {
        let payload = store.get(&Self::key(user))?;
        let set: PracticeTestSet = store::decode_payload(&payload)?;
        Ok(set.tests.len())
    }
}
