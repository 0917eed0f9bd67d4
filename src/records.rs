//! Record model: the synthetic per-user practice-test records the benchmark
//! writes and reads back.
//!
//! Records are bincode-encoded before they reach a store; the store only ever
//! sees opaque payload bytes plus whichever properties a layout asks it to
//! index.

use bincode::{Decode, Encode};

/// `admin_year` assigned to the first record of a freshly built set.
pub const BASE_ADMIN_YEAR: i32 = 2000;

/// Name of the owner property, as known to store indexes and query filters.
pub const OWNER_FIELD: &str = "owner_id";

/// One synthetic unit of user activity.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct PracticeTest {
    /// Descriptive payload only — never filtered on.
    pub admin_year: i32,
    /// Identifier of the owning user (`kaid_{i:04}`).
    pub owner_id: String,
}

/// Container record holding all of one user's practice tests inline.
///
/// Used by the embedded layout, where a single record per user carries the
/// whole sequence as an unindexed sub-structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode)]
pub struct PracticeTestSet {
    pub tests: Vec<PracticeTest>,
}

/// Owner identifier for user index `user`.
pub fn owner_id(user: usize) -> String {
    format!("kaid_{user:04}")
}

/// Build `count` records for `owner_id`, with `admin_year = base_year + slot`.
///
/// `count == 0` is legal and yields an empty vector.
pub fn practice_tests(owner_id: &str, count: usize, base_year: i32) -> Vec<PracticeTest> {
    (0..count)
        .map(|slot| PracticeTest {
            admin_year: base_year + slot as i32,
            owner_id: owner_id.to_string(),
        })
        .collect()
}

/// Wrap a full set of records for one user into an embeddable container.
pub fn practice_test_set(owner_id: &str, count: usize) -> PracticeTestSet {
    PracticeTestSet {
        tests: practice_tests(owner_id, count, BASE_ADMIN_YEAR),
    }
}
