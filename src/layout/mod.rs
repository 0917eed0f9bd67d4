//! Layout strategies and the common `Layout` trait.
//!
//! Four implementations are provided, one per record-layout scheme:
//! - [`embedded::EmbeddedLayout`] — one container record per user
//! - [`grouped::GroupedLayout`] — entity group, ancestor queries
//! - [`grouped_indexed::GroupedIndexedLayout`] — entity group + indexed owner
//! - [`flat_indexed::FlatIndexedLayout`] — indexed owner only

pub mod embedded;
pub mod flat_indexed;
pub mod grouped;
pub mod grouped_indexed;

use crate::store::{StoreClient, StoreError};

/// Benchmark parameters describing the dataset size and run behavior.
#[derive(Debug, Clone, Copy)]
pub struct BenchParams {
    /// Number of distinct users written and read back.
    pub num_users: usize,
    /// Records written per user.
    pub records_per_user: usize,
    /// When false, the write phase is skipped and reads hit existing data.
    pub do_write: bool,
    /// Read-order shuffle seed; `None` seeds from wall-clock time.
    pub seed: Option<u64>,
}

impl BenchParams {
    /// Standard benchmark population: 10 users × 10 records, writes enabled.
    pub fn standard() -> Self {
        Self {
            num_users: 10,
            records_per_user: 10,
            do_write: true,
            seed: None,
        }
    }
}

/// Trait implemented by each layout variant.
///
/// A layout owns the addressing scheme for one way of storing a user's
/// repeated records, and the matching access pattern for fetching them back.
pub trait Layout {
    /// Short identifier for reports and bench IDs.
    fn name(&self) -> &'static str;

    /// Storage kind this layout writes under.
    fn kind(&self) -> &'static str;

    /// Store operation used on the read path, for error reporting.
    fn read_op(&self) -> &'static str {
        "query"
    }

    /// Persist user `user`'s records under this layout's addressing scheme.
    ///
    /// Failed puts are collected and returned rather than propagated; the
    /// remaining puts still run, so one failure costs one record, not the
    /// whole user.
    fn write_user(
        &self,
        store: &mut dyn StoreClient,
        params: &BenchParams,
        user: usize,
    ) -> Vec<StoreError>;

    /// Fetch user `user`'s records back and return how many were retrieved.
    fn read_user(
        &self,
        store: &mut dyn StoreClient,
        params: &BenchParams,
        user: usize,
    ) -> Result<usize, StoreError>;
}

/// All four layouts, in the fixed order the runner benchmarks them.
pub fn all_layouts() -> Vec<Box<dyn Layout>> {
    vec![
        Box::new(embedded::EmbeddedLayout),
        Box::new(grouped::GroupedLayout),
        Box::new(grouped_indexed::GroupedIndexedLayout),
        Box::new(flat_indexed::FlatIndexedLayout),
    ]
}
