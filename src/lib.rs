//! Record-Layout Read-Latency Benchmark
//!
//! Measures how long it takes to read one user's worth of repeated records
//! back out of a schemaless document store under four layout strategies:
//!
//! - **embedded** — one container record holding all of a user's records inline
//! - **grouped** — discrete records co-located in an entity group, read with
//!   ancestor-scoped queries
//! - **grouped-indexed** — entity group plus an indexed owner field
//! - **flat-indexed** — discrete records with an indexed owner field only
//!
//! Every layout writes the same synthetic dataset, then reads it back in a
//! randomized per-user order; the report carries average per-user read
//! latency alongside any store errors or record-count mismatches.
//!
//! Run against KeyDB via the HTTP trigger: `cargo run --release`
//! Run locally against in-memory SQLite: `cargo run --bin local-run --release`

pub mod layout;
pub mod logging;
pub mod records;
pub mod report;
pub mod runner;
pub mod store;
