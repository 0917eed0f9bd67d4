//! One-shot benchmark runner against an in-memory SQLite store.
//!
//! Exercises the full harness without a running KeyDB instance:
//!
//!   cargo run --bin local-run --release

use layout_bench::layout::BenchParams;
use layout_bench::logging::initialize_logger;
use layout_bench::report;
use layout_bench::runner;
use layout_bench::store::sqlite::SqliteStore;

fn main() -> anyhow::Result<()> {
    initialize_logger(log::LevelFilter::Warn, None)?;

    let params = BenchParams::standard();
    println!("Running record-layout read benchmark (in-memory SQLite)...");
    println!("  Users:            {}", params.num_users);
    println!("  Records per user: {}", params.records_per_user);
    println!();

    let mut store = SqliteStore::open_in_memory()?;
    let results = runner::run_all(&mut store, &params);

    let mut stdout = std::io::stdout();
    report::write_report(&mut stdout, &results)?;
    Ok(())
}
