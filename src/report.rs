//! Report module: structured per-layout results plus the human-readable
//! line-oriented projection of them.
//!
//! The runner records what happened as [`Issue`] values; turning those into
//! text is kept separate so the same results can back an HTTP body, stdout,
//! or a test assertion.

use std::io::{self, Write};
use std::time::Duration;

/// One reportable problem encountered during a run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A store operation failed; the run continued past it.
    StoreOp {
        op: &'static str,
        kind: String,
        detail: String,
    },
    /// A read returned a different record count than expected.
    Verification {
        subject: String,
        expected: usize,
        actual: usize,
    },
}

/// Results from benchmarking one layout.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub layout_name: String,
    pub num_users: usize,
    pub read_elapsed: Duration,
    pub issues: Vec<Issue>,
}

impl LayoutResult {
    pub fn new(layout_name: &str, num_users: usize) -> Self {
        Self {
            layout_name: layout_name.to_string(),
            num_users,
            read_elapsed: Duration::ZERO,
            issues: Vec::new(),
        }
    }

    /// Average per-user read latency in milliseconds.
    pub fn avg_read_latency_ms(&self) -> f64 {
        if self.num_users == 0 {
            return 0.0;
        }
        self.read_elapsed.as_secs_f64() * 1000.0 / self.num_users as f64
    }

    pub fn store_error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, Issue::StoreOp { .. }))
            .count()
    }

    pub fn verification_failure_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, Issue::Verification { .. }))
            .count()
    }
}

/// Total store operation errors across a full run.
pub fn store_error_total(results: &[LayoutResult]) -> usize {
    results.iter().map(LayoutResult::store_error_count).sum()
}

/// Render the line-oriented report for a full run.
pub fn write_report<W: Write>(w: &mut W, results: &[LayoutResult]) -> io::Result<()> {
    for result in results {
        for issue in &result.issues {
            match issue {
                Issue::StoreOp { op, kind, detail } => {
                    writeln!(w, "Could not {op} {kind}: {detail}")?;
                }
                Issue::Verification {
                    subject,
                    expected,
                    actual,
                } => {
                    writeln!(
                        w,
                        "Error reading all records for {subject}: expected {expected}, got {actual}"
                    )?;
                }
            }
        }
        writeln!(
            w,
            "{} read time: {:.3} ms/user over {} users",
            result.layout_name,
            result.avg_read_latency_ms(),
            result.num_users
        )?;
    }

    let verification_failures: usize = results
        .iter()
        .map(LayoutResult::verification_failure_count)
        .sum();
    writeln!(
        w,
        "Benchmark complete: {} layouts, {} store errors, {} verification failures",
        results.len(),
        store_error_total(results),
        verification_failures
    )?;
    Ok(())
}
