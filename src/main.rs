//! HTTP trigger for the layout benchmark.
//!
//! `GET /` runs the full four-layout benchmark against the configured KeyDB
//! instance and returns the report as the response body; any other path is a
//! 404. The status is 500 when any store operation failed during the run;
//! verification failures alone still return 200.
//!
//! Configuration is environment-driven, read once at startup:
//! `BENCH_KEYDB_URL`, `BENCH_BIND_ADDR`, `BENCH_PORT`, `BENCH_LOG_LEVEL`,
//! `BENCH_LOG_FILE`, `BENCH_NUM_USERS`, `BENCH_RECORDS_PER_USER`,
//! `BENCH_DO_WRITE`, `BENCH_SEED`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use log::LevelFilter;
use std::env;

use layout_bench::layout::BenchParams;
use layout_bench::logging::initialize_logger;
use layout_bench::report;
use layout_bench::runner;
use layout_bench::store::keydb::KeydbStore;

fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn resolve_log_level() -> LevelFilter {
    env::var("BENCH_LOG_LEVEL")
        .ok()
        .as_deref()
        .and_then(parse_log_level)
        .unwrap_or(LevelFilter::Info)
}

fn resolve_log_file() -> Option<String> {
    match env::var("BENCH_LOG_FILE") {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

fn resolve_keydb_url() -> String {
    env::var("BENCH_KEYDB_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

fn resolve_bind_addr() -> String {
    env::var("BENCH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string())
}

fn resolve_port() -> u16 {
    env::var("BENCH_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
}

fn resolve_params() -> BenchParams {
    let defaults = BenchParams::standard();
    BenchParams {
        num_users: env_usize("BENCH_NUM_USERS", defaults.num_users),
        records_per_user: env_usize("BENCH_RECORDS_PER_USER", defaults.records_per_user),
        do_write: env::var("BENCH_DO_WRITE")
            .map(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
            .unwrap_or(defaults.do_write),
        seed: env::var("BENCH_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok()),
    }
}

#[derive(Clone)]
struct AppState {
    keydb_url: String,
    params: BenchParams,
}

async fn run_benchmark(State(state): State<AppState>) -> (StatusCode, String) {
    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<(StatusCode, String)> {
        // A connection per run keeps concurrent triggers independent.
        let mut store = KeydbStore::connect(&state.keydb_url)?;
        let results = runner::run_all(&mut store, &state.params);

        let mut body = Vec::new();
        report::write_report(&mut body, &results)?;

        let status = if report::store_error_total(&results) > 0 {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        Ok((status, String::from_utf8_lossy(&body).into_owned()))
    })
    .await;

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            log::error!("Benchmark run failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("benchmark failed: {err}\n"),
            )
        }
        Err(err) => {
            log::error!("Benchmark task panicked: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "benchmark task panicked\n".to_string(),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = resolve_log_level();
    let log_file = resolve_log_file();
    initialize_logger(log_level, log_file.as_deref())?;

    log::info!(
        "layout-bench starting (level={}, logfile={})",
        log_level,
        log_file.as_deref().unwrap_or("none")
    );

    let keydb_url = resolve_keydb_url();
    // A dead store at startup is fatal; nothing can be served without it.
    KeydbStore::connect(&keydb_url)
        .map_err(|err| anyhow::anyhow!("KeyDB at {keydb_url} unreachable: {err}"))?;
    log::info!("Connected to KeyDB at {keydb_url}");

    let params = resolve_params();
    log::info!(
        "Benchmark params: {} users × {} records, writes {}",
        params.num_users,
        params.records_per_user,
        if params.do_write { "enabled" } else { "disabled" }
    );

    let app = Router::new()
        .route("/", get(run_benchmark))
        .with_state(AppState { keydb_url, params });

    let bind_address = format!("{}:{}", resolve_bind_addr(), resolve_port());
    log::info!("Listening on {bind_address}");
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    log::info!("Server shutdown");
    Ok(())
}
