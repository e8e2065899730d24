use anyhow::Result;
use duckdb::Connection;
use std::time::Instant;
use tracing::info;

use crate::{
    config::Config,
    duck,
    load::{self, LoadStats},
    normalize::{self, NormalizeStep},
    report, schema,
};

/// What a run did, step by step.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub created_tables: Vec<&'static str>,
    pub load: LoadStats,
    pub normalized: Vec<(NormalizeStep, usize)>,
    pub counts: Vec<(&'static str, i64)>,
}

/// Open the configured database and run the whole migration against it.
///
/// The connection is closed on return, whether the run succeeded or not.
pub fn run(cfg: &Config) -> Result<RunSummary> {
    info!(
        database = %cfg.database_path.display(),
        recreate = cfg.recreate,
        "opening database"
    );
    let mut conn = duck::open_database(&cfg.database_path, cfg.recreate)?;
    run_with_connection(&mut conn, cfg)
}

/// create tables → load staging → normalize → drop staging.
///
/// Stops at the first failing step. Steps already finished stay committed.
#[tracing::instrument(level = "info", skip_all, fields(csv = %cfg.csv_path.display()))]
pub fn run_with_connection(conn: &mut Connection, cfg: &Config) -> Result<RunSummary> {
    let start = Instant::now();

    let created_tables = schema::create_missing_tables(conn)?;
    let load = load::load_file(conn, &cfg.csv_path, &cfg.load_options())?;
    let normalized = normalize::normalize(conn)?;

    if cfg.keep_staging {
        info!("keeping staging table");
    } else {
        normalize::drop_staging(conn)?;
    }

    let counts = report::table_counts(conn)?;
    report::log_summary(&counts);
    info!(elapsed = ?start.elapsed(), "migration finished");

    Ok(RunSummary {
        created_tables,
        load,
        normalized,
        counts,
    })
}
