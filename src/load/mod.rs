pub mod date_parser;
pub mod row;
pub mod source;

pub use row::{HeaderIndex, StagingRow, REQUIRED_COLUMNS};

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use duckdb::{params, Connection};
use std::{io::Read, path::Path};
use tracing::{debug, info, warn};

/// Knobs for a staging load.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Longest field accepted, in bytes; `gpx` is by far the largest.
    pub max_field_bytes: usize,
    /// Emit a progress line every N rows (0 disables it).
    pub progress_every: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_field_bytes: i32::MAX as usize,
            progress_every: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: u64,
    pub null_start_times: u64,
    pub null_end_times: u64,
}

const INSERT_STAGING: &str = "INSERT INTO kaggleTable (_id, length_3d, username, start_time, max_elevation, bounds, uphill, moving_time, end_time, max_speed, gpx, difficulty, min_elevation, url, downhill, name, length_2d)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Load the CSV (or zipped CSV) at `path` into the staging table.
#[tracing::instrument(level = "info", skip(conn, path, opts), fields(path = %path.display()))]
pub fn load_file(conn: &mut Connection, path: &Path, opts: &LoadOptions) -> Result<LoadStats> {
    source::with_csv_reader(path, |reader| load_staging(conn, reader, opts))
        .with_context(|| format!("loading {} into staging", path.display()))
}

/// Stream CSV records from `reader` into the staging table, one insert per
/// record, committing once after the last record.
///
/// The header row is consumed to locate columns. Nothing is committed if any
/// record fails to parse or insert.
pub fn load_staging(
    conn: &mut Connection,
    reader: &mut dyn Read,
    opts: &LoadOptions,
) -> Result<LoadStats> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers().context("reading CSV header")?.clone();
    let idx = HeaderIndex::from_headers(&headers)?;

    let tx = conn.transaction().context("starting staging transaction")?;
    let mut stats = LoadStats::default();
    {
        let mut stmt = tx.prepare(INSERT_STAGING).context("preparing staging insert")?;

        for (i, result) in rdr.records().enumerate() {
            // header is line 1
            let line = i + 2;
            let record = result.with_context(|| format!("CSV parse error at line {}", line))?;

            if let Some(pos) = record.iter().position(|f| f.len() > opts.max_field_bytes) {
                bail!(
                    "field {} at line {} exceeds the {} byte limit",
                    headers.get(pos).unwrap_or("?"),
                    line,
                    opts.max_field_bytes
                );
            }

            let row = StagingRow::from_record(&record, &idx)
                .with_context(|| format!("bad record at line {}", line))?;

            stmt.execute(params![
                row.id,
                row.length_3d,
                row.username,
                row.start_time,
                row.max_elevation,
                row.bounds,
                row.uphill,
                row.moving_time,
                row.end_time,
                row.max_speed,
                row.gpx,
                row.difficulty,
                row.min_elevation,
                row.url,
                row.downhill,
                row.name,
                row.length_2d,
            ])
            .with_context(|| format!("inserting record {:?} from line {}", row.id, line))?;

            stats.rows += 1;
            if row.start_time.is_none() {
                stats.null_start_times += 1;
            }
            if row.end_time.is_none() {
                stats.null_end_times += 1;
            }
            if opts.progress_every > 0 && stats.rows % opts.progress_every as u64 == 0 {
                debug!(rows = stats.rows, "staging progress");
            }
        }
    }
    tx.commit().context("committing staging load")?;

    if stats.null_start_times > 0 || stats.null_end_times > 0 {
        warn!(
            start = stats.null_start_times,
            end = stats.null_end_times,
            "timestamps stored as NULL"
        );
    }
    info!(rows = stats.rows, "staging load complete");
    Ok(stats)
}
