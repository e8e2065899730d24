use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use trailload::{config::Config, pipeline};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load the hikr.org GPX track export into a normalized trail database"
)]
struct Args {
    /// YAML file with run settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV export, or a zip containing it
    #[arg(long, env = "TRAILLOAD_CSV")]
    csv: Option<PathBuf>,
    /// DuckDB database file, or :memory:
    #[arg(long, env = "TRAILLOAD_DATABASE")]
    database: Option<PathBuf>,
    /// Drop and recreate the database before loading
    #[arg(long, env = "TRAILLOAD_RECREATE")]
    recreate: bool,
    #[arg(long)]
    max_field_bytes: Option<usize>,
    #[arg(long)]
    progress_every: Option<usize>,
    /// Leave the staging table in place after normalizing
    #[arg(long)]
    keep_staging: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };
        if let Some(csv) = self.csv {
            cfg.csv_path = csv;
        }
        if let Some(db) = self.database {
            cfg.database_path = db;
        }
        if let Some(n) = self.max_field_bytes {
            cfg.max_field_bytes = n;
        }
        if let Some(n) = self.progress_every {
            cfg.progress_every = n;
        }
        cfg.recreate |= self.recreate;
        cfg.keep_staging |= self.keep_staging;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve settings ─────────────────────────────────────────
    let cfg = Args::parse().into_config()?;
    info!(?cfg, "startup");

    // ─── 3) migrate ──────────────────────────────────────────────────
    let summary = pipeline::run(&cfg)?;
    info!(
        rows = summary.load.rows,
        tables_created = summary.created_tables.len(),
        "all done"
    );
    Ok(())
}
