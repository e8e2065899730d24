use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use trailload::{duck, report};

#[derive(Parser)]
#[command(author, version, about = "Print row counts of a migrated trail database")]
struct Args {
    #[arg(default_value = "allTrails.duckdb")]
    database: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let args = Args::parse();
    if !args.database.is_file() {
        bail!("no database file at {}", args.database.display());
    }

    let conn = duck::open_read_only(&args.database)?;
    let counts = report::table_counts(&conn)?;

    println!("{}", args.database.display());
    print!("{}", report::format_counts(&counts));
    Ok(())
}
