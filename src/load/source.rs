use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::info;
use zip::ZipArchive;

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Open `path` and hand a reader over its CSV bytes to `f`.
///
/// A `.zip` archive is streamed from its first `.csv` entry; anything else
/// is read as a plain CSV file. All handles are released when `f` returns.
pub fn with_csv_reader<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {:?}", path))?;

    if !is_zip(path) {
        let mut reader = BufReader::new(file);
        return f(&mut reader);
    }

    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read ZIP archive: {:?}", path))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to access ZIP entry #{} in {:?}", i, path))?;
        let name = entry.name().to_string();

        if entry.is_file() && name.to_lowercase().ends_with(".csv") {
            info!(entry = %name, "reading CSV from archive");
            return f(&mut entry);
        }
    }

    Err(anyhow!("no .csv entry in archive {:?}", path))
}
