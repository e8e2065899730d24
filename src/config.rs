use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::load::LoadOptions;

/// Everything a run needs. Missing YAML keys fall back to `Default`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// CSV export, or a zip holding it.
    pub csv_path: PathBuf,
    /// DuckDB file, or `:memory:`.
    pub database_path: PathBuf,
    /// Drop the database before loading.
    pub recreate: bool,
    pub max_field_bytes: usize,
    pub progress_every: usize,
    /// Leave `kaggleTable` in place after normalizing.
    pub keep_staging: bool,
}

impl Default for Config {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            csv_path: PathBuf::from("gpx-tracks-from-hikr.org.csv"),
            database_path: PathBuf::from("allTrails.duckdb"),
            recreate: false,
            max_field_bytes: load.max_field_bytes,
            progress_every: load.progress_every,
            keep_staging: false,
        }
    }
}

impl Config {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening config file {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_field_bytes: self.max_field_bytes,
            progress_every: self.progress_every,
        }
    }
}
