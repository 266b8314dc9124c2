//! Discovery and concurrent reading of utility CSV exports
//!
//! Exports follow the portal's
//! `{prefix}_{service_id}_{service_index}_{start}_to_{end}.csv` naming, so
//! ascending file-name order is a proxy for chronological recency; the loader
//! orders series that way for the merger. Files are read concurrently and
//! parsed after the fan-in, preserving that order.

use crate::error::{MeterstatError, Result};
use crate::ingest;
use crate::timezone::Calendar;
use crate::types::UsageRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Loader over a fixed set of export files
pub struct ExportLoader {
    paths: Vec<PathBuf>,
}

impl ExportLoader {
    /// Discover `.csv` exports under `dir`, recursively.
    ///
    /// # Errors
    ///
    /// [`MeterstatError::NoExports`] if the walk finds no CSV files.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                paths.push(path.to_path_buf());
            }
        }
        if paths.is_empty() {
            return Err(MeterstatError::NoExports(dir.to_path_buf()));
        }
        debug!("discovered {} CSV exports under {}", paths.len(), dir.display());
        Ok(Self::from_files(paths))
    }

    /// Use an explicit file list, ordered by file name so newer exports merge
    /// last.
    pub fn from_files(mut paths: Vec<PathBuf>) -> Self {
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Self { paths }
    }

    /// The files this loader will read, in merge order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Read every export concurrently, then parse in file-name order.
    ///
    /// A read failure fails the whole batch so no partial merge is committed
    /// downstream. A file without the interval header line is skipped with a
    /// warning and its siblings still contribute.
    pub async fn load(&self, calendar: &dyn Calendar) -> Result<Vec<Vec<UsageRecord>>> {
        let reads = self.paths.iter().map(tokio::fs::read_to_string);
        let texts = futures::future::join_all(reads).await;

        let mut series_list = Vec::with_capacity(self.paths.len());
        for (path, text) in self.paths.iter().zip(texts) {
            let text = text?;
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match ingest::parse_export(&text, &source, calendar) {
                Ok(series) => {
                    info!("parsed {} interval records from {source}", series.len());
                    series_list.push(series);
                }
                Err(MeterstatError::MalformedSource { file }) => {
                    warn!("skipping {file}: no interval header line found");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(series_list)
    }
}
