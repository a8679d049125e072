// ABOUTME: Writes scraped records, per-section files, debug dumps, and the run report to disk.
// ABOUTME: A failed write is recorded as a global error and the remaining files are still written.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::category::Category;
use crate::error::PersistError;
use crate::report::RunReport;
use crate::scraper::ScrapedData;

/// All records across categories, in category order.
pub const COMBINED_FILE: &str = "mhnow_data_all.json";

pub const REPORT_FILE: &str = "scrape_report.json";

/// `mhnow_<section>.json`
pub fn section_file_name(category: Category) -> String {
    format!("mhnow_{}.json", category.section_name())
}

/// `debug_<section>.html`
pub fn debug_file_name(category: Category) -> String {
    format!("debug_{}.html", category.section_name())
}

/// Saves the rendered page for a category, creating `dir` if needed.
pub fn write_debug_html(dir: &Path, category: Category, html: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(debug_file_name(category));
    fs::write(&path, html)?;
    Ok(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistError> {
    // serde_json leaves non-ASCII characters unescaped.
    let mut body = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    body.push('\n');
    fs::write(path, body).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a run's output files into one directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the combined file, one file per non-empty category, then the
    /// report. Write failures are appended to the report's global errors so
    /// the report, written last, includes them.
    ///
    /// Returns the paths that were written.
    pub fn write(&self, data: &ScrapedData, report: &mut RunReport) -> Vec<PathBuf> {
        let mut written = Vec::new();

        if let Err(e) = fs::create_dir_all(&self.dir) {
            report.push_global_error(
                PersistError::Io {
                    path: self.dir.clone(),
                    source: e,
                }
                .to_string(),
            );
        }

        let mut attempt = |path: PathBuf, result: Result<(), PersistError>, report: &mut RunReport| {
            match result {
                Ok(()) => {
                    info!(path = %path.display(), "wrote output");
                    written.push(path);
                }
                Err(e) => {
                    error!(error = %e, "output write failed");
                    report.push_global_error(e.to_string());
                }
            }
        };

        let combined = self.dir.join(COMBINED_FILE);
        let result = write_json(&combined, &data.combined());
        attempt(combined, result, report);

        for (category, records) in data.iter() {
            if records.is_empty() {
                continue;
            }
            let path = self.dir.join(section_file_name(category));
            let result = write_json(&path, records);
            attempt(path, result, report);
        }

        let path = self.dir.join(REPORT_FILE);
        let result = write_json(&path, &*report);
        attempt(path, result, report);

        written
    }
}
