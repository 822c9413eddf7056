use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::routing::PageAssignment;

const REPORT_SUFFIX: &str = "_assignments.json";

/// A page that was routed but could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page_index: usize,
    pub output_path: PathBuf,
    pub reason: String,
}

/// Machine-readable record of one run: every assignment plus write failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub book: String,
    pub total_pages: usize,
    pub ocr_pages: usize,
    pub timestamp: u64,
    pub assignments: Vec<PageAssignment>,
    pub failures: Vec<PageFailure>,
}

impl RunReport {
    pub fn new(
        book: impl Into<String>,
        total_pages: usize,
        ocr_pages: usize,
        assignments: Vec<PageAssignment>,
        failures: Vec<PageFailure>,
    ) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            book: book.into(),
            total_pages,
            ocr_pages,
            timestamp,
            assignments,
            failures,
        }
    }

    pub fn written_pages(&self) -> usize {
        self.assignments.len() - self.failures.len()
    }
}

/// Write the report as pretty JSON
pub fn save_report(report: &RunReport, path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;

    info!("Assignment report saved: {:?}", path);
    Ok(path.to_path_buf())
}

pub fn load_report(path: &Path) -> Result<RunReport> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write the per-page audit lines, one per line, in page order
pub fn save_debug_log(lines: &[String], path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body)?;

    info!("Debug log saved: {:?}", path);
    Ok(path.to_path_buf())
}

/// List reports directly under an output root as (path, book, timestamp), oldest first
pub fn list_reports(output_root: &Path) -> Result<Vec<(PathBuf, String, u64)>> {
    if !output_root.exists() {
        warn!("Output root does not exist: {:?}", output_root);
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();

    for entry in WalkDir::new(output_root)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_report = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.ends_with(REPORT_SUFFIX));
        if !is_report {
            continue;
        }
        if let Ok(report) = load_report(path) {
            reports.push((path.to_path_buf(), report.book, report.timestamp));
        }
    }

    reports.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.1.cmp(&b.1)));

    Ok(reports)
}
