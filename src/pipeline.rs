use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{RoutingConfig, RunConfig};
use crate::error::{Result, SplitError};
use crate::naming::OutputLayout;
use crate::report::{save_debug_log, save_report, PageFailure, RunReport};
use crate::routing::{route_document, PageAssignment, RouteResult};
use crate::source::TextProvider;
use crate::utils::{open_document, LopdfPageWriter, PageWriter, PdfTextProvider};

/// Counts and artifact locations for one finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub book: String,
    pub total_pages: usize,
    pub written_pages: usize,
    pub failed_pages: usize,
    pub ocr_pages: usize,
    pub debug_log: PathBuf,
    pub report: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} pages, {} written, {} failed, {} OCR'd",
            self.book, self.total_pages, self.written_pages, self.failed_pages, self.ocr_pages
        )
    }
}

/// Split one PDF into per-page files under the configured output root.
pub fn split_document(config: &RunConfig) -> Result<RunSummary> {
    config.validate()?;

    let document = open_document(&config.document)?;
    fs::create_dir_all(&config.output_root).map_err(|e| {
        SplitError::config(format!(
            "cannot create output root {:?}: {}",
            config.output_root, e
        ))
    })?;

    let provider =
        PdfTextProvider::new(config.document.clone(), document.clone(), &config.routing);
    let mut writer = LopdfPageWriter::new(document);
    let layout = OutputLayout::new(&config.output_root, &config.root_label);

    split_with(
        provider,
        &mut writer,
        layout,
        config.routing.clone(),
        config.aggressive_ocr,
    )
}

/// Route every page, write each one, then flush the debug log and report.
///
/// A page that fails to write is logged and recorded; the run continues.
pub fn split_with<P: TextProvider, W: PageWriter>(
    provider: P,
    writer: &mut W,
    layout: OutputLayout,
    routing: RoutingConfig,
    aggressive_ocr: bool,
) -> Result<RunSummary> {
    let total_pages = provider.page_count();
    let RouteResult {
        assignments,
        mut audit,
        ocr_pages,
    } = route_document(provider, layout.clone(), routing, aggressive_ocr)?;

    let failures = write_pages(writer, &assignments);
    for failure in &failures {
        audit.push(format!(
            "Page {}: write failed: {}",
            failure.page_index, failure.reason
        ));
    }

    let debug_log = layout.debug_log_path();
    if let Err(e) = save_debug_log(&audit, &debug_log) {
        warn!("Failed to save debug log {:?}: {}", debug_log, e);
    }

    let report = RunReport::new(layout.book(), total_pages, ocr_pages, assignments, failures);
    let report_path = layout.report_path();
    if let Err(e) = save_report(&report, &report_path) {
        warn!("Failed to save report {:?}: {}", report_path, e);
    }

    let summary = RunSummary {
        book: layout.book().to_string(),
        total_pages,
        written_pages: report.written_pages(),
        failed_pages: report.failures.len(),
        ocr_pages,
        debug_log,
        report: report_path,
    };
    info!("{}", summary);

    Ok(summary)
}

fn write_pages<W: PageWriter>(writer: &mut W, assignments: &[PageAssignment]) -> Vec<PageFailure> {
    let mut failures = Vec::new();

    for assignment in assignments {
        if let Err(e) = writer.write_page(assignment.page_index, &assignment.output_path) {
            warn!("{}", e);
            failures.push(PageFailure {
                page_index: assignment.page_index,
                output_path: assignment.output_path.clone(),
                reason: e.to_string(),
            });
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::load_report;
    use crate::source::InMemoryProvider;
    use std::path::Path;
    use tempfile::TempDir;

    /// Touches the destination file; fails for one chosen page
    struct TouchWriter {
        fail_on: Option<usize>,
        written: Vec<usize>,
    }

    impl PageWriter for TouchWriter {
        fn write_page(&mut self, index: usize, destination: &Path) -> Result<()> {
            if self.fail_on == Some(index) {
                return Err(SplitError::Write {
                    page: index,
                    path: destination.to_path_buf(),
                    reason: "disk full".to_string(),
                });
            }
            if let Some(dir) = destination.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(destination, b"")?;
            self.written.push(index);
            Ok(())
        }
    }

    fn pages() -> Vec<String> {
        let mut pages: Vec<String> = (0..4).map(|i| format!("cover {}", i)).collect();
        pages.push("CONTENTS\nOne\nTwo\n5".to_string());
        pages.push("CHAPTER ONE\nIt was a dark night and the wind howled\n6".to_string());
        pages.push("The story went on and on through the night\n7".to_string());
        pages.push("And it ended quietly in the morning light\n8".to_string());
        pages
    }

    #[test]
    fn test_every_page_written_once() {
        let temp_dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp_dir.path(), "Test Book");
        let mut writer = TouchWriter {
            fail_on: None,
            written: Vec::new(),
        };

        let summary = split_with(
            InMemoryProvider::new(pages()),
            &mut writer,
            layout,
            RoutingConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(summary.total_pages, 8);
        assert_eq!(summary.written_pages, 8);
        assert_eq!(summary.failed_pages, 0);
        assert_eq!(writer.written, (0..8).collect::<Vec<_>>());
        assert!(summary.debug_log.exists());

        let report = load_report(&summary.report).unwrap();
        assert_eq!(report.assignments.len(), 8);
        for assignment in &report.assignments {
            assert!(assignment.output_path.exists());
        }
    }

    #[test]
    fn test_report_records_null_name_subtitle() {
        let temp_dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp_dir.path(), "Test Book");
        let mut writer = TouchWriter {
            fail_on: None,
            written: Vec::new(),
        };

        let summary = split_with(
            InMemoryProvider::new(pages()),
            &mut writer,
            layout,
            RoutingConfig::default(),
            false,
        )
        .unwrap();

        let report = load_report(&summary.report).unwrap();
        let title = report.assignments[5]
            .heading
            .as_ref()
            .and_then(|h| h.title())
            .unwrap();
        assert_eq!(title.text, "Chapter One");
        assert_eq!(title.subtitle.as_deref(), Some("Null Name"));

        let json = fs::read_to_string(&summary.report).unwrap();
        assert!(json.contains(r#""subtitle": "Null Name""#));

        let log = fs::read_to_string(&summary.debug_log).unwrap();
        assert!(log.contains("(Null Name)"));
    }

    #[test]
    fn test_write_failure_does_not_stop_run() {
        let temp_dir = TempDir::new().unwrap();
        let layout = OutputLayout::new(temp_dir.path(), "Test Book");
        let mut writer = TouchWriter {
            fail_on: Some(5),
            written: Vec::new(),
        };

        let summary = split_with(
            InMemoryProvider::new(pages()),
            &mut writer,
            layout,
            RoutingConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(summary.written_pages, 7);
        assert_eq!(summary.failed_pages, 1);
        assert!(writer.written.contains(&6));

        let report = load_report(&summary.report).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].page_index, 5);

        let log = fs::read_to_string(&summary.debug_log).unwrap();
        assert!(log.contains("Page 5: write failed"));
    }

    #[test]
    fn test_missing_document_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig::new(
            temp_dir.path().join("missing.pdf"),
            temp_dir.path().join("out"),
            "Book",
        );
        let err = split_document(&config).unwrap_err();
        assert!(err.is_fatal());
    }
}
