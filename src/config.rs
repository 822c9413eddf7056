use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SplitError};
use crate::naming::sanitize;

/// Tunable thresholds for heading detection and routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    // Layout
    pub cover_pages: usize,

    // Heading detection
    pub heading_window: usize,
    pub part_span_lines: usize,
    pub chapter_span_lines: usize,
    pub chapter_span_max_chars: usize,
    pub short_line_words: usize,
    pub special_parents: Vec<String>,

    // Merging and capture
    pub near_blank_max_chars: usize,
    pub near_blank_max_digits: usize,
    pub wide_merge_max_chars: usize,
    pub implicit_chapter_min_words: usize,
    pub capture_following_pages: usize,

    // Context
    pub parent_lock_pages: u32,
    pub lookahead_pages: usize,

    // Text extraction
    pub ocr_min_native_chars: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cover_pages: 4,
            heading_window: 6,
            part_span_lines: 4,
            chapter_span_lines: 4,
            chapter_span_max_chars: 40,
            short_line_words: 6,
            special_parents: vec![
                "HONEYMOON".to_string(),
                "AN INTERVIEW WITH THE WOMEN'S MURDER CLUB".to_string(),
            ],
            near_blank_max_chars: 5,
            near_blank_max_digits: 3,
            wide_merge_max_chars: 20,
            implicit_chapter_min_words: 50,
            capture_following_pages: 3,
            parent_lock_pages: 2,
            lookahead_pages: 2,
            ocr_min_native_chars: 20,
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cover_pages == 0 {
            return Err(SplitError::config("cover_pages must be > 0"));
        }
        if self.heading_window == 0 {
            return Err(SplitError::config("heading_window must be > 0"));
        }
        if self.part_span_lines == 0 || self.chapter_span_lines == 0 {
            return Err(SplitError::config("heading span lengths must be > 0"));
        }
        if self.chapter_span_max_chars < "CHAPTER I".len() {
            return Err(SplitError::config(
                "chapter_span_max_chars is too small to hold any chapter heading",
            ));
        }
        if self.wide_merge_max_chars < self.near_blank_max_chars {
            return Err(SplitError::config(
                "wide_merge_max_chars must be >= near_blank_max_chars",
            ));
        }
        if self
            .special_parents
            .iter()
            .any(|phrase| phrase.trim().is_empty())
        {
            return Err(SplitError::config("special_parents must not contain blank phrases"));
        }
        Ok(())
    }

    /// Load thresholds from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            SplitError::config(format!("failed to read routing config {:?}: {}", path, e))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            SplitError::config(format!("failed to parse routing config {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Display for RoutingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Everything a single document run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub document: PathBuf,
    pub output_root: PathBuf,
    pub root_label: String,
    #[serde(default)]
    pub aggressive_ocr: bool,
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl RunConfig {
    pub fn new(document: PathBuf, output_root: PathBuf, root_label: impl Into<String>) -> Self {
        Self {
            document,
            output_root,
            root_label: root_label.into(),
            aggressive_ocr: false,
            routing: RoutingConfig::default(),
        }
    }

    /// Checks that can fail before any page is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.document.is_file() {
            return Err(SplitError::config(format!(
                "document {:?} does not exist or is not a file",
                self.document
            )));
        }
        let is_pdf = self
            .document
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(SplitError::config(format!(
                "document {:?} is not a PDF",
                self.document
            )));
        }
        if self.output_root.exists() && !self.output_root.is_dir() {
            return Err(SplitError::config(format!(
                "output root {:?} exists and is not a directory",
                self.output_root
            )));
        }
        if sanitize(&self.root_label).is_empty() {
            return Err(SplitError::config(format!(
                "root label {:?} is empty after sanitizing",
                self.root_label
            )));
        }
        self.routing.validate()
    }
}
