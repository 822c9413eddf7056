use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::RoutingConfig;
use crate::error::{Result, SplitError};
use crate::source::{PageText, TextProvider, TextSource};
use crate::utils::ocr;

/// Open a PDF for splitting; any failure here fails the whole run
pub fn open_document(path: &Path) -> Result<Document> {
    info!("Opening PDF: {:?}", path);

    let document = Document::load(path)
        .map_err(|e| SplitError::config(format!("failed to open PDF {:?}: {}", path, e)))?;

    if document.is_encrypted() {
        return Err(SplitError::config(format!(
            "PDF {:?} is encrypted and cannot be split",
            path
        )));
    }

    let pages = document.get_pages().len();
    if pages == 0 {
        return Err(SplitError::config(format!("PDF {:?} has no pages", path)));
    }
    info!("PDF has {} pages", pages);

    Ok(document)
}

/// Check if a PDF is likely scanned (no extractable text anywhere)
pub fn is_scanned_pdf(path: &Path) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read {:?} for scan probe: {}", path, e);
            return false;
        }
    };

    // pdf-extract can panic on some fonts
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&bytes)
    })) {
        Ok(Ok(text)) => {
            let scanned = text.trim().is_empty();
            if scanned {
                warn!("PDF appears to be scanned or has no extractable text: {:?}", path);
            }
            scanned
        }
        Ok(Err(e)) => {
            warn!("Scan probe failed for {:?}: {}", path, e);
            false
        }
        Err(_) => {
            warn!("Scan probe panicked for {:?}", path);
            false
        }
    }
}

/// Page text from a PDF, with OCR for pages that carry too little native text.
///
/// Without `aggressive_ocr`, OCR only runs on empty pages of a document that
/// has no native text at all. With it, any page whose native text is shorter
/// than `ocr_min_native_chars` is OCR'd.
pub struct PdfTextProvider {
    path: PathBuf,
    document: Document,
    page_numbers: Vec<u32>,
    min_native_chars: usize,
    scanned: bool,
    ocr_available: bool,
}

impl PdfTextProvider {
    pub fn new(path: PathBuf, document: Document, config: &RoutingConfig) -> Self {
        let page_numbers = document.get_pages().keys().copied().collect();
        let scanned = is_scanned_pdf(&path);
        let ocr_available = ocr::tools_available();
        if !ocr_available {
            warn!("OCR tools not found; pages without native text will be empty");
        }

        Self {
            path,
            document,
            page_numbers,
            min_native_chars: config.ocr_min_native_chars,
            scanned,
            ocr_available,
        }
    }

    pub fn open(path: &Path, config: &RoutingConfig) -> Result<Self> {
        let document = open_document(path)?;
        Ok(Self::new(path.to_path_buf(), document, config))
    }

    fn native_text(&self, index: usize, page_number: u32) -> String {
        match self.document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                let err = SplitError::Extraction {
                    page: index,
                    reason: e.to_string(),
                };
                warn!("{}; treating as empty", err);
                String::new()
            }
        }
    }

    fn wants_ocr(&self, native: &str, aggressive_ocr: bool) -> bool {
        if !self.ocr_available {
            return false;
        }
        let chars = native.trim().chars().count();
        if aggressive_ocr {
            chars < self.min_native_chars
        } else {
            self.scanned && chars == 0
        }
    }
}

impl TextProvider for PdfTextProvider {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn text_for_page(&mut self, index: usize, aggressive_ocr: bool) -> PageText {
        let Some(&page_number) = self.page_numbers.get(index) else {
            return PageText::empty(index);
        };

        let native = self.native_text(index, page_number);
        if !self.wants_ocr(&native, aggressive_ocr) {
            return PageText::native(index, native);
        }

        match ocr::ocr_pdf_page(&self.path, page_number) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("OCR produced {} chars for page {}", text.len(), index);
                PageText {
                    index,
                    text,
                    source: TextSource::Ocr,
                }
            }
            Ok(_) => PageText::native(index, native),
            Err(e) => {
                warn!("OCR failed for page {}: {:#}", index, e);
                PageText::native(index, native)
            }
        }
    }
}
