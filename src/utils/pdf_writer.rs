use lopdf::Document;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SplitError};

/// Persists a single page of the source document to a path
pub trait PageWriter {
    fn write_page(&mut self, index: usize, destination: &Path) -> Result<()>;
}

/// Writes each page as its own PDF by dropping every other page from a copy
/// of the source document.
pub struct LopdfPageWriter {
    document: Document,
    page_numbers: Vec<u32>,
}

impl LopdfPageWriter {
    pub fn new(document: Document) -> Self {
        let page_numbers = document.get_pages().keys().copied().collect();
        Self {
            document,
            page_numbers,
        }
    }
}

fn write_error(index: usize, destination: &Path, reason: impl ToString) -> SplitError {
    SplitError::Write {
        page: index,
        path: destination.to_path_buf(),
        reason: reason.to_string(),
    }
}

impl PageWriter for LopdfPageWriter {
    fn write_page(&mut self, index: usize, destination: &Path) -> Result<()> {
        let page_number = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| write_error(index, destination, "page index out of range"))?;

        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir).map_err(|e| write_error(index, destination, e))?;
        }

        let others: Vec<u32> = self
            .page_numbers
            .iter()
            .copied()
            .filter(|n| *n != page_number)
            .collect();

        let mut single = self.document.clone();
        single.delete_pages(&others);
        single.prune_objects();
        single
            .save(destination)
            .map_err(|e| write_error(index, destination, e))?;

        debug!("Wrote page {} to {:?}", index, destination);
        Ok(())
    }
}
