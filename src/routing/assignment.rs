use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::context::{SectionContext, SectionKind};
use crate::heading::HeadingMatch;

/// Where one page goes, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAssignment {
    pub page_index: usize,
    pub output_path: PathBuf,
    pub file_name: String,
    pub heading: Option<HeadingMatch>,
    pub section: SectionKind,
    pub section_label: String,
    /// Running part-sequence number, when the page is filed under a part
    pub part_number: Option<u32>,
    pub context: SectionContext,
}

/// Page indices that already have an assignment.
///
/// A page is claimed exactly once, whether by the main loop or by a
/// multi-page merge or capture.
#[derive(Debug, Clone, Default)]
pub struct ConsumedPages {
    pages: BTreeSet<usize>,
}

impl ConsumedPages {
    /// Returns false when the page was already claimed
    pub fn claim(&mut self, index: usize) -> bool {
        self.pages.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.pages.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
