use serde::{Deserialize, Serialize};

use crate::utils::text_processor::non_empty_lines;

/// Printed page number: the last non-empty line when it is all digits,
/// otherwise the 1-based position in the document.
pub fn printed_page_number(text: &str, index: usize) -> u32 {
    non_empty_lines(text)
        .last()
        .filter(|line| line.chars().all(|c| c.is_ascii_digit()))
        .and_then(|line| line.parse::<u32>().ok())
        .unwrap_or(index as u32 + 1)
}

/// Number shown on front-matter index pages; the first page after the
/// cover is 1.
pub fn front_index_number(index: usize, cover_pages: usize) -> u32 {
    (index + 1).saturating_sub(cover_pages) as u32
}

/// Running counter for pages filed under any part.
///
/// It starts at 1 on the first part page and is never reset, even when a
/// new part begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSequence {
    pub part_page_counter: u32,
    pub part_sequence_started: bool,
}

impl PartSequence {
    pub fn advance(&mut self) -> u32 {
        if self.part_sequence_started {
            self.part_page_counter += 1;
        } else {
            self.part_sequence_started = true;
            self.part_page_counter = 1;
        }
        self.part_page_counter
    }
}
