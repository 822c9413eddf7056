use serde::{Deserialize, Serialize};
use std::fmt;

use crate::heading::{HeadingMatch, Title, NULL_NAME};
use crate::naming::{CoverSlot, PartSequence};

/// Section state carried across the whole page sequence of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContext {
    pub parent: Option<String>,
    pub part: Option<String>,
    pub chapter: Option<String>,
    pub special: Option<String>,
    pub chapter_is_special: bool,
    pub seen_first_content: bool,
    pub parent_lock_remaining: u32,
    #[serde(flatten)]
    pub part_sequence: PartSequence,
    pub last_part_under_parent: Option<String>,
}

impl SectionContext {
    pub fn enter_special_parent(&mut self, title: &Title, lock_pages: u32) {
        if self.parent.as_deref() != Some(title.text.as_str()) {
            self.last_part_under_parent = None;
        }
        self.parent = Some(title.text.clone());
        self.part = None;
        self.clear_chapter();
        self.parent_lock_remaining = lock_pages;
        self.seen_first_content = true;
    }

    pub fn enter_part(&mut self, title: &Title) {
        self.part = Some(title.text.clone());
        self.clear_chapter();
        if self.parent.is_some() {
            self.last_part_under_parent = Some(title.text.clone());
        }
        self.seen_first_content = true;
    }

    pub fn enter_chapter(&mut self, title: &Title) {
        self.chapter = Some(title.text.clone());
        self.special = None;
        self.chapter_is_special = false;
        self.seen_first_content = true;
    }

    pub fn enter_special(&mut self, title: &Title) {
        self.chapter = Some(title.text.clone());
        self.special = Some(title.text.clone());
        self.chapter_is_special = true;
        self.seen_first_content = true;
    }

    /// Apply a structural heading; `None` leaves the context unchanged.
    pub fn apply(&mut self, heading: &HeadingMatch, lock_pages: u32) {
        match heading {
            HeadingMatch::None => {}
            HeadingMatch::SpecialParent(t) => self.enter_special_parent(t, lock_pages),
            HeadingMatch::Part(t) => self.enter_part(t),
            HeadingMatch::Chapter(t) => self.enter_chapter(t),
            HeadingMatch::Prologue(t) | HeadingMatch::Epilogue(t) => self.enter_special(t),
        }
    }

    fn clear_chapter(&mut self) {
        self.chapter = None;
        self.special = None;
        self.chapter_is_special = false;
    }

    /// Inside a prologue/epilogue whose pages have not yet been split into
    /// an unnamed chapter.
    pub fn in_open_special(&self) -> bool {
        self.chapter_is_special && self.special.is_some() && self.chapter == self.special
    }

    /// Turn the open prologue/epilogue into its `<Special> Chapter Null Name`
    /// sub-section and return the new chapter label.
    pub fn promote_special(&mut self) -> Option<String> {
        if !self.in_open_special() {
            return None;
        }
        let special = self.special.as_deref()?;
        let label = format!("{} Chapter {}", special, NULL_NAME);
        self.chapter = Some(label.clone());
        Some(label)
    }

    /// The parent is set but nothing has been opened beneath it yet.
    pub fn awaiting_child(&self) -> bool {
        self.parent.is_some() && self.part.is_none() && self.chapter.is_none()
    }

    /// The bucket a page lands in given the current context, most specific
    /// first: parent, part (or the last part seen under the parent), chapter.
    pub fn bucket(&self) -> Bucket {
        if !self.seen_first_content {
            return Bucket::front_index();
        }

        let mut segments = Vec::new();
        let mut in_part = false;

        if let Some(parent) = &self.parent {
            segments.push(parent.clone());
        }

        match (&self.part, &self.chapter) {
            (Some(part), _) => {
                segments.push(part.clone());
                in_part = true;
            }
            (None, Some(_)) if self.parent.is_some() && !self.chapter_is_special => {
                if let Some(last) = &self.last_part_under_parent {
                    segments.push(last.clone());
                    in_part = true;
                }
            }
            _ => {}
        }

        let kind = match (&self.chapter, &self.special) {
            (Some(chapter), Some(special)) if self.chapter_is_special => {
                segments.push(special.clone());
                if chapter != special {
                    segments.push(chapter.clone());
                    SectionKind::SpecialChapter
                } else {
                    SectionKind::Special
                }
            }
            (Some(chapter), _) => {
                segments.push(chapter.clone());
                SectionKind::Chapter
            }
            (None, _) if self.part.is_some() => SectionKind::Part,
            (None, _) if self.parent.is_some() => SectionKind::SpecialParent,
            _ => return Bucket::back_index(),
        };

        let numbering = if in_part {
            Numbering::PartSequence
        } else {
            Numbering::Printed
        };

        Bucket {
            kind,
            segments,
            numbering,
        }
    }
}

/// Closed set of section labels used in assignments and the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Cover(CoverSlot),
    FrontIndex,
    SpecialParent,
    Part,
    Chapter,
    Special,
    SpecialChapter,
    BackIndex,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Cover(slot) => write!(f, "Cover ({})", slot),
            SectionKind::FrontIndex => write!(f, "Index"),
            SectionKind::SpecialParent => write!(f, "Special Parent"),
            SectionKind::Part => write!(f, "Part"),
            SectionKind::Chapter => write!(f, "Chapter"),
            SectionKind::Special => write!(f, "Special"),
            SectionKind::SpecialChapter => write!(f, "Special Chapter"),
            SectionKind::BackIndex => write!(f, "Back Index"),
        }
    }
}

/// How the page label in a filename is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    Cover(CoverSlot),
    FrontIndex,
    PartSequence,
    Printed,
}

/// Destination section for a page: its kind, the title segments of its
/// nested path and the numbering scheme for its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub kind: SectionKind,
    pub segments: Vec<String>,
    pub numbering: Numbering,
}

impl Bucket {
    pub fn cover(slot: CoverSlot) -> Self {
        Self {
            kind: SectionKind::Cover(slot),
            segments: vec!["Cover".to_string()],
            numbering: Numbering::Cover(slot),
        }
    }

    pub fn front_index() -> Self {
        Self {
            kind: SectionKind::FrontIndex,
            segments: vec!["Index".to_string()],
            numbering: Numbering::FrontIndex,
        }
    }

    pub fn back_index() -> Self {
        Self {
            kind: SectionKind::BackIndex,
            segments: vec!["Back Index".to_string()],
            numbering: Numbering::Printed,
        }
    }

    pub fn label(&self) -> String {
        match self.kind {
            SectionKind::Cover(_) | SectionKind::FrontIndex | SectionKind::BackIndex => {
                self.kind.to_string()
            }
            _ => format!("{}: {}", self.kind, self.segments.join("/")),
        }
    }
}
