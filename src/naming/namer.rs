use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

const FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Make a title safe to use as a path segment.
///
/// Whitespace becomes `_`, the characters `<>:"/\|?*` are dropped, runs of
/// underscores collapse and leading/trailing underscores are trimmed.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if FORBIDDEN.contains(&ch) {
            continue;
        }
        let ch = if ch.is_whitespace() { '_' } else { ch };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('_').to_string()
}

/// Drop path-hostile characters but keep spaces, for the mirrored root dirs
fn strip_forbidden(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Position of a page among the fixed cover pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverSlot {
    FrontOuter,
    FrontInner,
    BackInner,
    BackOuter,
    Extra(usize),
}

impl CoverSlot {
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => CoverSlot::FrontOuter,
            1 => CoverSlot::FrontInner,
            2 => CoverSlot::BackInner,
            3 => CoverSlot::BackOuter,
            n => CoverSlot::Extra(n),
        }
    }

    fn file_label(&self) -> String {
        match self {
            CoverSlot::FrontOuter => "Front_Outer".to_string(),
            CoverSlot::FrontInner => "Front_Inner".to_string(),
            CoverSlot::BackInner => "Back_Inner".to_string(),
            CoverSlot::BackOuter => "Back_Outer".to_string(),
            CoverSlot::Extra(n) => format!("Cover_Page {}", n + 1),
        }
    }
}

impl fmt::Display for CoverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_label().replace('_', " "))
    }
}

/// Names directories and files under the output root.
///
/// Layout: `<output_root>/<root>/<root>/<book>_<segment>/.../<file>.pdf`,
/// where `<root>` is the root label and `<book>` its sanitized form.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    output_root: PathBuf,
    root_dir_name: String,
    book: String,
}

impl OutputLayout {
    pub fn new(output_root: impl Into<PathBuf>, root_label: &str) -> Self {
        Self {
            output_root: output_root.into(),
            root_dir_name: strip_forbidden(root_label),
            book: sanitize(root_label),
        }
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    /// The doubled root directory every section lives under
    pub fn root_dir(&self) -> PathBuf {
        self.output_root
            .join(&self.root_dir_name)
            .join(&self.root_dir_name)
    }

    /// One directory per segment, each named `<book>_<segment>` on its own;
    /// only file names accumulate the whole segment chain.
    pub fn section_dir(&self, segments: &[String]) -> PathBuf {
        segments.iter().fold(self.root_dir(), |dir, segment| {
            dir.join(format!("{}_{}", self.book, sanitize(segment)))
        })
    }

    fn stem(&self, segments: &[String]) -> String {
        let mut stem = self.book.clone();
        for segment in segments {
            stem.push('_');
            stem.push_str(&sanitize(segment));
        }
        stem
    }

    pub fn page_file_name(&self, segments: &[String], number: u32) -> String {
        format!("{}_Page {}.pdf", self.stem(segments), number)
    }

    pub fn cover_file_name(&self, slot: CoverSlot) -> String {
        format!("{}_{}.pdf", self.book, slot.file_label())
    }

    pub fn debug_log_path(&self) -> PathBuf {
        self.output_root
            .join(format!("{}_processing_debug.log", self.book))
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_root
            .join(format!("{}_assignments.json", self.book))
    }
}
