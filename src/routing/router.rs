use std::fmt;
use tracing::{debug, info, warn};

use super::assignment::{ConsumedPages, PageAssignment};
use super::context::{Bucket, Numbering, SectionContext};
use super::lookahead::{apply_parent_lock, peek_upcoming, Upcoming};
use crate::config::RoutingConfig;
use crate::error::Result;
use crate::heading::{HeadingClassifier, HeadingMatch};
use crate::naming::{front_index_number, printed_page_number, CoverSlot, OutputLayout};
use crate::source::{PageCache, TextProvider};
use crate::utils::text_processor::{is_near_blank, word_count};

/// Per-page facts the reducer needs besides the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub index: usize,
    pub word_count: usize,
    pub near_blank: bool,
}

impl PageInfo {
    pub fn from_text(index: usize, text: &str, config: &RoutingConfig) -> Self {
        Self {
            index,
            word_count: word_count(text),
            near_blank: is_near_blank(
                text,
                config.near_blank_max_chars,
                config.near_blank_max_digits,
            ),
        }
    }
}

/// Why a page was placed where it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Heading,
    FrontMatter,
    Anticipated { index: usize },
    AwaitingChild,
    ImplicitChapter,
    PromotedByHeading,
    Flow,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Heading => write!(f, "new section"),
            Decision::FrontMatter => write!(f, "front matter"),
            Decision::Anticipated { index } => {
                write!(f, "placed ahead of heading on page {}", index)
            }
            Decision::AwaitingChild => write!(f, "inside parent, no child yet"),
            Decision::ImplicitChapter => write!(f, "unlabelled chapter start"),
            Decision::PromotedByHeading => write!(f, "chapter heading inside special"),
            Decision::Flow => write!(f, "continues current section"),
        }
    }
}

/// Extra pages claimed together with the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    None,
    /// Fold the next page in when it is near-blank; `wide` uses the looser
    /// character limit.
    MergeNearBlank { wide: bool },
    /// Claim the following `capture_following_pages` pages.
    Following,
}

/// Outcome of reducing one page against the context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub context: SectionContext,
    pub decision: Decision,
    pub capture: Capture,
}

/// Whether a page needs a lookahead peek before it can be reduced.
pub fn wants_lookahead(context: &SectionContext, heading: &HeadingMatch) -> bool {
    heading.is_none() && context.awaiting_child()
}

/// Pure transition: current context, effective heading and page facts in,
/// next context plus placement out.
///
/// Implicit chapter promotion is checked before the lookahead result is
/// used, so an immediate page-local split always wins over a speculative
/// placement.
pub fn reduce(
    context: &SectionContext,
    heading: &HeadingMatch,
    page: &PageInfo,
    upcoming: Option<&Upcoming>,
    config: &RoutingConfig,
) -> Step {
    let mut next = context.clone();
    next.parent_lock_remaining = next.parent_lock_remaining.saturating_sub(1);

    let (decision, capture) = match heading {
        HeadingMatch::SpecialParent(title) => {
            next.enter_special_parent(title, config.parent_lock_pages);
            (Decision::Heading, Capture::MergeNearBlank { wide: true })
        }
        HeadingMatch::Part(title) => {
            next.enter_part(title);
            (Decision::Heading, Capture::None)
        }
        HeadingMatch::Chapter(_) if next.in_open_special() => {
            next.promote_special();
            (Decision::PromotedByHeading, Capture::Following)
        }
        HeadingMatch::Chapter(title) => {
            next.enter_chapter(title);
            (Decision::Heading, Capture::None)
        }
        HeadingMatch::Prologue(title) | HeadingMatch::Epilogue(title) => {
            next.enter_special(title);
            (Decision::Heading, Capture::MergeNearBlank { wide: false })
        }
        HeadingMatch::None if !next.seen_first_content => (Decision::FrontMatter, Capture::None),
        HeadingMatch::None
            if next.in_open_special()
                && !page.near_blank
                && page.word_count >= config.implicit_chapter_min_words =>
        {
            next.promote_special();
            (Decision::ImplicitChapter, Capture::Following)
        }
        HeadingMatch::None if next.awaiting_child() => match upcoming {
            Some(upcoming) => {
                next.apply(&upcoming.heading, config.parent_lock_pages);
                (
                    Decision::Anticipated {
                        index: upcoming.index,
                    },
                    Capture::None,
                )
            }
            None => (Decision::AwaitingChild, Capture::None),
        },
        HeadingMatch::None => (Decision::Flow, Capture::None),
    };

    Step {
        context: next,
        decision,
        capture,
    }
}

/// Everything a routing run produced
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub assignments: Vec<PageAssignment>,
    pub audit: Vec<String>,
    pub ocr_pages: usize,
}

/// Walks a document page by page and assigns every page to a section.
pub struct Router<P: TextProvider> {
    pages: PageCache<P>,
    classifier: HeadingClassifier,
    config: RoutingConfig,
    layout: OutputLayout,
    context: SectionContext,
    consumed: ConsumedPages,
    assignments: Vec<PageAssignment>,
    audit: Vec<String>,
}

impl<P: TextProvider> Router<P> {
    pub fn new(
        provider: P,
        layout: OutputLayout,
        config: RoutingConfig,
        aggressive_ocr: bool,
    ) -> Result<Self> {
        config.validate()?;
        let classifier = HeadingClassifier::new(&config)?;

        Ok(Self {
            pages: PageCache::new(provider, aggressive_ocr),
            classifier,
            config,
            layout,
            context: SectionContext::default(),
            consumed: ConsumedPages::default(),
            assignments: Vec::new(),
            audit: Vec::new(),
        })
    }

    pub fn run(mut self) -> RouteResult {
        let total = self.pages.page_count();
        info!("Routing {} pages for {}", total, self.layout.book());
        self.audit
            .push(format!("Processing document with {} pages", total));

        for index in 0..total {
            if self.consumed.contains(index) {
                continue;
            }
            self.pages.evict_before(index);

            if index < self.config.cover_pages {
                let bucket = Bucket::cover(CoverSlot::for_position(index));
                self.emit(index, &bucket, None, "cover page");
                continue;
            }
            self.route_page(index);
        }

        info!(
            "Routed {} pages ({} sections touched)",
            self.assignments.len(),
            self.distinct_sections()
        );

        RouteResult {
            assignments: self.assignments,
            audit: self.audit,
            ocr_pages: self.pages.ocr_pages(),
        }
    }

    fn route_page(&mut self, index: usize) {
        let text = self.pages.text(index);
        let raw = self.classifier.classify(&text);
        let locked = self.context.parent_lock_remaining > 0;
        let (heading, suppressed) = apply_parent_lock(raw, locked);

        let upcoming = if wants_lookahead(&self.context, &heading) {
            peek_upcoming(
                &mut self.pages,
                &self.classifier,
                &self.consumed,
                index,
                self.config.lookahead_pages,
                self.context.parent_lock_remaining.saturating_sub(1),
            )
        } else {
            None
        };

        let page = PageInfo::from_text(index, &text, &self.config);
        let step = reduce(&self.context, &heading, &page, upcoming.as_ref(), &self.config);
        self.context = step.context;

        let reason = match (&heading, suppressed) {
            (_, true) => "chapter heading suppressed under parent lock".to_string(),
            (HeadingMatch::None, false) => step.decision.to_string(),
            (heading, false) => format!("{} ({})", step.decision, heading),
        };
        let bucket = self.context.bucket();
        let resolved = (!heading.is_none()).then_some(heading);
        self.emit(index, &bucket, resolved, &reason);

        match step.capture {
            Capture::None => {}
            Capture::MergeNearBlank { wide } => self.merge_near_blank(index, &bucket, wide),
            Capture::Following => self.capture_following(index, &bucket),
        }
    }

    /// Fold the single next page into `bucket` when it carries next to no text
    /// and no heading of its own.
    fn merge_near_blank(&mut self, index: usize, bucket: &Bucket, wide: bool) {
        let next = index + 1;
        if next >= self.pages.page_count() || self.consumed.contains(next) {
            return;
        }
        let max_chars = if wide {
            self.config.wide_merge_max_chars
        } else {
            self.config.near_blank_max_chars
        };
        let text = self.pages.text(next);
        if !is_near_blank(&text, max_chars, self.config.near_blank_max_digits) {
            return;
        }

        let raw = self.classifier.classify(&text);
        let (heading, _) = apply_parent_lock(raw, self.context.parent_lock_remaining > 0);
        if !heading.is_none() {
            debug!("Merge from page {} skipped: {} on page {}", index, heading, next);
            return;
        }
        self.emit(next, bucket, None, "near-blank page merged");
    }

    /// Claim the pages after `index` into `bucket`, stopping early at any page
    /// that carries a heading of its own.
    fn capture_following(&mut self, index: usize, bucket: &Bucket) {
        let total = self.pages.page_count();
        let lock_after = self.context.parent_lock_remaining;

        for offset in 1..=self.config.capture_following_pages {
            let next = index + offset;
            if next >= total || self.consumed.contains(next) {
                break;
            }
            let raw = self.classifier.classify(&self.pages.text(next));
            let (heading, _) = apply_parent_lock(raw, offset as u32 <= lock_after);
            if !heading.is_none() {
                debug!("Capture from page {} stopped at {} on page {}", index, heading, next);
                break;
            }
            self.emit(next, bucket, None, "captured with unlabelled chapter start");
        }
    }

    fn emit(&mut self, index: usize, bucket: &Bucket, heading: Option<HeadingMatch>, reason: &str) {
        if !self.consumed.claim(index) {
            warn!("Page {} already assigned, not assigning again", index);
            return;
        }

        let printed = match bucket.numbering {
            Numbering::Cover(_) => None,
            _ => Some(printed_page_number(&self.pages.text(index), index)),
        };

        let (file_name, part_number) = match bucket.numbering {
            Numbering::Cover(slot) => (self.layout.cover_file_name(slot), None),
            Numbering::FrontIndex => {
                let number = front_index_number(index, self.config.cover_pages);
                (self.layout.page_file_name(&bucket.segments, number), None)
            }
            Numbering::PartSequence => {
                let number = self.context.part_sequence.advance();
                (
                    self.layout.page_file_name(&bucket.segments, number),
                    Some(number),
                )
            }
            Numbering::Printed => {
                let number = printed.unwrap_or(index as u32 + 1);
                (self.layout.page_file_name(&bucket.segments, number), None)
            }
        };

        let section_label = bucket.label();
        let line = match printed {
            Some(printed) => format!(
                "Page {} (printed: {}): {} -> {} [{}]",
                index, printed, reason, section_label, file_name
            ),
            None => format!("Page {}: {} -> {} [{}]", index, reason, section_label, file_name),
        };
        debug!("{}", line);
        self.audit.push(line);

        self.assignments.push(PageAssignment {
            page_index: index,
            output_path: self.layout.section_dir(&bucket.segments).join(&file_name),
            file_name,
            heading,
            section: bucket.kind,
            section_label,
            part_number,
            context: self.context.clone(),
        });
    }

    fn distinct_sections(&self) -> usize {
        let mut labels: Vec<&str> = self
            .assignments
            .iter()
            .map(|a| a.section_label.as_str())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}

/// Route a whole document in one call.
pub fn route_document<P: TextProvider>(
    provider: P,
    layout: OutputLayout,
    config: RoutingConfig,
    aggressive_ocr: bool,
) -> Result<RouteResult> {
    Ok(Router::new(provider, layout, config, aggressive_ocr)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading::Title;
    use crate::routing::SectionKind;
    use crate::source::InMemoryProvider;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn body(words: usize) -> String {
        let mut text = vec!["word"; words].join(" ");
        text.push_str("\n123");
        text
    }

    fn route(pages: &[String]) -> RouteResult {
        route_document(
            InMemoryProvider::new(pages.iter().cloned()),
            OutputLayout::new("/out", "Book"),
            RoutingConfig::default(),
            false,
        )
        .unwrap()
    }

    fn covers() -> Vec<String> {
        vec![
            "PART ONE".to_string(),
            "CHAPTER ONE".to_string(),
            "HONEYMOON".to_string(),
            String::new(),
        ]
    }

    fn dir_name(assignment: &PageAssignment) -> String {
        assignment
            .output_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn assert_total_cover(result: &RouteResult, total: usize) {
        let mut indices: Vec<usize> = result.assignments.iter().map(|a| a.page_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_four_pages_are_cover() {
        let mut pages = covers();
        pages.push(body(10));
        let result = route(&pages);

        let slots: Vec<SectionKind> = result.assignments[..4].iter().map(|a| a.section).collect();
        assert_eq!(
            slots,
            vec![
                SectionKind::Cover(CoverSlot::FrontOuter),
                SectionKind::Cover(CoverSlot::FrontInner),
                SectionKind::Cover(CoverSlot::BackInner),
                SectionKind::Cover(CoverSlot::BackOuter),
            ]
        );
        assert_eq!(result.assignments[0].file_name, "Book_Front_Outer.pdf");
        assert!(result.assignments[..4].iter().all(|a| a.heading.is_none()));
        assert_total_cover(&result, 5);
    }

    #[test]
    fn test_short_document_is_all_cover() {
        let result = route(&["a".to_string(), "b".to_string()]);
        assert_eq!(result.assignments.len(), 2);
        assert!(result
            .assignments
            .iter()
            .all(|a| matches!(a.section, SectionKind::Cover(_))));
    }

    #[test]
    fn test_contents_part_and_chapter() {
        let mut pages = covers();
        pages.push("TABLE OF CONTENTS\nThe Beginning .... 5\nThe End .... 300".to_string());
        pages.push("PART ONE\n".to_string());
        pages.push(format!("CHAPTER ONE\n{}", body(80)));
        let result = route(&pages);

        let contents = &result.assignments[4];
        assert_eq!(contents.section, SectionKind::FrontIndex);
        assert_eq!(contents.file_name, "Book_Index_Page 1.pdf");

        let part = &result.assignments[5];
        assert_eq!(part.section, SectionKind::Part);
        assert_eq!(part.part_number, Some(1));
        assert_eq!(part.file_name, "Book_Part_One_Page 1.pdf");

        let chapter = &result.assignments[6];
        assert_eq!(chapter.section, SectionKind::Chapter);
        assert_eq!(chapter.part_number, Some(2));
        assert_eq!(chapter.file_name, "Book_Part_One_Chapter_One_Page 2.pdf");
        assert!(chapter
            .output_path
            .ends_with("Book/Book/Book_Part_One/Book_Chapter_One/Book_Part_One_Chapter_One_Page 2.pdf"));
        assert!(matches!(chapter.heading, Some(HeadingMatch::Chapter(_))));
    }

    #[test]
    fn test_part_counter_runs_across_parts() {
        let mut pages = covers();
        pages.push(format!("CHAPTER ONE\n{}", body(60)));
        pages.push("PART ONE".to_string());
        pages.push(body(60));
        pages.push("PART TWO".to_string());
        pages.push(format!("CHAPTER TWO\n{}", body(60)));
        pages.push(body(60));
        let result = route(&pages);

        // the standalone chapter before any part uses the printed number
        assert_eq!(result.assignments[4].part_number, None);
        assert_eq!(result.assignments[4].file_name, "Book_Chapter_One_Page 123.pdf");

        let numbers: Vec<Option<u32>> = result.assignments[5..]
            .iter()
            .map(|a| a.part_number)
            .collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
        assert_eq!(result.assignments[9].file_name, "Book_Part_Two_Chapter_Two_Page 5.pdf");
    }

    #[test]
    fn test_near_blank_page_merges_into_special_parent() {
        let mut pages = covers();
        pages.extend((4..10).map(|_| "front matter".to_string()));
        pages.push("HONEYMOON".to_string());
        pages.push("12".to_string());
        pages.push("PART ONE".to_string());
        let result = route(&pages);

        let parent = &result.assignments[10];
        let merged = &result.assignments[11];
        assert_eq!(parent.section, SectionKind::SpecialParent);
        assert_eq!(merged.page_index, 11);
        assert_eq!(merged.section, SectionKind::SpecialParent);
        assert_eq!(dir_name(merged), "Book_Honeymoon");
        assert_eq!(merged.file_name, "Book_Honeymoon_Page 12.pdf");
        assert_total_cover(&result, 13);
    }

    #[test]
    fn test_wide_merge_only_for_special_parent() {
        let mut pages = covers();
        pages.push("PROLOGUE".to_string());
        pages.push("a short caption".to_string());
        let result = route(&pages);
        // 15 chars: too long for the narrow prologue merge, so it flows
        assert_eq!(result.assignments[5].section, SectionKind::Special);
        assert!(result.audit[6].contains("continues current section"));
    }

    #[test]
    fn test_short_part_heading_after_special_parent_is_not_merged() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("PART ONE".to_string());
        pages.push(body(60));
        let result = route(&pages);

        let part = &result.assignments[5];
        assert!(matches!(part.heading, Some(HeadingMatch::Part(_))));
        assert_eq!(part.section, SectionKind::Part);
        assert_eq!(dir_name(part), "Book_Part_One");
        assert!(!result.audit[6].contains("merged"));

        let following = &result.assignments[6];
        assert_eq!(following.section, SectionKind::Part);
        assert_eq!(following.context.part.as_deref(), Some("Part One"));
    }

    #[test]
    fn test_short_prologue_heading_after_special_parent_is_not_merged() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("PROLOGUE".to_string());
        let result = route(&pages);

        let prologue = &result.assignments[5];
        assert!(matches!(prologue.heading, Some(HeadingMatch::Prologue(_))));
        assert_eq!(prologue.section, SectionKind::Special);
    }

    #[test]
    fn test_long_page_after_special_parent_is_not_merged() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("A short note from the author of this book.".to_string());
        pages.push(body(60));
        pages.push(body(60));
        let result = route(&pages);

        assert_eq!(result.assignments[5].section, SectionKind::SpecialParent);
        assert!(result.audit[6].contains("inside parent, no child yet"));
    }

    #[test]
    fn test_locked_chapter_header_still_merges_into_special_parent() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("CHAPTER ONE".to_string());
        let result = route(&pages);

        let merged = &result.assignments[5];
        assert_eq!(merged.heading, None);
        assert_eq!(merged.section, SectionKind::SpecialParent);
        assert!(result.audit[6].contains("near-blank page merged"));
    }

    #[test]
    fn test_parent_lock_suppresses_repeated_chapter_header() {
        let header = format!("CHAPTER ONE\n{}", body(30));
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push(header.clone());
        pages.push(header.clone());
        pages.push(body(30));
        pages.push(body(30));
        pages.push(header);
        let result = route(&pages);

        for locked in &result.assignments[5..7] {
            assert_eq!(locked.heading, None);
            assert_eq!(locked.section, SectionKind::SpecialParent);
            assert_eq!(locked.context.chapter, None);
        }
        // past the lock the same text opens the chapter
        let opened = &result.assignments[9];
        assert!(matches!(opened.heading, Some(HeadingMatch::Chapter(_))));
        assert_eq!(opened.section, SectionKind::Chapter);
    }

    #[test]
    fn test_lookahead_places_page_into_upcoming_part() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("An introduction that is longer than twenty characters.".to_string());
        pages.push("PART ONE".to_string());
        let result = route(&pages);

        let early = &result.assignments[5];
        assert_eq!(early.section, SectionKind::Part);
        assert_eq!(early.part_number, Some(1));
        assert_eq!(early.context.part.as_deref(), Some("Part One"));
        assert!(result.audit[6].contains("placed ahead of heading on page 6"));

        let part = &result.assignments[6];
        assert_eq!(part.part_number, Some(2));
        assert_eq!(dir_name(part), "Book_Part_One");
        assert!(part.output_path.to_string_lossy().contains("Book_Honeymoon"));
    }

    #[test]
    fn test_implicit_chapter_captures_four_pages() {
        let mut pages = covers();
        pages.extend((4..19).map(|_| "front matter".to_string()));
        pages.push("PROLOGUE\nIt rained.".to_string());
        for _ in 20..24 {
            pages.push(body(60));
        }
        pages.push(format!("CHAPTER ONE\n{}", body(60)));
        let result = route(&pages);

        for page in 20..24 {
            let a = &result.assignments[page];
            assert_eq!(a.page_index, page);
            assert_eq!(a.section, SectionKind::SpecialChapter);
            assert_eq!(dir_name(a), "Book_Prologue_Chapter_Null_Name");
        }
        assert!(result.audit[21].contains("unlabelled chapter start"));
        assert!(result.audit[22].contains("captured"));

        let chapter = &result.assignments[24];
        assert_eq!(chapter.section, SectionKind::Chapter);
        assert_eq!(dir_name(chapter), "Book_Chapter_One");
    }

    #[test]
    fn test_chapter_heading_inside_open_special_is_promoted() {
        let mut pages = covers();
        pages.push("EPILOGUE\nShort words only.".to_string());
        pages.push(format!("CHAPTER ONE\n{}", body(20)));
        pages.push(body(20));
        let result = route(&pages);

        let promoted = &result.assignments[5];
        assert_eq!(promoted.section, SectionKind::SpecialChapter);
        assert_eq!(dir_name(promoted), "Book_Epilogue_Chapter_Null_Name");
        assert_eq!(result.assignments[6].section, SectionKind::SpecialChapter);
        assert_total_cover(&result, 7);
    }

    #[test]
    fn test_capture_stops_at_heading_page() {
        let mut pages = covers();
        pages.push("PROLOGUE".to_string());
        pages.push(body(60));
        pages.push(format!("CHAPTER TWO\n{}", body(60)));
        pages.push(body(60));
        let result = route(&pages);

        assert_eq!(result.assignments[5].section, SectionKind::SpecialChapter);
        let chapter = &result.assignments[6];
        assert!(matches!(chapter.heading, Some(HeadingMatch::Chapter(_))));
        assert_eq!(chapter.section, SectionKind::Chapter);
        assert_total_cover(&result, 8);
    }

    #[test]
    fn test_implicit_promotion_wins_over_lookahead() {
        let mut pages = covers();
        pages.push("HONEYMOON".to_string());
        pages.push("Dedicated to everyone who ever waited.".to_string());
        pages.push(body(60));
        pages.push("PROLOGUE".to_string());
        let result = route(&pages);

        // page 5 anticipates the prologue two pages ahead
        assert_eq!(result.assignments[5].section, SectionKind::Special);
        // page 6 is body text inside that special and is split off at once
        assert_eq!(result.assignments[6].section, SectionKind::SpecialChapter);
        // the capture never swallows the prologue heading page itself
        let prologue = &result.assignments[7];
        assert_eq!(prologue.page_index, 7);
        assert!(matches!(prologue.heading, Some(HeadingMatch::Prologue(_))));
        assert_eq!(prologue.section, SectionKind::Special);
        assert_total_cover(&result, 8);
    }

    #[test]
    fn test_reduce_front_matter_is_untouched() {
        let ctx = SectionContext::default();
        let page = PageInfo {
            index: 4,
            word_count: 200,
            near_blank: false,
        };
        let step = reduce(&ctx, &HeadingMatch::None, &page, None, &RoutingConfig::default());
        assert_eq!(step.decision, Decision::FrontMatter);
        assert_eq!(step.context, ctx);
    }

    #[test]
    fn test_reduce_special_parent_sets_lock() {
        let ctx = SectionContext::default();
        let page = PageInfo {
            index: 9,
            word_count: 1,
            near_blank: false,
        };
        let heading = HeadingMatch::SpecialParent(Title::new("Honeymoon"));
        let step = reduce(&ctx, &heading, &page, None, &RoutingConfig::default());
        assert_eq!(step.context.parent_lock_remaining, 2);
        assert!(step.context.seen_first_content);
        assert_eq!(step.capture, Capture::MergeNearBlank { wide: true });
    }

    const TEMPLATES: [&str; 12] = [
        "",
        "7",
        "PART ONE",
        "PART TWO",
        "CHAPTER ONE",
        "CHAPTER TWO\nTHE CALL",
        "PROLOGUE",
        "EPILOGUE",
        "HONEYMOON",
        "short line",
        "CHAPTER ONE HUNDRED\nAND NINE",
        "AN INTERVIEW WITH THE WOMEN'S MURDER CLUB",
    ];

    fn random_document(rng: &mut StdRng) -> Vec<String> {
        let len = rng.gen_range(0..80);
        (0..len)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    body(rng.gen_range(10..90))
                } else {
                    TEMPLATES[rng.gen_range(0..TEMPLATES.len())].to_string()
                }
            })
            .collect()
    }

    #[test]
    fn test_random_documents_cover_every_page_once() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let pages = random_document(&mut rng);
            let result = route(&pages);
            assert_total_cover(&result, pages.len());

            // assignments come out in page order
            assert!(result
                .assignments
                .windows(2)
                .all(|w| w[0].page_index < w[1].page_index));

            for a in result.assignments.iter().take(4) {
                assert!(matches!(a.section, SectionKind::Cover(_)));
            }
        }
    }

    #[test]
    fn test_random_documents_part_numbers_are_dense() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let pages = random_document(&mut rng);
            let result = route(&pages);

            let numbers: Vec<u32> = result
                .assignments
                .iter()
                .filter_map(|a| a.part_number)
                .collect();
            let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
            assert_eq!(numbers, expected);

            let counters: Vec<u32> = result
                .assignments
                .iter()
                .map(|a| a.context.part_sequence.part_page_counter)
                .collect();
            assert!(counters.windows(2).all(|w| w[0] <= w[1]));

            let seen: Vec<bool> = result
                .assignments
                .iter()
                .map(|a| a.context.seen_first_content)
                .collect();
            assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
