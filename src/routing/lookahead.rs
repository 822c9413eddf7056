use tracing::debug;

use super::assignment::ConsumedPages;
use crate::heading::{HeadingClassifier, HeadingMatch};
use crate::source::{PageCache, TextProvider};

/// A structural heading found ahead of the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub index: usize,
    pub heading: HeadingMatch,
}

/// While a special parent's lock is active, chapter matches are repeated
/// running headers and are read as no heading. Returns the effective
/// heading and whether it was suppressed.
pub fn apply_parent_lock(heading: HeadingMatch, locked: bool) -> (HeadingMatch, bool) {
    match heading {
        HeadingMatch::Chapter(_) if locked => (HeadingMatch::None, true),
        other => (other, false),
    }
}

/// Peek at up to `count` pages after `current` for the heading that will
/// open the first child section under a special parent.
///
/// Reads through the page cache only; routing state is never touched.
/// `lock_after` is the number of following pages still under the parent
/// lock, so a locked running header is not mistaken for a chapter here
/// either. A special parent ahead ends the search.
pub fn peek_upcoming<P: TextProvider>(
    pages: &mut PageCache<P>,
    classifier: &HeadingClassifier,
    consumed: &ConsumedPages,
    current: usize,
    count: usize,
    lock_after: u32,
) -> Option<Upcoming> {
    let total = pages.page_count();

    for offset in 1..=count {
        let index = current + offset;
        if index >= total {
            break;
        }
        if consumed.contains(index) {
            continue;
        }

        let raw = classifier.classify(&pages.text(index));
        let (heading, _) = apply_parent_lock(raw, offset as u32 <= lock_after);

        match heading {
            HeadingMatch::None => continue,
            HeadingMatch::SpecialParent(_) => return None,
            heading => {
                debug!("Lookahead from page {} found {} on page {}", current, heading, index);
                return Some(Upcoming { index, heading });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfig;
    use crate::source::InMemoryProvider;

    fn setup(pages: &[&str]) -> (PageCache<InMemoryProvider>, HeadingClassifier) {
        let provider = InMemoryProvider::new(pages.iter().copied());
        let classifier = HeadingClassifier::new(&RoutingConfig::default()).unwrap();
        (PageCache::new(provider, false), classifier)
    }

    #[test]
    fn test_finds_part_two_pages_ahead() {
        let (mut pages, classifier) = setup(&["HONEYMOON", "blurb", "more blurb", "PART ONE"]);
        let consumed = ConsumedPages::default();
        let found = peek_upcoming(&mut pages, &classifier, &consumed, 1, 2, 0).unwrap();
        assert_eq!(found.index, 3);
        assert!(matches!(found.heading, HeadingMatch::Part(_)));
    }

    #[test]
    fn test_window_is_bounded() {
        let (mut pages, classifier) = setup(&["x", "a", "b", "c", "PART ONE"]);
        let consumed = ConsumedPages::default();
        assert_eq!(peek_upcoming(&mut pages, &classifier, &consumed, 1, 2, 0), None);
    }

    #[test]
    fn test_locked_chapter_is_skipped() {
        let (mut pages, classifier) = setup(&["HONEYMOON", "CHAPTER ONE", "CHAPTER ONE"]);
        let consumed = ConsumedPages::default();
        assert_eq!(peek_upcoming(&mut pages, &classifier, &consumed, 0, 2, 2), None);
        let found = peek_upcoming(&mut pages, &classifier, &consumed, 0, 2, 1).unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_special_parent_stops_search() {
        let (mut pages, classifier) = setup(&["x", "HONEYMOON", "PART ONE"]);
        let consumed = ConsumedPages::default();
        assert_eq!(peek_upcoming(&mut pages, &classifier, &consumed, 0, 2, 0), None);
    }

    #[test]
    fn test_consumed_pages_are_skipped() {
        let (mut pages, classifier) = setup(&["x", "PART ONE", "CHAPTER TWO"]);
        let mut consumed = ConsumedPages::default();
        consumed.claim(1);
        let found = peek_upcoming(&mut pages, &classifier, &consumed, 0, 2, 0).unwrap();
        assert_eq!(found.index, 2);
        assert!(matches!(found.heading, HeadingMatch::Chapter(_)));
    }

    #[test]
    fn test_parent_lock_only_suppresses_chapters() {
        let part = HeadingMatch::Part(crate::heading::Title::new("Part One"));
        assert_eq!(apply_parent_lock(part.clone(), true), (part, false));
        let chapter = HeadingMatch::Chapter(crate::heading::Title::new("Chapter One"));
        assert_eq!(apply_parent_lock(chapter, true), (HeadingMatch::None, true));
    }
}
