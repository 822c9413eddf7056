use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::numbers::is_heading_number;
use super::{HeadingMatch, Title};
use crate::config::RoutingConfig;
use crate::error::{Result, SplitError};
use crate::utils::text_processor::{
    is_upper_case_line, non_empty_lines, normalize_heading, title_case, word_count,
};

static PART_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PART\s+(.+)$").expect("valid regex"));

static CHAPTER_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CHAPTER\s+(.+)$").expect("valid regex"));

const SPECIAL_PARENT_SPAN_LINES: usize = 3;
const HEADING_KEYWORDS: [&str; 4] = ["PART", "CHAPTER", "PROLOGUE", "EPILOGUE"];

struct SpecialParentPhrase {
    phrase: String,
    words: usize,
    inline: Regex,
}

/// Classifies page text into a heading match.
///
/// Rules are tried in order (special parent, part, chapter, prologue and
/// epilogue) over the first `heading_window` non-empty lines; the first rule
/// that matches wins.
pub struct HeadingClassifier {
    window: usize,
    part_span_lines: usize,
    chapter_span_lines: usize,
    chapter_span_max_chars: usize,
    short_line_words: usize,
    special_parents: Vec<SpecialParentPhrase>,
}

impl HeadingClassifier {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let special_parents = config
            .special_parents
            .iter()
            .map(|raw| {
                let phrase = normalize_heading(raw);
                let inline = Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))
                    .map_err(|e| SplitError::config(format!("bad special parent {raw:?}: {e}")))?;
                Ok(SpecialParentPhrase {
                    words: word_count(&phrase),
                    phrase,
                    inline,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            window: config.heading_window,
            part_span_lines: config.part_span_lines,
            chapter_span_lines: config.chapter_span_lines,
            chapter_span_max_chars: config.chapter_span_max_chars,
            short_line_words: config.short_line_words,
            special_parents,
        })
    }

    pub fn classify(&self, text: &str) -> HeadingMatch {
        let lines = non_empty_lines(text);
        if lines.is_empty() {
            return HeadingMatch::None;
        }
        let window = lines.len().min(self.window);

        let heading = if let Some(title) = self.match_special_parent(&lines[..window]) {
            HeadingMatch::SpecialParent(title)
        } else if let Some(title) = self.match_part(&lines, window) {
            HeadingMatch::Part(title)
        } else if let Some(title) = self.match_chapter(&lines, window) {
            HeadingMatch::Chapter(title)
        } else {
            self.match_prologue_epilogue(&lines, window)
                .unwrap_or(HeadingMatch::None)
        };

        if !heading.is_none() {
            debug!("Classified heading: {}", heading);
        }
        heading
    }

    fn match_special_parent(&self, window: &[&str]) -> Option<Title> {
        for parent in &self.special_parents {
            for start in 0..window.len() {
                let max_end = (start + SPECIAL_PARENT_SPAN_LINES).min(window.len());
                for end in start + 1..=max_end {
                    if normalize_heading(&window[start..end].join(" ")) == parent.phrase {
                        return Some(Title::new(title_case(&parent.phrase)));
                    }
                }
            }

            // Inline occurrence, accepted only on short or shouted lines
            for line in window {
                let normalized = normalize_heading(line);
                if !parent.inline.is_match(&normalized) {
                    continue;
                }
                let words = word_count(&normalized);
                if words <= self.short_line_words.max(parent.words) || is_upper_case_line(line) {
                    return Some(Title::new(title_case(&parent.phrase)));
                }
            }
        }
        None
    }

    fn match_part(&self, lines: &[&str], window: usize) -> Option<Title> {
        self.longest_keyword_span(lines, window, self.part_span_lines, usize::MAX, &PART_SHAPE)
    }

    fn match_chapter(&self, lines: &[&str], window: usize) -> Option<Title> {
        self.longest_keyword_span(
            lines,
            window,
            self.chapter_span_lines,
            self.chapter_span_max_chars,
            &CHAPTER_SHAPE,
        )
        .map(Title::or_placeholder)
    }

    /// Grow a span from each start line and keep the longest span that is
    /// exactly `<KEYWORD> <number>`, so a heading broken across lines
    /// ("CHAPTER ONE HUNDRED" / "AND NINE") is read whole.
    fn longest_keyword_span(
        &self,
        lines: &[&str],
        window: usize,
        max_lines: usize,
        max_chars: usize,
        shape: &Regex,
    ) -> Option<Title> {
        for start in 0..window {
            let mut best: Option<(usize, String)> = None;
            let max_end = (start + max_lines).min(window);

            for end in start + 1..=max_end {
                let candidate = normalize_heading(&lines[start..end].join(" "));
                if candidate.chars().count() > max_chars {
                    break;
                }
                let fits = shape
                    .captures(&candidate)
                    .and_then(|caps| caps.get(1))
                    .map(|token| is_heading_number(token.as_str()))
                    .unwrap_or(false);
                if fits {
                    best = Some((end, candidate));
                }
            }

            if let Some((end, candidate)) = best {
                let subtitle = self.subtitle_at(lines, end);
                return Some(Title::new(title_case(&candidate)).with_subtitle(subtitle));
            }
        }
        None
    }

    fn match_prologue_epilogue(&self, lines: &[&str], window: usize) -> Option<HeadingMatch> {
        // The very first line wins; otherwise tolerate a running header above
        self.special_at(lines, 0)
            .or_else(|| (1..window).find_map(|idx| self.special_at(lines, idx)))
    }

    fn special_at(&self, lines: &[&str], idx: usize) -> Option<HeadingMatch> {
        let line = normalize_heading(lines.get(idx)?);
        if word_count(&line) > self.short_line_words {
            return None;
        }
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?.trim_end_matches([':', '.', ',']);
        let rest = tokens.collect::<Vec<_>>().join(" ");

        let subtitle = if rest.is_empty() {
            self.subtitle_at(lines, idx + 1)
        } else {
            Some(title_case(&rest))
        };

        match keyword {
            "PROLOGUE" => Some(HeadingMatch::Prologue(
                Title::new("Prologue").with_subtitle(subtitle).or_placeholder(),
            )),
            "EPILOGUE" => Some(HeadingMatch::Epilogue(
                Title::new("Epilogue").with_subtitle(subtitle).or_placeholder(),
            )),
            _ => None,
        }
    }

    /// An upper-case short line directly under a heading is its subtitle.
    fn subtitle_at(&self, lines: &[&str], idx: usize) -> Option<String> {
        let line = lines.get(idx)?;
        let normalized = normalize_heading(line);
        let first = normalized.split_whitespace().next()?;

        if !is_upper_case_line(line)
            || word_count(line) > self.short_line_words
            || HEADING_KEYWORDS.contains(&first)
        {
            return None;
        }
        Some(title_case(&normalized))
    }
}
