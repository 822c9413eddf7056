use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trimmed, non-empty lines of a page in reading order
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Collapse runs of whitespace to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Upper-cased, whitespace-collapsed form used for keyword matching.
///
/// Curly apostrophes and trailing punctuation that OCR tends to attach to
/// headings are normalized away.
pub fn normalize_heading(text: &str) -> String {
    let collapsed = collapse_whitespace(&text.replace(['\u{2019}', '\u{2018}'], "'"));
    collapsed
        .trim_end_matches(['.', ':', ','])
        .trim()
        .to_uppercase()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when a line has letters and none of them are lower-case
pub fn is_upper_case_line(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

/// Near-blank pages are folded into the section opened just before them.
///
/// A page qualifies when it is empty, a bare page number of at most
/// `max_digits` digits, or at most `max_chars` characters long.
pub fn is_near_blank(text: &str, max_chars: usize, max_digits: usize) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    let chars = trimmed.chars().count();
    if chars <= max_digits && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    chars <= max_chars
}

/// Capitalize the first letter of every word (words split on whitespace and
/// hyphens), lower-casing the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in collapse_whitespace(text).chars() {
        if ch.is_whitespace() || ch == '-' {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            result.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}
