use regex::Regex;
use std::sync::LazyLock;

static ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").expect("valid regex")
});

const UNITS: [&str; 19] = [
    "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN", "ELEVEN",
    "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 8] = [
    "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

fn unit_value(word: &str) -> Option<u32> {
    UNITS.iter().position(|w| *w == word).map(|i| i as u32 + 1)
}

fn tens_value(word: &str) -> Option<u32> {
    TENS.iter().position(|w| *w == word).map(|i| (i as u32 + 2) * 10)
}

/// Parse 1..=99 from upper-case words ("FORTY", "FORTY TWO").
fn parse_below_hundred(words: &[&str]) -> Option<u32> {
    match words {
        [single] => unit_value(single).or_else(|| tens_value(single)),
        [tens, unit] => {
            let tens = tens_value(tens)?;
            let unit = unit_value(unit).filter(|u| *u < 10)?;
            Some(tens + unit)
        }
        _ => None,
    }
}

/// Parse a spelled-out cardinal in the range 1..=199.
///
/// Accepts upper-case input with spaces or hyphens between words, e.g.
/// `NINETY-NINE`, `ONE HUNDRED`, `ONE HUNDRED AND NINE`,
/// `ONE HUNDRED TWENTY-ONE`.
pub fn parse_cardinal(text: &str) -> Option<u32> {
    let normalized = text.replace('-', " ");
    let words: Vec<&str> = normalized.split_whitespace().collect();

    match words.as_slice() {
        [] => None,
        ["ONE", "HUNDRED"] => Some(100),
        ["ONE", "HUNDRED", "AND", rest @ ..] if !rest.is_empty() => {
            parse_below_hundred(rest).map(|n| 100 + n)
        }
        ["ONE", "HUNDRED", rest @ ..] => parse_below_hundred(rest).map(|n| 100 + n),
        rest => parse_below_hundred(rest),
    }
}

pub fn is_roman_numeral(token: &str) -> bool {
    !token.is_empty() && ROMAN.is_match(token)
}

pub fn is_arabic_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Any of the number shapes allowed after a PART or CHAPTER keyword
pub fn is_heading_number(token: &str) -> bool {
    is_arabic_number(token) || is_roman_numeral(token) || parse_cardinal(token).is_some()
}
