//! Page-number patterns.

use regex::Regex;
use std::sync::LazyLock;

static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\b").unwrap());
static TRAILING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)$").unwrap());

/// Whether a cleaned boundary line starts or ends with a run of digits.
pub fn has_digit_run(line: &str) -> bool {
    LEADING_DIGITS.is_match(line) || TRAILING_DIGITS.is_match(line)
}

/// Leading digit run of a cleaned line (`"42 Chapter One"` → `"42"`).
pub fn leading_digits(line: &str) -> Option<&str> {
    LEADING_DIGITS
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Trailing digit run of a cleaned line (`"Chapter One 42"` → `"42"`).
pub fn trailing_digits(line: &str) -> Option<&str> {
    TRAILING_DIGITS
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove the leading digit run and the whitespace after it.
pub fn strip_leading_digits(line: &str) -> String {
    LEADING_DIGITS.replace(line, "").trim_start().to_string()
}

/// Remove the trailing digit run and the whitespace before it.
pub fn strip_trailing_digits(line: &str) -> String {
    TRAILING_DIGITS.replace(line, "").trim_end().to_string()
}

fn unit_value(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

/// Parse a whole line written as an English number ("forty-two" → 42).
///
/// Every word must be a number word; "and" is ignored. Returns `None`
/// for anything else, including an empty line.
pub fn words_to_number(text: &str) -> Option<u64> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty() && *w != "and")
        .collect();

    if words.is_empty() {
        return None;
    }

    let mut total = 0u64;
    let mut current = 0u64;

    for word in words {
        if let Some(value) = unit_value(word) {
            current += value;
            continue;
        }
        match word {
            "hundred" => current = current.max(1) * 100,
            "thousand" => {
                total += current.max(1) * 1_000;
                current = 0;
            }
            "million" => {
                total += current.max(1) * 1_000_000;
                current = 0;
            }
            "billion" => {
                total += current.max(1) * 1_000_000_000;
                current = 0;
            }
            _ => return None,
        }
    }

    Some(total + current)
}
