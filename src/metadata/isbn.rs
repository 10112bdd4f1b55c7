//! ISBN discovery in page text.

use regex::Regex;
use std::sync::LazyLock;

static ISBN_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d-?){9,12}[\dXx]\b").unwrap());

/// Digits of an ISBN with separators removed (`X` upper-cased).
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether `isbn` is a valid ISBN-10 or ISBN-13 (hyphens allowed).
pub fn is_valid_isbn(isbn: &str) -> bool {
    let digits = normalize_isbn(isbn);
    match digits.len() {
        10 => valid_isbn10(&digits),
        13 => valid_isbn13(&digits),
        _ => false,
    }
}

fn valid_isbn10(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

fn valid_isbn13(digits: &str) -> bool {
    if !(digits.starts_with("978") || digits.starts_with("979")) {
        return false;
    }
    let mut sum = 0u32;
    for (i, c) in digits.chars().enumerate() {
        let Some(d) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { d } else { 3 * d };
    }
    sum % 10 == 0
}

/// First valid ISBN in `text`, as written.
pub fn find_isbn(text: &str) -> Option<String> {
    ISBN_CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| is_valid_isbn(candidate))
        .map(String::from)
}

/// Every distinct valid ISBN in `text`, in order of appearance.
pub fn find_isbns(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for candidate in ISBN_CANDIDATE.find_iter(text).map(|m| m.as_str()) {
        if !is_valid_isbn(candidate) {
            continue;
        }
        let digits = normalize_isbn(candidate);
        if !found.iter().any(|f| normalize_isbn(f) == digits) {
            found.push(candidate.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_isbn() {
        assert_eq!(find_isbn(" blah 123 23refw"), None);
        assert_eq!(
            find_isbn(" blah 123 23refw 978-1-86197-876-9 qdfwe90"),
            Some("978-1-86197-876-9".to_string())
        );
        assert_eq!(
            find_isbn(" blah 123 23refw 978-1-86197-876-9 qdfwe90 978-1-86197-876-8"),
            Some("978-1-86197-876-9".to_string())
        );
    }

    #[test]
    fn test_checksums() {
        assert!(is_valid_isbn("9781861978769"));
        assert!(!is_valid_isbn("978-1-86197-876-8"));
        assert!(is_valid_isbn("0-306-40615-2"));
        assert!(is_valid_isbn("0-8044-2957-X"));
        assert!(!is_valid_isbn("0-306-40615-3"));
        assert!(!is_valid_isbn("12345"));
    }

    #[test]
    fn test_find_isbns_distinct() {
        let text = "ISBN 978-1-86197-876-9\nalso 9781861978769 and 0-306-40615-2";
        assert_eq!(
            find_isbns(text),
            vec!["978-1-86197-876-9".to_string(), "0-306-40615-2".to_string()]
        );
    }
}
