//! Fuzzy line comparison used by header and footer removal.

use unicode_normalization::UnicodeNormalization;

/// Normalize a line for comparison.
///
/// Applies NFKC (so `U+00A0` and friends become plain spaces), collapses
/// whitespace runs to a single space and trims the ends.
pub fn normalize_line(line: &str) -> String {
    let composed: String = line.nfkc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity ratio of two strings in `[0, 1]`.
///
/// `2 * LCS / (len(a) + len(b))` over characters, where LCS is the length of
/// the longest common subsequence. Symmetric; two empty strings are equal.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Best similarity of two normalized lines.
///
/// Besides the whole-line ratio, the shorter string is compared against the
/// equally long prefix and suffix of the longer one, so a running header
/// that gained a trailing " by Author" still matches its shorter form. The
/// aligned comparison only applies when the shorter string covers at least
/// half of the longer one and the aligned slice ends at a space in the
/// longer string.
pub fn line_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize_line(a).chars().collect();
    let b: Vec<char> = normalize_line(b).chars().collect();

    let whole = ratio_chars(&a, &b);

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() || short.len() * 2 < long.len() || short.len() == long.len() {
        return whole;
    }

    let cut = long.len() - short.len();
    let prefix = if long[short.len()] == ' ' {
        ratio_chars(short, &long[..short.len()])
    } else {
        0.0
    };
    let suffix = if long[cut - 1] == ' ' {
        ratio_chars(short, &long[cut..])
    } else {
        0.0
    };

    whole.max(prefix).max(suffix)
}

/// Whether `line` matches `candidate` above `threshold`.
///
/// Blank candidates never match.
pub fn line_matches(line: &str, candidate: &str, threshold: f64) -> bool {
    if candidate.trim().is_empty() || line.trim().is_empty() {
        return false;
    }
    line_similarity(line, candidate) > threshold
}
