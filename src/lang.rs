//! Language detection seam.
//!
//! Detection is an external capability: given text, return a best-guess
//! language code or `None`. [`StopwordDetector`] is a small built-in
//! implementation that scores function words; callers with a better
//! detector plug it in through [`LanguageDetector`].

use std::collections::HashMap;

/// Number of leading characters of a page used for detection.
pub const LANG_SAMPLE_CHARS: usize = 1000;

/// Detects the dominant language of a text sample.
pub trait LanguageDetector: Send + Sync {
    /// Return an ISO 639-1 code, or `None` when the text is inconclusive.
    fn detect(&self, text: &str) -> Option<String>;
}

const STOPWORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "of", "to", "in", "is", "it", "that", "this", "for", "with", "on",
            "as", "are", "was", "be", "from", "into", "by", "he", "she", "they", "his", "her",
            "not", "but", "have", "had", "you", "what", "which", "there",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "de", "des", "du", "un", "une", "et", "est", "dans", "ce", "que",
            "qui", "pour", "pas", "sur", "au", "aux", "avec", "il", "elle", "ils", "mais", "ou",
            "nous", "vous", "son", "sa", "ses", "cette",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "den", "mit", "sich",
            "auf", "für", "von", "dem", "des", "im", "auch", "es", "sie", "wir", "ich", "aber",
        ],
    ),
    (
        "es",
        &[
            "el", "los", "las", "del", "y", "en", "que", "por", "con", "para", "una", "es",
            "pero", "como", "más", "su", "sus", "lo", "al", "se", "este", "esta",
        ],
    ),
    (
        "it",
        &[
            "il", "gli", "della", "che", "di", "per", "con", "non", "una", "sono", "nel",
            "alla", "questo", "questa", "anche", "come", "ma", "dei", "delle",
        ],
    ),
    (
        "pt",
        &[
            "os", "as", "do", "da", "dos", "das", "que", "não", "uma", "em", "para", "com",
            "por", "mais", "mas", "como", "ao", "seu", "sua", "isso",
        ],
    ),
    (
        "nl",
        &[
            "de", "het", "een", "en", "van", "ik", "te", "dat", "die", "niet", "zijn", "op",
            "aan", "met", "voor", "maar", "ook", "wij", "je", "hij",
        ],
    ),
];

/// Function-word frequency detector.
///
/// The winning language needs at least `min_hits` stopword hits and must
/// beat the runner-up outright; ties are inconclusive.
#[derive(Debug, Clone)]
pub struct StopwordDetector {
    min_hits: usize,
}

impl StopwordDetector {
    /// Create a detector with the default threshold (2 hits).
    pub fn new() -> Self {
        Self { min_hits: 2 }
    }

    /// Set the minimum number of stopword hits.
    pub fn with_min_hits(mut self, min_hits: usize) -> Self {
        self.min_hits = min_hits.max(1);
        self
    }
}

impl Default for StopwordDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| w.chars().count() > 1)
            .collect();

        if words.is_empty() {
            return None;
        }

        let mut scores: HashMap<&str, usize> = HashMap::new();
        for (code, list) in STOPWORDS {
            let hits = words.iter().filter(|w| list.contains(w)).count();
            scores.insert(code, hits);
        }

        let mut ranked: Vec<(&str, usize)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let (best, best_hits) = ranked[0];
        let runner_up = ranked.get(1).map(|r| r.1).unwrap_or(0);

        if best_hits < self.min_hits || best_hits == runner_up {
            return None;
        }
        Some(best.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let detector = StopwordDetector::new();
        assert_eq!(
            detector.detect("This program converts files of one format into another"),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_detect_french() {
        let detector = StopwordDetector::new();
        assert_eq!(
            detector.detect("Ce programme convertit les fichiers d'un format dans un autre"),
            Some("fr".to_string())
        );
    }

    #[test]
    fn test_inconclusive() {
        let detector = StopwordDetector::new();
        assert_eq!(detector.detect(""), None);
        assert_eq!(detector.detect("42"), None);
        assert_eq!(detector.detect("Lorem ipsum"), None);
    }
}
