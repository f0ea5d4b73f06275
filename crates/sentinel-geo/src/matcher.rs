//! Free-text relevance scoring for names.

use crate::config::GeoConfig;

pub const SCORE_EXACT: u32 = 100;
pub const SCORE_PREFIX: u32 = 80;
pub const SCORE_CONTAINS: u32 = 60;
const SCORE_WORD_BASE: u32 = 40;
const SCORE_PER_WORD: u32 = 10;

/// Scores how well a query matches a candidate name.
///
/// Rules are tried from most to least specific and the first hit wins:
/// exact (100), prefix (80), substring (60), then word prefixes
/// (`40 + 10 * matching query words`). Comparison is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatcher {
    min_word_len: usize,
    clamp: bool,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self {
            min_word_len: 4,
            clamp: true,
        }
    }
}

impl NameMatcher {
    #[must_use]
    pub const fn new(min_word_len: usize, clamp: bool) -> Self {
        Self {
            min_word_len,
            clamp,
        }
    }

    #[must_use]
    pub const fn from_config(config: &GeoConfig) -> Self {
        Self::new(config.min_word_len, config.clamp_scores)
    }

    /// Score in `0..=100` when clamping is on. A blank query scores 0.
    #[must_use]
    pub fn score(&self, query: &str, candidate: &str) -> u32 {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return 0;
        }
        let candidate = candidate.trim().to_lowercase();

        if candidate == query {
            return SCORE_EXACT;
        }
        if candidate.starts_with(&query) {
            return SCORE_PREFIX;
        }
        if candidate.contains(&query) {
            return SCORE_CONTAINS;
        }

        let words = self.matching_words(&query, &candidate);
        if words == 0 {
            return 0;
        }
        let score = SCORE_WORD_BASE + SCORE_PER_WORD * words;
        if self.clamp {
            score.min(SCORE_EXACT)
        } else {
            score
        }
    }

    /// Query words (long enough) that prefix some candidate word.
    fn matching_words(&self, query: &str, candidate: &str) -> u32 {
        let candidate_words: Vec<&str> = candidate.split_whitespace().collect();
        let count = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= self.min_word_len)
            .filter(|w| candidate_words.iter().any(|c| c.starts_with(w)))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// [`NameMatcher::score`] with the default matcher.
#[must_use]
pub fn match_score(query: &str, candidate: &str) -> u32 {
    NameMatcher::default().score(query, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(match_score("Session Road Area", "session road area"), 100);
        assert_eq!(match_score("  IRISAN ", "Irisan"), 100);
    }

    #[test]
    fn test_prefix_and_substring() {
        assert_eq!(match_score("Session", "Session Road Area"), 80);
        assert_eq!(match_score("road area", "Session Road Area"), 60);
        assert!(match_score("Session", "Session Road Area") > match_score("xyz", "Session Road Area"));
    }

    #[test]
    fn test_word_level_match() {
        // Every query word prefixes a candidate word, "luna" included
        assert_eq!(match_score("lower general luna", "General Luna, Lower"), 70);
        // "upper" matches, "gen" is too short to count
        assert_eq!(match_score("gen upper", "Upper General Luna"), 50);
        assert_eq!(match_score("market area", "Bagong Lipunan (Market Area)"), 60);
    }

    #[test]
    fn test_short_words_are_ignored() {
        assert_eq!(match_score("the sm", "SM City Baguio"), 0);
        assert_eq!(match_score("camp x", "Camp 7"), 50);
        assert_eq!(match_score("old camp", "PNP Camp"), 50);
    }

    #[test]
    fn test_no_match_and_blank_query() {
        assert_eq!(match_score("xyz", "Irisan"), 0);
        assert_eq!(match_score("", "Irisan"), 0);
        assert_eq!(match_score("   ", "Irisan"), 0);
    }

    #[test]
    fn test_clamping() {
        let query = "alpha bravo charlie delta echo1 foxtrot golf1 hotel india";
        let candidate = "alpha bravo charlie delta echo1 foxtrot golf1 hotel india extra";
        // Prefix rule fires first for this pair, so reorder the candidate
        let shuffled = "extra india hotel golf1 foxtrot echo1 delta charlie bravo alpha";
        assert_eq!(match_score(query, candidate), 80);
        assert_eq!(match_score(query, shuffled), 100);
        assert_eq!(NameMatcher::new(4, false).score(query, shuffled), 40 + 10 * 9);
    }
}
