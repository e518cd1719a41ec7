//! Spelling correction over a ranked word list.
//!
//! [`Corrector`] suggests the most frequent known words close to a
//! (possibly misspelled) input. Two strategies are available:
//!
//! - [`CorrectionStrategy::EditCandidates`] enumerates every string within
//!   one, then two, edits of the input and keeps the known ones. The first
//!   non-empty tier wins: the word itself, known one-edit neighbours, known
//!   two-edit neighbours, and finally the input unchanged.
//! - [`CorrectionStrategy::MetricTree`] answers from a BK-tree over the
//!   word list, ranking by `(distance, rank)`.
//!
//! Casing of the input is detected once ([`CaseStyle`]) and re-applied to
//! every suggestion.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::correction::Corrector;
//!
//! let corrector = Corrector::new(["the", "of", "spelling", "spewing"]);
//!
//! assert_eq!(corrector.correct("speling", 1), vec!["spelling"]);
//! assert_eq!(corrector.correct("Speling", 1), vec!["Spelling"]);
//! assert_eq!(corrector.correct("xyzzy", 3), vec!["xyzzy"]);
//! ```

mod case;
mod edits;

pub use self::case::CaseStyle;
pub use self::edits::{one_edit_words, two_edit_words, ASCII_LOWERCASE};

use rustc_hash::FxHashMap;

use crate::dictionary::bk_tree::BkTree;

/// How a [`Corrector`] generates candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CorrectionStrategy {
    /// Enumerate edit neighbourhoods (up to two edits) and keep known words.
    #[default]
    EditCandidates,
    /// Query a BK-tree over the word list with the given tolerance.
    MetricTree {
        /// Maximum edit distance of a suggestion.
        tolerance: usize,
    },
}

/// Configuration for [`Corrector`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CorrectorConfig {
    /// Characters used for substitutions and insertions.
    pub alphabet: String,
    /// Candidate generation strategy.
    pub strategy: CorrectionStrategy,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            alphabet: ASCII_LOWERCASE.to_owned(),
            strategy: CorrectionStrategy::default(),
        }
    }
}

/// Which candidate tier produced a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Known,
    OneEdit,
    TwoEdits,
    Unknown,
}

/// Frequency-ranked spelling corrector.
#[derive(Debug, Clone)]
pub struct Corrector {
    config: CorrectorConfig,
    /// 1-based rank of each known word, most frequent first.
    ranks: FxHashMap<String, usize>,
    tree: Option<BkTree>,
}

impl Corrector {
    /// Create a corrector from a ranked word list, most frequent first.
    pub fn new<I, S>(ranked_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(ranked_words, CorrectorConfig::default())
    }

    /// Create a corrector with a custom configuration.
    ///
    /// Words are lowercased. A word listed more than once keeps the rank of
    /// its first occurrence.
    pub fn with_config<I, S>(ranked_words: I, config: CorrectorConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        let mut ranks = FxHashMap::default();
        for word in ranked_words {
            let word = word.as_ref().to_lowercase();
            if !ranks.contains_key(&word) {
                ranks.insert(word.clone(), ordered.len() + 1);
                ordered.push(word);
            }
        }

        let tree = match config.strategy {
            CorrectionStrategy::MetricTree { .. } => Some(BkTree::build(&ordered)),
            CorrectionStrategy::EditCandidates => None,
        };

        Self {
            config,
            ranks,
            tree,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Rank of a known word (case-insensitive), 1 being the most frequent.
    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(&word.to_lowercase()).copied()
    }

    /// Check if `word` is known (case-insensitive).
    pub fn is_known(&self, word: &str) -> bool {
        self.rank(word).is_some()
    }

    /// Number of distinct known words.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if the word list is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Up to `top_n` suggestions for `word`, best first, in the casing of
    /// `word`.
    ///
    /// When nothing known is close enough, the single suggestion is the
    /// input itself (lowercased, then re-cased).
    pub fn correct(&self, word: &str, top_n: usize) -> Vec<String> {
        if top_n == 0 {
            return Vec::new();
        }
        let case = CaseStyle::detect(word);
        let lowered = word.to_lowercase();

        let suggestions = match (&self.config.strategy, &self.tree) {
            (CorrectionStrategy::MetricTree { tolerance }, Some(tree)) => tree
                .query(&lowered, *tolerance, top_n)
                .map(|hits| hits.into_iter().map(|hit| hit.word).collect())
                .unwrap_or_default(),
            _ => self.edit_candidates(&lowered, top_n),
        };

        if suggestions.is_empty() {
            return vec![case.apply(&lowered)];
        }
        suggestions.iter().map(|s| case.apply(s)).collect()
    }

    /// Known candidates from the first non-empty edit tier, ranked.
    fn edit_candidates(&self, word: &str, top_n: usize) -> Vec<String> {
        let alphabet = &self.config.alphabet;
        let known = |candidates: &mut dyn Iterator<Item = String>| -> Vec<(usize, String)> {
            candidates
                .filter_map(|c| self.ranks.get(&c).map(|&rank| (rank, c)))
                .collect()
        };

        let (tier, mut ranked) = if let Some(&rank) = self.ranks.get(word) {
            (Tier::Known, vec![(rank, word.to_owned())])
        } else {
            let one_edit = one_edit_words(word, alphabet);
            let hits = known(&mut one_edit.iter().cloned());
            if !hits.is_empty() {
                (Tier::OneEdit, hits)
            } else {
                let hits = known(&mut one_edit.iter().flat_map(|e| one_edit_words(e, alphabet)));
                if hits.is_empty() {
                    (Tier::Unknown, hits)
                } else {
                    (Tier::TwoEdits, hits)
                }
            }
        };

        ranked.sort_unstable();
        ranked.dedup();
        ranked.truncate(top_n);
        tracing::debug!(word, tier = ?tier, candidates = ranked.len(), "correction tier selected");

        ranked.into_iter().map(|(_, w)| w).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<&'static str> {
        vec![
            "the", "of", "and", "to", "in", "is", "that", "for", "it", "was", "on", "are", "as",
            "with", "his", "they", "at", "be", "this", "from", "have", "or", "by", "one", "had",
            "not", "but", "what", "all", "were", "when", "we", "there", "can", "an", "your",
            "which", "their", "said", "if", "do", "will", "each", "about", "how", "up", "out",
            "them", "then", "she", "many", "some", "so", "these", "would", "other", "into", "has",
            "more", "her", "two", "like", "him", "see", "time", "could", "no", "make", "than",
            "first", "been", "its", "who", "now", "people", "my", "made", "over", "did", "down",
            "only", "way", "find", "use", "may", "water", "long", "little", "very", "after",
            "words", "called", "just", "where", "most", "know", "spelling", "corrector",
        ]
    }

    #[test]
    fn test_known_word_is_returned_alone() {
        let corrector = Corrector::new(vocabulary());
        assert_eq!(corrector.correct("the", 5), vec!["the"]);
    }

    #[test]
    fn test_one_edit_tier_ranked_by_frequency() {
        let corrector = Corrector::new(vocabulary());
        // "thn" is one edit from "the", "then", "than" and "thin"(unknown)
        assert_eq!(corrector.correct("thn", 3), vec!["the", "then", "than"]);
    }

    #[test]
    fn test_two_edit_tier() {
        let corrector = Corrector::new(vocabulary());
        assert_eq!(corrector.correct("speing", 1), vec!["spelling"]);
        assert_eq!(corrector.correct("korrectr", 1), vec!["corrector"]);
    }

    #[test]
    fn test_one_edit_tier_shadows_two_edit_tier() {
        let corrector = Corrector::new(["abc", "xb"]);
        // "xb" is one edit away and "abc" two; the closer tier wins even
        // though "abc" ranks higher
        assert_eq!(corrector.correct("b", 5), vec!["xb"]);
    }

    #[test]
    fn test_unknown_word_falls_back_to_itself() {
        let corrector = Corrector::new(vocabulary());
        assert_eq!(corrector.correct("qqqqqqq", 5), vec!["qqqqqqq"]);
        assert_eq!(corrector.correct("QQQQQQQ", 5), vec!["QQQQQQQ"]);
    }

    #[test]
    fn test_casing_restored() {
        let corrector = Corrector::new(vocabulary());
        assert_eq!(corrector.correct("SPELING", 1), vec!["SPELLING"]);
        assert_eq!(corrector.correct("Speling", 1), vec!["Spelling"]);
        assert_eq!(corrector.correct("The", 1), vec!["The"]);
    }

    #[test]
    fn test_top_n_zero() {
        let corrector = Corrector::new(vocabulary());
        assert!(corrector.correct("thn", 0).is_empty());
    }

    #[test]
    fn test_ranks() {
        let corrector = Corrector::new(["Alpha", "beta", "alpha"]);
        assert_eq!(corrector.len(), 2);
        assert_eq!(corrector.rank("ALPHA"), Some(1));
        assert_eq!(corrector.rank("beta"), Some(2));
        assert!(!corrector.is_known("gamma"));
    }

    #[test]
    fn test_metric_tree_strategy() {
        let config = CorrectorConfig {
            strategy: CorrectionStrategy::MetricTree { tolerance: 2 },
            ..CorrectorConfig::default()
        };
        let corrector = Corrector::with_config(vocabulary(), config);
        assert_eq!(corrector.correct("speling", 1), vec!["spelling"]);
        // Ranked by distance first: "the" (0) then distance-1 words by rank
        assert_eq!(corrector.correct("The", 3), vec!["The", "They", "Them"]);
        assert_eq!(corrector.correct("qqqqqqq", 2), vec!["qqqqqqq"]);
    }

    #[test]
    fn test_metric_tree_with_empty_word_list() {
        let config = CorrectorConfig {
            strategy: CorrectionStrategy::MetricTree { tolerance: 1 },
            ..CorrectorConfig::default()
        };
        let corrector = Corrector::with_config(Vec::<String>::new(), config);
        assert!(corrector.is_empty());
        assert_eq!(corrector.correct("word", 3), vec!["word"]);
    }

    #[test]
    fn test_custom_alphabet() {
        let config = CorrectorConfig {
            alphabet: "ab".to_owned(),
            ..CorrectorConfig::default()
        };
        let restricted = Corrector::with_config(["cd"], config);
        assert_eq!(restricted.correct("d", 5), vec!["d"]);

        let full = Corrector::new(["cd"]);
        assert_eq!(full.correct("d", 5), vec!["cd"]);
    }
}
