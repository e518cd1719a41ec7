//! Classical single-pattern exact matching.
//!
//! Every algorithm answers the same two questions, "where is the first
//! occurrence" and "where are all occurrences (overlaps included)", and
//! they are interchangeable behind [`ExactMatcher`]. They also serve as
//! the brute-force baselines the multi-pattern and suffix-tree indexes are
//! checked against.
//!
//! Positions are character offsets into the text.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::matching::{Algorithm, ExactMatcher};
//!
//! let matcher = ExactMatcher::new(Algorithm::Kmp);
//! assert_eq!(matcher.search("abracadabra", "cad").unwrap(), Some(4));
//! assert_eq!(matcher.search_all("abracadabra", "abra").unwrap(), vec![0, 7]);
//! ```

mod kmp;
mod shift;
mod z;

use crate::error::Result;

/// The exact-matching algorithm used by an [`ExactMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Algorithm {
    /// Try every window: O(n·m).
    BruteForce,
    /// Knuth-Morris-Pratt with a prefix-function failure table: O(n+m).
    #[default]
    Kmp,
    /// Boyer-Moore-Horspool, right-to-left with a last-character shift.
    Horspool,
    /// Sunday, left-to-right with a shift keyed on the character after the
    /// window.
    Sunday,
    /// Z-algorithm over `pattern + separator + text`.
    Z,
}

/// Configured single-pattern matcher.
///
/// Only [`Algorithm::Z`] consults the separator; it must be a character
/// absent from both the text and the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ExactMatcher {
    algorithm: Algorithm,
    separator: char,
}

/// Default separator for the Z-algorithm.
pub const DEFAULT_SEPARATOR: char = '\u{0}';

impl Default for ExactMatcher {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl ExactMatcher {
    /// Create a matcher for the given algorithm.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Use `separator` when concatenating for the Z-algorithm.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The configured Z-algorithm separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Find the first occurrence of `pattern` in `text`.
    ///
    /// An empty pattern matches at offset 0.
    ///
    /// # Errors
    ///
    /// Only [`Algorithm::Z`] can fail, with `InvalidArgument` when the
    /// separator occurs in either input.
    pub fn search(&self, text: &str, pattern: &str) -> Result<Option<usize>> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();

        if self.algorithm == Algorithm::Z {
            return Ok(z::z_find_all(&text, &pattern, self.separator)?
                .first()
                .copied());
        }
        if pattern.is_empty() {
            return Ok(Some(0));
        }

        let mut first = None;
        self.scan(&text, &pattern, |i| {
            first = Some(i);
            false
        });
        Ok(first)
    }

    /// Find every occurrence of `pattern` in `text`, overlapping ones
    /// included, in ascending order.
    ///
    /// An empty pattern matches at every offset `0..=text.len()`.
    ///
    /// # Errors
    ///
    /// Only [`Algorithm::Z`] can fail, with `InvalidArgument` when the
    /// separator occurs in either input.
    pub fn search_all(&self, text: &str, pattern: &str) -> Result<Vec<usize>> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();

        if self.algorithm == Algorithm::Z {
            return z::z_find_all(&text, &pattern, self.separator);
        }
        if pattern.is_empty() {
            return Ok((0..=text.len()).collect());
        }

        let mut hits = Vec::new();
        self.scan(&text, &pattern, |i| {
            hits.push(i);
            true
        });
        Ok(hits)
    }

    fn scan<F>(&self, text: &[char], pattern: &[char], on_match: F)
    where
        F: FnMut(usize) -> bool,
    {
        match self.algorithm {
            Algorithm::BruteForce => brute_force_scan(text, pattern, on_match),
            Algorithm::Kmp => kmp::scan(text, pattern, on_match),
            Algorithm::Horspool => shift::horspool_scan(text, pattern, on_match),
            Algorithm::Sunday => shift::sunday_scan(text, pattern, on_match),
            Algorithm::Z => unreachable!("Z-algorithm is dispatched before scanning"),
        }
    }
}

fn brute_force_scan<F>(text: &[char], pattern: &[char], mut on_match: F)
where
    F: FnMut(usize) -> bool,
{
    let m = pattern.len();
    if m > text.len() {
        return;
    }
    for k in 0..=text.len() - m {
        if text[k..k + m] == *pattern && !on_match(k) {
            return;
        }
    }
}

/// First occurrence by brute force. See [`ExactMatcher::search`].
pub fn brute_force_search(text: &str, pattern: &str) -> Option<usize> {
    first_with(Algorithm::BruteForce, text, pattern)
}

/// First occurrence by Knuth-Morris-Pratt. See [`ExactMatcher::search`].
pub fn kmp_search(text: &str, pattern: &str) -> Option<usize> {
    first_with(Algorithm::Kmp, text, pattern)
}

/// First occurrence by Boyer-Moore-Horspool. See [`ExactMatcher::search`].
pub fn horspool_search(text: &str, pattern: &str) -> Option<usize> {
    first_with(Algorithm::Horspool, text, pattern)
}

/// First occurrence by Sunday's algorithm. See [`ExactMatcher::search`].
pub fn sunday_search(text: &str, pattern: &str) -> Option<usize> {
    first_with(Algorithm::Sunday, text, pattern)
}

/// All occurrences by the Z-algorithm.
///
/// # Errors
///
/// Returns `InvalidArgument` if `separator` occurs in `text` or `pattern`.
pub fn z_search(text: &str, pattern: &str, separator: char) -> Result<Vec<usize>> {
    ExactMatcher::new(Algorithm::Z)
        .with_separator(separator)
        .search_all(text, pattern)
}

fn first_with(algorithm: Algorithm, text: &str, pattern: &str) -> Option<usize> {
    // Non-Z algorithms have no failure modes
    ExactMatcher::new(algorithm)
        .search(text, pattern)
        .unwrap_or(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SCANNING: [Algorithm; 4] = [
        Algorithm::BruteForce,
        Algorithm::Kmp,
        Algorithm::Horspool,
        Algorithm::Sunday,
    ];

    const ALL: [Algorithm; 5] = [
        Algorithm::BruteForce,
        Algorithm::Kmp,
        Algorithm::Horspool,
        Algorithm::Sunday,
        Algorithm::Z,
    ];

    #[test]
    fn test_first_occurrence() {
        for algorithm in ALL {
            let matcher = ExactMatcher::new(algorithm);
            assert_eq!(
                matcher.search("hello world", "world").unwrap(),
                Some(6),
                "{:?}",
                algorithm
            );
            assert_eq!(matcher.search("hello world", "xyz").unwrap(), None);
            assert_eq!(matcher.search("abc", "abcd").unwrap(), None);
            assert_eq!(matcher.search("aaab", "aab").unwrap(), Some(1));
        }
    }

    #[test]
    fn test_all_occurrences() {
        for algorithm in ALL {
            let matcher = ExactMatcher::new(algorithm);
            assert_eq!(
                matcher.search_all("aaa", "aa").unwrap(),
                vec![0, 1],
                "{:?}",
                algorithm
            );
            assert_eq!(
                matcher.search_all("abcabcab", "cab").unwrap(),
                vec![2, 5]
            );
            assert!(matcher.search_all("", "a").unwrap().is_empty());
        }
    }

    #[test]
    fn test_empty_pattern() {
        for algorithm in ALL {
            let matcher = ExactMatcher::new(algorithm);
            assert_eq!(matcher.search("abc", "").unwrap(), Some(0));
            assert_eq!(matcher.search_all("abc", "").unwrap(), vec![0, 1, 2, 3]);
            assert_eq!(matcher.search_all("", "").unwrap(), vec![0]);
        }
    }

    #[test]
    fn test_unicode_offsets_are_characters() {
        for algorithm in ALL {
            let matcher = ExactMatcher::new(algorithm);
            assert_eq!(matcher.search("日本語のテキスト", "テキ").unwrap(), Some(4));
        }
    }

    #[test]
    fn test_z_separator_collision() {
        let matcher = ExactMatcher::new(Algorithm::Z).with_separator('#');
        assert!(matches!(
            matcher.search("a#b", "b"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            z_search("ab", "#", '#'),
            Err(Error::InvalidArgument(_))
        ));
        // Other algorithms never look at the separator
        for algorithm in SCANNING {
            let matcher = ExactMatcher::new(algorithm).with_separator('#');
            assert_eq!(matcher.search("a#b", "#b").unwrap(), Some(1));
        }
    }

    #[test]
    fn test_free_functions() {
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(brute_force_search(text, "the"), Some(0));
        assert_eq!(kmp_search(text, "fox"), Some(16));
        assert_eq!(horspool_search(text, "lazy"), Some(35));
        assert_eq!(sunday_search(text, "dog"), Some(40));
        assert_eq!(z_search(text, "the", '$').unwrap(), vec![0, 31]);
        assert_eq!(sunday_search(text, "cat"), None);
    }

    #[test]
    fn test_default_matcher() {
        let matcher = ExactMatcher::default();
        assert_eq!(matcher.algorithm(), Algorithm::Kmp);
        assert_eq!(matcher.separator(), DEFAULT_SEPARATOR);
    }
}
