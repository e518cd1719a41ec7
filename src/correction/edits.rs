//! Edit neighbourhoods: every string one or two edits away from a word.

use rustc_hash::FxHashSet;

/// Lowercase ASCII letters, the default substitution/insertion alphabet.
pub const ASCII_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// All strings one edit away from `word`.
///
/// Edits are deletions, adjacent transpositions, substitutions and
/// insertions; the last two draw characters from `alphabet`. The result may
/// contain `word` itself (e.g. transposing two equal characters).
///
/// ```rust
/// use libstrmatch::correction::{one_edit_words, ASCII_LOWERCASE};
///
/// let edits = one_edit_words("ab", ASCII_LOWERCASE);
/// assert!(edits.contains("a"));   // deletion
/// assert!(edits.contains("ba"));  // transposition
/// assert!(edits.contains("xb"));  // substitution
/// assert!(edits.contains("abc")); // insertion
/// ```
pub fn one_edit_words(word: &str, alphabet: &str) -> FxHashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let alphabet: Vec<char> = alphabet.chars().collect();
    let n = chars.len();
    let mut edits =
        FxHashSet::with_capacity_and_hasher(n * (2 * alphabet.len() + 2) + alphabet.len(), Default::default());

    let splice = |head: &[char], middle: &[char], tail: &[char]| -> String {
        head.iter().chain(middle).chain(tail).collect()
    };

    for i in 0..=n {
        let (head, tail) = chars.split_at(i);
        if !tail.is_empty() {
            edits.insert(splice(head, &[], &tail[1..]));
            for &c in &alphabet {
                edits.insert(splice(head, &[c], &tail[1..]));
            }
        }
        if tail.len() > 1 {
            edits.insert(splice(head, &[tail[1], tail[0]], &tail[2..]));
        }
        for &c in &alphabet {
            edits.insert(splice(head, &[c], tail));
        }
    }
    edits
}

/// All strings within two edits of `word`, built by applying
/// [`one_edit_words`] to each one-edit neighbour.
pub fn two_edit_words(word: &str, alphabet: &str) -> FxHashSet<String> {
    one_edit_words(word, alphabet)
        .iter()
        .flat_map(|edit| one_edit_words(edit, alphabet))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::transposition_distance;

    #[test]
    fn test_one_edit_count() {
        // n deletions, n-1 transpositions, 26n substitutions, 26(n+1)
        // insertions, less duplicates
        let edits = one_edit_words("cat", ASCII_LOWERCASE);
        assert!(edits.len() <= 3 + 2 + 78 + 104);
        assert!(edits.contains("at"));
        assert!(edits.contains("act"));
        assert!(edits.contains("bat"));
        assert!(edits.contains("cats"));
        assert!(edits.contains("cat"));
    }

    #[test]
    fn test_every_edit_is_within_distance_one() {
        for edit in one_edit_words("spell", ASCII_LOWERCASE) {
            assert!(transposition_distance("spell", &edit) <= 1, "{}", edit);
        }
    }

    #[test]
    fn test_empty_word() {
        let edits = one_edit_words("", "ab");
        let mut sorted: Vec<_> = edits.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b"]);
    }

    #[test]
    fn test_custom_alphabet() {
        let edits = one_edit_words("ab", "x");
        let mut sorted: Vec<_> = edits.into_iter().collect();
        sorted.sort();
        assert_eq!(
            sorted,
            vec!["a", "abx", "ax", "axb", "b", "ba", "xab", "xb"]
        );
    }

    #[test]
    fn test_two_edits() {
        let edits = two_edit_words("ab", "x");
        assert!(edits.contains("xx"));
        assert!(edits.contains(""));
        assert!(edits.contains("xabx"));
    }
}
