//! Distance metric implementations.
//!
//! These are the metrics the BK-tree and the corrector are built on. All of
//! them work on Unicode scalar values, not bytes.
//!
//! - **Standard**: Levenshtein distance (insert, delete, substitute)
//! - **Transposition**: restricted Damerau-Levenshtein (adds adjacent swaps)
//! - **Hamming**: substitutions only, defined for equal-length inputs

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Signature of a pluggable string metric.
pub type DistanceFn = fn(&str, &str) -> usize;

/// Strip common prefix and suffix from two character sequences.
///
/// Returns `(start_offset, adjusted_len_a, adjusted_len_b)` where:
/// - `start_offset`: Number of common prefix characters
/// - `adjusted_len_a`: Length of first sequence minus common prefix/suffix
/// - `adjusted_len_b`: Length of second sequence minus common prefix/suffix
///
/// Edit distance is invariant under shared affixes, so only the differing
/// middle has to go through the dynamic program.
#[inline]
pub(crate) fn strip_common_affixes(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let len_a = a.len();
    let len_b = b.len();

    if len_a == 0 || len_b == 0 {
        return (0, len_a, len_b);
    }

    let min_len = len_a.min(len_b);
    let mut prefix_len = 0;
    while prefix_len < min_len && a[prefix_len] == b[prefix_len] {
        prefix_len += 1;
    }

    if prefix_len == min_len {
        // One sequence is a prefix of the other
        return (prefix_len, len_a - prefix_len, len_b - prefix_len);
    }

    // Suffix must not overlap the prefix
    let mut suffix_len = 0;
    while suffix_len < (min_len - prefix_len) && a[len_a - 1 - suffix_len] == b[len_b - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    (
        prefix_len,
        len_a - prefix_len - suffix_len,
        len_b - prefix_len - suffix_len,
    )
}

/// Compute standard Levenshtein distance between two strings.
///
/// Uses dynamic programming to compute the minimum number of
/// single-character edits (insertions, deletions, substitutions)
/// required to transform `source` into `target`.
///
/// # Example
///
/// ```rust
/// use libstrmatch::distance::standard_distance;
///
/// assert_eq!(standard_distance("kitten", "sitting"), 3);
/// assert_eq!(standard_distance("test", "test"), 0);
/// ```
pub fn standard_distance(source: &str, target: &str) -> usize {
    let source_chars: SmallVec<[char; 32]> = source.chars().collect();
    let target_chars: SmallVec<[char; 32]> = target.chars().collect();

    let (offset, m, n) = strip_common_affixes(&source_chars, &target_chars);
    let source_chars = &source_chars[offset..offset + m];
    let target_chars = &target_chars[offset..offset + n];

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0; n + 1];

    for i in 1..=m {
        curr_row[0] = i;

        for j in 1..=n {
            let cost = usize::from(source_chars[i - 1] != target_chars[j - 1]);

            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Compute Levenshtein distance with transposition support.
///
/// Extends standard Levenshtein distance to also consider transposition
/// (swapping two adjacent characters) as a single edit operation. This is
/// the restricted (optimal string alignment) variant, which is what the
/// corrector's one-edit neighbourhood generates.
///
/// # Example
///
/// ```rust
/// use libstrmatch::distance::transposition_distance;
///
/// assert_eq!(transposition_distance("ab", "ba"), 1);
/// assert_eq!(transposition_distance("test", "tset"), 1);
/// ```
pub fn transposition_distance(source: &str, target: &str) -> usize {
    let source_chars: SmallVec<[char; 32]> = source.chars().collect();
    let target_chars: SmallVec<[char; 32]> = target.chars().collect();

    let m = source_chars.len();
    let n = target_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Three rows: i-2, i-1 and i
    let mut prev_prev_row = vec![0; n + 1];
    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0; n + 1];

    for i in 1..=m {
        curr_row[0] = i;

        for j in 1..=n {
            let cost = usize::from(source_chars[i - 1] != target_chars[j - 1]);

            let mut best = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);

            if i > 1
                && j > 1
                && source_chars[i - 1] == target_chars[j - 2]
                && source_chars[i - 2] == target_chars[j - 1]
            {
                best = best.min(prev_prev_row[j - 2] + 1);
            }

            curr_row[j] = best;
        }

        std::mem::swap(&mut prev_prev_row, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Count the positions at which two equal-length strings differ.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when the inputs have different lengths
/// (in characters).
///
/// # Example
///
/// ```rust
/// use libstrmatch::distance::hamming_distance;
///
/// assert_eq!(hamming_distance("karolin", "kathrin").unwrap(), 3);
/// assert!(hamming_distance("abc", "ab").is_err());
/// ```
pub fn hamming_distance(source: &str, target: &str) -> Result<usize> {
    let source_len = source.chars().count();
    let target_len = target.chars().count();
    if source_len != target_len {
        return Err(Error::InvalidArgument(format!(
            "hamming distance needs equal lengths, got {} and {}",
            source_len, target_len
        )));
    }

    Ok(source
        .chars()
        .zip(target.chars())
        .filter(|(a, b)| a != b)
        .count())
}
