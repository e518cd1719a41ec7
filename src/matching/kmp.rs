//! Knuth-Morris-Pratt search.

/// Build the KMP failure table.
///
/// `next[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it.
pub(crate) fn failure_table(pattern: &[char]) -> Vec<usize> {
    let mut next = vec![0; pattern.len()];
    let mut j = 0;
    for i in 1..pattern.len() {
        while j > 0 && pattern[i] != pattern[j] {
            j = next[j - 1];
        }
        if pattern[i] == pattern[j] {
            j += 1;
        }
        next[i] = j;
    }
    next
}

/// Scan `text` once, reporting the start of every occurrence of `pattern`
/// to `on_match`. Stops early when the callback returns `false`.
///
/// `pattern` must be non-empty.
pub(crate) fn scan<F>(text: &[char], pattern: &[char], mut on_match: F)
where
    F: FnMut(usize) -> bool,
{
    debug_assert!(!pattern.is_empty());
    let next = failure_table(pattern);
    let m = pattern.len();
    let mut j = 0;

    for (i, &c) in text.iter().enumerate() {
        while j > 0 && c != pattern[j] {
            j = next[j - 1];
        }
        if c == pattern[j] {
            j += 1;
        }
        if j == m {
            if !on_match(i + 1 - m) {
                return;
            }
            // Keep the matched border so overlapping occurrences are found
            j = next[j - 1];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_failure_table() {
        assert_eq!(failure_table(&chars("abab")), vec![0, 0, 1, 2]);
        assert_eq!(failure_table(&chars("aabaaab")), vec![0, 1, 0, 1, 2, 2, 3]);
        assert_eq!(failure_table(&chars("abc")), vec![0, 0, 0]);
    }

    #[test]
    fn test_scan_overlapping() {
        let mut hits = Vec::new();
        scan(&chars("aaaa"), &chars("aa"), |i| {
            hits.push(i);
            true
        });
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn test_scan_stops_early() {
        let mut hits = Vec::new();
        scan(&chars("abcabcabc"), &chars("abc"), |i| {
            hits.push(i);
            false
        });
        assert_eq!(hits, vec![0]);
    }
}
