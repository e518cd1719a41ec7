//! Bad-character shift searches: Horspool and Sunday.
//!
//! Both skip ahead using a table keyed by a text character. Horspool looks
//! at the last character of the current window and compares right to left;
//! Sunday looks at the character just past the window and compares left to
//! right.

use rustc_hash::FxHashMap;

/// Shift table for Horspool: distance from the rightmost occurrence of each
/// character (excluding the pattern's last position) to the pattern end.
fn horspool_table(pattern: &[char]) -> FxHashMap<char, usize> {
    let m = pattern.len();
    let mut table = FxHashMap::default();
    for (i, &c) in pattern.iter().enumerate().take(m.saturating_sub(1)) {
        table.insert(c, m - 1 - i);
    }
    table
}

/// Shift table for Sunday: distance from the rightmost occurrence of each
/// character to one past the pattern end.
fn sunday_table(pattern: &[char]) -> FxHashMap<char, usize> {
    let m = pattern.len();
    let mut table = FxHashMap::default();
    for (i, &c) in pattern.iter().enumerate() {
        table.insert(c, m - i);
    }
    table
}

/// Reports every window start accepted by a shift search to `on_match`,
/// stopping when it returns `false`. `pattern` must be non-empty.
pub(crate) fn horspool_scan<F>(text: &[char], pattern: &[char], mut on_match: F)
where
    F: FnMut(usize) -> bool,
{
    let n = text.len();
    let m = pattern.len();
    if m > n {
        return;
    }
    let table = horspool_table(pattern);

    let mut i = 0;
    while i + m <= n {
        let mut j = m;
        while j > 0 && text[i + j - 1] == pattern[j - 1] {
            j -= 1;
        }
        if j == 0 && !on_match(i) {
            return;
        }
        i += table.get(&text[i + m - 1]).copied().unwrap_or(m);
    }
}

/// Sunday counterpart of [`horspool_scan`].
pub(crate) fn sunday_scan<F>(text: &[char], pattern: &[char], mut on_match: F)
where
    F: FnMut(usize) -> bool,
{
    let n = text.len();
    let m = pattern.len();
    if m > n {
        return;
    }
    let table = sunday_table(pattern);

    let mut i = 0;
    while i + m <= n {
        let mut j = 0;
        while j < m && text[i + j] == pattern[j] {
            j += 1;
        }
        if j == m && !on_match(i) {
            return;
        }
        let next = i + m;
        if next >= n {
            return;
        }
        i += table.get(&text[next]).copied().unwrap_or(m + 1);
    }
}
