//! Z-algorithm search.

use crate::error::{Error, Result};

/// Compute the Z-array of `s`.
///
/// `z[i]` is the length of the longest common prefix of `s` and `s[i..]`.
/// `z[0]` is defined as `s.len()`.
pub(crate) fn z_array(s: &[char]) -> Vec<usize> {
    let n = s.len();
    let mut z = vec![0; n];
    if n == 0 {
        return z;
    }
    z[0] = n;

    // [left, right) is the rightmost window known to match a prefix of s
    let (mut left, mut right) = (0, 0);
    for i in 1..n {
        if i < right {
            z[i] = (right - i).min(z[i - left]);
        }
        while i + z[i] < n && s[z[i]] == s[i + z[i]] {
            z[i] += 1;
        }
        if i + z[i] > right {
            left = i;
            right = i + z[i];
        }
    }
    z
}

/// Find every occurrence of `pattern` in `text` with the Z-algorithm.
///
/// The search runs over `pattern + separator + text`, so `separator` must
/// not occur in either input.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `separator` occurs in `text` or
/// `pattern`.
pub(crate) fn z_find_all(text: &[char], pattern: &[char], separator: char) -> Result<Vec<usize>> {
    if text.contains(&separator) || pattern.contains(&separator) {
        return Err(Error::InvalidArgument(format!(
            "separator {:?} occurs in the searched strings",
            separator
        )));
    }

    let m = pattern.len();
    if m == 0 {
        return Ok((0..=text.len()).collect());
    }

    let mut combined = Vec::with_capacity(m + 1 + text.len());
    combined.extend_from_slice(pattern);
    combined.push(separator);
    combined.extend_from_slice(text);

    let z = z_array(&combined);
    Ok((m + 1..combined.len())
        .filter(|&j| z[j] == m)
        .map(|j| j - m - 1)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_z_array() {
        assert_eq!(z_array(&chars("aabxaab")), vec![7, 1, 0, 0, 3, 1, 0]);
        assert_eq!(z_array(&chars("aaaaa")), vec![5, 4, 3, 2, 1]);
        assert!(z_array(&[]).is_empty());
    }

    #[test]
    fn test_z_find_all() {
        assert_eq!(
            z_find_all(&chars("abababa"), &chars("aba"), '$').unwrap(),
            vec![0, 2, 4]
        );
        assert!(z_find_all(&chars("abc"), &chars("d"), '$').unwrap().is_empty());
    }

    #[test]
    fn test_separator_collision() {
        let err = z_find_all(&chars("a$b"), &chars("b"), '$').unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = z_find_all(&chars("ab"), &chars("$"), '$').unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
