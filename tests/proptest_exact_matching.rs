//! Property-based cross-checks of the exact-matching algorithms.
//!
//! Every algorithm must report exactly the offsets a naive window scan
//! finds, overlapping occurrences included.

use libstrmatch::matching::*;
use proptest::prelude::*;

const ALGORITHMS: [Algorithm; 5] = [
    Algorithm::BruteForce,
    Algorithm::Kmp,
    Algorithm::Horspool,
    Algorithm::Sunday,
    Algorithm::Z,
];

fn naive_positions(text: &str, pattern: &str) -> Vec<usize> {
    let t: Vec<char> = text.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    if p.len() > t.len() {
        return Vec::new();
    }
    (0..=t.len() - p.len())
        .filter(|&i| t[i..i + p.len()] == p[..])
        .collect()
}

// Small alphabets make matches (and overlaps) frequent
fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abc]{0,60}").unwrap()
}

fn arb_pattern() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abc]{0,6}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn search_all_matches_naive_scan(text in arb_text(), pattern in arb_pattern()) {
        let expected = naive_positions(&text, &pattern);
        for algorithm in ALGORITHMS {
            let actual = ExactMatcher::new(algorithm).search_all(&text, &pattern).unwrap();
            prop_assert_eq!(&actual, &expected, "{:?}", algorithm);
        }
    }

    #[test]
    fn search_returns_first_occurrence(text in arb_text(), pattern in arb_pattern()) {
        let expected = naive_positions(&text, &pattern).first().copied();
        for algorithm in ALGORITHMS {
            let actual = ExactMatcher::new(algorithm).search(&text, &pattern).unwrap();
            prop_assert_eq!(actual, expected, "{:?}", algorithm);
        }
    }

    #[test]
    fn free_functions_agree(text in arb_text(), pattern in arb_pattern()) {
        let expected = brute_force_search(&text, &pattern);
        prop_assert_eq!(kmp_search(&text, &pattern), expected);
        prop_assert_eq!(horspool_search(&text, &pattern), expected);
        prop_assert_eq!(sunday_search(&text, &pattern), expected);
        prop_assert_eq!(z_search(&text, &pattern, '#').unwrap().first().copied(), expected);
    }

    #[test]
    fn unicode_offsets_are_char_based(
        text in prop::string::string_regex("[αβγ]{0,30}").unwrap(),
        pattern in prop::string::string_regex("[αβγ]{1,3}").unwrap(),
    ) {
        let expected = naive_positions(&text, &pattern);
        for algorithm in ALGORITHMS {
            let actual = ExactMatcher::new(algorithm).search_all(&text, &pattern).unwrap();
            prop_assert_eq!(&actual, &expected, "{:?}", algorithm);
        }
    }
}

#[test]
fn z_rejects_separator_in_input() {
    let matcher = ExactMatcher::new(Algorithm::Z).with_separator('|');
    assert!(matcher.search_all("a|b", "a").is_err());
    assert!(matcher.search_all("ab", "|").is_err());
}
