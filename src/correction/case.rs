//! Casing detection and restoration.
//!
//! Lookups run on lowercased words; the caller's casing is detected once
//! from the input and re-applied to every suggestion.

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

/// Casing pattern of a word.
///
/// Detection checks the styles in declaration order, so a single capital
/// letter such as `"I"` is [`Upper`](CaseStyle::Upper) rather than
/// [`Title`](CaseStyle::Title).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CaseStyle {
    /// At least one cased character and every cased character uppercase.
    Upper,
    /// At least one cased character and every cased character lowercase.
    Lower,
    /// Every run of cased characters starts uppercase and continues lowercase.
    Title,
    /// Anything else, including words without cased characters.
    #[default]
    Unchanged,
}

impl CaseStyle {
    /// Detect the casing pattern of `word`.
    ///
    /// ```rust
    /// use libstrmatch::correction::CaseStyle;
    ///
    /// assert_eq!(CaseStyle::detect("NASA"), CaseStyle::Upper);
    /// assert_eq!(CaseStyle::detect("speling"), CaseStyle::Lower);
    /// assert_eq!(CaseStyle::detect("New York"), CaseStyle::Title);
    /// assert_eq!(CaseStyle::detect("iPhone"), CaseStyle::Unchanged);
    /// ```
    pub fn detect(word: &str) -> Self {
        if Self::all_cased_match(word, char::is_uppercase) {
            CaseStyle::Upper
        } else if Self::all_cased_match(word, char::is_lowercase) {
            CaseStyle::Lower
        } else if Self::is_title(word) {
            CaseStyle::Title
        } else {
            CaseStyle::Unchanged
        }
    }

    /// Re-case `word` according to this style.
    pub fn apply(self, word: &str) -> String {
        match self {
            CaseStyle::Upper => word.to_uppercase(),
            CaseStyle::Lower => word.to_lowercase(),
            CaseStyle::Title => {
                let mut out = String::with_capacity(word.len());
                let mut after_cased = false;
                for c in word.chars() {
                    if after_cased {
                        out.extend(c.to_lowercase());
                    } else {
                        out.extend(c.to_uppercase());
                    }
                    after_cased = is_cased(c);
                }
                out
            }
            CaseStyle::Unchanged => word.to_owned(),
        }
    }

    fn all_cased_match(word: &str, predicate: fn(char) -> bool) -> bool {
        let mut any = false;
        for c in word.chars().filter(|&c| is_cased(c)) {
            if !predicate(c) {
                return false;
            }
            any = true;
        }
        any
    }

    fn is_title(word: &str) -> bool {
        let mut any = false;
        let mut after_cased = false;
        for c in word.chars() {
            if c.is_uppercase() {
                if after_cased {
                    return false;
                }
                after_cased = true;
                any = true;
            } else if c.is_lowercase() {
                if !after_cased {
                    return false;
                }
                after_cased = true;
                any = true;
            } else {
                after_cased = false;
            }
        }
        any
    }
}
