//! # libstrmatch
//!
//! String indexing and matching: prefix tries, Aho-Corasick automata, suffix
//! trees, BK-trees and the classical single-pattern exact matchers.
//!
//! Every index stores its nodes in a flat arena and links them by integer
//! index, so failure links and suffix links never form ownership cycles.
//! Deep traversals use explicit stacks, which keeps pathological inputs
//! (long keywords, highly repetitive texts) from exhausting the call stack.
//! Offsets and lengths are measured in `char`s.
//!
//! ## Example
//!
//! ```rust
//! use libstrmatch::prelude::*;
//!
//! // Multi-pattern search
//! let mut automaton = AhoCorasick::from_keywords(["he", "she", "his", "hers"]);
//! let found = automaton.search_all("ushers");
//! assert_eq!(found["hers"], vec![2]);
//!
//! // Substring index
//! let tree = SuffixTree::from_text("mississippi")?;
//! assert_eq!(tree.count("issi")?, 2);
//!
//! // Approximate lookup
//! let words = BkTree::build(["cat", "cap", "bat", "cats"]);
//! assert_eq!(words.query("cat", 1, 2)?.len(), 2);
//!
//! // Single-pattern search
//! let kmp = ExactMatcher::new(Algorithm::Kmp);
//! assert_eq!(kmp.search_all("abababa", "aba")?, vec![0, 2, 4]);
//! # Ok::<(), libstrmatch::Error>(())
//! ```
//!
//! ## Logging
//!
//! Lifecycle events (suffix-tree construction, automaton finalization,
//! BK-tree builds, corrector tier selection) are reported through
//! [`tracing`]. The crate never installs a subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod correction;
pub mod dictionary;
pub mod distance;
pub mod error;
pub mod matching;

#[cfg(feature = "serialization")]
pub mod serialization;

pub use error::{Error, Result};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::correction::{CaseStyle, CorrectionStrategy, Corrector, CorrectorConfig};
    pub use crate::dictionary::aho_corasick::{AhoCorasick, Match, MatchMap};
    pub use crate::dictionary::bk_tree::{BkTree, Candidate};
    pub use crate::dictionary::suffix_tree::{SuffixTree, SuffixTreeConfig};
    pub use crate::dictionary::trie::Trie;
    pub use crate::dictionary::{Dictionary, SharedDictionary, SyncStrategy, TermOrder};
    pub use crate::distance::{standard_distance, transposition_distance};
    pub use crate::error::{Error, Result};
    pub use crate::matching::{Algorithm, ExactMatcher};

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{BkTreeSerializer, JsonSerializer, SerializationError};
}
