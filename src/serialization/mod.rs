//! BK-tree persistence.
//!
//! Trees are stored as a versioned document whose nodes carry their word,
//! their rank, and their children keyed by distance. Distances are written
//! as decimal strings so the schema fits formats whose maps only allow
//! string keys:
//!
//! ```json
//! {
//!   "version": 1,
//!   "root": {
//!     "word": "cat",
//!     "rank": 1,
//!     "children": {
//!       "1": { "word": "cap", "rank": 2, "children": {} }
//!     }
//!   }
//! }
//! ```
//!
//! An empty tree is stored with `"root": null`. Loading restores the exact
//! tree shape, and checks every distance key against the distance function
//! supplied by the caller.
//!
//! Neither direction recurses per tree level, so degenerate trees (a chain
//! of thousands of words, each one edit from the last) persist like any
//! other.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::dictionary::bk_tree::BkTree;
//! use libstrmatch::serialization::{BkTreeSerializer, JsonSerializer};
//!
//! let tree = BkTree::build(["cat", "cap", "bat"]);
//!
//! let mut buffer = Vec::new();
//! JsonSerializer::serialize(&tree, &mut buffer).unwrap();
//!
//! let loaded: BkTree = JsonSerializer::deserialize(buffer.as_slice()).unwrap();
//! assert_eq!(loaded.size(), 3);
//! assert!(loaded.contains("bat"));
//! ```

use std::io::{Read, Write};

use crate::dictionary::bk_tree::BkTree;
use crate::distance::DistanceFn;

mod json;

pub use self::json::JsonSerializer;

/// Schema version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Trait for persisting BK-trees.
pub trait BkTreeSerializer {
    /// Serialize a tree to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn serialize<F, W>(tree: &BkTree<F>, writer: W) -> Result<(), SerializationError>
    where
        F: Fn(&str, &str) -> usize,
        W: Write;

    /// Deserialize a tree that uses standard edit distance.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if the document
    /// does not describe a valid tree.
    fn deserialize<R: Read>(reader: R) -> Result<BkTree<DistanceFn>, SerializationError> {
        Self::deserialize_with(reader, crate::distance::standard_distance as DistanceFn)
    }

    /// Deserialize a tree, attaching `distance` as its metric.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if the document
    /// does not describe a valid tree under `distance`.
    fn deserialize_with<F, R>(reader: R, distance: F) -> Result<BkTree<F>, SerializationError>
    where
        F: Fn(&str, &str) -> usize,
        R: Read;
}

/// Errors that can occur during serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during JSON encoding or decoding
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// The document was written by an unknown schema version
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    /// A child key is not a canonical decimal distance
    #[error("invalid distance key {0:?}")]
    InvalidKey(String),
    /// A record lacks a required field
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// Two children of the same node are stored under one key
    #[error("duplicate distance key {key} below {parent:?}")]
    DuplicateKey {
        /// Parent word
        parent: String,
        /// Repeated key
        key: usize,
    },
    /// A child key disagrees with the distance between the two words
    #[error("distance key {key} does not match distance {actual} between {parent:?} and {child:?}")]
    InconsistentDistance {
        /// Parent word
        parent: String,
        /// Child word
        child: String,
        /// Key stored in the document
        key: usize,
        /// Distance computed while loading
        actual: usize,
    },
}

/// One node read from a persisted document, before it is attached.
///
/// Documents nest records, but readers collect them into a flat list in
/// the order their objects open, so a parent always precedes its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NodeRecord {
    pub(crate) word: Option<String>,
    pub(crate) rank: Option<usize>,
    /// Index of the parent record and the distance key it was stored under.
    pub(crate) parent: Option<(usize, usize)>,
}

/// Rebuild a tree from records listed parents-first.
///
/// # Errors
///
/// - `MissingField` when a record lacks its word or rank
/// - `DuplicateKey` when two children of one node share a distance key
/// - `InconsistentDistance` when a key disagrees with `distance`
pub(crate) fn assemble<F>(
    records: Vec<NodeRecord>,
    distance: F,
) -> Result<BkTree<F>, SerializationError>
where
    F: Fn(&str, &str) -> usize,
{
    let mut tree = BkTree::with_distance(distance);
    let mut placed: Vec<usize> = Vec::with_capacity(records.len());

    for record in records {
        let word = record.word.ok_or(SerializationError::MissingField("word"))?;
        let rank = record.rank.ok_or(SerializationError::MissingField("rank"))?;

        let (parent, key) = match record.parent {
            None => (None, 0),
            Some((parent, key)) => {
                let parent = placed[parent];
                let (parent_word, _, children) = tree.node(parent);
                if children.iter().any(|&(existing, _)| existing == key) {
                    return Err(SerializationError::DuplicateKey {
                        parent: parent_word.to_owned(),
                        key,
                    });
                }
                let actual = tree.distance(parent_word, &word);
                if actual != key {
                    return Err(SerializationError::InconsistentDistance {
                        parent: parent_word.to_owned(),
                        child: word,
                        key,
                        actual,
                    });
                }
                (Some(parent), key)
            }
        };
        placed.push(tree.attach(parent, key, word, rank));
    }
    Ok(tree)
}

/// Parse a distance key, accepting only the canonical decimal spelling so
/// that two keys can never denote the same distance.
fn parse_key(text: &str) -> Result<usize, SerializationError> {
    match text.parse::<usize>() {
        Ok(key) if key.to_string() == text => Ok(key),
        _ => Err(SerializationError::InvalidKey(text.to_owned())),
    }
}
