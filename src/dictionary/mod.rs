//! Keyword indexes and their shared abstractions.
//!
//! This module provides the index structures of the crate:
//!
//! - [`trie::Trie`]: keyword set with per-keyword occurrence counts
//! - [`aho_corasick::AhoCorasick`]: simultaneous search for a keyword set
//! - [`suffix_tree::SuffixTree`]: substring index over a single text
//! - [`bk_tree::BkTree`]: metric tree for approximate word lookup
//!
//! All of them store their nodes in a flat arena addressed by index, so
//! back-links (failure links, suffix links) are plain integers.

use std::sync::Arc;

use parking_lot::RwLock;

pub mod aho_corasick;
pub mod bk_tree;
pub mod suffix_tree;
pub mod trie;

/// Synchronization strategy for dictionary operations.
///
/// Different index structures have different thread-safety phases. This
/// lets wrappers decide how much locking a structure needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Structure is still mutable and requires external synchronization
    /// (e.g., [`SharedDictionary`]) when shared between threads.
    ExternalSync,

    /// Structure is immutable; any number of readers may query it
    /// concurrently without locking.
    Persistent,
}

/// Order in which stored keywords are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermOrder {
    /// Depth-first, children visited in the order they were first inserted.
    #[default]
    Insertion,
    /// Lexicographic by character.
    Lexicographic,
}

/// Read access shared by the keyword-set indexes.
pub trait Dictionary {
    /// Check if a term is stored.
    fn contains(&self, term: &str) -> bool;

    /// Number of distinct stored terms.
    fn len(&self) -> usize;

    /// Check if the dictionary is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored terms, each listed once, in the requested order.
    fn terms(&self, order: TermOrder) -> Vec<String>;

    /// Get the synchronization strategy for the structure's current phase.
    ///
    /// Default: `ExternalSync` (conservative, always safe)
    fn sync_strategy(&self) -> SyncStrategy {
        SyncStrategy::ExternalSync
    }
}

/// Single-writer, many-reader handle around a dictionary.
///
/// Cloning the handle shares the underlying structure. Writers are
/// serialized by the lock; readers proceed concurrently.
///
/// ```rust
/// use libstrmatch::dictionary::{Dictionary, SharedDictionary};
/// use libstrmatch::dictionary::trie::Trie;
///
/// let shared = SharedDictionary::new(Trie::new());
/// shared.write(|trie| trie.insert("apple"));
/// assert!(shared.read(|trie| trie.contains("apple")));
/// ```
#[derive(Debug)]
pub struct SharedDictionary<D> {
    inner: Arc<RwLock<D>>,
}

impl<D> Clone for SharedDictionary<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> SharedDictionary<D> {
    /// Wrap a dictionary for shared access.
    pub fn new(dictionary: D) -> Self {
        Self {
            inner: Arc::new(RwLock::new(dictionary)),
        }
    }

    /// Run `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive write access.
    pub fn write<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<D: Dictionary> SharedDictionary<D> {
    /// Convenience for `read(|d| d.contains(term))`.
    pub fn contains(&self, term: &str) -> bool {
        self.read(|d| d.contains(term))
    }

    /// Convenience for `read(|d| d.len())`.
    pub fn len(&self) -> usize {
        self.read(|d| d.len())
    }

    /// Convenience for `read(|d| d.is_empty())`.
    pub fn is_empty(&self) -> bool {
        self.read(|d| d.is_empty())
    }
}
