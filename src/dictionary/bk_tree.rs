//! Burkhard-Keller tree for approximate word lookup.
//!
//! Every child edge is keyed by the distance between the parent's word and
//! the child's word. When the distance function is a metric, the triangle
//! inequality bounds which subtrees can hold words within a tolerance of
//! the query, so a lookup visits only the children keyed in
//! `[d - tolerance, d + tolerance]`.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::dictionary::bk_tree::BkTree;
//!
//! let tree = BkTree::build(["cat", "cap", "bat", "cats", "dog"]);
//! let hits: Vec<String> = tree
//!     .query("cat", 1, 10)
//!     .unwrap()
//!     .into_iter()
//!     .map(|c| c.word)
//!     .collect();
//!
//! assert_eq!(hits, vec!["cat", "cap", "bat", "cats"]);
//! ```

use std::fmt;

use smallvec::SmallVec;

use super::{Dictionary, TermOrder};
use crate::correction::CaseStyle;
use crate::distance::{standard_distance, DistanceFn};
use crate::error::{Error, Result};

const ROOT: usize = 0;

/// A word returned by [`BkTree::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The indexed word, re-cased to match the query.
    pub word: String,
    /// Distance between the lowercased query and the indexed word.
    pub distance: usize,
    /// Frequency rank of the word; smaller is more frequent.
    pub rank: usize,
}

#[derive(Clone, Debug)]
struct BkNode {
    word: String,
    rank: usize,
    /// `(distance to this node's word, child)`, sorted by distance.
    children: SmallVec<[(usize, usize); 4]>,
}

impl BkNode {
    fn new(word: String, rank: usize) -> Self {
        Self {
            word,
            rank,
            children: SmallVec::new(),
        }
    }

    fn child(&self, distance: usize) -> Option<usize> {
        self.children
            .binary_search_by_key(&distance, |(d, _)| *d)
            .ok()
            .map(|idx| self.children[idx].1)
    }

    fn add_child(&mut self, distance: usize, target: usize) {
        if let Err(idx) = self.children.binary_search_by_key(&distance, |(d, _)| *d) {
            self.children.insert(idx, (distance, target));
        }
    }
}

/// Metric tree over words, parameterized by its distance function.
#[derive(Clone)]
pub struct BkTree<F = DistanceFn> {
    nodes: Vec<BkNode>,
    distance: F,
}

impl<F> fmt::Debug for BkTree<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BkTree")
            .field("size", &self.nodes.len())
            .field("root", &self.nodes.first().map(|node| node.word.as_str()))
            .finish()
    }
}

impl Default for BkTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BkTree {
    /// Create an empty tree using standard edit distance.
    pub fn new() -> Self {
        Self::with_distance(standard_distance as DistanceFn)
    }

    /// Build a tree from a ranked word list, most frequent first.
    ///
    /// Ranks are 1-based positions among the distinct words of `words`.
    /// Repeated words keep the rank of their first occurrence and do not
    /// consume a rank.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        tree.extend_ranked(words);
        tree
    }
}

impl<F> BkTree<F>
where
    F: Fn(&str, &str) -> usize,
{
    /// Create an empty tree with a custom distance function.
    ///
    /// Pruning is only exact when `distance` is a metric (in particular,
    /// when it satisfies the triangle inequality).
    pub fn with_distance(distance: F) -> Self {
        Self {
            nodes: Vec::new(),
            distance,
        }
    }

    /// Insert every word of a ranked list. Ranks continue after the words
    /// already indexed and only advance when a word is actually inserted.
    pub fn extend_ranked<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut offered = 0;
        let mut next_rank = self.size() + 1;
        for word in words {
            if self.insert(word.as_ref(), next_rank) {
                next_rank += 1;
            }
            offered += 1;
        }
        tracing::debug!(
            words = offered,
            size = self.size(),
            depth = self.depth(),
            "bk-tree built"
        );
    }

    /// Insert `word` with frequency rank `rank`.
    ///
    /// Returns `false` and leaves the tree unchanged if the word is already
    /// present.
    pub fn insert(&mut self, word: &str, rank: usize) -> bool {
        if self.nodes.is_empty() {
            self.nodes.push(BkNode::new(word.to_owned(), rank));
            return true;
        }

        let mut current = ROOT;
        loop {
            let node = &self.nodes[current];
            let d = (self.distance)(&node.word, word);
            if d == 0 && node.word == word {
                return false;
            }
            match node.child(d) {
                Some(next) => current = next,
                None => {
                    self.nodes.push(BkNode::new(word.to_owned(), rank));
                    let idx = self.nodes.len() - 1;
                    self.nodes[current].add_child(d, idx);
                    return true;
                }
            }
        }
    }

    /// Check whether `word` is indexed.
    pub fn contains(&self, word: &str) -> bool {
        let mut current = ROOT;
        while let Some(node) = self.nodes.get(current) {
            let d = (self.distance)(&node.word, word);
            if d == 0 && node.word == word {
                return true;
            }
            match node.child(d) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    /// Up to `top_n` indexed words within `tolerance` of `word`, ranked by
    /// `(distance, rank)`.
    ///
    /// The query is lowercased before matching and the casing of `word` is
    /// restored on every returned candidate.
    ///
    /// # Errors
    ///
    /// `NotReady` if nothing has been inserted yet.
    pub fn query(&self, word: &str, tolerance: usize, top_n: usize) -> Result<Vec<Candidate>> {
        if self.nodes.is_empty() {
            return Err(Error::NotReady("bk-tree"));
        }

        let case = CaseStyle::detect(word);
        let word = word.to_lowercase();
        let mut hits: Vec<(usize, usize, usize)> = Vec::new(); // (distance, rank, node)
        let mut stack = vec![ROOT];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            let d = (self.distance)(&word, &node.word);
            if d <= tolerance {
                hits.push((d, node.rank, idx));
            }

            let low = d.saturating_sub(tolerance);
            let high = d.saturating_add(tolerance);
            let from = node.children.partition_point(|(key, _)| *key < low);
            stack.extend(
                node.children[from..]
                    .iter()
                    .take_while(|(key, _)| *key <= high)
                    .map(|(_, child)| *child),
            );
        }

        hits.sort_unstable_by(|a, b| {
            (a.0, a.1)
                .cmp(&(b.0, b.1))
                .then_with(|| self.nodes[a.2].word.cmp(&self.nodes[b.2].word))
        });
        hits.truncate(top_n);

        Ok(hits
            .into_iter()
            .map(|(distance, rank, idx)| Candidate {
                word: case.apply(&self.nodes[idx].word),
                distance,
                rank,
            })
            .collect())
    }

    /// Number of edges on the longest root-to-leaf path (0 for a lone root
    /// or an empty tree).
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(ROOT, 0)];
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.nodes[idx].children.iter().map(|(_, child)| (*child, depth + 1)));
        }
        deepest
    }

    /// Number of indexed words.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Check if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distance between two words under this tree's metric.
    pub fn distance(&self, a: &str, b: &str) -> usize {
        (self.distance)(a, b)
    }

    /// Root node index, if any.
    pub(crate) fn root(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(ROOT)
    }

    /// Word, rank and `(distance, child)` edges of node `idx`.
    pub(crate) fn node(&self, idx: usize) -> (&str, usize, &[(usize, usize)]) {
        let node = &self.nodes[idx];
        (&node.word, node.rank, &node.children)
    }

    /// Attach a node below `parent` under an explicit distance key, or as the
    /// root when `parent` is `None`. Used to restore persisted trees without
    /// re-deriving their shape.
    pub(crate) fn attach(
        &mut self,
        parent: Option<usize>,
        distance: usize,
        word: String,
        rank: usize,
    ) -> usize {
        self.nodes.push(BkNode::new(word, rank));
        let idx = self.nodes.len() - 1;
        if let Some(parent) = parent {
            self.nodes[parent].add_child(distance, idx);
        }
        idx
    }
}

impl<F> Dictionary for BkTree<F>
where
    F: Fn(&str, &str) -> usize,
{
    fn contains(&self, term: &str) -> bool {
        BkTree::contains(self, term)
    }

    fn len(&self) -> usize {
        self.size()
    }

    fn terms(&self, order: TermOrder) -> Vec<String> {
        let mut terms: Vec<String> = self.nodes.iter().map(|node| node.word.clone()).collect();
        if order == TermOrder::Lexicographic {
            terms.sort_unstable();
        }
        terms
    }
}
