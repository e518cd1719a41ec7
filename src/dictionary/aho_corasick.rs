//! Aho-Corasick automaton for simultaneous multi-keyword search.
//!
//! The automaton goes through two phases:
//!
//! 1. **Building**: keywords are inserted into (or removed from) a trie.
//! 2. **Finalized**: [`AhoCorasick::finalize`] computes failure links by a
//!    breadth-first traversal and merges keyword lengths along them. From
//!    then on the automaton is immutable and safe to search from many
//!    threads at once.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::dictionary::aho_corasick::AhoCorasick;
//!
//! let mut automaton = AhoCorasick::from_keywords(["he", "she", "his", "hers"]);
//! let matches = automaton.search_all("ushers");
//!
//! assert_eq!(matches["she"], vec![1]);
//! assert_eq!(matches["he"], vec![2]);
//! assert_eq!(matches["hers"], vec![2]);
//! ```

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::{Dictionary, SyncStrategy, TermOrder};
use crate::error::{Error, Result};

const ROOT: usize = 0;

/// Keyword → ascending start offsets of its occurrences.
pub type MatchMap = FxHashMap<String, Vec<usize>>;

/// One keyword occurrence, as a half-open character span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Offset of the first character of the occurrence.
    pub start: usize,
    /// Offset one past the last character.
    pub end: usize,
}

impl Match {
    /// Length of the matched keyword in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always `false`; empty keywords are never stored.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Debug)]
struct AcNode {
    label: char,
    depth: usize,
    children: SmallVec<[(char, usize); 4]>,
    /// Node for the longest proper suffix of this path that is also a path
    /// from the root. Meaningful only after finalization.
    fail: usize,
    /// A keyword ends exactly here.
    terminal: bool,
    /// Lengths of every keyword ending here, own keyword first, then the
    /// ones inherited through the failure link. Filled at finalization.
    outputs: SmallVec<[usize; 2]>,
}

impl AcNode {
    fn new(label: char, depth: usize) -> Self {
        Self {
            label,
            depth,
            children: SmallVec::new(),
            fail: ROOT,
            terminal: false,
            outputs: SmallVec::new(),
        }
    }

    fn child(&self, label: char) -> Option<usize> {
        self.children
            .iter()
            .find(|(c, _)| *c == label)
            .map(|(_, idx)| *idx)
    }
}

/// Multi-pattern matching automaton.
#[derive(Clone, Debug)]
pub struct AhoCorasick {
    nodes: Vec<AcNode>,
    keyword_count: usize,
    finalized: bool,
}

impl Default for AhoCorasick {
    fn default() -> Self {
        Self::new()
    }
}

impl AhoCorasick {
    /// Create an empty automaton in the building phase.
    pub fn new() -> Self {
        Self {
            nodes: vec![AcNode::new('\0', 0)],
            keyword_count: 0,
            finalized: false,
        }
    }

    /// Create an automaton from a keyword set. Duplicates and empty
    /// keywords are skipped.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut automaton = Self::new();
        let mut seen = FxHashSet::default();
        for keyword in keywords {
            let keyword = keyword.as_ref();
            if !keyword.is_empty() && seen.insert(keyword.to_owned()) {
                automaton.insert_unchecked(keyword);
            }
        }
        automaton
    }

    /// Add a keyword.
    ///
    /// Inserting a keyword that is already present has no effect.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the automaton is finalized
    /// - `InvalidArgument` if `keyword` is empty
    pub fn insert(&mut self, keyword: &str) -> Result<()> {
        self.ensure_building("insert into")?;
        if keyword.is_empty() {
            return Err(Error::InvalidArgument(
                "empty keywords cannot be matched".to_owned(),
            ));
        }
        self.insert_unchecked(keyword);
        Ok(())
    }

    /// Remove a keyword, pruning nodes that no longer lead anywhere.
    ///
    /// Returns `false` if the keyword was not present.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the automaton is finalized: failure links already
    /// carry merged keyword lengths that removal cannot take back.
    pub fn remove(&mut self, keyword: &str) -> Result<bool> {
        self.ensure_building("remove from")?;

        let mut node = ROOT;
        let mut path: Vec<(usize, char, usize)> = Vec::new();
        for c in keyword.chars() {
            match self.nodes[node].child(c) {
                Some(child) => {
                    path.push((node, c, child));
                    node = child;
                }
                None => return Ok(false),
            }
        }
        if !self.nodes[node].terminal {
            return Ok(false);
        }

        self.nodes[node].terminal = false;
        self.keyword_count -= 1;

        for &(parent, label, child) in path.iter().rev() {
            let entry = &self.nodes[child];
            if entry.terminal || !entry.children.is_empty() {
                break;
            }
            self.nodes[parent].children.retain(|(c, _)| *c != label);
        }
        // Detached nodes stay in the arena; finalize only visits reachable ones
        Ok(true)
    }

    /// Check whether `keyword` was inserted.
    pub fn contains(&self, keyword: &str) -> bool {
        let mut node = ROOT;
        for c in keyword.chars() {
            match self.nodes[node].child(c) {
                Some(child) => node = child,
                None => return false,
            }
        }
        self.nodes[node].terminal
    }

    /// All keywords, each listed once.
    pub fn list_all(&self, order: TermOrder) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut buffer: Vec<char> = Vec::new();
        let mut stack = vec![(ROOT, 0usize)];

        while let Some((idx, len)) = stack.pop() {
            let node = &self.nodes[idx];
            if idx != ROOT {
                buffer.truncate(len - 1);
                buffer.push(node.label);
            }
            if node.terminal {
                keywords.push(buffer.iter().collect());
            }

            let mut children: SmallVec<[(char, usize); 8]> = node.children.iter().copied().collect();
            if order == TermOrder::Lexicographic {
                children.sort_unstable_by_key(|(c, _)| *c);
            }
            for &(_, child) in children.iter().rev() {
                stack.push((child, len + 1));
            }
        }
        keywords
    }

    /// Number of stored keywords.
    pub fn len(&self) -> usize {
        self.keyword_count
    }

    /// Check if no keyword is stored.
    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    /// Whether failure links have been computed.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Compute failure links and merge keyword lengths along them.
    ///
    /// Idempotent: once finalized, further calls do nothing.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }

        let mut visited = 1;
        self.nodes[ROOT].outputs.clear();

        // Breadth-first so that a failure target (always shallower) is
        // complete before anything inherits from it
        let mut queue = VecDeque::from([ROOT]);
        while let Some(parent) = queue.pop_front() {
            let children = self.nodes[parent].children.clone();
            for (c, child) in children {
                let fail = if parent == ROOT {
                    ROOT
                } else {
                    self.fail_target(self.nodes[parent].fail, c)
                };

                let mut outputs: SmallVec<[usize; 2]> = SmallVec::new();
                if self.nodes[child].terminal {
                    outputs.push(self.nodes[child].depth);
                }
                outputs.extend_from_slice(&self.nodes[fail].outputs);

                let entry = &mut self.nodes[child];
                entry.fail = fail;
                entry.outputs = outputs;

                visited += 1;
                queue.push_back(child);
            }
        }

        self.finalized = true;
        tracing::debug!(
            nodes = visited,
            keywords = self.keyword_count,
            "aho-corasick failure links computed"
        );
    }

    /// Walk the failure chain from `start` until a node with a `c`-child is
    /// found, falling back to the root.
    fn fail_target(&self, start: usize, c: char) -> usize {
        let mut node = start;
        loop {
            if let Some(next) = self.nodes[node].child(c) {
                return next;
            }
            if node == ROOT {
                return ROOT;
            }
            node = self.nodes[node].fail;
        }
    }

    /// Every keyword occurrence in `text`, in scan order (by end offset,
    /// longest keyword first for equal ends).
    ///
    /// # Errors
    ///
    /// `NotReady` if the automaton has not been finalized.
    pub fn matches(&self, text: &str) -> Result<Vec<Match>> {
        let mut found = Vec::new();
        self.scan(text, |m| found.push(m))?;
        Ok(found)
    }

    /// Read-only variant of [`search_all`](Self::search_all) for a
    /// finalized automaton.
    ///
    /// # Errors
    ///
    /// `NotReady` if the automaton has not been finalized.
    pub fn find_all(&self, text: &str) -> Result<MatchMap> {
        if !self.finalized {
            return Err(Error::NotReady("aho-corasick automaton"));
        }
        Ok(self.collect_matches(text))
    }

    /// Map each keyword found in `text` to the ascending start offsets of
    /// its occurrences, finalizing the automaton first if necessary.
    pub fn search_all(&mut self, text: &str) -> MatchMap {
        self.finalize();
        self.collect_matches(text)
    }

    fn collect_matches(&self, text: &str) -> MatchMap {
        let chars: Vec<char> = text.chars().collect();
        let mut result = MatchMap::default();
        self.walk(text, |m| {
            let keyword: String = chars[m.start..m.end].iter().collect();
            result.entry(keyword).or_default().push(m.start);
        });
        result
    }

    fn scan<F>(&self, text: &str, emit: F) -> Result<()>
    where
        F: FnMut(Match),
    {
        if !self.finalized {
            return Err(Error::NotReady("aho-corasick automaton"));
        }
        self.walk(text, emit);
        Ok(())
    }

    /// Run the automaton over `text`. Failure links must already be built.
    fn walk<F>(&self, text: &str, mut emit: F)
    where
        F: FnMut(Match),
    {
        let mut node = ROOT;
        for (i, c) in text.chars().enumerate() {
            node = loop {
                if let Some(next) = self.nodes[node].child(c) {
                    break next;
                }
                if node == ROOT {
                    break ROOT;
                }
                node = self.nodes[node].fail;
            };

            for &len in &self.nodes[node].outputs {
                emit(Match {
                    start: i + 1 - len,
                    end: i + 1,
                });
            }
        }
    }

    fn insert_unchecked(&mut self, keyword: &str) {
        let mut node = ROOT;
        for c in keyword.chars() {
            node = match self.nodes[node].child(c) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    let depth = self.nodes[node].depth + 1;
                    self.nodes.push(AcNode::new(c, depth));
                    self.nodes[node].children.push((c, child));
                    child
                }
            };
        }
        if !self.nodes[node].terminal {
            self.nodes[node].terminal = true;
            self.keyword_count += 1;
        }
    }

    fn ensure_building(&self, action: &str) -> Result<()> {
        if self.finalized {
            return Err(Error::InvalidState(format!(
                "cannot {} a finalized aho-corasick automaton",
                action
            )));
        }
        Ok(())
    }
}

impl Dictionary for AhoCorasick {
    fn contains(&self, term: &str) -> bool {
        AhoCorasick::contains(self, term)
    }

    fn len(&self) -> usize {
        self.keyword_count
    }

    fn terms(&self, order: TermOrder) -> Vec<String> {
        self.list_all(order)
    }

    fn sync_strategy(&self) -> SyncStrategy {
        if self.finalized {
            SyncStrategy::Persistent
        } else {
            SyncStrategy::ExternalSync
        }
    }
}
