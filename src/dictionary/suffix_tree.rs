//! Suffix tree built online with Ukkonen's algorithm.
//!
//! # Overview
//!
//! A suffix tree over `text + END` has one leaf per suffix and one internal
//! node per right-branching repeated substring. Every edge is a half-open
//! window into the shared text buffer rather than an owned string, and
//! every leaf edge ends at a single global "leaf end" cell, so appending a
//! character grows all open leaves at once.
//!
//! - **Construction**: O(n) amortized, one extension phase per character
//! - **Substring queries**: O(m) to locate, plus the size of the output
//! - **Structure**: immutable after [`SuffixTree::build`]; safe to query
//!   from many threads at once
//!
//! All traversals use explicit stacks, so very repetitive inputs (which
//! produce very deep trees) cannot exhaust the call stack.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::dictionary::suffix_tree::SuffixTree;
//!
//! let tree = SuffixTree::from_text("banana").unwrap();
//!
//! assert_eq!(tree.find("ana").unwrap(), Some(1));
//! assert_eq!(tree.find_all("ana").unwrap(), vec![1, 3]);
//! assert_eq!(tree.count("a").unwrap(), 3);
//! assert_eq!(tree.longest_repeated_substring().unwrap(), "ana");
//!
//! assert_eq!(
//!     SuffixTree::longest_common_substring("xabxac", "abcabxabcd").unwrap(),
//!     "abxa"
//! );
//! assert_eq!(SuffixTree::longest_palindrome("cbbd").unwrap(), "bb");
//! ```
//!
//! # References
//!
//! - Ukkonen (1995): "On-line construction of suffix trees"
//! - Gusfield (1997): "Algorithms on Strings, Trees, and Sequences", ch. 6-7

use std::collections::BTreeSet;
use std::fmt::Write as _;

use smallvec::SmallVec;

use crate::error::{Error, Result};

const ROOT: usize = 0;

/// Reserved characters of a suffix tree.
///
/// Both must be absent from every indexed text and distinct from each
/// other. The separator is only used by the two-string queries
/// ([`SuffixTree::longest_common_substring`] and
/// [`SuffixTree::longest_palindrome`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SuffixTreeConfig {
    /// Appended to the text so that every suffix ends at a leaf.
    pub end_marker: char,
    /// Joins the two inputs of a two-string query.
    pub separator: char,
}

impl Default for SuffixTreeConfig {
    fn default() -> Self {
        Self {
            end_marker: '$',
            separator: '#',
        }
    }
}

impl SuffixTreeConfig {
    /// Create a configuration with custom reserved characters.
    pub fn new(end_marker: char, separator: char) -> Self {
        Self {
            end_marker,
            separator,
        }
    }

    /// Check that the reserved characters differ.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the end marker equals the separator.
    pub fn validate(&self) -> Result<()> {
        if self.end_marker == self.separator {
            return Err(Error::InvalidArgument(format!(
                "end marker and separator must differ, both are {:?}",
                self.end_marker
            )));
        }
        Ok(())
    }

    /// Check that no reserved character occurs in any of `inputs`.
    fn check_absent(&self, inputs: &[&str], check_separator: bool) -> Result<()> {
        for input in inputs {
            if input.contains(self.end_marker) {
                return Err(Error::InvalidArgument(format!(
                    "end marker {:?} occurs in the input",
                    self.end_marker
                )));
            }
            if check_separator && input.contains(self.separator) {
                return Err(Error::InvalidArgument(format!(
                    "separator {:?} occurs in the input",
                    self.separator
                )));
            }
        }
        Ok(())
    }
}

/// Inclusive end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeEnd {
    /// Leaf edge: ends wherever the tree's global leaf end currently is.
    Open,
    /// Internal edge with a fixed end.
    Closed(usize),
}

#[derive(Clone, Debug)]
struct SuffixNode {
    /// Start of the incoming edge in the text.
    start: usize,
    end: EdgeEnd,
    /// Outgoing edges keyed by first character, kept sorted.
    children: SmallVec<[(char, usize); 4]>,
    /// For an internal node spelling `cα`, the node spelling `α`.
    suffix_link: Option<usize>,
    /// Start of the suffix spelled by a leaf.
    suffix_index: Option<usize>,
}

impl SuffixNode {
    fn new(start: usize, end: EdgeEnd) -> Self {
        Self {
            start,
            end,
            children: SmallVec::new(),
            suffix_link: None,
            suffix_index: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.end == EdgeEnd::Open
    }

    /// Find an edge by first character.
    ///
    /// Uses linear search for small edge counts, binary search for larger.
    fn child(&self, label: char) -> Option<usize> {
        if self.children.len() < 16 {
            self.children
                .iter()
                .find(|(c, _)| *c == label)
                .map(|(_, t)| *t)
        } else {
            self.children
                .binary_search_by_key(&label, |(c, _)| *c)
                .ok()
                .map(|idx| self.children[idx].1)
        }
    }

    /// Add an edge, maintaining sorted order.
    fn add_child(&mut self, label: char, target: usize) {
        match self.children.binary_search_by_key(&label, |(c, _)| *c) {
            Ok(idx) => self.children[idx].1 = target,
            Err(idx) => self.children.insert(idx, (label, target)),
        }
    }
}

/// Suffix tree over a single text.
#[derive(Clone, Debug)]
pub struct SuffixTree {
    config: SuffixTreeConfig,
    /// Indexed text with the end marker appended.
    text: Vec<char>,
    nodes: Vec<SuffixNode>,
    /// Shared end of every leaf edge.
    leaf_end: usize,
    built: bool,
}

impl Default for SuffixTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixTree {
    /// Create an unbuilt tree with the default reserved characters.
    pub fn new() -> Self {
        Self::with_config(SuffixTreeConfig::default())
    }

    /// Create an unbuilt tree with custom reserved characters.
    pub fn with_config(config: SuffixTreeConfig) -> Self {
        Self {
            config,
            text: Vec::new(),
            nodes: vec![SuffixNode::new(0, EdgeEnd::Closed(0))],
            leaf_end: 0,
            built: false,
        }
    }

    /// Create and build a tree over `text` with the default configuration.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `text` contains the end marker.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut tree = Self::new();
        tree.build(text)?;
        Ok(tree)
    }

    /// Index `text`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the tree was already built
    /// - `InvalidArgument` if the configuration is inconsistent or `text`
    ///   contains the end marker
    pub fn build(&mut self, text: &str) -> Result<()> {
        if self.built {
            return Err(Error::InvalidState(
                "suffix tree is already built".to_owned(),
            ));
        }
        self.config.validate()?;
        self.config.check_absent(&[text], false)?;

        self.text = text.chars().chain([self.config.end_marker]).collect();
        self.nodes.reserve(2 * self.text.len());
        self.construct();
        self.assign_suffix_indices();
        self.built = true;

        tracing::debug!(
            text_len = self.text.len() - 1,
            nodes = self.nodes.len(),
            "suffix tree built"
        );
        Ok(())
    }

    /// Whether [`build`](Self::build) has completed.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// The reserved characters in use.
    pub fn config(&self) -> &SuffixTreeConfig {
        &self.config
    }

    /// The indexed text, without the end marker.
    pub fn text(&self) -> String {
        self.text
            .iter()
            .take(self.text.len().saturating_sub(1))
            .collect()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves: one per suffix, the end-marker-only one included.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Smallest offset at which `pattern` occurs.
    ///
    /// An empty pattern occurs at offset 0.
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn find(&self, pattern: &str) -> Result<Option<usize>> {
        self.ensure_built()?;
        Ok(self
            .locate(pattern)
            .and_then(|node| self.leaves_below(node).into_iter().min()))
    }

    /// Every offset at which `pattern` occurs, ascending, overlapping
    /// occurrences included.
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn find_all(&self, pattern: &str) -> Result<Vec<usize>> {
        self.ensure_built()?;
        let mut positions = self
            .locate(pattern)
            .map(|node| self.leaves_below(node))
            .unwrap_or_default();
        positions.sort_unstable();
        Ok(positions)
    }

    /// Number of occurrences of `pattern`, overlapping ones included.
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn count(&self, pattern: &str) -> Result<usize> {
        self.ensure_built()?;
        Ok(self
            .locate(pattern)
            .map_or(0, |node| self.leaves_below(node).len()))
    }

    /// Check whether `pattern` occurs in the text.
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn contains(&self, pattern: &str) -> Result<bool> {
        self.ensure_built()?;
        Ok(self.locate(pattern).is_some())
    }

    /// A longest substring occurring at least twice (empty if none).
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn longest_repeated_substring(&self) -> Result<String> {
        self.ensure_built()?;

        let mut best: Option<(usize, usize)> = None; // (depth, node)
        for (node, depth) in self.internal_preorder() {
            if best.map_or(true, |(d, _)| depth > d) {
                best = Some((depth, node));
            }
        }
        Ok(best.map_or_else(String::new, |(depth, node)| self.path_label(node, depth)))
    }

    /// Suffix start offsets in lexicographic order of the suffixes, with the
    /// end marker ordered before every other character.
    ///
    /// # Errors
    ///
    /// `NotReady` if the tree has not been built.
    pub fn suffix_array(&self) -> Result<Vec<usize>> {
        self.ensure_built()?;

        let marker = self.config.end_marker;
        let terminal_suffix = self.text.len() - 1;
        let mut array = Vec::with_capacity(terminal_suffix);
        let mut stack = vec![ROOT];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if let Some(suffix) = node.suffix_index {
                if suffix != terminal_suffix {
                    array.push(suffix);
                }
                continue;
            }
            // Pushed in reverse: other edges from largest to smallest, then
            // the end marker edge so it is visited first
            for &(c, child) in node.children.iter().rev() {
                if c != marker {
                    stack.push(child);
                }
            }
            if let Some(child) = node.child(marker) {
                stack.push(child);
            }
        }
        Ok(array)
    }

    /// Box-drawing outline of the tree, one edge label per line.
    ///
    /// `max_depth` limits how many edge levels are shown; at most `limit`
    /// lines follow the root line, and a final marker line is added when
    /// more were available.
    pub fn render(&self, max_depth: Option<usize>, limit: usize) -> String {
        let mut out = String::from("root\n");
        let mut lines = 0;
        // (node, prefix of its parent's lines, is last sibling, edge level)
        let mut stack: Vec<(usize, String, bool, usize)> = Vec::new();
        if max_depth.map_or(true, |max| max > 0) {
            self.push_render_children(&mut stack, ROOT, "", 1);
        }

        while let Some((idx, prefix, is_last, level)) = stack.pop() {
            if lines == limit {
                out.push_str("row limit reached\n");
                break;
            }
            let stem = if is_last { "└──" } else { "│──" };
            let _ = writeln!(out, "{}{}{}", prefix, stem, self.edge_label(idx));
            lines += 1;

            if max_depth.map_or(true, |max| level < max) {
                let extension = if is_last { "   " } else { "│  " };
                let child_prefix = format!("{}{}", prefix, extension);
                self.push_render_children(&mut stack, idx, &child_prefix, level + 1);
            }
        }
        out
    }

    fn push_render_children(
        &self,
        stack: &mut Vec<(usize, String, bool, usize)>,
        idx: usize,
        prefix: &str,
        level: usize,
    ) {
        let children = &self.nodes[idx].children;
        for (k, &(_, child)) in children.iter().enumerate().rev() {
            stack.push((child, prefix.to_owned(), k + 1 == children.len(), level));
        }
    }

    /// A longest common substring of `a` and `b`, using the default
    /// reserved characters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `#` or `$` occurs in either input.
    pub fn longest_common_substring(a: &str, b: &str) -> Result<String> {
        Self::longest_common_substring_with(a, b, SuffixTreeConfig::default())
    }

    /// A longest common substring of `a` and `b`.
    ///
    /// Builds a tree over `a + SEP + b + END` and returns the label of the
    /// deepest internal node that has suffixes of both strings below it.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the configuration is inconsistent or a
    /// reserved character occurs in either input.
    pub fn longest_common_substring_with(
        a: &str,
        b: &str,
        config: SuffixTreeConfig,
    ) -> Result<String> {
        let (tree, split) = Self::joined(a, b, config)?;

        const FROM_A: u8 = 0b01;
        const FROM_B: u8 = 0b10;
        let terminal_suffix = tree.text.len() - 1;
        let mut origin = vec![0u8; tree.nodes.len()];
        let mut best: Option<(usize, usize)> = None; // (depth, node)

        // Reverse pre-order visits children before their parents
        for &(node, depth) in tree.internal_preorder().iter().rev() {
            let mut tag = 0;
            for &(_, child) in &tree.nodes[node].children {
                tag |= match tree.nodes[child].suffix_index {
                    Some(suffix) if suffix < split => FROM_A,
                    Some(suffix) if suffix > split && suffix < terminal_suffix => FROM_B,
                    Some(_) => 0,
                    None => origin[child],
                };
            }
            origin[node] = tag;

            if tag == FROM_A | FROM_B && best.map_or(true, |(d, _)| depth > d) {
                best = Some((depth, node));
            }
        }

        Ok(best.map_or_else(String::new, |(depth, node)| tree.path_label(node, depth)))
    }

    /// A longest palindromic substring of `text`, using the default
    /// reserved characters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `#` or `$` occurs in `text`.
    pub fn longest_palindrome(text: &str) -> Result<String> {
        Self::longest_palindrome_with(text, SuffixTreeConfig::default())
    }

    /// A longest palindromic substring of `text`.
    ///
    /// Builds a tree over `text + SEP + reverse(text) + END`. A common
    /// substring starting at `i` in the text and at `j` in the reversal is a
    /// palindrome when the two occurrences mirror each other, that is when
    /// `i + j + len == n`. For every internal node the candidate pairs that
    /// meet below it are checked with a small-to-large merge of the position
    /// sets, so the result is always a palindrome.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the configuration is inconsistent or a
    /// reserved character occurs in `text`.
    pub fn longest_palindrome_with(text: &str, config: SuffixTreeConfig) -> Result<String> {
        let reversed: String = text.chars().rev().collect();
        let (tree, n) = Self::joined(text, &reversed, config)?;
        if n == 0 {
            return Ok(String::new());
        }

        #[derive(Default)]
        struct Positions {
            forward: BTreeSet<usize>,
            reversed: BTreeSet<usize>,
        }

        impl Positions {
            fn len(&self) -> usize {
                self.forward.len() + self.reversed.len()
            }
        }

        // Smallest partner p with n - x - depth <= p < n - x, which gives
        // the longest mirrored occurrence no deeper than the node
        fn partner(set: &BTreeSet<usize>, n: usize, x: usize, depth: usize) -> Option<usize> {
            let upper = n - x;
            set.range(upper.saturating_sub(depth)..upper).next().copied()
        }

        let mut pending: Vec<Option<Positions>> = Vec::new();
        pending.resize_with(tree.nodes.len(), || None);
        let mut best: Option<(usize, usize)> = None; // (len, start)

        for &(node, depth) in tree.internal_preorder().iter().rev() {
            let mut merged = Positions::default();

            for &(_, child) in &tree.nodes[node].children {
                let mut incoming = match tree.nodes[child].suffix_index {
                    Some(suffix) => {
                        let mut leaf = Positions::default();
                        if suffix < n {
                            leaf.forward.insert(suffix);
                        } else if suffix > n && suffix <= 2 * n {
                            leaf.reversed.insert(suffix - n - 1);
                        }
                        leaf
                    }
                    None => pending[child].take().unwrap_or_default(),
                };
                if incoming.len() > merged.len() {
                    std::mem::swap(&mut merged, &mut incoming);
                }

                for &i in &incoming.forward {
                    if let Some(j) = partner(&merged.reversed, n, i, depth) {
                        let len = n - i - j;
                        if best.map_or(true, |(l, _)| len > l) {
                            best = Some((len, i));
                        }
                    }
                }
                for &j in &incoming.reversed {
                    if let Some(i) = partner(&merged.forward, n, j, depth) {
                        let len = n - i - j;
                        if best.map_or(true, |(l, _)| len > l) {
                            best = Some((len, i));
                        }
                    }
                }

                merged.forward.extend(incoming.forward);
                merged.reversed.extend(incoming.reversed);
            }

            pending[node] = Some(merged);
        }

        Ok(best.map_or_else(String::new, |(len, start)| {
            tree.text[start..start + len].iter().collect()
        }))
    }

    /// Build a tree over `a + SEP + b`; returns it with the separator's
    /// offset.
    fn joined(a: &str, b: &str, config: SuffixTreeConfig) -> Result<(Self, usize)> {
        config.validate()?;
        config.check_absent(&[a, b], true)?;

        let split = a.chars().count();
        let mut combined = String::with_capacity(a.len() + b.len() + config.separator.len_utf8());
        combined.push_str(a);
        combined.push(config.separator);
        combined.push_str(b);

        let mut tree = Self::with_config(config);
        tree.build(&combined)?;
        Ok((tree, split))
    }

    /// Ukkonen's construction over `self.text`.
    fn construct(&mut self) {
        let mut active_node = ROOT;
        let mut active_edge = 0;
        let mut active_length = 0;
        // Suffixes of the current prefix still waiting to be made explicit
        let mut remainder = 0;

        for i in 0..self.text.len() {
            // Every open leaf grows by one character
            self.leaf_end = i;
            remainder += 1;
            let mut last_internal: Option<usize> = None;

            while remainder > 0 {
                if active_length == 0 {
                    active_edge = i;
                }
                let edge_char = self.text[active_edge];

                match self.nodes[active_node].child(edge_char) {
                    None => {
                        let leaf = self.push_node(i, EdgeEnd::Open);
                        self.nodes[active_node].add_child(edge_char, leaf);
                        if let Some(pending) = last_internal.take() {
                            self.nodes[pending].suffix_link = Some(active_node);
                        }
                    }
                    Some(next) => {
                        // Walk down when the active length spans the whole edge
                        let edge_len = self.edge_length(next);
                        if active_length >= edge_len {
                            active_edge += edge_len;
                            active_length -= edge_len;
                            active_node = next;
                            continue;
                        }

                        let next_start = self.nodes[next].start;
                        if self.text[next_start + active_length] == self.text[i] {
                            // Already present: defer the rest of this phase
                            if let Some(pending) = last_internal {
                                if active_node != ROOT {
                                    self.nodes[pending].suffix_link = Some(active_node);
                                }
                            }
                            active_length += 1;
                            break;
                        }

                        // Split the edge and hang a new leaf off the split
                        let split = self.push_node(
                            next_start,
                            EdgeEnd::Closed(next_start + active_length - 1),
                        );
                        self.nodes[active_node].add_child(edge_char, split);

                        let leaf = self.push_node(i, EdgeEnd::Open);
                        let leaf_char = self.text[i];
                        self.nodes[split].add_child(leaf_char, leaf);

                        self.nodes[next].start += active_length;
                        let continuation_char = self.text[self.nodes[next].start];
                        self.nodes[split].add_child(continuation_char, next);

                        if let Some(pending) = last_internal {
                            self.nodes[pending].suffix_link = Some(split);
                        }
                        last_internal = Some(split);
                    }
                }

                remainder -= 1;
                if active_node == ROOT && active_length > 0 {
                    active_length -= 1;
                    active_edge = i + 1 - remainder;
                } else if active_node != ROOT {
                    active_node = self.nodes[active_node].suffix_link.unwrap_or(ROOT);
                }
            }
        }
    }

    /// Label every leaf with the start of the suffix it spells.
    fn assign_suffix_indices(&mut self) {
        let len = self.text.len();
        let mut stack = vec![(ROOT, 0)];

        while let Some((idx, depth)) = stack.pop() {
            for k in 0..self.nodes[idx].children.len() {
                let child = self.nodes[idx].children[k].1;
                let child_depth = depth + self.edge_length(child);
                if self.nodes[child].is_leaf() {
                    self.nodes[child].suffix_index = Some(len - child_depth);
                } else {
                    stack.push((child, child_depth));
                }
            }
        }
    }

    fn push_node(&mut self, start: usize, end: EdgeEnd) -> usize {
        self.nodes.push(SuffixNode::new(start, end));
        self.nodes.len() - 1
    }

    fn edge_end(&self, idx: usize) -> usize {
        match self.nodes[idx].end {
            EdgeEnd::Open => self.leaf_end,
            EdgeEnd::Closed(end) => end,
        }
    }

    fn edge_length(&self, idx: usize) -> usize {
        self.edge_end(idx) + 1 - self.nodes[idx].start
    }

    fn edge_label(&self, idx: usize) -> String {
        self.text[self.nodes[idx].start..=self.edge_end(idx)]
            .iter()
            .collect()
    }

    /// String spelled from the root to internal node `idx` of string
    /// depth `depth`.
    fn path_label(&self, idx: usize, depth: usize) -> String {
        let end = self.edge_end(idx);
        self.text[end + 1 - depth..=end].iter().collect()
    }

    /// Node whose subtree holds exactly the suffixes starting with
    /// `pattern`.
    fn locate(&self, pattern: &str) -> Option<usize> {
        let pattern: Vec<char> = pattern.chars().collect();
        if pattern.contains(&self.config.end_marker) {
            return None;
        }

        let mut node = ROOT;
        let mut i = 0;
        while i < pattern.len() {
            let child = self.nodes[node].child(pattern[i])?;
            let end = self.edge_end(child);
            let mut j = self.nodes[child].start;
            while i < pattern.len() && j <= end {
                if pattern[i] != self.text[j] {
                    return None;
                }
                i += 1;
                j += 1;
            }
            node = child;
        }
        Some(node)
    }

    /// Suffix indices of every leaf below `idx` (or `idx` itself).
    fn leaves_below(&self, idx: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            match node.suffix_index {
                Some(suffix) => leaves.push(suffix),
                None => stack.extend(node.children.iter().map(|(_, child)| *child)),
            }
        }
        leaves
    }

    /// Internal nodes other than the root, in pre-order, with their string
    /// depths.
    fn internal_preorder(&self) -> Vec<(usize, usize)> {
        let mut order = Vec::new();
        let mut stack = vec![(ROOT, 0)];
        while let Some((idx, depth)) = stack.pop() {
            if idx != ROOT {
                order.push((idx, depth));
            }
            for &(_, child) in self.nodes[idx].children.iter().rev() {
                if !self.nodes[child].is_leaf() {
                    stack.push((child, depth + self.edge_length(child)));
                }
            }
        }
        order
    }

    fn ensure_built(&self) -> Result<()> {
        if self.built {
            Ok(())
        } else {
            Err(Error::NotReady("suffix tree"))
        }
    }
}
