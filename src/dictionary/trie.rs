//! Prefix trie with per-keyword occurrence counts.
//!
//! Nodes live in an arena; node 0 is the root. Children keep the order in
//! which they were first created, so listings can be replayed in insertion
//! order or sorted lexicographically on demand. Slots freed by pruning are
//! recycled through a free list.
//!
//! # Example
//!
//! ```rust
//! use libstrmatch::dictionary::trie::Trie;
//! use libstrmatch::dictionary::TermOrder;
//!
//! let mut trie = Trie::new();
//! trie.insert("tea");
//! trie.insert("ten");
//! trie.insert("tea");
//!
//! assert_eq!(trie.frequency("tea"), 2);
//! assert!(trie.contains("ten"));
//! assert!(!trie.contains("te"));
//! assert_eq!(trie.list_all(TermOrder::Lexicographic), vec!["tea", "ten"]);
//! ```

use smallvec::SmallVec;

use super::{Dictionary, TermOrder};

const ROOT: usize = 0;

#[derive(Clone, Debug)]
struct TrieNode {
    label: char,
    /// Outgoing edges in creation order.
    children: SmallVec<[(char, usize); 4]>,
    /// Number of times a keyword ending here was inserted, net of removals.
    count: usize,
}

impl TrieNode {
    fn new(label: char) -> Self {
        Self {
            label,
            children: SmallVec::new(),
            count: 0,
        }
    }

    fn child(&self, label: char) -> Option<usize> {
        self.children
            .iter()
            .find(|(c, _)| *c == label)
            .map(|(_, idx)| *idx)
    }
}

/// Ordered keyword set with per-keyword occurrence counts.
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    free: Vec<usize>,
    keyword_count: usize,
    total: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new('\0')],
            free: Vec::new(),
            keyword_count: 0,
            total: 0,
        }
    }

    /// Create a trie by inserting every keyword of `keywords` in order.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for keyword in keywords {
            trie.insert(keyword.as_ref());
        }
        trie
    }

    /// Insert one occurrence of `keyword`.
    ///
    /// Returns the keyword's frequency after the insertion.
    pub fn insert(&mut self, keyword: &str) -> usize {
        let mut node = ROOT;
        for c in keyword.chars() {
            node = match self.nodes[node].child(c) {
                Some(child) => child,
                None => {
                    let child = self.alloc(c);
                    self.nodes[node].children.push((c, child));
                    child
                }
            };
        }

        let entry = &mut self.nodes[node];
        entry.count += 1;
        if entry.count == 1 {
            self.keyword_count += 1;
        }
        self.total += 1;
        entry.count
    }

    /// Remove one occurrence of `keyword`.
    ///
    /// When the last occurrence goes away and the keyword's node has no
    /// children, the now-useless chain is pruned back up to, but not
    /// including, the first ancestor that ends a keyword or has other
    /// children.
    ///
    /// Returns `false` if the keyword was not present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        let mut node = ROOT;
        let mut path: Vec<(usize, char, usize)> = Vec::new(); // (parent, label, child)

        for c in keyword.chars() {
            match self.nodes[node].child(c) {
                Some(child) => {
                    path.push((node, c, child));
                    node = child;
                }
                None => return false,
            }
        }

        if self.nodes[node].count == 0 {
            return false;
        }

        self.nodes[node].count -= 1;
        self.total -= 1;
        if self.nodes[node].count > 0 {
            return true;
        }
        self.keyword_count -= 1;

        let mut pruned = 0;
        for &(parent, label, child) in path.iter().rev() {
            let entry = &self.nodes[child];
            if entry.count > 0 || !entry.children.is_empty() {
                break;
            }
            self.nodes[parent].children.retain(|(c, _)| *c != label);
            self.release(child);
            pruned += 1;
        }
        tracing::trace!(keyword, pruned, "trie keyword removed");
        true
    }

    /// Check whether `keyword` has a positive count.
    pub fn contains(&self, keyword: &str) -> bool {
        self.frequency(keyword) > 0
    }

    /// Number of net insertions of `keyword` (0 if absent).
    pub fn frequency(&self, keyword: &str) -> usize {
        self.find(keyword).map_or(0, |node| self.nodes[node].count)
    }

    /// Check whether any stored keyword starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        match self.find(prefix) {
            Some(node) => self.nodes[node].count > 0 || !self.nodes[node].children.is_empty(),
            None => false,
        }
    }

    /// All stored keywords, each listed once.
    pub fn list_all(&self, order: TermOrder) -> Vec<String> {
        self.collect(ROOT, Vec::new(), order)
    }

    /// Stored keywords starting with `prefix` (including `prefix` itself).
    pub fn keywords_with_prefix(&self, prefix: &str, order: TermOrder) -> Vec<String> {
        match self.find(prefix) {
            Some(node) => self.collect(node, prefix.chars().collect(), order),
            None => Vec::new(),
        }
    }

    /// Longest prefix shared by every stored keyword.
    pub fn longest_common_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.keyword_count == 0 {
            return prefix;
        }

        let mut node = &self.nodes[ROOT];
        while node.count == 0 && node.children.len() == 1 {
            let (c, child) = node.children[0];
            prefix.push(c);
            node = &self.nodes[child];
        }
        prefix
    }

    /// Number of distinct keywords with a positive count.
    pub fn len(&self) -> usize {
        self.keyword_count
    }

    /// Check if no keyword is stored.
    pub fn is_empty(&self) -> bool {
        self.keyword_count == 0
    }

    /// Sum of all keyword counts.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn find(&self, keyword: &str) -> Option<usize> {
        let mut node = ROOT;
        for c in keyword.chars() {
            node = self.nodes[node].child(c)?;
        }
        Some(node)
    }

    fn alloc(&mut self, label: char) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = TrieNode::new(label);
                idx
            }
            None => {
                self.nodes.push(TrieNode::new(label));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) {
        self.nodes[idx].children.clear();
        self.nodes[idx].count = 0;
        self.free.push(idx);
    }

    /// Pre-order walk below `start` with an explicit stack, so tall tries
    /// cannot exhaust the call stack.
    fn collect(&self, start: usize, prefix: Vec<char>, order: TermOrder) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut buffer = prefix;
        let base = buffer.len();
        // (node, buffer length once the node's label is appended)
        let mut stack = vec![(start, base)];

        while let Some((idx, len)) = stack.pop() {
            let node = &self.nodes[idx];
            if idx == start {
                buffer.truncate(base);
            } else {
                buffer.truncate(len - 1);
                buffer.push(node.label);
            }

            if node.count > 0 {
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
}

impl Dictionary for Trie {
    fn contains(&self, term: &str) -> bool {
        Trie::contains(self, term)
    }

    fn len(&self) -> usize {
        self.keyword_count
    }

    fn terms(&self, order: TermOrder) -> Vec<String> {
        self.list_all(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_frequency() {
        let mut trie = Trie::new();
        assert_eq!(trie.insert("test"), 1);
        assert_eq!(trie.insert("test"), 2);
        assert_eq!(trie.insert("testing"), 1);

        assert_eq!(trie.frequency("test"), 2);
        assert_eq!(trie.frequency("testing"), 1);
        assert_eq!(trie.frequency("tes"), 0);
        assert_eq!(trie.frequency("unknown"), 0);
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.total(), 3);
    }

    #[test]
    fn test_prefix_is_not_keyword() {
        let trie = Trie::from_keywords(["testing"]);
        assert!(!trie.contains("test"));
        assert!(trie.starts_with("test"));
        assert!(!trie.starts_with("tex"));
    }

    #[test]
    fn test_remove_decrements_before_pruning() {
        let mut trie = Trie::from_keywords(["apple", "apple"]);
        assert!(trie.remove("apple"));
        assert!(trie.contains("apple"));
        assert!(trie.remove("apple"));
        assert!(!trie.contains("apple"));
        assert!(!trie.remove("apple"));
        assert_eq!(trie.node_count(), 1);
        assert!(trie.is_empty());
    }

    #[test]
    fn test_remove_stops_at_terminal_ancestor() {
        let mut trie = Trie::from_keywords(["to", "tooth"]);
        let before = trie.node_count();
        assert!(trie.remove("tooth"));
        // "oth" chain pruned, "to" kept
        assert_eq!(trie.node_count(), before - 3);
        assert!(trie.contains("to"));
        assert!(!trie.starts_with("too"));
    }

    #[test]
    fn test_remove_stops_at_branching_ancestor() {
        let mut trie = Trie::from_keywords(["card", "care"]);
        assert!(trie.remove("card"));
        assert!(trie.contains("care"));
        assert!(!trie.starts_with("card"));
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn test_remove_keeps_nodes_with_children() {
        let mut trie = Trie::from_keywords(["in", "inn"]);
        assert!(trie.remove("in"));
        assert!(!trie.contains("in"));
        assert!(trie.contains("inn"));
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_remove_absent() {
        let mut trie = Trie::from_keywords(["hello"]);
        assert!(!trie.remove("help"));
        assert!(!trie.remove("hell"));
        assert!(!trie.remove("hellos"));
        assert!(trie.contains("hello"));
    }

    #[test]
    fn test_free_slots_are_reused() {
        let mut trie = Trie::from_keywords(["abc"]);
        trie.remove("abc");
        let allocated = trie.nodes.len();
        trie.insert("xyz");
        assert_eq!(trie.nodes.len(), allocated);
        assert!(trie.contains("xyz"));
    }

    #[test]
    fn test_list_orders() {
        let trie = Trie::from_keywords(["banana", "apple", "band", "ban", "apple"]);
        assert_eq!(
            trie.list_all(TermOrder::Insertion),
            vec!["ban", "banana", "band", "apple"]
        );
        assert_eq!(
            trie.list_all(TermOrder::Lexicographic),
            vec!["apple", "ban", "banana", "band"]
        );
    }

    #[test]
    fn test_keywords_with_prefix() {
        let trie = Trie::from_keywords(["car", "cart", "care", "dog"]);
        assert_eq!(
            trie.keywords_with_prefix("car", TermOrder::Lexicographic),
            vec!["car", "care", "cart"]
        );
        assert!(trie
            .keywords_with_prefix("cat", TermOrder::Insertion)
            .is_empty());
    }

    #[test]
    fn test_empty_keyword() {
        let mut trie = Trie::new();
        trie.insert("");
        trie.insert("a");
        assert!(trie.contains(""));
        assert_eq!(trie.list_all(TermOrder::Insertion), vec!["", "a"]);
        assert!(trie.remove(""));
        assert!(!trie.contains(""));
        assert!(trie.contains("a"));
    }

    #[test]
    fn test_longest_common_prefix() {
        assert_eq!(Trie::new().longest_common_prefix(), "");
        assert_eq!(
            Trie::from_keywords(["flower", "flow", "flight"]).longest_common_prefix(),
            "fl"
        );
        assert_eq!(
            Trie::from_keywords(["interview", "internet", "inter"]).longest_common_prefix(),
            "inter"
        );
        assert_eq!(Trie::from_keywords(["dog", "car"]).longest_common_prefix(), "");
    }

    #[test]
    fn test_deep_trie_listing() {
        let long = "x".repeat(100_000);
        let trie = Trie::from_keywords([long.as_str(), "x"]);
        let listed = trie.list_all(TermOrder::Insertion);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].len(), 100_000);
    }

    #[test]
    fn test_unicode_keywords() {
        let trie = Trie::from_keywords(["日本", "日本語", "中国"]);
        assert!(trie.contains("日本"));
        assert_eq!(trie.longest_common_prefix(), "");
        assert_eq!(
            trie.keywords_with_prefix("日", TermOrder::Insertion),
            vec!["日本", "日本語"]
        );
    }
}
