//! Frozen suffix trie and suffix matching

use super::builder::SuffixTrieBuilder;
use super::{NodeId, ROOT};

/// Immutable suffix trie in a flat, breadth-first layout.
///
/// The children of node `n` are `labels[offsets[n]..offsets[n + 1]]`
/// (sorted) with the matching child ids at the same positions in `targets`.
/// Terminal nodes are flagged in a bitmap.
#[derive(Debug, Clone)]
pub struct SuffixTrie {
    offsets: Vec<u32>,
    labels: Vec<u8>,
    targets: Vec<NodeId>,
    terminals: Vec<u64>,
    len: usize,
}

impl SuffixTrie {
    /// Start a new builder
    pub fn builder() -> SuffixTrieBuilder {
        SuffixTrieBuilder::new()
    }

    pub(crate) fn from_parts(
        offsets: Vec<u32>,
        labels: Vec<u8>,
        targets: Vec<NodeId>,
        terminals: Vec<u64>,
        len: usize,
    ) -> Self {
        Self {
            offsets,
            labels,
            targets,
            terminals,
            len,
        }
    }

    /// Number of distinct stored suffixes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether `suffix` itself was inserted
    pub fn contains(&self, suffix: &str) -> bool {
        let mut node = ROOT;
        for &byte in suffix.as_bytes().iter().rev() {
            match self.child(node, byte) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.is_terminal(node)
    }

    /// Every stored suffix that ends `candidate`, shortest first.
    ///
    /// The returned slices borrow from `candidate`.
    pub fn match_all_suffixes<'a>(&self, candidate: &'a str) -> Vec<&'a str> {
        self.suffixes(candidate).collect()
    }

    /// Lazy form of [`SuffixTrie::match_all_suffixes`]
    pub fn suffixes<'t, 'a>(&'t self, candidate: &'a str) -> Suffixes<'t, 'a> {
        Suffixes {
            trie: self,
            candidate,
            node: Some(ROOT),
            ptr: candidate.len(),
        }
    }

    fn child(&self, node: NodeId, byte: u8) -> Option<NodeId> {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        self.labels[start..end]
            .binary_search(&byte)
            .ok()
            .map(|i| self.targets[start + i])
    }

    #[inline]
    fn is_terminal(&self, node: NodeId) -> bool {
        let idx = node as usize;
        (self.terminals[idx / 64] >> (idx % 64)) & 1 == 1
    }
}

impl Default for SuffixTrie {
    fn default() -> Self {
        SuffixTrieBuilder::new().build()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SuffixTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut builder = SuffixTrieBuilder::new();
        builder.extend(iter);
        builder.build()
    }
}

/// Iterator over the stored suffixes of one candidate, shortest first
#[derive(Debug, Clone)]
pub struct Suffixes<'t, 'a> {
    trie: &'t SuffixTrie,
    candidate: &'a str,
    /// Current node, `None` once the walk has stopped
    node: Option<NodeId>,
    /// Start of the suffix consumed so far
    ptr: usize,
}

impl<'t, 'a> Iterator for Suffixes<'t, 'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.candidate.as_bytes();
        while let Some(node) = self.node {
            let hit = self.trie.is_terminal(node);
            let start = self.ptr;

            self.node = if self.ptr == 0 {
                None
            } else {
                self.ptr -= 1;
                self.trie.child(node, bytes[self.ptr])
            };

            if hit {
                // A terminal node spells a whole stored &str, whose first byte is
                // never a UTF-8 continuation byte, so `start` is a char boundary.
                return Some(&self.candidate[start..]);
            }
        }
        None
    }
}
