//! Mutable construction phase of the suffix trie

use super::suffix::SuffixTrie;
use super::{NodeId, NONE, ROOT};

#[derive(Debug, Clone, Copy)]
struct BuildNode {
    /// Head of this node's edge list in `edges`
    first_edge: u32,
    terminal: bool,
}

#[derive(Debug, Clone, Copy)]
struct BuildEdge {
    byte: u8,
    child: NodeId,
    /// Next sibling edge of the same parent
    next: u32,
}

/// Builder for [`SuffixTrie`]
///
/// Nodes and edges live in two flat arenas linked by index (first-child /
/// next-sibling), so inserting never allocates per node.
#[derive(Debug, Clone)]
pub struct SuffixTrieBuilder {
    nodes: Vec<BuildNode>,
    edges: Vec<BuildEdge>,
    len: usize,
}

impl SuffixTrieBuilder {
    /// Create a builder holding only the (non-terminal) root
    pub fn new() -> Self {
        Self {
            nodes: vec![BuildNode {
                first_edge: NONE,
                terminal: false,
            }],
            edges: Vec::new(),
            len: 0,
        }
    }

    /// Insert a suffix, consuming it from its last byte to its first.
    ///
    /// Returns `false` when the suffix was already present. Inserting the
    /// empty string marks the root itself terminal.
    pub fn add_suffix(&mut self, suffix: &str) -> bool {
        let mut node = ROOT;
        for &byte in suffix.as_bytes().iter().rev() {
            node = self.child_or_insert(node, byte);
        }

        let entry = &mut self.nodes[node as usize];
        if entry.terminal {
            return false;
        }
        entry.terminal = true;
        self.len += 1;
        true
    }

    /// Insert every suffix yielded by `suffixes`
    pub fn extend<I, S>(&mut self, suffixes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for suffix in suffixes {
            self.add_suffix(suffix.as_ref());
        }
    }

    /// Number of distinct suffixes inserted so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Freeze into the read-only representation.
    ///
    /// Nodes are renumbered breadth first and each node's children are
    /// sorted by byte so lookups can binary search them.
    pub fn build(self) -> SuffixTrie {
        let node_count = self.nodes.len();
        let mut order: Vec<NodeId> = Vec::with_capacity(node_count);
        let mut offsets: Vec<u32> = Vec::with_capacity(node_count + 1);
        let mut labels: Vec<u8> = Vec::with_capacity(node_count.saturating_sub(1));
        let mut targets: Vec<NodeId> = Vec::with_capacity(node_count.saturating_sub(1));
        let mut terminals: Vec<u64> = vec![0; node_count.div_ceil(64)];

        order.push(ROOT);
        let mut children: Vec<(u8, NodeId)> = Vec::new();
        let mut cursor = 0;

        // `order[i]` is the old id of the node that gets new id `i`.
        while cursor < order.len() {
            let old = order[cursor];
            let node = self.nodes[old as usize];
            if node.terminal {
                set_bit(&mut terminals, cursor);
            }

            children.clear();
            let mut edge = node.first_edge;
            while edge != NONE {
                let e = self.edges[edge as usize];
                children.push((e.byte, e.child));
                edge = e.next;
            }
            children.sort_unstable_by_key(|&(byte, _)| byte);

            offsets.push(labels.len() as u32);
            for &(byte, child) in &children {
                labels.push(byte);
                targets.push(order.len() as NodeId);
                order.push(child);
            }
            cursor += 1;
        }
        offsets.push(labels.len() as u32);

        SuffixTrie::from_parts(offsets, labels, targets, terminals, self.len)
    }

    fn child_or_insert(&mut self, parent: NodeId, byte: u8) -> NodeId {
        let mut edge = self.nodes[parent as usize].first_edge;
        while edge != NONE {
            let e = self.edges[edge as usize];
            if e.byte == byte {
                return e.child;
            }
            edge = e.next;
        }

        let child = self.nodes.len() as NodeId;
        self.nodes.push(BuildNode {
            first_edge: NONE,
            terminal: false,
        });

        let new_edge = self.edges.len() as u32;
        self.edges.push(BuildEdge {
            byte,
            child,
            next: self.nodes[parent as usize].first_edge,
        });
        self.nodes[parent as usize].first_edge = new_edge;

        child
    }
}

impl Default for SuffixTrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn set_bit(bitmap: &mut [u64], idx: usize) {
    bitmap[idx / 64] |= 1u64 << (idx % 64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_suffix_reports_new_entries() {
        let mut builder = SuffixTrieBuilder::new();
        assert!(builder.add_suffix("io"));
        assert!(builder.add_suffix("o"));
        assert!(!builder.add_suffix("io"));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_shared_tail_reuses_nodes() {
        let mut builder = SuffixTrieBuilder::new();
        builder.extend(["com", "dotcom"]);
        // root + m, o, c + o, t, o, d
        assert_eq!(builder.nodes.len(), 7);
        assert_eq!(builder.edges.len(), 6);
    }

    #[test]
    fn test_empty_builder() {
        let builder = SuffixTrieBuilder::default();
        assert!(builder.is_empty());

        let trie = builder.build();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.match_all_suffixes("anything").is_empty());
    }
}
