//! Reverse-keyed suffix trie over the known TLD set
//!
//! TLDs are inserted back to front, so answering "which known TLDs end this
//! word" is a single walk from the word's last byte towards its first. The
//! cost of a query is bounded by the longest matching suffix, never by the
//! number of TLDs.
//!
//! Construction happens on a [`SuffixTrieBuilder`]; [`SuffixTrieBuilder::build`]
//! freezes it into an immutable [`SuffixTrie`] that can be shared across tasks
//! without locking.

mod builder;
mod suffix;

pub use builder::SuffixTrieBuilder;
pub use suffix::{SuffixTrie, Suffixes};

/// Index of a node inside a trie arena
pub(crate) type NodeId = u32;

/// The root node represents the empty suffix
pub(crate) const ROOT: NodeId = 0;

/// Sentinel for "no node / no edge" in arena links
pub(crate) const NONE: u32 = u32::MAX;
