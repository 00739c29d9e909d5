//! Candidate generation: split a word on every known TLD that ends it

use crate::trie::SuffixTrie;

/// Join `label` and `suffix` of `word` into `label.suffix`
fn split_at_suffix(word: &str, suffix: &str) -> String {
    let label = &word[..word.len() - suffix.len()];
    let mut domain = String::with_capacity(word.len() + 1);
    domain.push_str(label);
    domain.push('.');
    domain.push_str(suffix);
    domain
}

/// Every candidate for `word`, in the trie's shortest-suffix-first order
pub fn generate(word: &str, trie: &SuffixTrie) -> Vec<String> {
    CandidateGenerator::new(trie).generate(word)
}

/// Turns words into `label.tld` candidates using a frozen [`SuffixTrie`]
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'t> {
    trie: &'t SuffixTrie,
    skip_empty_labels: bool,
}

impl<'t> CandidateGenerator<'t> {
    pub fn new(trie: &'t SuffixTrie) -> Self {
        Self {
            trie,
            skip_empty_labels: false,
        }
    }

    /// Drop candidates where the matched TLD is the whole word (`.com`)
    pub fn skip_empty_labels(mut self, skip: bool) -> Self {
        self.skip_empty_labels = skip;
        self
    }

    /// Lazily yield the candidates for `word`
    pub fn candidates<'a>(&self, word: &'a str) -> impl Iterator<Item = String> + 'a
    where
        't: 'a,
    {
        let skip_empty = self.skip_empty_labels;
        let trie: &'a SuffixTrie = self.trie;
        trie.suffixes(word)
            .filter(move |suffix| !(skip_empty && suffix.len() == word.len()))
            .map(move |suffix| split_at_suffix(word, suffix))
    }

    pub fn generate(&self, word: &str) -> Vec<String> {
        self.candidates(word).collect()
    }
}
