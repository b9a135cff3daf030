use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    terminal: bool,
}

/// Prefix tree over lower-cased course codes and titles. Matching is
/// case-insensitive; original casing is recovered through a parallel
/// lowercase-to-original map built from the same source list. The first
/// insertion wins when two keys collide in lowercase.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    originals: HashMap<String, String>,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch construction at startup.
    pub fn build<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for key in keys {
            trie.insert(key.as_ref());
        }
        trie
    }

    pub fn insert(&mut self, key: &str) {
        let lowered = key.to_lowercase();
        let mut node = &mut self.root;
        for ch in lowered.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.terminal = true;
        self.originals.entry(lowered).or_insert_with(|| key.to_string());
    }

    /// All keys starting with `prefix`, in original casing. A prefix that
    /// leaves the trie yields nothing; there is no fuzzy fallback.
    /// Enumeration order is discovery order and deliberately unpinned.
    pub fn query(&self, prefix: &str) -> Vec<String> {
        let lowered = prefix.to_lowercase();
        let mut node = &self.root;
        for ch in lowered.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut matches = Vec::new();
        self.collect(node, lowered, &mut matches);
        matches
            .into_iter()
            .filter_map(|key| self.originals.get(&key).cloned())
            .collect()
    }

    fn collect(&self, node: &TrieNode, word: String, out: &mut Vec<String>) {
        if node.terminal {
            out.push(word.clone());
        }
        for (ch, child) in &node.children {
            let mut next = word.clone();
            next.push(*ch);
            self.collect(child, next, out);
        }
    }
}
