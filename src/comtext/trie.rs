//! Prefix index over invocation spellings
//!
//! Nodes live in an arena and point at their parent by id, so a stored name
//! can be rebuilt by walking back to the root without any shared ownership.
//! Dispatch relies on [`PrefixIndex::longest_prefix`]: when both `\a` and
//! `\ab` are registered, the text `\abc` always resolves to `\ab`.

use std::collections::BTreeMap;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node<V> {
    key: char,
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
    value: Option<V>,
}

impl<V> Node<V> {
    fn new(key: char, parent: Option<NodeId>) -> Self {
        Self {
            key,
            parent,
            children: BTreeMap::new(),
            value: None,
        }
    }
}

/// Character trie mapping names to values
#[derive(Debug, Clone)]
pub struct PrefixIndex<V> {
    nodes: Vec<Node<V>>,
    len: usize,
}

impl<V> PrefixIndex<V> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new('\0', None)],
            len: 0,
        }
    }

    /// Store `value` under `name`, returning the value it replaces
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        let mut current = ROOT;
        for ch in name.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new(ch, Some(current)));
                    self.nodes[current].children.insert(ch, child);
                    child
                }
            };
        }
        let previous = self.nodes[current].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn find_node(&self, name: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for ch in name.chars() {
            current = *self.nodes[current].children.get(&ch)?;
        }
        Some(current)
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.find_node(name)
            .and_then(|id| self.nodes[id].value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Longest stored name that is a prefix of `text`.
    ///
    /// Returns the matched slice of `text` together with its value.
    pub fn longest_prefix<'t>(&self, text: &'t str) -> Option<(&'t str, &V)> {
        let mut current = ROOT;
        let mut best: Option<(usize, NodeId)> = None;
        for (offset, ch) in text.char_indices() {
            match self.nodes[current].children.get(&ch) {
                Some(&child) => current = child,
                None => break,
            }
            if self.nodes[current].value.is_some() {
                best = Some((offset + ch.len_utf8(), current));
            }
        }
        let (end, id) = best?;
        self.nodes[id].value.as_ref().map(|value| (&text[..end], value))
    }

    /// Number of stored names
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn name_of(&self, id: NodeId) -> String {
        let mut chars = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            chars.push(self.nodes[current].key);
            current = parent;
        }
        chars.iter().rev().collect()
    }

    /// All stored names with their values, in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (String, &V)> + '_ {
        let mut stack = vec![ROOT];
        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                let node = &self.nodes[id];
                stack.extend(node.children.values().rev().copied());
                if let Some(value) = node.value.as_ref() {
                    return Some((self.name_of(id), value));
                }
            }
            None
        })
    }
}

impl<V> Default for PrefixIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}
