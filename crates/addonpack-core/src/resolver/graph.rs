//! Insertion-ordered dependency name set.

use std::collections::HashSet;

/// Set of dependency names that remembers first-insertion order.
///
/// The resolver's BFS visited set: the root, every name reached and
/// every missing name, so no name is enqueued twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name`; returns `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl<'a> FromIterator<&'a str> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut graph = Self::new();
        for name in iter {
            graph.insert(name);
        }
        graph
    }
}
