//! Build-dependency tracking for incremental rebuilds.
//!
//! Layout composition records an edge from a written document to every layout
//! that wrapped it. [`Regenerator`] keeps those edges in a directed graph so a
//! rebuild driver can ask which documents are stale when a layout changes.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sink for dependency edges produced while rendering.
pub trait DependencyTracker: Send + Sync {
    /// Record that `dependent` must be rebuilt when `dependency` changes.
    fn add_dependency(&self, dependent: &Path, dependency: &Path);
}

/// Directed graph of source paths. An edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Default)]
struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

impl DependencyGraph {
    fn ensure_node(&mut self, path: &Path) -> NodeIndex {
        if let Some(&index) = self.node_map.get(path) {
            index
        } else {
            let index = self.graph.add_node(path.to_path_buf());
            self.node_map.insert(path.to_path_buf(), index);
            index
        }
    }

    fn add_dependency(&mut self, from: &Path, to: &Path) -> bool {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if self.graph.contains_edge(from_idx, to_idx) {
            false
        } else {
            self.graph.add_edge(from_idx, to_idx, ());
            true
        }
    }

    fn direct(&self, path: &Path, direction: Direction) -> Vec<PathBuf> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        let set: BTreeSet<PathBuf> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|idx| self.graph[idx].clone())
            .collect();
        set.into_iter().collect()
    }

    fn transitive(&self, path: &Path, direction: Direction) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::new();

        if let Some(&index) = self.node_map.get(path) {
            queue.push_back(index);
            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors_directed(current, direction) {
                    if found.insert(self.graph[neighbor].clone()) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        found.remove(path);
        found.into_iter().collect()
    }
}

/// Thread-safe dependency graph.
#[derive(Debug, Default)]
pub struct Regenerator {
    graph: Mutex<DependencyGraph>,
}

impl Regenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn graph(&self) -> MutexGuard<'_, DependencyGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Direct dependencies of `path`, sorted.
    pub fn dependencies_of(&self, path: &Path) -> Vec<PathBuf> {
        self.graph().direct(path, Direction::Outgoing)
    }

    /// Everything that depends on `path`, directly or through other files, sorted.
    pub fn dependents_of(&self, path: &Path) -> Vec<PathBuf> {
        self.graph().transitive(path, Direction::Incoming)
    }

    pub fn edge_count(&self) -> usize {
        self.graph().graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph().graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Forget every recorded edge.
    pub fn clear(&self) {
        *self.graph() = DependencyGraph::default();
    }
}

impl DependencyTracker for Regenerator {
    fn add_dependency(&self, dependent: &Path, dependency: &Path) {
        if self.graph().add_dependency(dependent, dependency) {
            tracing::debug!(
                "Dependency: {} -> {}",
                dependent.display(),
                dependency.display()
            );
        }
    }
}
