//! Dependency edges between tasks and reachability over them.
//!
//! An edge `A -> B` reads "A depends on B". The edge set is kept acyclic by
//! refusing any new edge whose target already reaches its source. Reachability
//! is answered by `petgraph` over a graph keyed directly by task id.

use super::{TaskDomainError, TaskId};
use petgraph::Direction;
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directed edge recording that `task_id` depends on `depends_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    task_id: TaskId,
    depends_on: TaskId,
}

impl DependencyEdge {
    /// Creates an edge between two distinct tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SelfDependency`] when both ends are the
    /// same task.
    pub const fn new(task_id: TaskId, depends_on: TaskId) -> Result<Self, TaskDomainError> {
        if task_id.value() == depends_on.value() {
            return Err(TaskDomainError::SelfDependency(task_id));
        }
        Ok(Self {
            task_id,
            depends_on,
        })
    }

    /// Returns the dependent task.
    #[must_use]
    pub const fn task_id(self) -> TaskId {
        self.task_id
    }

    /// Returns the task depended upon.
    #[must_use]
    pub const fn depends_on(self) -> TaskId {
        self.depends_on
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.task_id, self.depends_on)
    }
}

/// Directed graph from each task to the tasks it depends on.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraphMap<TaskId, ()>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge. Returns `false` if it was already present.
    pub fn insert(&mut self, edge: DependencyEdge) -> bool {
        self.graph
            .add_edge(edge.task_id(), edge.depends_on(), ())
            .is_none()
    }

    /// Removes an edge. Returns `false` if it was absent.
    pub fn remove(&mut self, edge: DependencyEdge) -> bool {
        self.graph
            .remove_edge(edge.task_id(), edge.depends_on())
            .is_some()
    }

    /// Returns `true` when the edge is present.
    #[must_use]
    pub fn contains(&self, edge: DependencyEdge) -> bool {
        self.graph.contains_edge(edge.task_id(), edge.depends_on())
    }

    /// Returns the direct dependencies of `task_id` in ascending order.
    #[must_use]
    pub fn dependencies_of(&self, task_id: TaskId) -> Vec<TaskId> {
        if !self.graph.contains_node(task_id) {
            return Vec::new();
        }
        let mut targets: Vec<TaskId> = self
            .graph
            .neighbors_directed(task_id, Direction::Outgoing)
            .collect();
        targets.sort_unstable();
        targets
    }

    /// Returns `true` when `target` is reachable from `start`.
    #[must_use]
    pub fn reaches(&self, start: TaskId, target: TaskId) -> bool {
        if start == target {
            return true;
        }
        self.graph.contains_node(start)
            && self.graph.contains_node(target)
            && has_path_connecting(&self.graph, start, target, None)
    }

    /// Returns `true` when inserting `edge` would close a cycle, i.e. the task
    /// depended upon already reaches the dependent task.
    #[must_use]
    pub fn would_close_cycle(&self, edge: DependencyEdge) -> bool {
        self.reaches(edge.depends_on(), edge.task_id())
    }

    /// Returns `true` when no edge lies on a cycle.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Iterates every edge in `(task_id, depends_on)` order.
    pub fn iter(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .all_edges()
            .map(|(task_id, depends_on, _)| DependencyEdge {
                task_id,
                depends_on,
            })
            .collect();
        edges.sort_unstable();
        edges.into_iter()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` when the graph holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}

impl FromIterator<DependencyEdge> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = DependencyEdge>>(iter: I) -> Self {
        let mut graph = Self::new();
        for edge in iter {
            graph.insert(edge);
        }
        graph
    }
}
