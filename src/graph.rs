//! Dependency graph over requirement identities.
//!
//! The graph is not stored; it is a derived view rebuilt from a snapshot of
//! the requirement collection whenever an edge mutation needs validating.
//! `A depends-on B` is a directed edge from A to B, meaning A cannot be
//! considered satisfied until B is.

use petgraph::{
    algo::{has_path_connecting, is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use uuid::Uuid;

use crate::domain::Requirement;

/// A directed dependency graph over requirement identities.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraphMap<Uuid, ()>,
}

impl DependencyGraph {
    /// Builds the graph from a snapshot of the requirement collection.
    ///
    /// Every record becomes a node; every `depends_on` entry becomes an edge
    /// from the dependent to its dependency. The snapshot must not change
    /// while the graph is in use; the facade builds it inside the same
    /// serialized unit as the edge insertion.
    pub fn from_requirements<'a, I>(requirements: I) -> Self
    where
        I: IntoIterator<Item = &'a Requirement>,
    {
        let mut graph = DiGraphMap::new();
        for requirement in requirements {
            graph.add_node(requirement.id());
            for &dependency in requirement.depends_on() {
                graph.add_edge(requirement.id(), dependency, ());
            }
        }
        Self { graph }
    }

    /// Whether inserting the edge `dependent → dependency` would close a
    /// cycle.
    ///
    /// Self-loops always would. Otherwise the edge is rejected when
    /// `dependent` is already reachable from `dependency` over the existing
    /// edge set. Reachability is a depth-first traversal with a visited set,
    /// so it terminates on graphs with shared sub-dependencies; a single-hop
    /// check would not catch transitive cycles.
    #[must_use]
    pub fn would_create_cycle(&self, dependent: Uuid, dependency: Uuid) -> bool {
        if dependent == dependency {
            return true;
        }

        self.graph.contains_node(dependency)
            && self.graph.contains_node(dependent)
            && has_path_connecting(&self.graph, dependency, dependent, None)
    }

    /// Whether the current edge set contains any cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// All cycles in the graph, as sorted groups of requirement ids.
    ///
    /// The engine never commits a cycle-closing edge, so on healthy stores
    /// this is empty; hand-edited store files can still introduce cycles,
    /// which the health view surfaces through this method.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<Uuid>> {
        let mut cycles = Vec::new();

        for component in tarjan_scc(&self.graph) {
            if component.len() > 1 {
                let mut ids = component;
                ids.sort();
                cycles.push(ids);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if self.graph.contains_edge(node, node) {
                cycles.push(vec![node]);
            }
        }

        cycles.sort();
        cycles
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
