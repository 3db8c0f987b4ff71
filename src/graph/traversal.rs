//! Bidirectional lineage traversal from a root table.
//!
//! Two stack-based explorations run from the same root: first over the
//! downstream relation, then over the upstream relation. By default both
//! phases share one visited set, so a node yields exactly one edge, the one
//! that first discovered it. A node reached downstream therefore never
//! produces an upstream edge, even when the relation holds in both
//! directions.
//!
//! Sibling visitation order is an implementation detail. Callers should rely
//! on the node set and on first-discovery semantics, not on edge order.

use super::index::EdgeIndex;
use crate::table::TableId;
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Label carried by every lineage edge, whichever phase produced it
pub const DOWNSTREAM_LABEL: &str = "downstream";

/// How the two traversal phases track visited tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisitedMode {
    /// One visited set for both phases
    #[default]
    Shared,
    /// Each phase starts from a fresh visited set containing only the root.
    /// A table related to the root in both directions gets an edge from
    /// each phase.
    Independent,
}

impl FromStr for VisitedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(VisitedMode::Shared),
            "independent" => Ok(VisitedMode::Independent),
            _ => Err(format!(
                "Unknown visited mode: {}. Valid options: shared, independent",
                s
            )),
        }
    }
}

impl fmt::Display for VisitedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitedMode::Shared => write!(f, "shared"),
            VisitedMode::Independent => write!(f, "independent"),
        }
    }
}

/// Knobs for [`traverse_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions {
    pub mode: VisitedMode,
    /// Tables at this distance from the root are kept but not expanded
    pub max_depth: Option<usize>,
}

/// A directed edge pointing from a producer to its downstream consumer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineageEdge {
    pub from: TableId,
    pub to: TableId,
    pub label: &'static str,
}

impl LineageEdge {
    fn downstream(from: &TableId, to: &TableId) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            label: DOWNSTREAM_LABEL,
        }
    }
}

/// Tables and edges reachable from one root
#[derive(Debug, Clone)]
pub struct Lineage {
    pub root: TableId,
    pub visited: AHashSet<TableId>,
    pub edges: Vec<LineageEdge>,
}

impl Lineage {
    pub fn is_root(&self, table: &TableId) -> bool {
        &self.root == table
    }

    pub fn node_count(&self) -> usize {
        self.visited.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Visited tables with the root first, the rest sorted
    pub fn sorted_nodes(&self) -> Vec<&TableId> {
        let mut nodes: Vec<_> = self
            .visited
            .iter()
            .filter(|t| **t != self.root)
            .collect();
        nodes.sort();
        nodes.insert(0, &self.root);
        nodes
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Downstream,
    Upstream,
}

/// Traverse both directions from `root` with a shared visited set.
///
/// An unknown root is not an error: the result holds the root alone.
pub fn traverse(root: &TableId, index: &EdgeIndex) -> Lineage {
    traverse_with(root, index, &TraversalOptions::default())
}

pub fn traverse_with(root: &TableId, index: &EdgeIndex, options: &TraversalOptions) -> Lineage {
    let mut visited = AHashSet::new();
    visited.insert(root.clone());
    let mut edges = Vec::new();

    explore(
        root,
        index,
        Phase::Downstream,
        options.max_depth,
        &mut visited,
        &mut edges,
    );

    match options.mode {
        VisitedMode::Shared => {
            explore(
                root,
                index,
                Phase::Upstream,
                options.max_depth,
                &mut visited,
                &mut edges,
            );
        }
        VisitedMode::Independent => {
            let mut upstream_visited = AHashSet::new();
            upstream_visited.insert(root.clone());
            explore(
                root,
                index,
                Phase::Upstream,
                options.max_depth,
                &mut upstream_visited,
                &mut edges,
            );
            visited.extend(upstream_visited);
        }
    }

    Lineage {
        root: root.clone(),
        visited,
        edges,
    }
}

fn explore(
    root: &TableId,
    index: &EdgeIndex,
    phase: Phase,
    max_depth: Option<usize>,
    visited: &mut AHashSet<TableId>,
    edges: &mut Vec<LineageEdge>,
) {
    let mut stack: Vec<(TableId, usize)> = vec![(root.clone(), 0)];

    while let Some((current, depth)) = stack.pop() {
        if let Some(max) = max_depth {
            if depth >= max {
                continue;
            }
        }

        let neighbors: &BTreeSet<TableId> = match phase {
            Phase::Downstream => index.downstream_of(current.as_str()),
            Phase::Upstream => index.upstream_of(current.as_str()),
        };

        for neighbor in neighbors {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            stack.push((neighbor.clone(), depth + 1));

            // An upstream neighbor still points at its consumer
            edges.push(match phase {
                Phase::Downstream => LineageEdge::downstream(&current, neighbor),
                Phase::Upstream => LineageEdge::downstream(neighbor, &current),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TableId {
        TableId::new(s)
    }

    fn edge(from: &str, to: &str) -> LineageEdge {
        LineageEdge::downstream(&id(from), &id(to))
    }

    fn index_of(pairs: &[(&str, &str)]) -> EdgeIndex {
        let mut index = EdgeIndex::new();
        for (source, target) in pairs {
            index.add_downstream_edge(id(source), id(target));
        }
        index
    }

    fn names(lineage: &Lineage) -> BTreeSet<&str> {
        lineage.visited.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_downstream_chain() {
        let index = index_of(&[("A", "B"), ("B", "C")]);
        let lineage = traverse(&id("A"), &index);

        assert_eq!(names(&lineage), BTreeSet::from(["A", "B", "C"]));
        assert_eq!(lineage.edges, vec![edge("A", "B"), edge("B", "C")]);
    }

    #[test]
    fn test_upstream_edges_point_at_consumer() {
        let index = index_of(&[("A", "B"), ("C", "A")]);
        let lineage = traverse(&id("A"), &index);

        assert_eq!(names(&lineage), BTreeSet::from(["A", "B", "C"]));
        assert!(lineage.edges.contains(&edge("A", "B")));
        assert!(lineage.edges.contains(&edge("C", "A")));
        assert_eq!(lineage.edge_count(), 2);
    }

    #[test]
    fn test_rediscovered_node_yields_no_edge() {
        // B is found from A before C is expanded, so C -> B is dropped
        let index = index_of(&[("A", "B"), ("A", "C"), ("C", "B")]);
        let lineage = traverse(&id("A"), &index);

        assert_eq!(names(&lineage), BTreeSet::from(["A", "B", "C"]));
        assert!(lineage.edges.contains(&edge("A", "B")));
        assert!(lineage.edges.contains(&edge("A", "C")));
        assert!(!lineage.edges.contains(&edge("C", "B")));
        assert_eq!(lineage.edge_count(), 2);
    }

    #[test]
    fn test_downstream_phase_wins_across_phases() {
        // B is both downstream and upstream of A
        let index = index_of(&[("A", "B"), ("B", "A")]);
        let lineage = traverse(&id("A"), &index);

        assert_eq!(lineage.edges, vec![edge("A", "B")]);
    }

    #[test]
    fn test_ancestors_behind_downstream_node_are_not_reached() {
        // X is downstream of A, so the upstream phase never expands it
        let index = index_of(&[("A", "X"), ("X", "A"), ("Y", "X")]);

        let shared = traverse(&id("A"), &index);
        assert_eq!(names(&shared), BTreeSet::from(["A", "X"]));

        let options = TraversalOptions {
            mode: VisitedMode::Independent,
            max_depth: None,
        };
        let independent = traverse_with(&id("A"), &index, &options);
        assert_eq!(names(&independent), BTreeSet::from(["A", "X", "Y"]));
        assert!(independent.edges.contains(&edge("Y", "X")));
    }

    #[test]
    fn test_independent_mode_keeps_both_directions() {
        let index = index_of(&[("A", "B"), ("B", "A")]);
        let options = TraversalOptions {
            mode: VisitedMode::Independent,
            max_depth: None,
        };
        let lineage = traverse_with(&id("A"), &index, &options);

        assert_eq!(names(&lineage), BTreeSet::from(["A", "B"]));
        assert_eq!(lineage.edges, vec![edge("A", "B"), edge("B", "A")]);
    }

    #[test]
    fn test_unknown_root_is_singleton() {
        let index = index_of(&[("A", "B")]);
        let lineage = traverse(&id("nowhere"), &index);

        assert_eq!(names(&lineage), BTreeSet::from(["nowhere"]));
        assert!(lineage.edges.is_empty());
    }

    #[test]
    fn test_isolated_table() {
        let index = EdgeIndex::from_rows(vec![(id("solo"), vec![])]);
        let lineage = traverse(&id("solo"), &index);

        assert_eq!(lineage.node_count(), 1);
        assert!(lineage.edges.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let index = index_of(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let lineage = traverse(&id("A"), &index);

        assert_eq!(lineage.node_count(), 3);
        assert_eq!(lineage.edge_count(), 2);
    }

    #[test]
    fn test_max_depth_limits_both_phases() {
        let index = index_of(&[("U2", "U1"), ("U1", "A"), ("A", "D1"), ("D1", "D2")]);
        let options = TraversalOptions {
            mode: VisitedMode::Shared,
            max_depth: Some(1),
        };
        let lineage = traverse_with(&id("A"), &index, &options);

        assert_eq!(names(&lineage), BTreeSet::from(["A", "D1", "U1"]));
        assert_eq!(lineage.edges, vec![edge("A", "D1"), edge("U1", "A")]);
    }

    #[test]
    fn test_max_depth_zero_is_root_only() {
        let index = index_of(&[("A", "B")]);
        let options = TraversalOptions {
            mode: VisitedMode::Shared,
            max_depth: Some(0),
        };
        let lineage = traverse_with(&id("A"), &index, &options);

        assert_eq!(lineage.node_count(), 1);
        assert!(lineage.edges.is_empty());
    }

    #[test]
    fn test_each_node_discovered_once() {
        let index = index_of(&[
            ("A", "B"),
            ("A", "C"),
            ("B", "D"),
            ("C", "D"),
            ("E", "A"),
            ("E", "B"),
            ("F", "E"),
        ]);

        for root in index.tables() {
            let lineage = traverse(root, &index);
            assert!(lineage.visited.contains(root));

            // Every non-root node owns exactly one discovery edge
            assert_eq!(lineage.edge_count(), lineage.node_count() - 1);
            let mut known = AHashSet::new();
            known.insert(root.clone());
            for e in &lineage.edges {
                let from_known = known.contains(&e.from);
                let to_known = known.contains(&e.to);
                assert!(from_known != to_known, "edge {:?} rediscovers a node", e);
                known.insert(e.from.clone());
                known.insert(e.to.clone());
            }
            assert_eq!(known, lineage.visited);
        }
    }

    #[test]
    fn test_traversal_is_repeatable() {
        let index = index_of(&[("A", "B"), ("B", "C"), ("D", "B"), ("C", "A")]);
        let first = traverse(&id("B"), &index);
        let second = traverse(&id("B"), &index);

        assert_eq!(first.visited, second.visited);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn test_sorted_nodes_root_first() {
        let index = index_of(&[("A", "Z"), ("M", "Z")]);
        let lineage = traverse(&id("Z"), &index);
        let nodes: Vec<&str> = lineage.sorted_nodes().iter().map(|t| t.as_str()).collect();

        assert_eq!(nodes, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_visited_mode_parse() {
        assert_eq!("shared".parse::<VisitedMode>().unwrap(), VisitedMode::Shared);
        assert_eq!(
            "Independent".parse::<VisitedMode>().unwrap(),
            VisitedMode::Independent
        );
        assert!("both".parse::<VisitedMode>().is_err());
    }
}
