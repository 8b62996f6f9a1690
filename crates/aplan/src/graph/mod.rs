//! Constraint graphs produced by the detectors and consumed by the AND/OR generator.
//!
//! - `ConnectionGraph`: undirected contact graph. Edges are stored once as `(a, b)` with `a < b`.
//! - `ObstructionGraph`: directed blocking graph for one motion direction. `(t, o)` means `o`
//!   blocks the removal of `t` along the direction.
//!
//! Both serialize to the node/link document `GraphJson`.

mod json;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::geom::MotionDirection;

pub use json::{GraphJson, LinkJson, NodeJson};

pub type Edge = (String, String);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionGraph {
    nodes: BTreeSet<String>,
    edges: BTreeSet<Edge>,
}

impl ConnectionGraph {
    /// Build from nodes and unordered edges. Endpoints missing from `nodes` are added;
    /// self-loops are dropped.
    pub fn new<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = Edge>,
    {
        let mut nodes: BTreeSet<String> = nodes.into_iter().map(Into::into).collect();
        let mut set = BTreeSet::new();
        for (a, b) in edges {
            if a == b {
                continue;
            }
            nodes.insert(a.clone());
            nodes.insert(b.clone());
            set.insert(if a < b { (a, b) } else { (b, a) });
        }
        Self { nodes, edges: set }
    }

    /// Every pair adjacent.
    pub fn complete<N>(nodes: N) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let nodes: Vec<String> = nodes.into_iter().map(Into::into).collect();
        let mut edges = Vec::new();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                edges.push((a.clone(), b.clone()));
            }
        }
        Self::new(nodes, edges)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    /// Sorted `(a, b)` edges with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.edges.contains(&(a.to_string(), b.to_string()))
    }

    /// Adjacency lists for every node (isolated nodes map to an empty set).
    pub fn adjacency(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut adj: BTreeMap<&str, BTreeSet<&str>> =
            self.nodes.iter().map(|n| (n.as_str(), BTreeSet::new())).collect();
        for (a, b) in &self.edges {
            adj.entry(a.as_str()).or_default().insert(b.as_str());
            adj.entry(b.as_str()).or_default().insert(a.as_str());
        }
        adj
    }

    pub fn neighbors(&self, label: &str) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter_map(|(a, b)| {
                if a == label {
                    Some(b.as_str())
                } else if b == label {
                    Some(a.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    /// True if the subgraph induced by `subset` is connected. Empty subsets are not.
    pub fn is_connected_subset<S: AsRef<str>>(&self, subset: &[S]) -> bool {
        let Some(first) = subset.first() else {
            return false;
        };
        let members: BTreeSet<&str> = subset.iter().map(AsRef::as_ref).collect();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue = VecDeque::from([first.as_ref()]);
        seen.insert(first.as_ref());
        while let Some(n) = queue.pop_front() {
            for m in self.neighbors(n) {
                if members.contains(m) && seen.insert(m) {
                    queue.push_back(m);
                }
            }
        }
        seen.len() == members.len()
    }

    pub fn to_json(&self) -> GraphJson {
        GraphJson::from_parts(&self.nodes, &self.edges)
    }

    pub fn from_json(doc: &GraphJson) -> Self {
        Self::new(doc.node_names(), doc.edge_pairs())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstructionGraph {
    direction: MotionDirection,
    nodes: BTreeSet<String>,
    edges: BTreeSet<Edge>,
}

impl ObstructionGraph {
    pub fn new<N, E>(direction: MotionDirection, nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = Edge>,
    {
        let mut nodes: BTreeSet<String> = nodes.into_iter().map(Into::into).collect();
        let mut set = BTreeSet::new();
        for (t, o) in edges {
            if t == o {
                continue;
            }
            nodes.insert(t.clone());
            nodes.insert(o.clone());
            set.insert((t, o));
        }
        Self {
            direction,
            nodes,
            edges: set,
        }
    }

    #[inline]
    pub fn direction(&self) -> MotionDirection {
        self.direction
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }

    /// `(target, obstructor)` edges in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, target: &str, obstructor: &str) -> bool {
        self.edges
            .contains(&(target.to_string(), obstructor.to_string()))
    }

    /// Obstructors of `target`.
    pub fn successors(&self, target: &str) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, o)| o.as_str())
            .collect()
    }

    /// Graph of the opposite direction obtained by swapping every edge.
    pub fn reversed(&self) -> Self {
        Self {
            direction: self.direction.opposite(),
            nodes: self.nodes.clone(),
            edges: self
                .edges
                .iter()
                .map(|(t, o)| (o.clone(), t.clone()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> GraphJson {
        GraphJson::from_parts(&self.nodes, &self.edges)
    }

    pub fn from_json(direction: MotionDirection, doc: &GraphJson) -> Self {
        Self::new(direction, doc.node_names(), doc.edge_pairs())
    }
}

#[cfg(test)]
mod tests;
