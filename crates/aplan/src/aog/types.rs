//! Arena types for the AND/OR graph.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sorted, deduplicated set of component labels. Identity is structural.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subassembly(Vec<String>);

impl Subassembly {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut v: Vec<String> = labels.into_iter().map(Into::into).collect();
        v.sort();
        v.dedup();
        Self(v)
    }

    pub fn single(label: impl Into<String>) -> Self {
        Self(vec![label.into()])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.binary_search_by(|l| l.as_str().cmp(label)).is_ok()
    }

    pub fn is_disjoint(&self, other: &Subassembly) -> bool {
        !self.0.iter().any(|l| other.contains(l))
    }

    /// `self` plus `label`, still sorted.
    pub fn with(&self, label: &str) -> Self {
        let mut v = self.0.clone();
        if let Err(pos) = v.binary_search_by(|l| l.as_str().cmp(label)) {
            v.insert(pos, label.to_string());
        }
        Self(v)
    }

    /// Labels of `self` not in `part`.
    pub fn minus(&self, part: &Subassembly) -> Self {
        Self(self.0.iter().filter(|l| !part.contains(l)).cloned().collect())
    }
}

impl fmt::Display for Subassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.join(", "))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

/// Decomposition of `parent` into disjoint `children` whose union is the parent.
/// Children are sorted by their subassembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AndEdge {
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}

/// Hypergraph of feasible subassemblies and their decompositions.
///
/// Nodes live in an arena; edges and both adjacency indices refer to them by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AndOrGraph {
    nodes: Vec<Subassembly>,
    index: BTreeMap<Subassembly, NodeId>,
    edges: Vec<AndEdge>,
    out_edges: Vec<Vec<EdgeId>>, // edges whose parent is node k
    in_edges: Vec<Vec<EdgeId>>,  // edges listing node k as a child
}

impl AndOrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `sub` (or find it) and return its id.
    pub fn add_node(&mut self, sub: Subassembly) -> NodeId {
        if let Some(&id) = self.index.get(&sub) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(sub.clone(), id);
        self.nodes.push(sub);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    /// Record `parent -> children` once. Returns `None` for a duplicate or an unknown id.
    pub fn add_edge(&mut self, parent: NodeId, mut children: Vec<NodeId>) -> Option<EdgeId> {
        let n = self.nodes.len();
        if parent.0 >= n || children.iter().any(|c| c.0 >= n) {
            return None;
        }
        children.sort_by(|a, b| self.nodes[a.0].cmp(&self.nodes[b.0]));
        children.dedup();
        let dup = self.out_edges[parent.0]
            .iter()
            .any(|e| self.edges[e.0].children == children);
        if dup {
            return None;
        }
        let id = EdgeId(self.edges.len());
        for c in &children {
            self.in_edges[c.0].push(id);
        }
        self.out_edges[parent.0].push(id);
        self.edges.push(AndEdge { parent, children });
        Some(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> &Subassembly {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, sub: &Subassembly) -> Option<NodeId> {
        self.index.get(sub).copied()
    }

    pub fn contains(&self, sub: &Subassembly) -> bool {
        self.index.contains_key(sub)
    }

    pub fn edge(&self, id: EdgeId) -> &AndEdge {
        &self.edges[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Subassembly)> {
        self.nodes.iter().enumerate().map(|(i, s)| (NodeId(i), s))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &AndEdge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Decompositions of `id`.
    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.out_edges[id.0]
    }

    /// Decompositions that produce `id` as one of their parts.
    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.in_edges[id.0]
    }

    /// The largest node, i.e. the full assembly once generation succeeded.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes()
            .max_by(|(_, a), (_, b)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(id, _)| id)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(|(_, s)| s.len() == 1)
            .map(|(id, _)| id)
    }

    /// Children subassemblies of every decomposition of `sub`, sorted.
    pub fn decompositions(&self, sub: &Subassembly) -> Vec<Vec<&Subassembly>> {
        let Some(id) = self.node_id(sub) else {
            return Vec::new();
        };
        let mut out: Vec<Vec<&Subassembly>> = self
            .out_edges(id)
            .iter()
            .map(|e| self.edge(*e).children.iter().map(|c| self.node(*c)).collect())
            .collect();
        out.sort();
        out
    }

    /// Document with nodes sorted by (size, labels) and edges referring to node positions.
    pub fn to_json(&self) -> AogJson {
        let mut order: Vec<NodeId> = (0..self.nodes.len()).map(NodeId).collect();
        order.sort_by(|a, b| {
            let (sa, sb) = (&self.nodes[a.0], &self.nodes[b.0]);
            sa.len().cmp(&sb.len()).then_with(|| sa.cmp(sb))
        });
        let mut pos = vec![0usize; self.nodes.len()];
        for (i, id) in order.iter().enumerate() {
            pos[id.0] = i;
        }
        let nodes = order
            .iter()
            .map(|id| AogNodeJson {
                elements: self.nodes[id.0].clone(),
            })
            .collect();
        let mut edges: Vec<AogEdgeJson> = self
            .edges
            .iter()
            .map(|e| AogEdgeJson {
                parent: pos[e.parent.0],
                children: e.children.iter().map(|c| pos[c.0]).collect(),
            })
            .collect();
        edges.sort_by(|a, b| (a.parent, &a.children).cmp(&(b.parent, &b.children)));
        AogJson { nodes, edges }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AogNodeJson {
    pub elements: Subassembly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AogEdgeJson {
    pub parent: usize,
    pub children: Vec<usize>,
}

/// Persisted AND/OR graph: `{"nodes": [{"elements": [...]}], "edges": [{"parent": i, "children": [j, k]}]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AogJson {
    pub nodes: Vec<AogNodeJson>,
    pub edges: Vec<AogEdgeJson>,
}

impl AogJson {
    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
