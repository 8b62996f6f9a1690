//! Node/link document shared by both graph kinds:
//! `{"nodes": [{"name": ..}], "links": [{"source": .., "target": ..}]}`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeJson {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkJson {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphJson {
    pub nodes: Vec<NodeJson>,
    pub links: Vec<LinkJson>,
}

impl GraphJson {
    pub(crate) fn from_parts(nodes: &BTreeSet<String>, edges: &BTreeSet<(String, String)>) -> Self {
        Self {
            nodes: nodes
                .iter()
                .map(|n| NodeJson { name: n.clone() })
                .collect(),
            links: edges
                .iter()
                .map(|(s, t)| LinkJson {
                    source: s.clone(),
                    target: t.clone(),
                })
                .collect(),
        }
    }

    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    pub fn edge_pairs(&self) -> Vec<(String, String)> {
        self.links
            .iter()
            .map(|l| (l.source.clone(), l.target.clone()))
            .collect()
    }

    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn parse(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
