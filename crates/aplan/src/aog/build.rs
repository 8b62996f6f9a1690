//! Reverse cutset construction of the AND/OR graph.

use std::collections::BTreeSet;

use crate::error::AogError;
use crate::graph::{ConnectionGraph, ObstructionGraph};

use super::rules::BlockingRules;
use super::types::{AndOrGraph, Subassembly};

/// Feasible subassemblies grouped by size; `levels[k]` holds the size-`k` ones.
#[derive(Clone, Debug, Default)]
pub struct Levels(Vec<BTreeSet<Subassembly>>);

impl Levels {
    pub fn get(&self, size: usize) -> Option<&BTreeSet<Subassembly>> {
        self.0.get(size)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(BTreeSet::len).sum()
    }

    fn contains(&self, sub: &Subassembly) -> bool {
        self.0.get(sub.len()).is_some_and(|l| l.contains(sub))
    }
}

/// Build the AND/OR graph of `components`.
///
/// `topological = None` means every pair of components is connected. Obstruction graphs
/// become blocking rules; an empty slice means no geometrical constraints.
pub fn generate(
    components: &[String],
    topological: Option<&ConnectionGraph>,
    geometrical: &[ObstructionGraph],
) -> Result<AndOrGraph, AogError> {
    let comps: BTreeSet<String> = components.iter().cloned().collect();
    if comps.is_empty() {
        return Err(AogError::Empty);
    }
    check_labels(&comps, topological, geometrical)?;
    let comps: Vec<String> = comps.into_iter().collect();

    let complete;
    let topo = match topological {
        Some(t) => t,
        None => {
            complete = ConnectionGraph::complete(comps.iter().cloned());
            &complete
        }
    };
    if !topo.is_connected_subset(&comps) {
        return Err(AogError::NoFeasibleDecomposition(comps));
    }

    let rules = BlockingRules::from_graphs(&comps, geometrical);
    let levels = enumerate(&comps, topo, &rules);
    tracing::debug!(
        components = comps.len(),
        rules = rules.len(),
        subassemblies = levels.total(),
        "enumerated feasible subassemblies"
    );

    let aog = cutsets(&levels, comps.len());
    let full = Subassembly::new(comps.iter().cloned());
    let has_root_edge = aog
        .node_id(&full)
        .is_some_and(|id| !aog.out_edges(id).is_empty());
    if comps.len() > 1 && !has_root_edge {
        return Err(AogError::NoFeasibleDecomposition(comps));
    }
    tracing::info!(
        nodes = aog.node_count(),
        edges = aog.edge_count(),
        "built AND/OR graph"
    );
    Ok(aog)
}

fn check_labels(
    comps: &BTreeSet<String>,
    topological: Option<&ConnectionGraph>,
    geometrical: &[ObstructionGraph],
) -> Result<(), AogError> {
    let unknown = |l: &str| (!comps.contains(l)).then(|| AogError::UnknownComponent(l.to_string()));
    if let Some(t) = topological {
        if let Some(e) = t.nodes().find_map(unknown) {
            return Err(e);
        }
    }
    for g in geometrical {
        if let Some(e) = g.nodes().find_map(unknown) {
            return Err(e);
        }
        let endpoints = g.edges().flat_map(|(a, b)| [a.as_str(), b.as_str()]);
        if let Some(e) = endpoints.into_iter().find_map(unknown) {
            return Err(e);
        }
    }
    Ok(())
}

/// Size 1: every singleton. Size 2: feasible connection edges. Sizes 3..n-1: feasible
/// one-neighbour growths of the previous size. Size n: the full set.
pub fn enumerate(comps: &[String], topo: &ConnectionGraph, rules: &BlockingRules) -> Levels {
    let n = comps.len();
    let mut levels: Vec<BTreeSet<Subassembly>> = vec![BTreeSet::new(); n + 1];
    levels[1] = comps.iter().map(Subassembly::single).collect();
    if n >= 2 {
        levels[2] = topo
            .edges()
            .map(|(a, b)| Subassembly::new([a.as_str(), b.as_str()]))
            .filter(|s| rules.is_feasible(s))
            .collect();
    }
    let adj = topo.adjacency();
    for size in 3..n {
        let mut grown = BTreeSet::new();
        for sub in &levels[size - 1] {
            let frontier: BTreeSet<&str> = sub
                .labels()
                .iter()
                .filter_map(|l| adj.get(l.as_str()))
                .flatten()
                .copied()
                .filter(|nb| !sub.contains(nb))
                .collect();
            for nb in frontier {
                let cand = sub.with(nb);
                if !grown.contains(&cand) && rules.is_feasible(&cand) {
                    grown.insert(cand);
                }
            }
        }
        levels[size] = grown;
    }
    levels[n] = BTreeSet::from([Subassembly::new(comps.iter().cloned())]);
    Levels(levels)
}

/// Nodes for every enumerated subassembly and an AND-edge for every split of a size-`k`
/// node into two enumerated parts, the first of size `k-1` down to `ceil(k/2)`.
pub fn cutsets(levels: &Levels, n: usize) -> AndOrGraph {
    let mut aog = AndOrGraph::new();
    for size in (1..=n).rev() {
        for sub in levels.get(size).into_iter().flatten() {
            aog.add_node(sub.clone());
        }
    }
    for k in (3..=n).rev() {
        let Some(parents) = levels.get(k) else {
            continue;
        };
        for t1 in (k.div_ceil(2)..k).rev() {
            let Some(firsts) = levels.get(t1) else {
                continue;
            };
            for parent in parents {
                for first in firsts {
                    if !first.labels().iter().all(|l| parent.contains(l)) {
                        continue;
                    }
                    let rest = parent.minus(first);
                    if !levels.contains(&rest) {
                        continue;
                    }
                    if let (Some(p), Some(a), Some(b)) =
                        (aog.node_id(parent), aog.node_id(first), aog.node_id(&rest))
                    {
                        aog.add_edge(p, vec![a, b]);
                    }
                }
            }
        }
    }
    for pair in levels.get(2).into_iter().flatten() {
        let ids: Vec<_> = pair
            .labels()
            .iter()
            .filter_map(|l| aog.node_id(&Subassembly::single(l.as_str())))
            .collect();
        if let Some(p) = aog.node_id(pair) {
            aog.add_edge(p, ids);
        }
    }
    aog
}
