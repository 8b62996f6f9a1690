//! Blocking rules derived from obstruction graphs.
//!
//! A rule `(c, S)` reads: a subassembly containing every label of `S` must also contain `c`.
//! For each component the rules are the Cartesian product of its successor sets, one factor
//! per obstruction graph: `c` cannot leave along any of the directions while one obstructor
//! per direction stays behind.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::ObstructionGraph;

use super::types::Subassembly;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockingRules {
    rules: BTreeMap<String, Vec<Subassembly>>,
}

impl BlockingRules {
    /// Rules for `components`. A component with no successors in some graph is free along
    /// that direction and gets no rules at all. Without graphs there are no rules.
    pub fn from_graphs(components: &[String], geometrical: &[ObstructionGraph]) -> Self {
        let mut rules = BTreeMap::new();
        if geometrical.is_empty() {
            return Self { rules };
        }
        for c in components {
            let factors: Vec<BTreeSet<&str>> =
                geometrical.iter().map(|g| g.successors(c)).collect();
            if factors.iter().any(BTreeSet::is_empty) {
                continue;
            }
            let mut tuples: Vec<Vec<&str>> = vec![Vec::new()];
            for f in &factors {
                tuples = tuples
                    .into_iter()
                    .flat_map(|t| {
                        f.iter().map(move |&o| {
                            let mut next = t.clone();
                            next.push(o);
                            next
                        })
                    })
                    .collect();
            }
            let unique: BTreeSet<Subassembly> = tuples.into_iter().map(Subassembly::new).collect();
            rules.insert(c.clone(), minimal(unique));
        }
        Self { rules }
    }

    /// Rules of `component`, smallest first.
    pub fn of(&self, component: &str) -> &[Subassembly] {
        self.rules.get(component).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Subassembly)> {
        self.rules
            .iter()
            .flat_map(|(c, rs)| rs.iter().map(move |r| (c.as_str(), r)))
    }

    /// No rule violated: whenever a rule set lies inside `sub`, its component does too.
    pub fn is_feasible(&self, sub: &Subassembly) -> bool {
        self.rules.iter().all(|(c, rs)| {
            sub.contains(c) || !rs.iter().any(|r| is_subset(r, sub))
        })
    }
}

/// Drop every set that contains another one.
fn minimal(sets: BTreeSet<Subassembly>) -> Vec<Subassembly> {
    let mut by_size: Vec<Subassembly> = sets.into_iter().collect();
    by_size.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    let mut kept: Vec<Subassembly> = Vec::new();
    for s in by_size {
        if !kept.iter().any(|k| is_subset(k, &s)) {
            kept.push(s);
        }
    }
    kept
}

#[inline]
fn is_subset(a: &Subassembly, b: &Subassembly) -> bool {
    a.labels().iter().all(|l| b.contains(l))
}
