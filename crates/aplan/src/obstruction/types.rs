//! Data types of the obstruction pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde_json::{json, Value};

use crate::geom::{Interval, MotionDirection};
use crate::graph::ObstructionGraph;

/// Sub-interval of the sweep (progress coordinate of the target's trailing face) together
/// with the components the target may hit while its trailing face is inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalCandidates {
    pub interval: Interval,
    pub candidates: BTreeSet<String>,
}

/// Result for one requested motion direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionResult {
    pub graph: ObstructionGraph,
    /// Wall time of the sweep; zero for derived directions.
    pub elapsed: Duration,
    /// True if obtained by reversing the opposite direction's graph.
    pub derived: bool,
}

/// Results of an obstruction run, keyed by requested direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstructionReport {
    pub results: BTreeMap<MotionDirection, DirectionResult>,
}

impl ObstructionReport {
    pub fn graph(&self, dir: MotionDirection) -> Option<&ObstructionGraph> {
        self.results.get(&dir).map(|r| &r.graph)
    }

    pub fn graphs(&self) -> Vec<ObstructionGraph> {
        self.results.values().map(|r| r.graph.clone()).collect()
    }

    /// Batch payload: `{"<code>": [[[target, obstructor], ...], seconds], ...}`.
    pub fn to_payload(&self) -> Value {
        let mut out = serde_json::Map::new();
        for (dir, r) in &self.results {
            let pairs: Vec<Value> = r.graph.edges().map(|(t, o)| json!([t, o])).collect();
            out.insert(
                dir.code().to_string(),
                json!([pairs, r.elapsed.as_secs_f64()]),
            );
        }
        Value::Object(out)
    }
}
