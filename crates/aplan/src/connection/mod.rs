//! Connection detection: which components touch.
//!
//! Purpose
//! - Narrow all component pairs down to plausible candidates (`refine`), then run the selected
//!   touching test on each candidate (`solve`), producing an undirected `ConnectionGraph`.
//!
//! Why this design
//! - Refinement is pure bounding-box arithmetic and keeps the expensive kernel queries to a
//!   handful of pairs per component.
//! - Failures stay local: a pair the adapter cannot answer is skipped with a warning, only
//!   fatal adapter errors end the run.
//!
//! Code cross-refs: `ConnectionConfig`, `ConnRefinement`, `ConnSolver`, `ConnectionGraph`.

mod refine;
mod solve;

pub use refine::candidate_pairs;
pub use solve::touching;

use crate::config::ConnectionConfig;
use crate::geom::{ensure_tessellated, GeometryQuery, SampleCache};
use crate::graph::ConnectionGraph;
use crate::progress::{check_cancel, CancelToken, Outcome, Reporter};

/// Detect touching pairs among `components` and return their connection graph.
///
/// Every component appears as a node, isolated ones included.
pub fn detect_connections<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    components: &[String],
    cfg: &ConnectionConfig,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ConnectionGraph> {
    reporter.focus(">>> STARTED");
    let out = run(scene, components, cfg, cancel, reporter);
    reporter.conclude(out)
}

fn run<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    components: &[String],
    cfg: &ConnectionConfig,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ConnectionGraph> {
    if cfg.solver.needs_tessellation() {
        for c in components {
            check_cancel!(cancel);
            match ensure_tessellated(scene, std::slice::from_ref(c), cfg.linear_deflection) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Outcome::Errored(e.into()),
                Err(e) => reporter.warn(format!("Could not tessellate {c}: {e}")),
            }
        }
    }

    reporter.focus("====== Refining ======");
    let pairs = match candidate_pairs(&*scene, components, &cfg.refinement, cancel, reporter) {
        Outcome::Finished(p) => p,
        Outcome::Aborted => return Outcome::Aborted,
        Outcome::Errored(e) => return Outcome::Errored(e),
    };
    reporter.info(format!(
        "Found {} candidate pairs among {} components",
        pairs.len(),
        components.len()
    ));

    reporter.focus("====== Solving ======");
    let mut cache = SampleCache::new();
    let mut edges = Vec::new();
    for (a, b) in pairs {
        check_cancel!(cancel);
        match touching(&*scene, &a, &b, &cfg.solver, &mut cache) {
            Ok(true) => {
                reporter.info(format!("Connection {a} <-> {b}"));
                edges.push((a, b));
            }
            Ok(false) => {}
            Err(e) if e.is_fatal() => return Outcome::Errored(e.into()),
            Err(e) => reporter.warn(format!("Skipping pair ({a}, {b}): {e}")),
        }
    }
    Outcome::Finished(ConnectionGraph::new(components.iter().cloned(), edges))
}
