//! End-to-end obstruction detection over a set of motion directions.
//!
//! Direction planning follows the batch convention: when both `d` and `-d` are requested only
//! the positive one is swept and the negative graph is derived by reversing every edge
//! (`NegativePolicy::Reverse`). A direction requested without its opposite is swept as is.
//! `NegativePolicy::Solve` sweeps every requested direction.

use std::collections::{BTreeMap, BTreeSet};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{NegativePolicy, ObstructionConfig};
use crate::error::{ConfigError, Error};
use crate::geom::{ensure_tessellated, Aabb, GeometryQuery, MotionDirection, SampleCache};
use crate::graph::ObstructionGraph;
use crate::progress::{check_cancel, try_outcome, CancelToken, Outcome, Reporter};

use super::refine::refine;
use super::solve::solve;
use super::types::{DirectionResult, IntervalCandidates, ObstructionReport};

/// Parse batch direction codes (`±1, ±2, ±3`), keeping first occurrences only.
pub fn directions_from_codes(codes: &[i32]) -> Result<Vec<MotionDirection>, ConfigError> {
    let mut out = Vec::new();
    for &c in codes {
        let d = MotionDirection::from_code(c).ok_or(ConfigError::InvalidDirection(c))?;
        if !out.contains(&d) {
            out.push(d);
        }
    }
    if out.is_empty() {
        return Err(ConfigError::NoDirections);
    }
    Ok(out)
}

/// Directions to sweep, and `(derived, source)` pairs obtained by reversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionPlan {
    pub solve: Vec<MotionDirection>,
    pub derive: Vec<(MotionDirection, MotionDirection)>,
}

pub fn plan_directions(
    requested: &[MotionDirection],
    policy: NegativePolicy,
) -> Result<DirectionPlan, ConfigError> {
    if requested.is_empty() {
        return Err(ConfigError::NoDirections);
    }
    let set: BTreeSet<MotionDirection> = requested.iter().copied().collect();
    let mut solve = BTreeSet::new();
    let mut derive = Vec::new();
    for &d in &set {
        let paired_negative = !d.is_positive() && set.contains(&d.opposite());
        if policy == NegativePolicy::Reverse && paired_negative {
            derive.push((d, d.opposite()));
        } else {
            solve.insert(d);
        }
    }
    Ok(DirectionPlan {
        solve: solve.into_iter().collect(),
        derive,
    })
}

/// An obstruction run: which components, which directions, how.
#[derive(Clone, Debug)]
pub struct ObstructionRequest {
    pub components: Vec<String>,
    pub directions: Vec<MotionDirection>,
    pub config: ObstructionConfig,
    /// Sweep each direction on its own worker thread with a cloned scene.
    pub parallel: bool,
}

impl ObstructionRequest {
    pub fn new(
        components: Vec<String>,
        directions: Vec<MotionDirection>,
        config: ObstructionConfig,
    ) -> Self {
        Self {
            components,
            directions,
            config,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.config.negative_policy = policy;
        self
    }

    /// Run with the requested fan-out. Parallel runs need a cloneable scene.
    pub fn run<S>(&self, scene: &mut S, cancel: &CancelToken, reporter: &Reporter) -> Outcome<ObstructionReport>
    where
        S: GeometryQuery + Clone + Send,
    {
        if self.parallel {
            reporter.focus(">>> STARTED");
            let out = run_parallel(scene, self, cancel, reporter);
            reporter.conclude(out)
        } else {
            detect_obstructions(scene, self, cancel, reporter)
        }
    }
}

/// Sequential obstruction detection for every requested direction.
pub fn detect_obstructions<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    req: &ObstructionRequest,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ObstructionReport> {
    reporter.focus(">>> STARTED");
    let out = run_sequential(scene, req, cancel, reporter);
    reporter.conclude(out)
}

fn prepare<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    req: &ObstructionRequest,
    reporter: &Reporter,
) -> Result<DirectionPlan, Error> {
    let plan = plan_directions(&req.directions, req.config.negative_policy)?;
    // Every criterion is gated by a proximity query, which needs a tessellation.
    for c in &req.components {
        match ensure_tessellated(scene, std::slice::from_ref(c), req.config.linear_deflection) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => reporter.warn(format!("Could not tessellate {c}: {e}")),
        }
    }
    Ok(plan)
}

fn run_sequential<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    req: &ObstructionRequest,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ObstructionReport> {
    let plan = try_outcome!(prepare(scene, req, reporter));
    let mut solved = BTreeMap::new();
    for &dir in &plan.solve {
        check_cancel!(cancel);
        let t0 = Instant::now();
        let mut cache = SampleCache::new();
        let graph = match detect_direction(scene, &req.components, dir, &req.config, &mut cache, cancel, reporter) {
            Outcome::Finished(g) => g,
            Outcome::Aborted => return Outcome::Aborted,
            Outcome::Errored(e) => return Outcome::Errored(e),
        };
        solved.insert(dir, (graph, t0.elapsed()));
    }
    Outcome::Finished(assemble(plan, solved))
}

fn run_parallel<S: GeometryQuery + Clone + Send>(
    scene: &mut S,
    req: &ObstructionRequest,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ObstructionReport> {
    let plan = try_outcome!(prepare(scene, req, reporter));
    let snapshot: &S = scene;
    let results: Vec<(MotionDirection, thread::Result<(Outcome<ObstructionGraph>, Duration)>)> =
        thread::scope(|s| {
            let handles: Vec<_> = plan
                .solve
                .iter()
                .map(|&dir| {
                    let mut local = snapshot.clone();
                    let cancel = cancel.clone();
                    let reporter = reporter.clone();
                    let handle = s.spawn(move || {
                        let t0 = Instant::now();
                        let mut cache = SampleCache::new();
                        let out = detect_direction(
                            &mut local,
                            &req.components,
                            dir,
                            &req.config,
                            &mut cache,
                            &cancel,
                            &reporter,
                        );
                        (out, t0.elapsed())
                    });
                    (dir, handle)
                })
                .collect();
            handles.into_iter().map(|(d, h)| (d, h.join())).collect()
        });

    let mut solved = BTreeMap::new();
    let mut aborted = false;
    for (dir, res) in results {
        match res {
            Ok((Outcome::Finished(g), elapsed)) => {
                solved.insert(dir, (g, elapsed));
            }
            Ok((Outcome::Aborted, _)) => aborted = true,
            Ok((Outcome::Errored(e), _)) => return Outcome::Errored(e),
            Err(_) => return Outcome::Errored(Error::Worker(format!("worker for {dir} panicked"))),
        }
    }
    if aborted || cancel.is_cancelled() {
        return Outcome::Aborted;
    }
    Outcome::Finished(assemble(plan, solved))
}

fn assemble(
    plan: DirectionPlan,
    mut solved: BTreeMap<MotionDirection, (ObstructionGraph, Duration)>,
) -> ObstructionReport {
    let mut report = ObstructionReport::default();
    for (derived, source) in &plan.derive {
        if let Some((g, _)) = solved.get(source) {
            report.results.insert(
                *derived,
                DirectionResult {
                    graph: g.reversed(),
                    elapsed: Duration::ZERO,
                    derived: true,
                },
            );
        }
    }
    for dir in plan.solve {
        if let Some((graph, elapsed)) = solved.remove(&dir) {
            report.results.insert(
                dir,
                DirectionResult {
                    graph,
                    elapsed,
                    derived: false,
                },
            );
        }
    }
    report
}

/// Refine then solve every component along `dir`.
///
/// Per-target geometry failures skip that target with a warning; fatal failures end the run.
/// A component without a bounding box takes no part in the direction and stays an isolated node.
pub fn detect_direction<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    components: &[String],
    dir: MotionDirection,
    cfg: &ObstructionConfig,
    cache: &mut SampleCache,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<ObstructionGraph> {
    let (usable, overall) = try_outcome!(bound_usable(&*scene, components, reporter));

    reporter.focus(format!("====== Refining ({dir}) ======"));
    let mut refined: Vec<(&String, Vec<IntervalCandidates>)> = Vec::with_capacity(usable.len());
    for target in &usable {
        match refine(&*scene, target, &usable, dir, cfg.refinement, &overall, cancel) {
            Outcome::Finished(pairs) => {
                let n = pairs
                    .iter()
                    .flat_map(|p| p.candidates.iter())
                    .collect::<BTreeSet<_>>()
                    .len();
                reporter.info(format!("Found {n} potential obstructions for {target}"));
                refined.push((target, pairs));
            }
            Outcome::Aborted => return Outcome::Aborted,
            Outcome::Errored(e) => try_outcome!(skip_or_fail(e, target, reporter)),
        }
    }

    reporter.focus(format!("====== Solving ({dir}) ======"));
    let mut edges = Vec::new();
    for (target, pairs) in refined {
        check_cancel!(cancel);
        if pairs.is_empty() {
            continue;
        }
        match solve(scene, target, dir, &pairs, &cfg.criterion, &cfg.step, cache, cancel, reporter) {
            Outcome::Finished(obstructors) => {
                for o in obstructors {
                    edges.push((target.clone(), o));
                }
            }
            // Placement failures and fatal adapter errors; local ones are handled per candidate.
            Outcome::Aborted => return Outcome::Aborted,
            Outcome::Errored(e) => return Outcome::Errored(e),
        }
    }
    Outcome::Finished(ObstructionGraph::new(dir, components.iter().cloned(), edges))
}

/// Components with a bounding box, and the box enclosing all of them.
fn bound_usable<S: GeometryQuery + ?Sized>(
    scene: &S,
    components: &[String],
    reporter: &Reporter,
) -> Result<(Vec<String>, Aabb), Error> {
    let mut usable = Vec::with_capacity(components.len());
    let mut overall = Aabb::empty();
    for c in components {
        match scene.bound_box(c) {
            Ok(b) => {
                overall = overall.union(&b);
                usable.push(c.clone());
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => reporter.warn(format!("Leaving out {c}: {e}")),
        }
    }
    Ok((usable, overall))
}

/// Local geometry failures become a warning; anything else is returned as the fatal cause.
fn skip_or_fail(e: Error, target: &str, reporter: &Reporter) -> Result<(), Error> {
    match &e {
        Error::Geom(g) if !g.is_fatal() => {
            reporter.warn(format!("Skipping {target}: {e}"));
            Ok(())
        }
        _ => Err(e),
    }
}
