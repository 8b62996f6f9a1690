//! Obstruction refinement: which components can the target hit, and where along the sweep.
//!
//! Intervals are in the progress coordinate of the direction (`p = sign * axis coordinate`)
//! and bound the position of the target's trailing face. For `BoundBox`, a candidate whose
//! elongated-box intersection spans `[lo, hi]` can be hit while the trailing face is in
//! `[max(p_start, lo - size), hi]`, where `size` is the target's extent along the axis.

use std::collections::BTreeSet;

use crate::config::ObstructionRefinement;
use crate::geom::cfg::REFINE_EPS;
use crate::geom::{Aabb, Axis, GeometryQuery, Interval, MotionDirection};
use crate::progress::{check_cancel, try_outcome, CancelToken, Outcome};

use super::types::IntervalCandidates;

/// Ordered, non-overlapping `(interval, candidates)` pairs for sweeping `target` along `dir`.
pub fn refine<S: GeometryQuery + ?Sized>(
    scene: &S,
    target: &str,
    candidates: &[String],
    dir: MotionDirection,
    method: ObstructionRefinement,
    overall: &Aabb,
    cancel: &CancelToken,
) -> Outcome<Vec<IntervalCandidates>> {
    check_cancel!(cancel);
    let tb = try_outcome!(scene.bound_box(target));
    let start = tb.progress_range(dir);
    match method {
        ObstructionRefinement::None => {
            let sweep = Interval::new(start.lo, overall.progress_range(dir).hi);
            let others: BTreeSet<String> = candidates
                .iter()
                .filter(|c| c.as_str() != target)
                .cloned()
                .collect();
            if sweep.hi <= sweep.lo || others.is_empty() {
                return Outcome::Finished(Vec::new());
            }
            Outcome::Finished(vec![IntervalCandidates {
                interval: sweep,
                candidates: others,
            }])
        }
        ObstructionRefinement::BoundBox => {
            let elongated = tb.elongated(overall, dir);
            let size = start.length();
            let mut shifted: Vec<(&String, Interval)> = Vec::new();
            for c in candidates {
                check_cancel!(cancel);
                if c == target {
                    continue;
                }
                let cb = match scene.bound_box(c) {
                    Ok(b) => b,
                    Err(e) if e.is_fatal() => return Outcome::Errored(e.into()),
                    Err(e) => {
                        tracing::warn!(target_label = target, candidate = %c, error = %e, "skipping candidate");
                        continue;
                    }
                };
                let Some(inter) = elongated.intersection(&cb) else {
                    continue;
                };
                if Axis::ALL.iter().any(|&a| inter.length(a) <= REFINE_EPS) {
                    continue;
                }
                let r = inter.progress_range(dir);
                shifted.push((c, Interval::new(start.lo.max(r.lo - size), r.hi)));
            }
            Outcome::Finished(split_intervals(&shifted))
        }
    }
}

/// Cut the union of `shifted` at every boundary and attach the overlapping candidates.
fn split_intervals(shifted: &[(&String, Interval)]) -> Vec<IntervalCandidates> {
    let mut bounds: Vec<f64> = shifted.iter().flat_map(|(_, i)| [i.lo, i.hi]).collect();
    bounds.sort_by(f64::total_cmp);
    bounds.dedup();
    bounds
        .windows(2)
        .filter_map(|w| {
            let sub = Interval::new(w[0], w[1]);
            let candidates: BTreeSet<String> = shifted
                .iter()
                .filter(|(_, i)| i.overlaps_open(&sub))
                .map(|(c, _)| (*c).clone())
                .collect();
            (!candidates.is_empty()).then_some(IntervalCandidates {
                interval: sub,
                candidates,
            })
        })
        .collect()
}
