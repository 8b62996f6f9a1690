//! Obstruction solving: sweep the target through its candidate intervals.

use std::collections::BTreeSet;

use crate::config::{Criterion, StepCfg};
use crate::error::GeomError;
use crate::geom::{GeometryQuery, MotionDirection, MovedTarget, SampleCache};
use crate::progress::{check_cancel, try_outcome, CancelToken, Outcome, Reporter};

use super::criteria::collides;
use super::types::IntervalCandidates;

/// Obstructors of `target` along `dir`.
///
/// For each interval the target is placed with its trailing face on the lower bound and then
/// advanced in steps of `step.step_for(len)` while the trailing face is below the upper bound,
/// testing every unconfirmed candidate after each step. An interval ends early once all its
/// candidates are settled. The target's placement is restored on every exit path.
#[allow(clippy::too_many_arguments)]
pub fn solve<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    target: &str,
    dir: MotionDirection,
    pairs: &[IntervalCandidates],
    criterion: &Criterion,
    step: &StepCfg,
    cache: &mut SampleCache,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<BTreeSet<String>> {
    let mut guard = try_outcome!(MovedTarget::new(scene, target));
    let mut confirmed: BTreeSet<String> = BTreeSet::new();
    // Candidates the adapter failed on; never retried within this solve.
    let mut skipped: BTreeSet<String> = BTreeSet::new();

    for pair in pairs {
        check_cancel!(cancel);
        let settled = |c: &String, confirmed: &BTreeSet<String>, skipped: &BTreeSet<String>| {
            confirmed.contains(c) || skipped.contains(c)
        };
        if pair
            .candidates
            .iter()
            .all(|c| settled(c, &confirmed, &skipped))
        {
            continue;
        }
        let s = step.step_for(pair.interval.length());
        if !(s.is_finite() && s > 0.0) {
            return Outcome::Errored(
                GeomError::Degenerate {
                    label: target.to_string(),
                    reason: format!("non-positive step {s}"),
                }
                .into(),
            );
        }
        try_outcome!(guard.place_trailing_at(dir, pair.interval.lo));
        let mut pos = try_outcome!(guard.trailing(dir));
        let delta = dir.unit() * s;
        while pos < pair.interval.hi {
            if pair
                .candidates
                .iter()
                .all(|c| settled(c, &confirmed, &skipped))
            {
                break;
            }
            check_cancel!(cancel);
            try_outcome!(guard.translate(&delta));
            for c in &pair.candidates {
                if settled(c, &confirmed, &skipped) {
                    continue;
                }
                match collides(&*guard, target, c, criterion, cache) {
                    Ok(true) => {
                        confirmed.insert(c.clone());
                    }
                    Ok(false) => {}
                    Err(e) if e.is_fatal() => return Outcome::Errored(e.into()),
                    Err(e) => {
                        reporter.warn(format!("Skipping candidate {c} for {target}: {e}"));
                        skipped.insert(c.clone());
                    }
                }
            }
            pos = try_outcome!(guard.trailing(dir));
        }
    }
    try_outcome!(guard.restore());
    Outcome::Finished(confirmed)
}
