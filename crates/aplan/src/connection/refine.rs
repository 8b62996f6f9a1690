//! Candidate pairs for connection detection.

use crate::config::ConnRefinement;
use crate::geom::{Aabb, GeometryQuery};
use crate::progress::{check_cancel, CancelToken, Outcome, Reporter};

/// Unordered candidate pairs, in component order.
///
/// `BoundBox` swells every box by half the swell distance on each side and keeps pairs whose
/// swollen boxes intersect, touching included. Components whose box cannot be computed are
/// left out with a warning.
pub fn candidate_pairs<S: GeometryQuery + ?Sized>(
    scene: &S,
    components: &[String],
    refinement: &ConnRefinement,
    cancel: &CancelToken,
    reporter: &Reporter,
) -> Outcome<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    match *refinement {
        ConnRefinement::None => {
            for (i, a) in components.iter().enumerate() {
                check_cancel!(cancel);
                for b in &components[i + 1..] {
                    pairs.push((a.clone(), b.clone()));
                }
            }
        }
        ConnRefinement::BoundBox { swell_distance } => {
            let half = 0.5 * swell_distance;
            let mut boxes: Vec<(&String, Aabb)> = Vec::with_capacity(components.len());
            for c in components {
                check_cancel!(cancel);
                match scene.bound_box(c) {
                    Ok(b) => boxes.push((c, b.swollen(half))),
                    Err(e) if e.is_fatal() => return Outcome::Errored(e.into()),
                    Err(e) => reporter.warn(format!("Skipping {c}: {e}")),
                }
            }
            for (i, (a, ba)) in boxes.iter().enumerate() {
                check_cancel!(cancel);
                for (b, bb) in &boxes[i + 1..] {
                    if ba.intersects(bb) {
                        pairs.push(((*a).clone(), (*b).clone()));
                    }
                }
            }
        }
    }
    Outcome::Finished(pairs)
}
