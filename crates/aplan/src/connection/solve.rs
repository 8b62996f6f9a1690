//! Touching tests for one candidate pair.

use crate::config::ConnSolver;
use crate::error::{GeomError, GeomResult};
use crate::geom::{Aabb, GeometryQuery, PointState, SampleCache, SampleKind};

/// True if `a` and `b` touch under `solver`.
///
/// Sampling solvers take boundary samples of each shape at
/// `sample_rate * min(diag(a), diag(b))` spacing and accept as soon as one sample of either
/// shape lies inside or on the other within `tolerance`.
pub fn touching<S: GeometryQuery + ?Sized>(
    scene: &S,
    a: &str,
    b: &str,
    solver: &ConnSolver,
    cache: &mut SampleCache,
) -> GeomResult<bool> {
    match *solver {
        ConnSolver::DistToShape { min_distance } => {
            Ok(scene.distance(a, b)?.value < min_distance)
        }
        ConnSolver::Proximity { tolerance } => scene.proximity(a, b, tolerance),
        ConnSolver::Section => scene.section(a, b),
        ConnSolver::MeshInside {
            sample_rate,
            tolerance,
        } => sampled_contact(scene, a, b, SampleKind::Mesh, sample_rate, tolerance, cache),
        ConnSolver::GeoDataInside {
            sample_rate,
            tolerance,
        } => sampled_contact(scene, a, b, SampleKind::Native, sample_rate, tolerance, cache),
    }
}

fn sampled_contact<S: GeometryQuery + ?Sized>(
    scene: &S,
    a: &str,
    b: &str,
    kind: SampleKind,
    rate: f64,
    tol: f64,
    cache: &mut SampleCache,
) -> GeomResult<bool> {
    let (ba, bb) = (scene.bound_box(a)?, scene.bound_box(b)?);
    let spacing = rate * ba.diagonal().min(bb.diagonal());
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeomError::Degenerate {
            label: a.to_string(),
            reason: format!("sample spacing {spacing} for pair ({a}, {b})"),
        });
    }
    for (x, y, by) in [(a, b, bb), (b, a, ba)] {
        let reach = by.swollen(tol);
        for p in cache.to_world(scene, x, kind, spacing)? {
            if !reach.intersects(&Aabb::new(p, p)) {
                continue;
            }
            if scene.classify(y, &p, tol)? != PointState::Outside {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
