//! Collision criteria evaluated at each solver step.
//!
//! Every criterion is gated by `proximity(target, other, overlap_tolerance)`: shapes that are
//! not even close never collide. Touching faces are not a collision; each criterion requires
//! actual interpenetration beyond its tolerance.

use crate::config::Criterion;
use crate::error::{GeomError, GeomResult};
use crate::geom::{Aabb, GeometryQuery, PointState, SampleCache, SampleKind};

pub fn collides<S: GeometryQuery + ?Sized>(
    scene: &S,
    target: &str,
    other: &str,
    criterion: &Criterion,
    cache: &mut SampleCache,
) -> GeomResult<bool> {
    if !scene.proximity(target, other, criterion.overlap_tolerance())? {
        return Ok(false);
    }
    match *criterion {
        Criterion::DistToShape {
            min_distance,
            classification_tolerance,
            ..
        } => {
            let d = scene.distance(target, other)?;
            if d.value >= min_distance {
                return Ok(false);
            }
            // A closest point of one shape strictly inside the other; touching ones are only on.
            for (pa, pb) in &d.pairs {
                if scene.classify(other, pa, classification_tolerance)? == PointState::Inside
                    || scene.classify(target, pb, classification_tolerance)? == PointState::Inside
                {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Criterion::MeshInside {
            classification_tolerance,
            sample_coefficient,
            ..
        } => sampled_inside(
            scene,
            target,
            other,
            SampleKind::Mesh,
            sample_coefficient,
            classification_tolerance,
            cache,
        ),
        Criterion::GeoDataInside {
            classification_tolerance,
            sample_coefficient,
            ..
        } => sampled_inside(
            scene,
            target,
            other,
            SampleKind::Native,
            sample_coefficient,
            classification_tolerance,
            cache,
        ),
        Criterion::Common {
            volume_tolerance, ..
        } => Ok(scene.common_volume(target, other)? > volume_tolerance),
        Criterion::Fuse {
            volume_tolerance, ..
        } => {
            let overlap = scene.volume(target)? + scene.volume(other)?
                - scene.fuse_volume(target, other)?;
            Ok(overlap > volume_tolerance)
        }
    }
}

/// Some boundary sample of either shape strictly inside the other.
fn sampled_inside<S: GeometryQuery + ?Sized>(
    scene: &S,
    a: &str,
    b: &str,
    kind: SampleKind,
    coefficient: f64,
    tol: f64,
    cache: &mut SampleCache,
) -> GeomResult<bool> {
    let (ba, bb) = (scene.bound_box(a)?, scene.bound_box(b)?);
    let spacing = coefficient * ba.diagonal().min(bb.diagonal());
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeomError::Degenerate {
            label: a.to_string(),
            reason: format!("sample spacing {spacing} for pair ({a}, {b})"),
        });
    }
    for (x, y, by) in [(a, b, bb), (b, a, ba)] {
        for p in cache.to_world(scene, x, kind, spacing)? {
            if !by.intersects(&Aabb::new(p, p)) {
                continue;
            }
            if scene.classify(y, &p, tol)? == PointState::Inside {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
