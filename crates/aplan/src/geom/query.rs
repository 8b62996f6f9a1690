//! The geometry query adapter consumed by the engines.
//!
//! The host application (or `BoxScene`) answers every geometric question; the engines never
//! see shapes, only labels. Sample queries return points in the component's local frame so
//! callers can memoize them across placements (see `SampleCache`).

use nalgebra::{Isometry3, Point3};

use super::types::Aabb;
use crate::error::GeomResult;

/// Point classification against a solid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointState {
    Inside,
    On,
    Outside,
}

/// Minimum distance between two shapes with the closest point pairs `(on a, on b)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Distance {
    pub value: f64,
    pub pairs: Vec<(Point3<f64>, Point3<f64>)>,
}

/// Geometry queries over labelled solids.
///
/// Contract
/// - World-frame queries (`bound_box`, `distance`, `classify`, `proximity`, `section`, volumes)
///   reflect the current placements.
/// - `sample_surface` / `sample_mesh` return local-frame points; map them with `placement`.
/// - `proximity` and `sample_mesh` are only valid after `tessellate` for the involved labels.
pub trait GeometryQuery {
    fn bound_box(&self, label: &str) -> GeomResult<Aabb>;
    fn distance(&self, a: &str, b: &str) -> GeomResult<Distance>;
    fn classify(&self, label: &str, p: &Point3<f64>, tol: f64) -> GeomResult<PointState>;
    /// Non-empty set of boundary regions of `a` and `b` closer than `tol`.
    fn proximity(&self, a: &str, b: &str, tol: f64) -> GeomResult<bool>;
    /// Non-empty intersection of the two boundaries.
    fn section(&self, a: &str, b: &str) -> GeomResult<bool>;
    fn volume(&self, label: &str) -> GeomResult<f64>;
    fn common_volume(&self, a: &str, b: &str) -> GeomResult<f64>;
    fn fuse_volume(&self, a: &str, b: &str) -> GeomResult<f64>;
    /// Geometry-native boundary samples at roughly `spacing` apart (local frame).
    fn sample_surface(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>>;
    /// Tessellation-based boundary samples at roughly `spacing` apart (local frame).
    fn sample_mesh(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>>;
    fn is_tessellated(&self, label: &str) -> bool;
    fn tessellate(&mut self, label: &str, linear_deflection: f64) -> GeomResult<()>;
    fn placement(&self, label: &str) -> GeomResult<Isometry3<f64>>;
    fn set_placement(&mut self, label: &str, placement: Isometry3<f64>) -> GeomResult<()>;
}

/// Overall bounding box of `labels`.
pub fn overall_bound_box<S: GeometryQuery + ?Sized>(
    scene: &S,
    labels: &[String],
) -> GeomResult<Aabb> {
    let mut out = Aabb::empty();
    for l in labels {
        out = out.union(&scene.bound_box(l)?);
    }
    Ok(out)
}

/// Tessellate every label that is not tessellated yet.
pub fn ensure_tessellated<S: GeometryQuery + ?Sized>(
    scene: &mut S,
    labels: &[String],
    linear_deflection: f64,
) -> GeomResult<()> {
    for l in labels {
        if !scene.is_tessellated(l) {
            scene.tessellate(l, linear_deflection)?;
        }
    }
    Ok(())
}
