//! Shared fixtures for unit tests.

use nalgebra::{Isometry3, Point3};

use crate::error::{GeomError, GeomResult};
use crate::geom::{Aabb, BoxScene, BoxSolid, Distance, GeometryQuery, PointState};
use crate::progress::CancelToken;

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Three unit cubes `A`, `B`, `C` touching face to face along X.
pub fn line_scene() -> BoxScene {
    BoxScene::new()
        .with(BoxSolid::cuboid("A", [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]))
        .with(BoxSolid::cuboid("B", [1.0, 0.0, 0.0], [2.0, 1.0, 1.0]))
        .with(BoxSolid::cuboid("C", [2.0, 0.0, 0.0], [3.0, 1.0, 1.0]))
}

/// `BoxScene` wrapper whose pair queries fail whenever `poisoned` is involved, whose
/// `bound_box` fails for `bad_box`, whose `distance` can be pinned to `closest`, and which can
/// trip a cancel token after a number of placement changes.
#[derive(Clone, Debug)]
pub struct FlakyScene {
    pub inner: BoxScene,
    pub poisoned: String,
    pub fatal: bool,
    pub bad_box: Option<String>,
    pub closest: Option<Distance>,
    pub moves: usize,
    pub cancel_after: Option<(usize, CancelToken)>,
}

impl FlakyScene {
    pub fn new(inner: BoxScene, poisoned: &str, fatal: bool) -> Self {
        Self {
            inner,
            poisoned: poisoned.to_string(),
            fatal,
            bad_box: None,
            closest: None,
            moves: 0,
            cancel_after: None,
        }
    }

    pub fn cancelling(inner: BoxScene, after: usize, token: CancelToken) -> Self {
        Self {
            cancel_after: Some((after, token)),
            ..Self::new(inner, "", false)
        }
    }

    pub fn bad_bound_box(inner: BoxScene, label: &str) -> Self {
        Self {
            bad_box: Some(label.to_string()),
            ..Self::new(inner, "", false)
        }
    }

    /// Report `closest` from every `distance` query, like a kernel returning boundary points.
    pub fn with_closest(inner: BoxScene, closest: Distance) -> Self {
        Self {
            closest: Some(closest),
            ..Self::new(inner, "", false)
        }
    }

    fn check(&self, a: &str, b: &str) -> GeomResult<()> {
        if a != self.poisoned && b != self.poisoned {
            return Ok(());
        }
        if self.fatal {
            Err(GeomError::Unreachable("kernel went away".into()))
        } else {
            Err(GeomError::Degenerate {
                label: self.poisoned.clone(),
                reason: "broken shape".into(),
            })
        }
    }
}

impl GeometryQuery for FlakyScene {
    fn bound_box(&self, label: &str) -> GeomResult<Aabb> {
        if self.bad_box.as_deref() == Some(label) {
            return Err(GeomError::Degenerate {
                label: label.to_string(),
                reason: "no bounding box".into(),
            });
        }
        self.inner.bound_box(label)
    }
    fn distance(&self, a: &str, b: &str) -> GeomResult<Distance> {
        self.check(a, b)?;
        if let Some(d) = &self.closest {
            return Ok(d.clone());
        }
        self.inner.distance(a, b)
    }
    fn classify(&self, label: &str, p: &Point3<f64>, tol: f64) -> GeomResult<PointState> {
        self.inner.classify(label, p, tol)
    }
    fn proximity(&self, a: &str, b: &str, tol: f64) -> GeomResult<bool> {
        self.check(a, b)?;
        self.inner.proximity(a, b, tol)
    }
    fn section(&self, a: &str, b: &str) -> GeomResult<bool> {
        self.check(a, b)?;
        self.inner.section(a, b)
    }
    fn volume(&self, label: &str) -> GeomResult<f64> {
        self.inner.volume(label)
    }
    fn common_volume(&self, a: &str, b: &str) -> GeomResult<f64> {
        self.check(a, b)?;
        self.inner.common_volume(a, b)
    }
    fn fuse_volume(&self, a: &str, b: &str) -> GeomResult<f64> {
        self.check(a, b)?;
        self.inner.fuse_volume(a, b)
    }
    fn sample_surface(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>> {
        self.inner.sample_surface(label, spacing)
    }
    fn sample_mesh(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>> {
        self.inner.sample_mesh(label, spacing)
    }
    fn is_tessellated(&self, label: &str) -> bool {
        self.inner.is_tessellated(label)
    }
    fn tessellate(&mut self, label: &str, linear_deflection: f64) -> GeomResult<()> {
        self.inner.tessellate(label, linear_deflection)
    }
    fn placement(&self, label: &str) -> GeomResult<Isometry3<f64>> {
        self.inner.placement(label)
    }
    fn set_placement(&mut self, label: &str, placement: Isometry3<f64>) -> GeomResult<()> {
        self.moves += 1;
        if let Some((after, token)) = &self.cancel_after {
            if self.moves >= *after {
                token.cancel();
            }
        }
        self.inner.set_placement(label, placement)
    }
}
