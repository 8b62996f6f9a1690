//! Per-run memoization of boundary samples.
//!
//! Samples are stored in the component's local frame, keyed by `(label, kind, spacing)`.
//! An entry is written once and read for every subsequent step; world-frame points are
//! obtained by applying the current placement (`to_world`).

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::Point3;

use super::query::GeometryQuery;
use crate::error::GeomResult;

/// Which adapter sampler produced the points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// Geometry-native boundary samples (`sample_surface`).
    Native,
    /// Tessellation vertices (`sample_mesh`).
    Mesh,
}

type Key = (String, SampleKind, u64);

#[derive(Debug, Default)]
pub struct SampleCache {
    entries: HashMap<Key, Arc<Vec<Point3<f64>>>>,
    misses: usize,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local-frame samples for `label`, computed on first use.
    pub fn local<S: GeometryQuery + ?Sized>(
        &mut self,
        scene: &S,
        label: &str,
        kind: SampleKind,
        spacing: f64,
    ) -> GeomResult<Arc<Vec<Point3<f64>>>> {
        let key = (label.to_string(), kind, spacing.to_bits());
        if let Some(pts) = self.entries.get(&key) {
            return Ok(Arc::clone(pts));
        }
        let pts = match kind {
            SampleKind::Native => scene.sample_surface(label, spacing)?,
            SampleKind::Mesh => scene.sample_mesh(label, spacing)?,
        };
        self.misses += 1;
        let pts = Arc::new(pts);
        self.entries.insert(key, Arc::clone(&pts));
        Ok(pts)
    }

    /// Samples mapped through the current placement of `label`.
    pub fn to_world<S: GeometryQuery + ?Sized>(
        &mut self,
        scene: &S,
        label: &str,
        kind: SampleKind,
        spacing: f64,
    ) -> GeomResult<Vec<Point3<f64>>> {
        let local = self.local(scene, label, kind, spacing)?;
        let iso = scene.placement(label)?;
        Ok(local.iter().map(|p| iso.transform_point(p)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of adapter sampling calls made so far.
    #[inline]
    pub fn misses(&self) -> usize {
        self.misses
    }
}
