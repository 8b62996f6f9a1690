//! Scoped placement mutation for the component being moved by the obstruction solver.
//!
//! `MovedTarget` saves the target's placement on creation and writes it back when dropped,
//! so every exit path of a solve (success, early return through `?`, cancellation, unwinding)
//! leaves the scene as it found it. Call `restore` to observe the restore result.

use std::ops::Deref;

use nalgebra::{Isometry3, Translation3, Vector3};

use super::query::GeometryQuery;
use super::types::MotionDirection;
use crate::error::GeomResult;

pub struct MovedTarget<'s, S: GeometryQuery + ?Sized> {
    scene: &'s mut S,
    label: String,
    saved: Isometry3<f64>,
    restored: bool,
}

impl<'s, S: GeometryQuery + ?Sized> MovedTarget<'s, S> {
    pub fn new(scene: &'s mut S, label: &str) -> GeomResult<Self> {
        let saved = scene.placement(label)?;
        Ok(Self {
            scene,
            label: label.to_string(),
            saved,
            restored: false,
        })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Placement at the time the guard was created.
    #[inline]
    pub fn saved(&self) -> &Isometry3<f64> {
        &self.saved
    }

    /// Shift the current placement by `v`, keeping its rotation.
    pub fn translate(&mut self, v: &Vector3<f64>) -> GeomResult<()> {
        let cur = self.scene.placement(&self.label)?;
        let moved = Isometry3::from_parts(Translation3::from(cur.translation.vector + v), cur.rotation);
        self.scene.set_placement(&self.label, moved)
    }

    /// Current trailing-face progress coordinate of the target along `dir`.
    pub fn trailing(&self, dir: MotionDirection) -> GeomResult<f64> {
        Ok(self.scene.bound_box(&self.label)?.progress_range(dir).lo)
    }

    /// Move along `dir` so the trailing face sits at progress coordinate `p`.
    pub fn place_trailing_at(&mut self, dir: MotionDirection, p: f64) -> GeomResult<()> {
        let delta = p - self.trailing(dir)?;
        self.translate(&(dir.unit() * delta))
    }

    /// Restore the saved placement now and report failures.
    pub fn restore(mut self) -> GeomResult<()> {
        self.restored = true;
        self.scene.set_placement(&self.label, self.saved)
    }
}

impl<S: GeometryQuery + ?Sized> Deref for MovedTarget<'_, S> {
    type Target = S;
    fn deref(&self) -> &S {
        &*self.scene
    }
}

impl<S: GeometryQuery + ?Sized> Drop for MovedTarget<'_, S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.scene.set_placement(&self.label, self.saved) {
            tracing::error!(label = %self.label, error = %e, "failed to restore placement");
        }
    }
}
