//! `BoxScene`: a reference geometry adapter for solids built from axis-aligned cells.
//!
//! Purpose
//! - Answer every `GeometryQuery` exactly for unions of boxes so the engines can be run
//!   without a CAD kernel (CLI scene files, tests, benchmarks).
//!
//! Assumptions and conventions
//! - Cells of one solid do not overlap each other. Volumes are plain sums.
//! - Placements are pure translations; rotated placements are rejected.
//! - `proximity` and `sample_mesh` require `tessellate` first, mirroring kernels that need
//!   a mesh before proximity queries are valid.

use std::collections::HashMap;

use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::cfg::{MAX_SAMPLES_PER_EDGE, ROTATION_EPS};
use super::query::{Distance, GeometryQuery, PointState};
use super::types::Aabb;
use crate::error::{GeomError, GeomResult};
use crate::filter::AnalysisUnit;

/// A labelled solid given as a union of disjoint cells (local frame).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSolid {
    pub label: String,
    pub cells: Vec<Aabb>,
}

impl BoxSolid {
    pub fn new(label: impl Into<String>, cells: Vec<Aabb>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }

    /// Single-cell solid spanning the two corners.
    pub fn cuboid(label: impl Into<String>, a: [f64; 3], b: [f64; 3]) -> Self {
        Self::new(label, vec![Aabb::from_corners(a, b)])
    }
}

#[derive(Clone, Debug, Default)]
pub struct BoxScene {
    solids: Vec<BoxSolid>,
    index: HashMap<String, usize>,
    offsets: Vec<Vector3<f64>>,
    deflection: Vec<Option<f64>>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from solids; labels must be unique and every solid needs at least one cell.
    pub fn from_solids(solids: Vec<BoxSolid>) -> GeomResult<Self> {
        let mut scene = Self::new();
        for s in solids {
            scene.insert(s)?;
        }
        Ok(scene)
    }

    pub fn insert(&mut self, solid: BoxSolid) -> GeomResult<()> {
        if self.index.contains_key(&solid.label) {
            return Err(GeomError::Degenerate {
                label: solid.label,
                reason: "duplicate label".into(),
            });
        }
        if solid.cells.is_empty() || solid.cells.iter().any(|c| c.is_empty()) {
            return Err(GeomError::Degenerate {
                label: solid.label,
                reason: "solid without valid cells".into(),
            });
        }
        self.index.insert(solid.label.clone(), self.solids.len());
        self.solids.push(solid);
        self.offsets.push(Vector3::zeros());
        self.deflection.push(None);
        Ok(())
    }

    /// Builder-style `insert` for tests and small fixtures. Panics on invalid input.
    pub fn with(mut self, solid: BoxSolid) -> Self {
        if let Err(e) = self.insert(solid) {
            panic!("invalid fixture solid: {e}");
        }
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.solids.iter().map(|s| s.label.clone()).collect()
    }

    pub fn solid(&self, label: &str) -> Option<&BoxSolid> {
        self.index.get(label).map(|&i| &self.solids[i])
    }

    /// Scene with one solid per analysis unit. Compound solids collect the world-frame cells
    /// of their members; disjoint units keep their solid and placement.
    pub fn with_compounds(&self, units: &[AnalysisUnit]) -> GeomResult<BoxScene> {
        let mut out = BoxScene::new();
        for unit in units {
            if !unit.is_compound() {
                let idx = self.lookup(&unit.label)?;
                out.insert(self.solids[idx].clone())?;
                let j = out.solids.len() - 1;
                out.offsets[j] = self.offsets[idx];
                out.deflection[j] = self.deflection[idx];
                continue;
            }
            let mut cells = Vec::new();
            for m in &unit.members {
                let idx = self.lookup(m)?;
                cells.extend(self.world_cells(idx));
            }
            out.insert(BoxSolid::new(unit.label.clone(), cells))?;
        }
        Ok(out)
    }

    fn lookup(&self, label: &str) -> GeomResult<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| GeomError::UnknownComponent(label.to_string()))
    }

    fn world_cells(&self, idx: usize) -> impl Iterator<Item = Aabb> + '_ {
        let t = self.offsets[idx];
        self.solids[idx].cells.iter().map(move |c| c.translated(&t))
    }

    fn require_mesh(&self, idx: usize) -> GeomResult<()> {
        if self.deflection[idx].is_none() {
            return Err(GeomError::NotTessellated(self.solids[idx].label.clone()));
        }
        Ok(())
    }

    fn check_spacing(&self, idx: usize, spacing: f64) -> GeomResult<()> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(GeomError::Degenerate {
                label: self.solids[idx].label.clone(),
                reason: format!("sample spacing must be positive, got {spacing}"),
            });
        }
        Ok(())
    }
}

/// Closest points between two closed boxes; overlapping ranges meet at their midpoint.
fn cell_distance(a: &Aabb, b: &Aabb) -> (f64, Point3<f64>, Point3<f64>) {
    let mut pa = Point3::origin();
    let mut pb = Point3::origin();
    for i in 0..3 {
        if a.max[i] < b.min[i] {
            pa[i] = a.max[i];
            pb[i] = b.min[i];
        } else if b.max[i] < a.min[i] {
            pa[i] = a.min[i];
            pb[i] = b.max[i];
        } else {
            let m = 0.5 * (a.min[i].max(b.min[i]) + a.max[i].min(b.max[i]));
            pa[i] = m;
            pb[i] = m;
        }
    }
    ((pb - pa).norm(), pa, pb)
}

fn classify_cell(c: &Aabb, p: &Point3<f64>, tol: f64) -> PointState {
    let inner = c.swollen(-tol);
    if (0..3).all(|i| inner.min[i] < p[i] && p[i] < inner.max[i]) {
        return PointState::Inside;
    }
    let outer = c.swollen(tol);
    if (0..3).all(|i| outer.min[i] <= p[i] && p[i] <= outer.max[i]) {
        PointState::On
    } else {
        PointState::Outside
    }
}

#[inline]
fn subdivisions(length: f64, spacing: f64) -> usize {
    ((length / spacing).ceil() as usize).clamp(1, MAX_SAMPLES_PER_EDGE)
}

/// Boundary points of a cell. `vertices == false` samples face-cell centres (native),
/// `vertices == true` samples the grid vertices of a regular face tessellation (mesh).
fn sample_cell(c: &Aabb, spacing: f64, vertices: bool, out: &mut Vec<Point3<f64>>) {
    let e = c.extents();
    for k in 0..3 {
        let (u, v) = ((k + 1) % 3, (k + 2) % 3);
        let nu = subdivisions(e[u], spacing);
        let nv = subdivisions(e[v], spacing);
        let (iu, iv, off) = if vertices {
            (nu + 1, nv + 1, 0.0)
        } else {
            (nu, nv, 0.5)
        };
        for side in [c.min[k], c.max[k]] {
            for a in 0..iu {
                for b in 0..iv {
                    let mut p = Point3::origin();
                    p[k] = side;
                    p[u] = c.min[u] + (a as f64 + off) * e[u] / nu as f64;
                    p[v] = c.min[v] + (b as f64 + off) * e[v] / nv as f64;
                    out.push(p);
                }
            }
        }
    }
}

impl GeometryQuery for BoxScene {
    fn bound_box(&self, label: &str) -> GeomResult<Aabb> {
        let idx = self.lookup(label)?;
        Ok(self
            .world_cells(idx)
            .fold(Aabb::empty(), |acc, c| acc.union(&c)))
    }

    fn distance(&self, a: &str, b: &str) -> GeomResult<Distance> {
        let (ia, ib) = (self.lookup(a)?, self.lookup(b)?);
        let mut best = f64::INFINITY;
        let mut pairs = Vec::new();
        for ca in self.world_cells(ia) {
            for cb in self.world_cells(ib) {
                let (d, pa, pb) = cell_distance(&ca, &cb);
                if d < best - 1e-12 {
                    best = d;
                    pairs.clear();
                    pairs.push((pa, pb));
                } else if (d - best).abs() <= 1e-12 {
                    pairs.push((pa, pb));
                }
            }
        }
        Ok(Distance { value: best, pairs })
    }

    fn classify(&self, label: &str, p: &Point3<f64>, tol: f64) -> GeomResult<PointState> {
        let idx = self.lookup(label)?;
        let mut state = PointState::Outside;
        for c in self.world_cells(idx) {
            match classify_cell(&c, p, tol) {
                PointState::Inside => return Ok(PointState::Inside),
                PointState::On => state = PointState::On,
                PointState::Outside => {}
            }
        }
        Ok(state)
    }

    fn proximity(&self, a: &str, b: &str, tol: f64) -> GeomResult<bool> {
        let (ia, ib) = (self.lookup(a)?, self.lookup(b)?);
        self.require_mesh(ia)?;
        self.require_mesh(ib)?;
        Ok(self.distance(a, b)?.value <= tol)
    }

    fn section(&self, a: &str, b: &str) -> GeomResult<bool> {
        let (ia, ib) = (self.lookup(a)?, self.lookup(b)?);
        for ca in self.world_cells(ia) {
            for cb in self.world_cells(ib) {
                if ca.intersects(&cb) && !ca.strictly_contains(&cb) && !cb.strictly_contains(&ca) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn volume(&self, label: &str) -> GeomResult<f64> {
        let idx = self.lookup(label)?;
        Ok(self.solids[idx].cells.iter().map(Aabb::volume).sum())
    }

    fn common_volume(&self, a: &str, b: &str) -> GeomResult<f64> {
        let (ia, ib) = (self.lookup(a)?, self.lookup(b)?);
        let mut v = 0.0;
        for ca in self.world_cells(ia) {
            for cb in self.world_cells(ib) {
                if let Some(i) = ca.intersection(&cb) {
                    v += i.volume();
                }
            }
        }
        Ok(v)
    }

    fn fuse_volume(&self, a: &str, b: &str) -> GeomResult<f64> {
        Ok(self.volume(a)? + self.volume(b)? - self.common_volume(a, b)?)
    }

    fn sample_surface(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>> {
        let idx = self.lookup(label)?;
        self.check_spacing(idx, spacing)?;
        let mut out = Vec::new();
        for c in &self.solids[idx].cells {
            sample_cell(c, spacing, false, &mut out);
        }
        Ok(out)
    }

    fn sample_mesh(&self, label: &str, spacing: f64) -> GeomResult<Vec<Point3<f64>>> {
        let idx = self.lookup(label)?;
        self.require_mesh(idx)?;
        self.check_spacing(idx, spacing)?;
        let mut out = Vec::new();
        for c in &self.solids[idx].cells {
            sample_cell(c, spacing, true, &mut out);
        }
        Ok(out)
    }

    fn is_tessellated(&self, label: &str) -> bool {
        self.index
            .get(label)
            .map(|&i| self.deflection[i].is_some())
            .unwrap_or(false)
    }

    fn tessellate(&mut self, label: &str, linear_deflection: f64) -> GeomResult<()> {
        let idx = self.lookup(label)?;
        if !(linear_deflection.is_finite() && linear_deflection > 0.0) {
            return Err(GeomError::Degenerate {
                label: label.to_string(),
                reason: format!("linear deflection must be positive, got {linear_deflection}"),
            });
        }
        self.deflection[idx] = Some(linear_deflection);
        Ok(())
    }

    fn placement(&self, label: &str) -> GeomResult<Isometry3<f64>> {
        let idx = self.lookup(label)?;
        Ok(Isometry3::translation(
            self.offsets[idx].x,
            self.offsets[idx].y,
            self.offsets[idx].z,
        ))
    }

    fn set_placement(&mut self, label: &str, placement: Isometry3<f64>) -> GeomResult<()> {
        let idx = self.lookup(label)?;
        if placement.rotation.angle() > ROTATION_EPS {
            return Err(GeomError::Unsupported {
                label: label.to_string(),
                reason: "BoxScene placements must be pure translations".into(),
            });
        }
        self.offsets[idx] = placement.translation.vector;
        Ok(())
    }
}
