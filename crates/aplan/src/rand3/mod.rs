//! Random box assemblies (jittered grid stacks + replay tokens).
//!
//! Purpose
//! - Reproducible test and benchmark scenes whose contacts and obstructions are known by
//!   construction: a grid of cells that touch their axis neighbours face to face.
//!
//! Model
//! - Each axis gets `count` slab widths `base * (1 + u)`, `u` in `[-jitter, jitter]`.
//!   Cell `(i, j, k)` spans slab `i` on X, `j` on Y, `k` on Z, so neighbours share a face.
//! - An optional gap fraction shrinks every cell around its centre, which turns all contacts
//!   into clearances of known size.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{Aabb, BoxScene, BoxSolid};

/// Grid stack configuration.
#[derive(Clone, Copy, Debug)]
pub struct StackCfg {
    /// Cells per axis `[x, y, z]`; zero counts are treated as one.
    pub counts: [usize; 3],
    pub base_size: f64,
    /// Relative slab width jitter, clamped to `[0, 0.9]`.
    pub jitter: f64,
    /// Fraction of each slab width removed as clearance, clamped to `[0, 0.5)`.
    pub gap: f64,
}

impl Default for StackCfg {
    fn default() -> Self {
        Self {
            counts: [3, 1, 1],
            base_size: 10.0,
            jitter: 0.3,
            gap: 0.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        StdRng::seed_from_u64(mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15))))
    }
}

/// Label of grid cell `(i, j, k)`.
pub fn cell_label(i: usize, j: usize, k: usize) -> String {
    format!("P{i}_{j}_{k}")
}

fn slab_bounds<R: Rng>(rng: &mut R, n: usize, base: f64, jitter: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(n + 1);
    let mut x = 0.0;
    out.push(x);
    for _ in 0..n {
        let u = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        x += base * (1.0 + u);
        out.push(x);
    }
    out
}

/// Draw the cells of a jittered grid stack.
pub fn random_stack_solids(cfg: StackCfg, tok: ReplayToken) -> Vec<BoxSolid> {
    let mut rng = tok.to_std_rng();
    let base = cfg.base_size.abs().max(1e-6);
    let jitter = cfg.jitter.clamp(0.0, 0.9);
    let gap = cfg.gap.clamp(0.0, 0.49);
    let counts = cfg.counts.map(|c| c.max(1));
    let bounds: Vec<Vec<f64>> = counts
        .iter()
        .map(|&n| slab_bounds(&mut rng, n, base, jitter))
        .collect();

    let mut solids = Vec::with_capacity(counts.iter().product());
    for i in 0..counts[0] {
        for j in 0..counts[1] {
            for k in 0..counts[2] {
                let idx = [i, j, k];
                let mut lo = [0.0; 3];
                let mut hi = [0.0; 3];
                for a in 0..3 {
                    let (l, h) = (bounds[a][idx[a]], bounds[a][idx[a] + 1]);
                    let shrink = 0.5 * gap * (h - l);
                    lo[a] = l + shrink;
                    hi[a] = h - shrink;
                }
                solids.push(BoxSolid::new(
                    cell_label(i, j, k),
                    vec![Aabb::from_corners(lo, hi)],
                ));
            }
        }
    }
    solids
}

/// Draw a jittered grid stack as a ready-to-query scene.
pub fn random_stack(cfg: StackCfg, tok: ReplayToken) -> BoxScene {
    let mut scene = BoxScene::new();
    for s in random_stack_solids(cfg, tok) {
        // Labels are unique and cells non-empty by construction.
        if let Err(e) = scene.insert(s) {
            tracing::error!(error = %e, "random stack produced an invalid solid");
        }
    }
    scene
}
