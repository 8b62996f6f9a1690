//! Tolerance defaults for the geometry layer (internal).
//!
//! Policy
//! - Values no caller needs to tune stay fixed constants. Everything a user
//!   tunes per run (thresholds, sample rates, step sizes) lives in `crate::config`.

/// Minimum extent, on every axis, of an elongated-box/candidate-box intersection for the
/// candidate to be kept by `BoundBox` obstruction refinement. Rejects grazing contacts.
pub(crate) const REFINE_EPS: f64 = 0.01;
/// Upper bound on boundary sample subdivisions per cell edge.
pub const MAX_SAMPLES_PER_EDGE: usize = 128;
/// Tolerance for "placement is a pure translation" checks in `BoxScene`.
pub(crate) const ROTATION_EPS: f64 = 1e-12;
