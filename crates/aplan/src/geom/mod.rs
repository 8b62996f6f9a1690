//! Geometry layer: basic 3D types, the query adapter trait, and its box-based reference
//! implementation.
//!
//! Purpose
//! - Keep every shape-level computation behind `GeometryQuery` so the engines only deal with
//!   labels, boxes and points.
//! - Provide `BoxScene` as an exact adapter for axis-aligned cell solids.
//!
//! Why this design
//! - Host CAD kernels differ widely; a narrow trait with label-based queries is the seam.
//! - Placement mutation goes through `MovedTarget` so restoring is structural.
//!
//! Code cross-refs: `Aabb`, `MotionDirection`, `GeometryQuery`, `BoxScene`, `SampleCache`.

mod boxes;
pub(crate) mod cfg;
mod placement;
mod query;
mod sampling;
mod types;

pub use boxes::{BoxScene, BoxSolid};
pub use cfg::MAX_SAMPLES_PER_EDGE;
pub use placement::MovedTarget;
pub use query::{ensure_tessellated, overall_bound_box, Distance, GeometryQuery, PointState};
pub use sampling::{SampleCache, SampleKind};
pub use types::{Aabb, Axis, Interval, MotionDirection};

#[cfg(test)]
mod tests;
