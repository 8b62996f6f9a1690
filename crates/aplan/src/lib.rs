//! Disassembly planning for rigid assemblies.
//!
//! Pipeline
//! - `connection`: which components touch (undirected `ConnectionGraph`).
//! - `obstruction`: which components block a straight removal along each axis direction
//!   (one directed `ObstructionGraph` per direction).
//! - `aog`: all feasible ways to split the assembly recursively, as an AND/OR graph.
//!
//! Geometry is reached only through the `geom::GeometryQuery` trait; `geom::BoxScene` is
//! the in-crate adapter used by the CLI, the tests and the benches.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer the curated
//!   re-exports in `api` and `prelude`.

pub mod aog;
pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod geom;
pub mod graph;
pub mod obstruction;
pub mod progress;
pub mod rand3;
pub mod task;

#[cfg(test)]
mod testutil;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{AogError, ConfigError, Error, GeomError};
pub use progress::{CancelToken, Outcome, Reporter};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::aog::{generate, AndOrGraph, Subassembly};
    pub use crate::config::{ConnectionConfig, ObstructionConfig};
    pub use crate::connection::detect_connections;
    pub use crate::geom::{BoxScene, BoxSolid, GeometryQuery, MotionDirection};
    pub use crate::graph::{ConnectionGraph, ObstructionGraph};
    pub use crate::obstruction::{detect_obstructions, ObstructionRequest};
    pub use crate::progress::{CancelToken, Outcome, Reporter};
    pub use nalgebra::{Isometry3, Point3, Vector3};
}
