//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI, benches and
//!   project-internal callers. Breaking changes are allowed and expected.

// Geometry adapter
pub use crate::geom::{
    ensure_tessellated, overall_bound_box, Aabb, Axis, BoxScene, BoxSolid, Distance,
    GeometryQuery, Interval, MotionDirection, MovedTarget, PointState, SampleCache, SampleKind,
};
// Methods and parameters
pub use crate::config::{
    ConnRefinement, ConnSolver, ConnectionConfig, Criterion, NegativePolicy, ObstructionConfig,
    ObstructionRefinement, StepCfg,
};
// Parts and compounds
pub use crate::filter::{unit_labels, AnalysisUnit, PartFilter};
// Constraint graphs
pub use crate::graph::{ConnectionGraph, Edge, GraphJson, ObstructionGraph};
// Detectors
pub use crate::connection::{candidate_pairs, detect_connections, touching};
pub use crate::obstruction::{
    collides, detect_direction, detect_obstructions, directions_from_codes, plan_directions,
    refine, solve, DirectionPlan, DirectionResult, IntervalCandidates, ObstructionReport,
    ObstructionRequest,
};
// AND/OR graphs
pub use crate::aog::{generate, AndOrGraph, AogJson, BlockingRules, NodeId, Subassembly};
// Runs
pub use crate::progress::{CancelToken, Outcome, Progress, Reporter, Severity};
pub use crate::task::{spawn, spawn_connections, spawn_obstructions, Event, TaskHandle};
// Random scenes
pub use crate::rand3::{cell_label, random_stack, random_stack_solids, ReplayToken, StackCfg};
