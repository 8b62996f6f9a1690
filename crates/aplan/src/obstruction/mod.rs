//! Obstruction detection: which components block the straight-line removal of others.
//!
//! Purpose
//! - `refine` narrows, per target and direction, the components the target can hit and the
//!   stretch of the sweep where that can happen.
//! - `solve` moves the target through those stretches with fixed or adaptive steps and
//!   confirms obstructors with the selected `Criterion`.
//! - `detect_obstructions` / `ObstructionRequest::run` drive both over all components and
//!   directions and return one `ObstructionGraph` per requested direction.
//!
//! Why this design
//! - Refinement is a pure function of the static geometry, so it can be tested without moving
//!   anything and its output bounds the solver's work.
//! - The target's placement is only touched through `MovedTarget`, which restores it on every
//!   exit path including cancellation.
//! - Directions are independent; the parallel fan-out gives each worker its own scene clone
//!   and shares nothing mutable.
//!
//! Code cross-refs: `ObstructionConfig`, `Criterion`, `StepCfg`, `NegativePolicy`,
//! `geom::MovedTarget`, `geom::SampleCache`.

mod criteria;
mod pipeline;
mod refine;
mod solve;
mod types;

pub use criteria::collides;
pub use pipeline::{
    detect_direction, detect_obstructions, directions_from_codes, plan_directions, DirectionPlan,
    ObstructionRequest,
};
pub use refine::refine;
pub use solve::solve;
pub use types::{DirectionResult, IntervalCandidates, ObstructionReport};
