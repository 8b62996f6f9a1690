//! AND/OR graph generation (reverse cutset construction).
//!
//! Purpose
//! - Enumerate every subassembly that is connected in the contact graph and respects the
//!   blocking rules of the obstruction graphs, then record every split of a subassembly into
//!   two enumerated parts as an AND-edge. The result feeds disassembly sequence search.
//!
//! Why this design
//! - Nodes are keyed by their sorted label list in an arena; edges and the parent/child
//!   adjacency indices are plain ids into it, so the hypergraph has no reference cycles.
//! - Enumeration grows subassemblies by one adjacent component at a time, so every node is
//!   connected by construction and no separate connectivity pass is needed below size `n`.
//!
//! Code cross-refs: `graph::{ConnectionGraph, ObstructionGraph}`, `error::AogError`.

mod build;
mod rules;
mod types;

pub use build::{cutsets, enumerate, generate, Levels};
pub use rules::BlockingRules;
pub use types::{AndEdge, AndOrGraph, AogEdgeJson, AogJson, AogNodeJson, EdgeId, NodeId, Subassembly};
