//! Error taxonomy shared by the engines.
//!
//! - `ConfigError`: invalid method/parameter combinations. Raised before any geometry query.
//! - `GeomError`: the geometry adapter could not answer a query. Local unless `is_fatal`.
//! - `AogError`: AND/OR graph generation failures.
//!
//! Cancellation is not an error; see `crate::progress::Outcome`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown {family} method `{name}`")]
    UnknownMethod { family: &'static str, name: String },
    #[error("method `{method}` requires parameter `{param}`")]
    MissingParam {
        method: &'static str,
        param: &'static str,
    },
    #[error("parameter `{param}` of `{method}` is invalid: {reason}")]
    InvalidParam {
        method: &'static str,
        param: &'static str,
        reason: String,
    },
    #[error("parameters must be a JSON object, got {0}")]
    NotAnObject(String),
    #[error("no motion directions requested")]
    NoDirections,
    #[error("invalid motion direction code {0}")]
    InvalidDirection(i32),
    #[error("linear deflection must be positive and finite, got {0}")]
    InvalidDeflection(f64),
    #[error("part `{part}` is grouped into both `{first}` and `{second}`")]
    DuplicateMembership {
        part: String,
        first: String,
        second: String,
    },
    #[error("compound label `{0}` collides with a part label")]
    CompoundLabelCollision(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    #[error("unknown component `{0}`")]
    UnknownComponent(String),
    #[error("degenerate geometry for `{label}`: {reason}")]
    Degenerate { label: String, reason: String },
    #[error("component `{0}` has not been tessellated")]
    NotTessellated(String),
    #[error("unsupported query for `{label}`: {reason}")]
    Unsupported { label: String, reason: String },
    #[error("geometry adapter unreachable: {0}")]
    Unreachable(String),
}

impl GeomError {
    /// Fatal errors end the whole run; everything else skips the pair/interval at hand.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, GeomError::Unreachable(_))
    }
}

pub type GeomResult<T> = Result<T, GeomError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AogError {
    #[error("no feasible full decomposition of {0:?}")]
    NoFeasibleDecomposition(Vec<String>),
    #[error("constraint references component `{0}` that is not part of the analysis")]
    UnknownComponent(String),
    #[error("no components to decompose")]
    Empty,
}

/// Umbrella error carried by `Outcome::Errored`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geom(#[from] GeomError),
    #[error(transparent)]
    Aog(#[from] AogError),
    #[error("worker failed: {0}")]
    Worker(String),
}
