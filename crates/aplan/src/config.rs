//! Method selection and run parameters.
//!
//! Purpose
//! - Closed enums for every refinement/solver method with a static required-parameter set.
//! - Fail-fast parsing of `(method name, JSON params)` pairs as they arrive from the batch
//!   entry point; nothing here touches geometry.
//!
//! Conventions
//! - Method names are accepted either as the Rust variant name (`BoundBox`, `DistToShape`) or
//!   as the kernel-facing display label (`BoundBox_Intersection`, `BRepExtrema_DistShapeShape`).
//! - Parameter keys are camelCase (`swellDistance`, `overlapTolerance`, ...). Unrequired keys
//!   are ignored.
//! - `Default` values match the host tool defaults.

use serde_json::{Map, Value};

use crate::error::ConfigError;

type Params = Map<String, Value>;

fn as_object<'v>(params: &'v Value) -> Result<Option<&'v Params>, ConfigError> {
    match params {
        Value::Null => Ok(None),
        Value::Object(m) => Ok(Some(m)),
        other => Err(ConfigError::NotAnObject(other.to_string())),
    }
}

/// Read a required float; `positive` demands `> 0`, else `>= 0`.
fn float(
    params: Option<&Params>,
    method: &'static str,
    param: &'static str,
    positive: bool,
) -> Result<f64, ConfigError> {
    let v = params
        .and_then(|m| m.get(param))
        .ok_or(ConfigError::MissingParam { method, param })?;
    let x = v.as_f64().ok_or_else(|| ConfigError::InvalidParam {
        method,
        param,
        reason: format!("expected a number, got {v}"),
    })?;
    let ok = x.is_finite() && if positive { x > 0.0 } else { x >= 0.0 };
    if !ok {
        let bound = if positive { "> 0" } else { ">= 0" };
        return Err(ConfigError::InvalidParam {
            method,
            param,
            reason: format!("must be finite and {bound}, got {x}"),
        });
    }
    Ok(x)
}

fn matches_name(name: &str, variant: &str, label: &str) -> bool {
    name == variant || name == label
}

// ---------------------------------------------------------------------------
// Connection detection
// ---------------------------------------------------------------------------

/// Candidate-pair refinement for connection detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConnRefinement {
    /// All unordered pairs.
    None,
    /// Pairs whose boxes, each swollen by `swell_distance / 2`, intersect.
    BoundBox { swell_distance: f64 },
}

impl ConnRefinement {
    pub fn name(&self) -> &'static str {
        match self {
            ConnRefinement::None => "None",
            ConnRefinement::BoundBox { .. } => "BoundBox",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnRefinement::None => "None",
            ConnRefinement::BoundBox { .. } => "BoundBox_Intersection",
        }
    }

    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            ConnRefinement::None => &[],
            ConnRefinement::BoundBox { .. } => &["swellDistance"],
        }
    }

    pub fn from_parts(name: &str, params: &Value) -> Result<Self, ConfigError> {
        let p = as_object(params)?;
        if matches_name(name, "None", "None_") {
            Ok(ConnRefinement::None)
        } else if matches_name(name, "BoundBox", "BoundBox_Intersection") {
            Ok(ConnRefinement::BoundBox {
                swell_distance: float(p, "BoundBox", "swellDistance", false)?,
            })
        } else {
            Err(ConfigError::UnknownMethod {
                family: "connection refinement",
                name: name.to_string(),
            })
        }
    }
}

impl Default for ConnRefinement {
    fn default() -> Self {
        ConnRefinement::BoundBox {
            swell_distance: 0.01,
        }
    }
}

/// Touching test applied to each candidate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConnSolver {
    DistToShape { min_distance: f64 },
    MeshInside { sample_rate: f64, tolerance: f64 },
    GeoDataInside { sample_rate: f64, tolerance: f64 },
    Proximity { tolerance: f64 },
    Section,
}

impl ConnSolver {
    pub fn name(&self) -> &'static str {
        match self {
            ConnSolver::DistToShape { .. } => "DistToShape",
            ConnSolver::MeshInside { .. } => "MeshInside",
            ConnSolver::GeoDataInside { .. } => "GeoDataInside",
            ConnSolver::Proximity { .. } => "Proximity",
            ConnSolver::Section => "Section",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnSolver::DistToShape { .. } => "BRepExtrema_DistShapeShape",
            ConnSolver::MeshInside { .. } => "BRepMesh_SolidClassifier",
            ConnSolver::GeoDataInside { .. } => "GeoData_SolidClassifier",
            ConnSolver::Proximity { .. } => "BRepExtrema_ShapeProximity",
            ConnSolver::Section => "BRepAlgoAPI_Section",
        }
    }

    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            ConnSolver::DistToShape { .. } => &["minDistance"],
            ConnSolver::MeshInside { .. } | ConnSolver::GeoDataInside { .. } => {
                &["sampleRate", "tolerance"]
            }
            ConnSolver::Proximity { .. } => &["tolerance"],
            ConnSolver::Section => &[],
        }
    }

    /// Whether the adapter must tessellate components before this solver runs.
    pub fn needs_tessellation(&self) -> bool {
        matches!(self, ConnSolver::MeshInside { .. } | ConnSolver::Proximity { .. })
    }

    pub fn from_parts(name: &str, params: &Value) -> Result<Self, ConfigError> {
        let p = as_object(params)?;
        if matches_name(name, "DistToShape", "BRepExtrema_DistShapeShape") {
            Ok(ConnSolver::DistToShape {
                min_distance: float(p, "DistToShape", "minDistance", false)?,
            })
        } else if matches_name(name, "MeshInside", "BRepMesh_SolidClassifier") {
            Ok(ConnSolver::MeshInside {
                sample_rate: float(p, "MeshInside", "sampleRate", true)?,
                tolerance: float(p, "MeshInside", "tolerance", false)?,
            })
        } else if matches_name(name, "GeoDataInside", "GeoData_SolidClassifier") {
            Ok(ConnSolver::GeoDataInside {
                sample_rate: float(p, "GeoDataInside", "sampleRate", true)?,
                tolerance: float(p, "GeoDataInside", "tolerance", false)?,
            })
        } else if matches_name(name, "Proximity", "BRepExtrema_ShapeProximity") {
            Ok(ConnSolver::Proximity {
                tolerance: float(p, "Proximity", "tolerance", false)?,
            })
        } else if matches_name(name, "Section", "BRepAlgoAPI_Section") {
            Ok(ConnSolver::Section)
        } else {
            Err(ConfigError::UnknownMethod {
                family: "connection solver",
                name: name.to_string(),
            })
        }
    }
}

impl Default for ConnSolver {
    fn default() -> Self {
        ConnSolver::DistToShape { min_distance: 1e-5 }
    }
}

/// Validated configuration for `detect_connections`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionConfig {
    pub refinement: ConnRefinement,
    pub solver: ConnSolver,
    /// Linear deflection used when the solver needs a tessellation.
    pub linear_deflection: f64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            refinement: ConnRefinement::default(),
            solver: ConnSolver::default(),
            linear_deflection: 0.1,
        }
    }
}

impl ConnectionConfig {
    pub fn from_json(
        refinement: &str,
        refinement_params: &Value,
        solver: &str,
        solver_params: &Value,
        linear_deflection: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            refinement: ConnRefinement::from_parts(refinement, refinement_params)?,
            solver: ConnSolver::from_parts(solver, solver_params)?,
            linear_deflection: check_deflection(linear_deflection)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Obstruction detection
// ---------------------------------------------------------------------------

/// Candidate refinement for obstruction detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObstructionRefinement {
    /// One interval spanning the whole sweep, every other component a candidate.
    #[default]
    None,
    /// Elongated-box intersection with per-candidate sub-intervals.
    BoundBox,
}

impl ObstructionRefinement {
    pub fn name(&self) -> &'static str {
        match self {
            ObstructionRefinement::None => "None",
            ObstructionRefinement::BoundBox => "BoundBox",
        }
    }

    pub fn required_params(&self) -> &'static [&'static str] {
        &[]
    }

    pub fn from_parts(name: &str, params: &Value) -> Result<Self, ConfigError> {
        as_object(params)?;
        if matches_name(name, "None", "None_") {
            Ok(ObstructionRefinement::None)
        } else if matches_name(name, "BoundBox", "BoundBox_Intersection") {
            Ok(ObstructionRefinement::BoundBox)
        } else {
            Err(ConfigError::UnknownMethod {
                family: "obstruction refinement",
                name: name.to_string(),
            })
        }
    }
}

/// Collision criterion evaluated at every solver step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Criterion {
    DistToShape {
        overlap_tolerance: f64,
        min_distance: f64,
        classification_tolerance: f64,
    },
    MeshInside {
        overlap_tolerance: f64,
        classification_tolerance: f64,
        sample_coefficient: f64,
    },
    GeoDataInside {
        overlap_tolerance: f64,
        classification_tolerance: f64,
        sample_coefficient: f64,
    },
    Common {
        overlap_tolerance: f64,
        volume_tolerance: f64,
    },
    Fuse {
        overlap_tolerance: f64,
        volume_tolerance: f64,
    },
}

impl Criterion {
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::DistToShape { .. } => "DistToShape",
            Criterion::MeshInside { .. } => "MeshInside",
            Criterion::GeoDataInside { .. } => "GeoDataInside",
            Criterion::Common { .. } => "Common",
            Criterion::Fuse { .. } => "Fuse",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::DistToShape { .. } => "BRepExtrema_DistShapeShape",
            Criterion::MeshInside { .. } => "BRepMesh_SolidClassifier",
            Criterion::GeoDataInside { .. } => "GeoData_SolidClassifier",
            Criterion::Common { .. } => "Common",
            Criterion::Fuse { .. } => "Fuse",
        }
    }

    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Criterion::DistToShape { .. } => {
                &["overlapTolerance", "minDistance", "classificationTolerance"]
            }
            Criterion::MeshInside { .. } | Criterion::GeoDataInside { .. } => &[
                "overlapTolerance",
                "classificationTolerance",
                "sampleCoefficient",
            ],
            Criterion::Common { .. } | Criterion::Fuse { .. } => {
                &["overlapTolerance", "volumeTolerance"]
            }
        }
    }

    /// Proximity gate tolerance shared by every criterion.
    pub fn overlap_tolerance(&self) -> f64 {
        match *self {
            Criterion::DistToShape {
                overlap_tolerance, ..
            }
            | Criterion::MeshInside {
                overlap_tolerance, ..
            }
            | Criterion::GeoDataInside {
                overlap_tolerance, ..
            }
            | Criterion::Common {
                overlap_tolerance, ..
            }
            | Criterion::Fuse {
                overlap_tolerance, ..
            } => overlap_tolerance,
        }
    }

    pub fn from_parts(name: &str, params: &Value) -> Result<Self, ConfigError> {
        let p = as_object(params)?;
        if matches_name(name, "DistToShape", "BRepExtrema_DistShapeShape") {
            let m = "DistToShape";
            Ok(Criterion::DistToShape {
                overlap_tolerance: float(p, m, "overlapTolerance", false)?,
                min_distance: float(p, m, "minDistance", false)?,
                classification_tolerance: float(p, m, "classificationTolerance", false)?,
            })
        } else if matches_name(name, "MeshInside", "BRepMesh_SolidClassifier") {
            let m = "MeshInside";
            Ok(Criterion::MeshInside {
                overlap_tolerance: float(p, m, "overlapTolerance", false)?,
                classification_tolerance: float(p, m, "classificationTolerance", false)?,
                sample_coefficient: float(p, m, "sampleCoefficient", true)?,
            })
        } else if matches_name(name, "GeoDataInside", "GeoData_SolidClassifier") {
            let m = "GeoDataInside";
            Ok(Criterion::GeoDataInside {
                overlap_tolerance: float(p, m, "overlapTolerance", false)?,
                classification_tolerance: float(p, m, "classificationTolerance", false)?,
                sample_coefficient: float(p, m, "sampleCoefficient", true)?,
            })
        } else if name == "Common" {
            Ok(Criterion::Common {
                overlap_tolerance: float(p, "Common", "overlapTolerance", false)?,
                volume_tolerance: float(p, "Common", "volumeTolerance", false)?,
            })
        } else if name == "Fuse" {
            Ok(Criterion::Fuse {
                overlap_tolerance: float(p, "Fuse", "overlapTolerance", false)?,
                volume_tolerance: float(p, "Fuse", "volumeTolerance", false)?,
            })
        } else {
            Err(ConfigError::UnknownMethod {
                family: "obstruction solver",
                name: name.to_string(),
            })
        }
    }
}

impl Default for Criterion {
    fn default() -> Self {
        Criterion::DistToShape {
            overlap_tolerance: 1e-5,
            min_distance: 1e-5,
            classification_tolerance: 1e-5,
        }
    }
}

/// Solver step sizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepCfg {
    Fixed { step: f64 },
    /// `max(interval length * coefficient, min_step)` per interval.
    Adaptive { coefficient: f64, min_step: f64 },
}

impl StepCfg {
    /// Step length for an interval of length `len`.
    #[inline]
    pub fn step_for(&self, len: f64) -> f64 {
        match *self {
            StepCfg::Fixed { step } => step,
            StepCfg::Adaptive {
                coefficient,
                min_step,
            } => (len * coefficient).max(min_step),
        }
    }

    /// Parse the general solver parameters (`variableStepSizeEnabled`, `stepSizeCoefficient`,
    /// `minStepSize`, `fixedStepSize`). Only the keys of the selected mode are required.
    pub fn from_json(params: &Value) -> Result<Self, ConfigError> {
        let p = as_object(params)?;
        let m = "general";
        let variable = match p.and_then(|m| m.get("variableStepSizeEnabled")) {
            None => true,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(ConfigError::InvalidParam {
                    method: m,
                    param: "variableStepSizeEnabled",
                    reason: format!("expected a boolean, got {other}"),
                })
            }
        };
        if variable {
            Ok(StepCfg::Adaptive {
                coefficient: float(p, m, "stepSizeCoefficient", true)?,
                min_step: float(p, m, "minStepSize", true)?,
            })
        } else {
            Ok(StepCfg::Fixed {
                step: float(p, m, "fixedStepSize", true)?,
            })
        }
    }
}

impl Default for StepCfg {
    fn default() -> Self {
        StepCfg::Adaptive {
            coefficient: 0.1,
            min_step: 1.0,
        }
    }
}

/// How requested negative directions are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NegativePolicy {
    /// Derive from the positive counterpart by reversing every edge.
    #[default]
    Reverse,
    /// Run the sweep for the negative direction too.
    Solve,
}

/// Validated configuration for an obstruction run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstructionConfig {
    pub refinement: ObstructionRefinement,
    pub criterion: Criterion,
    pub step: StepCfg,
    pub linear_deflection: f64,
    pub negative_policy: NegativePolicy,
}

impl Default for ObstructionConfig {
    fn default() -> Self {
        Self {
            refinement: ObstructionRefinement::default(),
            criterion: Criterion::default(),
            step: StepCfg::default(),
            linear_deflection: 0.1,
            negative_policy: NegativePolicy::default(),
        }
    }
}

impl ObstructionConfig {
    pub fn from_json(
        refinement: &str,
        refinement_params: &Value,
        solver: &str,
        solver_params: &Value,
        general_params: &Value,
        linear_deflection: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            refinement: ObstructionRefinement::from_parts(refinement, refinement_params)?,
            criterion: Criterion::from_parts(solver, solver_params)?,
            step: StepCfg::from_json(general_params)?,
            linear_deflection: check_deflection(linear_deflection)?,
            negative_policy: NegativePolicy::default(),
        })
    }
}

fn check_deflection(d: f64) -> Result<f64, ConfigError> {
    if d.is_finite() && d > 0.0 {
        Ok(d)
    } else {
        Err(ConfigError::InvalidDeflection(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_labels_and_variant_names() {
        let a = ConnRefinement::from_parts("BoundBox", &json!({"swellDistance": 0.5})).unwrap();
        let b =
            ConnRefinement::from_parts("BoundBox_Intersection", &json!({"swellDistance": 0.5}))
                .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            ConnRefinement::from_parts("None_", &Value::Null).unwrap(),
            ConnRefinement::None
        );
        assert_eq!(
            ConnSolver::from_parts("BRepAlgoAPI_Section", &json!({})).unwrap(),
            ConnSolver::Section
        );
    }

    #[test]
    fn missing_and_invalid_params_fail_fast() {
        let err = Criterion::from_parts("Common", &json!({"overlapTolerance": 1e-5})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingParam {
                method: "Common",
                param: "volumeTolerance"
            }
        );
        let err = ConnSolver::from_parts("MeshInside", &json!({"sampleRate": 0.0, "tolerance": 1.0}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParam { param: "sampleRate", .. }));
        let err = ConnSolver::from_parts("DistToShape", &json!({"minDistance": "x"})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParam { .. }));
        assert!(matches!(
            Criterion::from_parts("Raycast", &json!({})),
            Err(ConfigError::UnknownMethod { .. })
        ));
        assert!(matches!(
            ConnSolver::from_parts("Section", &json!([1, 2])),
            Err(ConfigError::NotAnObject(_))
        ));
    }

    #[test]
    fn required_params_match_parsed_methods() {
        let params = json!({
            "overlapTolerance": 1e-5, "minDistance": 1e-5, "classificationTolerance": 1e-5,
            "sampleCoefficient": 0.01, "volumeTolerance": 1e-5
        });
        for name in ["DistToShape", "MeshInside", "GeoDataInside", "Common", "Fuse"] {
            let c = Criterion::from_parts(name, &params).unwrap();
            assert_eq!(c.name(), name);
            assert!(!c.required_params().is_empty());
            assert_eq!(c.overlap_tolerance(), 1e-5);
            for &key in c.required_params() {
                assert_eq!(
                    Criterion::from_parts(name, &without(&params, key)).unwrap_err(),
                    ConfigError::MissingParam { method: name, param: key },
                );
            }
        }
    }

    #[test]
    fn every_declared_connection_param_is_required() {
        let params = json!({"minDistance": 1e-5, "sampleRate": 0.05, "tolerance": 1e-5});
        for name in ["DistToShape", "MeshInside", "GeoDataInside", "Proximity", "Section"] {
            let s = ConnSolver::from_parts(name, &params).unwrap();
            assert_eq!(s.name(), name);
            for &key in s.required_params() {
                assert_eq!(
                    ConnSolver::from_parts(name, &without(&params, key)).unwrap_err(),
                    ConfigError::MissingParam { method: name, param: key },
                );
            }
        }
        let swell = json!({"swellDistance": 0.5});
        let r = ConnRefinement::from_parts("BoundBox", &swell).unwrap();
        for &key in r.required_params() {
            assert_eq!(
                ConnRefinement::from_parts("BoundBox", &without(&swell, key)).unwrap_err(),
                ConfigError::MissingParam { method: "BoundBox", param: key },
            );
        }
    }

    fn without(params: &Value, key: &str) -> Value {
        let mut p = params.clone();
        if let Some(m) = p.as_object_mut() {
            m.remove(key);
        }
        p
    }

    #[test]
    fn step_sizing() {
        let adaptive = StepCfg::from_json(&json!({
            "variableStepSizeEnabled": true, "stepSizeCoefficient": 0.1, "minStepSize": 1.0,
            "fixedStepSize": 1.0
        }))
        .unwrap();
        assert_eq!(adaptive, StepCfg::default());
        assert_eq!(adaptive.step_for(100.0), 10.0);
        assert_eq!(adaptive.step_for(3.0), 1.0);
        let fixed =
            StepCfg::from_json(&json!({"variableStepSizeEnabled": false, "fixedStepSize": 0.25}))
                .unwrap();
        assert_eq!(fixed.step_for(100.0), 0.25);
        assert!(StepCfg::from_json(&json!({"variableStepSizeEnabled": false, "fixedStepSize": 0}))
            .is_err());
    }

    #[test]
    fn deflection_is_validated() {
        let err = ObstructionConfig::from_json(
            "None",
            &json!({}),
            "Common",
            &json!({"overlapTolerance": 0.0, "volumeTolerance": 0.0}),
            &json!({"variableStepSizeEnabled": false, "fixedStepSize": 1.0}),
            -1.0,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidDeflection(-1.0));
    }
}
