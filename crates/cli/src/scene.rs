//! Scene files: box solids, optional translations, optional part filter.
//!
//! ```json
//! {
//!   "solids": [{"label": "A", "cells": [{"min": [0,0,0], "max": [1,1,1]}]}],
//!   "placements": {"A": [0.0, 0.0, 0.5]},
//!   "filter": {"excluded": ["screw"], "compounds": {"lid": ["lid_a", "lid_b"]}}
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use aplan::api::{unit_labels, AnalysisUnit, BoxScene, BoxSolid, GeometryQuery, PartFilter};
use aplan::prelude::Isometry3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    pub solids: Vec<BoxSolid>,
    #[serde(default)]
    pub placements: BTreeMap<String, [f64; 3]>,
    #[serde(default)]
    pub filter: PartFilter,
}

#[derive(Debug)]
pub struct LoadedScene {
    pub scene: BoxScene,
    pub units: Vec<AnalysisUnit>,
}

impl LoadedScene {
    /// `requested` labels if given (each must be an analysis unit), else every unit.
    pub fn components(&self, requested: &[String]) -> Result<Vec<String>> {
        let all = unit_labels(&self.units);
        if requested.is_empty() {
            return Ok(all);
        }
        for r in requested {
            if !all.contains(r) {
                bail!("component `{r}` is not part of the scene (after filtering)");
            }
        }
        Ok(requested.to_vec())
    }
}

pub fn load(path: &Path) -> Result<LoadedScene> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: SceneFile =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    from_file(file)
}

pub fn from_file(file: SceneFile) -> Result<LoadedScene> {
    let mut raw = BoxScene::from_solids(file.solids)?;
    for (label, t) in &file.placements {
        raw.set_placement(label, Isometry3::translation(t[0], t[1], t[2]))?;
    }
    let units = file.filter.resolve(&raw.labels())?;
    let scene = raw.with_compounds(&units)?;
    tracing::info!(
        parts = raw.labels().len(),
        units = units.len(),
        "loaded scene"
    );
    Ok(LoadedScene { scene, units })
}
