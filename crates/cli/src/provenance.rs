use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata used to generate a provenance sidecar.
pub struct Payload {
    /// Subcommand that produced the artifact.
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

/// Write `bytes` to `artifact` (creating parent dirs) followed by its sidecar.
#[track_caller]
pub fn write_artifact<P: AsRef<Path>>(artifact: P, bytes: &[u8], payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    ensure_parent(artifact)?;
    fs::write(artifact, bytes).with_context(|| format!("writing {}", artifact.display()))?;
    write_sidecar(artifact, payload)
}

/// Write `<artifact stem>.provenance.json` containing the git commit, callsite, params, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    ensure_parent(&provenance_path)?;

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "aplan_version": aplan::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "wrote provenance");
    Ok(provenance_path)
}

/// Provenance block printed by `aplan report`.
pub fn report_block() -> Value {
    json!({
        "code_rev": current_git_rev(),
        "aplan_version": aplan::VERSION,
        "command": "report",
        "params": {},
        "outputs": []
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    let mut name = stem;
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_rewrites_extension() {
        let base = Path::new("/tmp/output/connections.json");
        let derived = provenance_path(base);
        assert_eq!(derived, Path::new("/tmp/output/connections.provenance.json"));
    }

    #[test]
    fn write_artifact_creates_file_and_sidecar() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("aog.json");
        let payload = Payload::new("aog", json!({"components": ["A", "B"]}));
        let prov_path = write_artifact(&artifact, b"{}", payload).unwrap();
        assert!(artifact.exists());
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["command"], "aog");
        assert_eq!(parsed["params"]["components"][1], "B");
    }
}
