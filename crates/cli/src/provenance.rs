//! `<stem>.provenance.json` sidecar written next to each run's point table.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment override for the recorded code revision (CI, tarball builds).
const REV_ENV: &str = "MOC_CODE_REV";

/// What a run wrote and with which parameters.
pub struct RunRecord {
    params: Value,
    /// Point table first, then every table derived from it.
    outputs: Vec<PathBuf>,
}

impl RunRecord {
    pub fn new(points: &Path, params: Value) -> Self {
        Self {
            params,
            outputs: vec![points.to_path_buf()],
        }
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.outputs.push(path);
        self
    }

    /// Write the sidecar of the point table; returns its path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = sidecar_path(&self.outputs[0]);
        let outputs: Vec<String> = self
            .outputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let doc = json!({
            "code_rev": code_rev(),
            "moc_version": moc::VERSION,
            "params": self.params,
            "outputs": outputs,
        });
        fs::write(&path, serde_json::to_vec_pretty(&doc)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

fn sidecar_path(points: &Path) -> PathBuf {
    let mut name = points
        .file_stem()
        .map_or_else(|| "field".into(), |s| s.to_os_string());
    name.push(".provenance.json");
    points.with_file_name(name)
}

/// `$MOC_CODE_REV`, else `git rev-parse HEAD`, else `"unknown"`.
pub fn code_rev() -> String {
    std::env::var(REV_ENV)
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}
