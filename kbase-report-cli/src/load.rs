//! Payload ingestion for the file-driven commands.
//!
//! Inputs are files or directories; a directory contributes every `*.json`
//! file directly inside it. One unreadable or unparsable file does not stop
//! the others from loading.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedPayload {
    pub path: Utf8PathBuf,
    pub payload: Result<Value, PayloadLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum PayloadLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

pub fn load_payloads(inputs: &[Utf8PathBuf]) -> anyhow::Result<Vec<LoadedPayload>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(scan_dir(input)?);
        } else {
            paths.push(input.clone());
        }
    }

    // Deterministic order matters.
    paths.sort();
    paths.dedup();

    Ok(paths
        .into_iter()
        .map(|path| {
            let payload = read_payload(&path);
            LoadedPayload { path, payload }
        })
        .collect())
}

fn scan_dir(dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let pattern = dir.join("*.json");
    let pattern_str = pattern.as_str();

    debug!(pattern = %pattern_str, "scanning directory for payloads");

    let mut out = Vec::new();
    for entry in glob(pattern_str).with_context(|| format!("glob {pattern_str}"))? {
        let path = entry
            .map_err(|e| anyhow::anyhow!("glob error: {e}"))?
            .to_string_lossy()
            .to_string();
        out.push(Utf8PathBuf::from(path));
    }
    Ok(out)
}

pub fn read_payload(path: &Utf8Path) -> Result<Value, PayloadLoadError> {
    let text = fs::read_to_string(path).map_err(|e| PayloadLoadError::Io {
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| PayloadLoadError::Json {
        message: e.to_string(),
    })
}
