//! Configuration file loading for kbase-report.
//!
//! Discovers and loads `kbase-report.toml` from the working directory, or
//! from an explicit `--config` path. Merges file settings with CLI arguments
//! (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "kbase-report.toml";

/// Top-level configuration from kbase-report.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KbaseReportConfig {
    pub output: OutputConfig,

    pub validation: ValidationConfig,

    pub envelope: EnvelopeConfig,
}

/// How JSON is written to stdout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run the service's parameter rules before emitting anything.
    pub enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Request id used when `--id` is not given.
    pub default_id: String,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            default_id: "1".to_string(),
        }
    }
}

/// Discover the kbase-report.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<KbaseReportConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<KbaseReportConfig> {
    let config: KbaseReportConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else discover one in `dir`, else
/// return defaults. An explicit path that does not exist is an error.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<KbaseReportConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(KbaseReportConfig::default()),
    }
}

/// Effective settings after applying CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub pretty: bool,
    pub validate: bool,
    pub request_id: String,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: KbaseReportConfig,
}

impl ConfigMerger {
    pub fn new(config: KbaseReportConfig) -> Self {
        Self { config }
    }

    /// Merge with output and validation flags.
    ///
    /// `--compact` and `--no-validate` switch the corresponding setting off
    /// when given; otherwise the file value is kept. An explicit `--id` wins
    /// over the configured default.
    pub fn merge_args(self, compact: bool, no_validate: bool, id: Option<&str>) -> MergedConfig {
        MergedConfig {
            pretty: self.config.output.pretty && !compact,
            validate: self.config.validation.enabled && !no_validate,
            request_id: id
                .map(str::to_string)
                .unwrap_or(self.config.envelope.default_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[output]
pretty = false

[validation]
enabled = false

[envelope]
default_id = "narrative-42"
"#;

        let config = parse_config(contents).unwrap();
        assert!(!config.output.pretty);
        assert!(!config.validation.enabled);
        assert_eq!(config.envelope.default_id, "narrative-42");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.output.pretty);
        assert!(config.validation.enabled);
        assert_eq!(config.envelope.default_id, "1");
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        let err = parse_config("[output]\npretty = \"yes\"\n").expect_err("bad type");
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let merged =
            ConfigMerger::new(KbaseReportConfig::default()).merge_args(true, true, Some("9"));
        assert!(!merged.pretty);
        assert!(!merged.validate);
        assert_eq!(merged.request_id, "9");
    }

    #[test]
    fn test_config_used_when_cli_silent() {
        let config =
            parse_config("[output]\npretty = false\n[envelope]\ndefault_id = \"x\"\n").unwrap();
        let merged = ConfigMerger::new(config).merge_args(false, false, None);
        assert!(!merged.pretty);
        assert!(merged.validate);
        assert_eq!(merged.request_id, "x");
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let missing = root.join("elsewhere.toml");
        assert!(load_or_default(Some(&missing), &root).is_err());
        assert!(load_or_default(None, &root).is_ok());
    }
}
