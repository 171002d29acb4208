//! Compiler configuration.
//!
//! Config is optional JSON. Lookup order: an explicit path, then `kmlmc.json`
//! in the model folder, then the user config directory, then defaults.
use crate::vfs::Filesystem;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current schema version for compiler config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Runtime version recorded when the manifest leaves it blank.
pub const DEFAULT_MIN_KEYMAN_VERSION: &str = "12.0";
/// License recorded when the manifest leaves it blank.
pub const DEFAULT_LICENSE: &str = "mit";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_min_keyman_version")]
    pub min_keyman_version: String,
    #[serde(default = "default_license")]
    pub default_license: String,
    /// Shell-style command line used to transpile custom sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transpiler: Option<String>,
    /// Prefix joined in front of the derived `sourcePath`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path_prefix: Option<String>,
}

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn default_min_keyman_version() -> String {
    DEFAULT_MIN_KEYMAN_VERSION.to_string()
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            min_keyman_version: default_min_keyman_version(),
            default_license: default_license(),
            transpiler: None,
            source_path_prefix: None,
        }
    }
}

pub fn load_config(fs: &dyn Filesystem, path: &Path) -> Result<CompilerConfig> {
    let bytes = fs
        .read(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: CompilerConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config {}", path.display()))?;
    validate_config(&config).with_context(|| format!("validate config {}", path.display()))?;
    Ok(config)
}

pub fn validate_config(config: &CompilerConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.min_keyman_version.trim().is_empty() {
        return Err(anyhow!("min_keyman_version must not be empty"));
    }
    if config.default_license.trim().is_empty() {
        return Err(anyhow!("default_license must not be empty"));
    }
    if matches!(config.transpiler.as_deref(), Some(cmd) if cmd.trim().is_empty()) {
        return Err(anyhow!("transpiler must not be empty when set"));
    }
    if matches!(config.source_path_prefix.as_deref(), Some(prefix) if prefix.trim().is_empty()) {
        return Err(anyhow!("source_path_prefix must not be empty when set"));
    }
    Ok(())
}

/// User-level config file, `<config dir>/kmlmc/config.json`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kmlmc").join("config.json"))
}

/// Resolve the effective config for a build.
pub fn resolve_config(
    fs: &dyn Filesystem,
    explicit: Option<&Path>,
    project_path: &Path,
) -> Result<CompilerConfig> {
    if let Some(path) = explicit {
        return load_config(fs, path);
    }
    let candidates = std::iter::once(project_path.to_path_buf()).chain(user_config_path());
    for candidate in candidates {
        if fs.is_file(&candidate) {
            tracing::debug!(path = %candidate.display(), "using config");
            return load_config(fs, &candidate);
        }
    }
    Ok(CompilerConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryFilesystem, OsFilesystem};
    use std::fs;

    #[test]
    fn empty_object_uses_defaults() {
        let config: CompilerConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, CompilerConfig::default());
        validate_config(&config).expect("defaults are valid");
    }

    #[test]
    fn rejects_unknown_schema_and_blank_values() {
        let mut config = CompilerConfig {
            schema_version: 9,
            ..CompilerConfig::default()
        };
        assert!(validate_config(&config).is_err());

        config.schema_version = CONFIG_SCHEMA_VERSION;
        config.transpiler = Some("  ".to_string());
        assert!(validate_config(&config).is_err());

        config.transpiler = None;
        config.min_keyman_version = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<CompilerConfig>(r#"{"transpilr":"tsc"}"#).is_err());
    }

    #[test]
    fn explicit_path_wins_over_project_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let project = dir.path().join("kmlmc.json");
        let explicit = dir.path().join("explicit.json");
        fs::write(&project, r#"{"default_license":"apache-2.0"}"#).expect("write project");
        fs::write(&explicit, r#"{"min_keyman_version":"14.0"}"#).expect("write explicit");

        let config = resolve_config(&OsFilesystem, Some(&explicit), &project).expect("explicit");
        assert_eq!(config.min_keyman_version, "14.0");
        assert_eq!(config.default_license, DEFAULT_LICENSE);

        let config = resolve_config(&OsFilesystem, None, &project).expect("project");
        assert_eq!(config.default_license, "apache-2.0");
    }

    #[test]
    fn invalid_file_names_its_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"schema_version":2}"#).expect("write");
        let err = load_config(&OsFilesystem, &path).expect_err("bad schema");
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn project_file_is_found_through_the_filesystem() {
        let fs = MemoryFilesystem::new();
        let project = Path::new("/g/demo/en.sample/kmlmc.json");
        fs.insert(project, r#"{"source_path_prefix":"models"}"#);

        let config = resolve_config(&fs, None, project).expect("project");
        assert_eq!(config.source_path_prefix.as_deref(), Some("models"));
    }

    #[test]
    fn missing_explicit_config_names_its_path() {
        let fs = MemoryFilesystem::new();
        let err = resolve_config(&fs, Some(Path::new("/nowhere/kmlmc.json")), Path::new("/x.json"))
            .expect_err("missing explicit config");
        assert!(format!("{err:#}").contains("/nowhere/kmlmc.json"));
    }
}
