//! Typed paths into a lexical model project.
//!
//! A model lives at `<group>/<author>/<bcp47>.<uniq>/` with author inputs in
//! `source/` and everything the compiler produces in `build/`.
use crate::identity::ModelIdentifier;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Name of the folder builds must run from.
pub const BUILD_DIR_NAME: &str = "build";
/// Name of the folder holding author sources, next to `build/`.
pub const SOURCE_DIR_NAME: &str = "source";
/// Suffix of the author-supplied metadata file in the model folder.
pub const MODEL_INFO_SUFFIX: &str = ".model_info";
/// Project-level config file looked up in the model folder.
pub const PROJECT_CONFIG_FILE: &str = "kmlmc.json";

/// Convenience wrapper for locating model inputs and build artifacts.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    build_dir: PathBuf,
    model_dir: PathBuf,
}

impl BuildPaths {
    /// Create a path helper for the given build directory.
    pub fn new(build_dir: PathBuf) -> Result<Self> {
        let model_dir = build_dir
            .parent()
            .ok_or_else(|| anyhow!("build directory {} has no parent", build_dir.display()))?
            .to_path_buf();
        Ok(Self {
            build_dir,
            model_dir,
        })
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Return the `<bcp47>.<uniq>/` folder containing `build/` and `source/`.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Return the `source/` directory path.
    pub fn source_dir(&self) -> PathBuf {
        self.model_dir.join(SOURCE_DIR_NAME)
    }

    /// Return the author-supplied `../{id}.model_info` path.
    pub fn info_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.model_dir.join(format!("{id}{MODEL_INFO_SUFFIX}"))
    }

    /// Return the default `source/{id}.model.json` model description path.
    pub fn model_source_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.source_dir().join(format!("{id}.model.json"))
    }

    /// Return the `source/{id}.model.kps` project descriptor path.
    pub fn package_source_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.source_dir().join(format!("{id}.model.kps"))
    }

    /// Return a path below `source/` for an author-listed file.
    pub fn source_file(&self, rel: &str) -> PathBuf {
        crate::util::join_portable(&self.source_dir(), rel)
    }

    /// Return the `{id}.model.js` output path.
    pub fn script_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.build_dir.join(script_filename(id))
    }

    /// Return the `{id}.model.kmp` output path.
    pub fn package_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.build_dir.join(package_filename(id))
    }

    /// Return the merged `{id}.model_info` output path.
    pub fn manifest_path(&self, id: &ModelIdentifier) -> PathBuf {
        self.build_dir.join(format!("{id}{MODEL_INFO_SUFFIX}"))
    }

    /// Return the `kmlmc.json` project config path.
    pub fn project_config_path(&self) -> PathBuf {
        self.model_dir.join(PROJECT_CONFIG_FILE)
    }
}

pub fn script_filename(id: &ModelIdentifier) -> String {
    format!("{id}.model.js")
}

pub fn package_filename(id: &ModelIdentifier) -> String {
    format!("{id}.model.kmp")
}
