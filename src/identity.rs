//! Model identity resolution.
//!
//! The identifier is read from the single `*.model_info` file next to `build/`
//! and cross-checked against the directory the build runs in.
use crate::error::BuildError;
use crate::layout::{BuildPaths, BUILD_DIR_NAME, MODEL_INFO_SUFFIX};
use crate::vfs::Filesystem;
use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path};
use std::sync::OnceLock;

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-z_][a-z0-9_]*)\.([a-z_][a-z0-9_]*)\.([a-z_][a-z0-9_]*)$")
            .expect("regex for model identifiers")
    })
}

/// Canonical `author.bcp47.uniq` model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelIdentifier(String);

impl ModelIdentifier {
    pub fn parse(raw: &str) -> Result<Self, BuildError> {
        if identifier_regex().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(BuildError::InvalidIdentifier {
                id: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segment(&self, index: usize) -> &str {
        self.0.split('.').nth(index).unwrap_or_default()
    }

    pub fn author(&self) -> &str {
        self.segment(0)
    }

    pub fn bcp47(&self) -> &str {
        self.segment(1)
    }

    pub fn uniq(&self) -> &str {
        self.segment(2)
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory segments above `build/`, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelLocation {
    pub group: String,
    pub author: String,
    /// The `<bcp47>.<uniq>` folder name.
    pub language: String,
}

impl ModelLocation {
    pub fn source_path(&self) -> String {
        format!("{}/{}/{}", self.group, self.author, self.language)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedIdentity {
    pub id: ModelIdentifier,
    pub location: ModelLocation,
}

/// Find the single `*.model_info` file name among `names`.
pub fn select_info_file(dir: &Path, names: &[String]) -> Result<String, BuildError> {
    let matches: Vec<&String> = names
        .iter()
        .filter(|name| name.ends_with(MODEL_INFO_SUFFIX))
        .collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        _ => Err(BuildError::InfoFileNotFound {
            dir: dir.to_path_buf(),
            suffix: MODEL_INFO_SUFFIX,
            found: matches.len(),
        }),
    }
}

/// Check that `build_dir` is `.../<group>/<author>/<bcp47>.<uniq>/build` for `id`.
pub fn check_build_path(
    build_dir: &Path,
    id: &ModelIdentifier,
) -> Result<ModelLocation, BuildError> {
    let segments: Vec<String> = build_dir
        .components()
        .rev()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    let found = match segments.as_slice() {
        [_, language, author, ..] => format!("{author}.{language}"),
        _ => String::new(),
    };
    let valid = segments.len() >= 4
        && segments[0] == BUILD_DIR_NAME
        && found == id.as_str();
    if !valid {
        return Err(BuildError::PathMismatch {
            expected: id.to_string(),
            found,
        });
    }

    Ok(ModelLocation {
        group: segments[3].clone(),
        author: segments[2].clone(),
        language: segments[1].clone(),
    })
}

/// Resolve and validate the model identity for a build directory.
pub fn resolve_identity(fs: &dyn Filesystem, paths: &BuildPaths) -> Result<ResolvedIdentity> {
    let names = fs.list_files(paths.model_dir())?;
    let info_file = select_info_file(paths.model_dir(), &names)?;
    let stem = info_file
        .strip_suffix(MODEL_INFO_SUFFIX)
        .unwrap_or(info_file.as_str());
    let id = ModelIdentifier::parse(stem)?;
    let location = check_build_path(paths.build_dir(), &id)?;
    tracing::info!(model_id = %id, info_file = %info_file, "resolved model identity");
    Ok(ResolvedIdentity { id, location })
}
