//! Package compilation: project descriptor (KPS) in, installable archive (KMP) out.
mod kmp;
mod kps;

pub use kmp::{write_archive, ArchiveEntry, PACKAGE_METADATA_FILE};
pub use kps::{parse_kps, KpsFile, KpsProject};

use crate::identity::ModelIdentifier;
use crate::util::{join_portable, portable_file_name};
use crate::vfs::Filesystem;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Package format version written into `kmp.json`.
pub const PACKAGE_FILE_VERSION: &str = "12.0";

/// Everything a package compiler needs for one model.
pub struct PackageRequest<'a> {
    pub fs: &'a dyn Filesystem,
    pub model_id: &'a ModelIdentifier,
    /// Location of the descriptor; file references resolve against its folder.
    pub descriptor_path: &'a Path,
    pub descriptor_text: &'a str,
}

#[derive(Debug, Clone)]
pub struct CompiledPackage {
    pub archive: Vec<u8>,
    pub descriptor: PackageDescriptor,
}

pub trait PackageCompiler {
    fn compile(&self, request: &PackageRequest<'_>) -> Result<CompiledPackage>;
}

/// Package metadata as stored in the archive's `kmp.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub system: PackageSystem,
    pub info: PackageInfo,
    pub files: Vec<PackageFile>,
    pub lexical_models: Vec<PackageLexicalModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSystem {
    pub file_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PackageAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One archived file: its name inside the archive and its role.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLexicalModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub languages: Vec<PackageLanguage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLanguage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PackageDescriptor {
    /// The lexical model entry describing `id`, if the package declares one.
    pub fn lexical_model(&self, id: &ModelIdentifier) -> Option<&PackageLexicalModel> {
        self.lexical_models
            .iter()
            .find(|model| model.id == id.as_str())
    }
}

/// Default compiler reading `.kps` XML and writing a zip-based `.kmp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KpsPackageCompiler;

impl PackageCompiler for KpsPackageCompiler {
    fn compile(&self, request: &PackageRequest<'_>) -> Result<CompiledPackage> {
        let project = parse_kps(request.descriptor_text).with_context(|| {
            format!("parse package source {}", request.descriptor_path.display())
        })?;
        if project.lexical_models.is_empty() {
            return Err(anyhow!(
                "package source {} declares no lexical models",
                request.descriptor_path.display()
            ));
        }

        let base = request
            .descriptor_path
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(project.files.len() + 1);
        let mut files = Vec::with_capacity(project.files.len());
        for file in &project.files {
            let name = portable_file_name(&file.source).to_string();
            if name == PACKAGE_METADATA_FILE || !seen.insert(name.clone()) {
                return Err(anyhow!("duplicate package file name {name}"));
            }
            let path = join_portable(base, &file.source);
            let bytes = request
                .fs
                .read(&path)
                .with_context(|| format!("read package file {}", file.source))?;
            entries.push(ArchiveEntry {
                name: name.clone(),
                bytes,
            });
            files.push(PackageFile {
                name,
                description: file.description.clone(),
            });
        }

        let descriptor = PackageDescriptor {
            system: PackageSystem {
                file_version: PACKAGE_FILE_VERSION.to_string(),
            },
            info: project.info,
            files,
            lexical_models: project.lexical_models,
        };
        if descriptor.lexical_model(request.model_id).is_none() {
            tracing::warn!(
                model_id = %request.model_id,
                "package declares no lexical model with this id"
            );
        }

        let metadata = serde_json::to_vec_pretty(&descriptor).context("serialize kmp.json")?;
        entries.push(ArchiveEntry {
            name: PACKAGE_METADATA_FILE.to_string(),
            bytes: metadata,
        });
        let archive = write_archive(&entries)?;
        tracing::info!(
            files = descriptor.files.len(),
            archive_bytes = archive.len(),
            "compiled package"
        );

        Ok(CompiledPackage {
            archive,
            descriptor,
        })
    }
}
