//! The model build pipeline.
//!
//! Stages run strictly in order: identity, metadata, model source, code
//! generation (including word breaking), script, package, manifest. The first
//! failure ends the build; artifacts already written stay on disk.
use crate::codegen::generate_model_code;
use crate::config::CompilerConfig;
use crate::identity::{resolve_identity, ResolvedIdentity};
use crate::layout::BuildPaths;
use crate::manifest::{merge_model_info, MergeInputs};
use crate::metadata::{load_model_info, write_model_info, ModelInfo};
use crate::package::{PackageCompiler, PackageRequest};
use crate::source::{load_model_source, LexicalModelSource};
use crate::transpile::Transpiler;
use crate::trie::TrieBuilder;
use crate::vfs::Filesystem;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;

/// Process-level inputs for one build, passed explicitly.
pub struct BuildContext<'a> {
    pub fs: &'a dyn Filesystem,
    /// The `build/` directory the compiler runs in.
    pub build_dir: PathBuf,
    pub now: DateTime<Utc>,
}

/// External capabilities the pipeline delegates to.
pub struct Collaborators<'a> {
    pub transpiler: &'a dyn Transpiler,
    pub trie_builder: &'a dyn TrieBuilder,
    pub package_compiler: &'a dyn PackageCompiler,
}

/// Where the model source description comes from.
#[derive(Debug, Clone)]
pub enum ModelSourceInput {
    /// `source/{id}.model.json` next to the build directory.
    Layout,
    File(PathBuf),
    Loaded(LexicalModelSource),
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub identity: ResolvedIdentity,
    pub script_path: PathBuf,
    pub package_path: PathBuf,
    pub manifest_path: PathBuf,
    pub model_info: ModelInfo,
}

pub fn build_model(
    ctx: &BuildContext<'_>,
    collaborators: &Collaborators<'_>,
    config: &CompilerConfig,
    input: ModelSourceInput,
) -> Result<BuildOutcome> {
    let start = Instant::now();
    let paths = BuildPaths::new(ctx.build_dir.clone())?;

    let identity = resolve_identity(ctx.fs, &paths)?;
    let id = &identity.id;

    let info = load_model_info(ctx.fs, &paths.info_path(id))?;

    let source = match input {
        ModelSourceInput::Layout => load_model_source(ctx.fs, &paths.model_source_path(id))?,
        ModelSourceInput::File(path) => load_model_source(ctx.fs, &path)?,
        ModelSourceInput::Loaded(source) => source,
    };

    let generated = generate_model_code(ctx.fs, &paths, id, &source, collaborators)?;
    let script_path = paths.script_path(id);
    ctx.fs.write(&script_path, generated.script.as_bytes())?;
    tracing::info!(
        path = %script_path.display(),
        bytes = generated.script.len(),
        "wrote model script"
    );

    let descriptor_path = paths.package_source_path(id);
    let descriptor_text = ctx.fs.read_to_string(&descriptor_path)?;
    let package = collaborators.package_compiler.compile(&PackageRequest {
        fs: ctx.fs,
        model_id: id,
        descriptor_path: &descriptor_path,
        descriptor_text: &descriptor_text,
    })?;
    let package_path = paths.package_path(id);
    ctx.fs.write(&package_path, &package.archive)?;
    tracing::info!(
        path = %package_path.display(),
        bytes = package.archive.len(),
        "wrote package"
    );

    let package_file_size = ctx.fs.file_size(&package_path)?;
    let js_file_size = ctx.fs.file_size(&script_path)?;
    let model_info = merge_model_info(
        info,
        &MergeInputs {
            id,
            location: &identity.location,
            package: &package.descriptor,
            package_file_size,
            js_file_size,
            now: ctx.now,
            config,
        },
    );
    let manifest_path = paths.manifest_path(id);
    write_model_info(ctx.fs, &manifest_path, &model_info)?;
    tracing::info!(
        model_id = %id,
        elapsed_ms = start.elapsed().as_millis(),
        "build complete"
    );

    Ok(BuildOutcome {
        identity,
        script_path,
        package_path,
        manifest_path,
        model_info,
    })
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
