//! Shared fixtures for unit tests.
use crate::build::Collaborators;
use crate::package::{
    CompiledPackage, PackageCompiler, PackageDescriptor, PackageLexicalModel, PackageRequest,
};
use crate::source::SourceFile;
use crate::transpile::Transpiler;
use crate::trie::TrieBuilder;
use crate::vfs::MemoryFilesystem;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

pub const MODEL_DIR: &str = "/repo/release/demo/en.sample";
pub const BUILD_DIR: &str = "/repo/release/demo/en.sample/build";

pub fn build_dir() -> PathBuf {
    PathBuf::from(BUILD_DIR)
}

pub fn model_path(rel: &str) -> PathBuf {
    Path::new(MODEL_DIR).join(rel)
}

/// Wraps each source in a marker comment naming the file.
pub struct MarkingTranspiler;

impl Transpiler for MarkingTranspiler {
    fn transpile(&self, source: &SourceFile) -> Result<String> {
        let name = source
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        Ok(format!("/* {name} */\n{}", source.text.trim_end()))
    }
}

/// Emits the word-list texts as a JSON array.
pub struct EchoTrieBuilder;

impl TrieBuilder for EchoTrieBuilder {
    fn build(&self, word_lists: &[SourceFile]) -> Result<String> {
        let texts: Vec<&str> = word_lists.iter().map(|file| file.text.as_str()).collect();
        Ok(serde_json::to_string(&texts)?)
    }
}

/// Returns the descriptor text as the archive and a fixed descriptor.
pub struct StubPackageCompiler {
    pub descriptor: PackageDescriptor,
}

impl StubPackageCompiler {
    pub fn for_model(id: &str) -> Self {
        Self {
            descriptor: PackageDescriptor {
                lexical_models: vec![PackageLexicalModel {
                    id: id.to_string(),
                    ..PackageLexicalModel::default()
                }],
                ..PackageDescriptor::default()
            },
        }
    }
}

impl PackageCompiler for StubPackageCompiler {
    fn compile(&self, request: &PackageRequest<'_>) -> Result<CompiledPackage> {
        Ok(CompiledPackage {
            archive: request.descriptor_text.as_bytes().to_vec(),
            descriptor: self.descriptor.clone(),
        })
    }
}

pub struct FailingPackageCompiler;

impl PackageCompiler for FailingPackageCompiler {
    fn compile(&self, _request: &PackageRequest<'_>) -> Result<CompiledPackage> {
        Err(anyhow!("package compiler exploded"))
    }
}

pub fn collaborators<'a>(
    transpiler: &'a dyn Transpiler,
    trie_builder: &'a dyn TrieBuilder,
    package_compiler: &'a dyn PackageCompiler,
) -> Collaborators<'a> {
    Collaborators {
        transpiler,
        trie_builder,
        package_compiler,
    }
}

/// A model folder with an info file, a package source and a model source.
pub fn model_fixture(info_json: &str, model_json: &str) -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    fs.insert(model_path("demo.en.sample.model_info"), info_json);
    fs.insert(
        model_path("source/demo.en.sample.model.kps"),
        "<Package></Package>",
    );
    fs.insert(model_path("source/demo.en.sample.model.json"), model_json);
    fs
}
