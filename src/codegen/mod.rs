//! Model script generation.
//!
//! The declared format picks how the model body is produced; word breaking and
//! the strict-mode wrapper are the same for every format.
mod script;
mod wordbreak;

pub use script::{ScriptWriter, EPILOGUE, PROLOGUE};
pub use wordbreak::emit_word_breaker;

use crate::build::Collaborators;
use crate::error::BuildError;
use crate::identity::ModelIdentifier;
use crate::layout::BuildPaths;
use crate::source::{read_sources, LexicalModelSource, ModelFormat, WordBreakingSource};
use crate::transpile::transpile_all;
use crate::vfs::Filesystem;
use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Empty registration emitted ahead of custom model code.
pub const CUSTOM_MODEL_REGISTRATION: &str = "LMLayerWorker.registerModel(function() {});";

/// Build-time view of the model carried into the emitted script.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModel {
    pub id: ModelIdentifier,
    pub format: ModelFormat,
    /// Word-breaking configuration with its source list already consumed.
    pub word_breaking: Option<WordBreakingSource>,
    /// Base64 of the concatenated transducer sources (`fst-foma-1.0` only).
    pub fst: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedModel {
    pub script: String,
    pub model: CompiledModel,
}

/// Generate the complete model script for `source`.
pub fn generate_model_code(
    fs: &dyn Filesystem,
    paths: &BuildPaths,
    id: &ModelIdentifier,
    source: &LexicalModelSource,
    collaborators: &Collaborators<'_>,
) -> Result<GeneratedModel> {
    let format = ModelFormat::parse(&source.format)?;
    let mut model = CompiledModel {
        id: id.clone(),
        format,
        word_breaking: source.word_breaking.clone(),
        fst: None,
    };
    let mut writer = ScriptWriter::new();

    match format {
        ModelFormat::Custom => {
            let root_class = source
                .root_class
                .as_deref()
                .ok_or(BuildError::MissingRootClass {
                    context: "custom-1.0 model",
                })?;
            let files = read_sources(fs, paths, &source.sources)?;
            writer.push(CUSTOM_MODEL_REGISTRATION);
            writer.push(&transpile_all(collaborators.transpiler, &files)?);
            writer.push(&format!("LMLayerWorker.loadModel(new {root_class}());"));
        }
        ModelFormat::FstFoma => {
            let mut bytes = Vec::new();
            for rel in &source.sources {
                let path = paths.source_file(rel);
                bytes.extend(fs.read(&path)?);
            }
            let fst = STANDARD.encode(&bytes);
            tracing::debug!(fst_bytes = bytes.len(), "encoded transducer sources");
            model.fst = Some(fst);
            return Err(BuildError::UnimplementedFormat(format.to_string()).into());
        }
        ModelFormat::Trie => {
            let files = read_sources(fs, paths, &source.sources)?;
            let literal = collaborators.trie_builder.build(&files)?;
            writer.push(&format!(
                "LMLayerWorker.loadModel(new models.TrieModel({literal}));"
            ));
        }
    }
    tracing::info!(model_id = %id, format = %format, "generated model code");

    if let Some(word_breaking) = model.word_breaking.as_mut() {
        emit_word_breaker(
            fs,
            paths,
            collaborators.transpiler,
            word_breaking,
            &mut writer,
        )?;
    }

    Ok(GeneratedModel {
        script: writer.finish(),
        model,
    })
}
