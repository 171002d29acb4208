//! Word-breaker registration appended after the model itself.
use super::script::ScriptWriter;
use crate::error::BuildError;
use crate::layout::BuildPaths;
use crate::source::{read_sources, WordBreakingSource};
use crate::transpile::{transpile_all, Transpiler};
use crate::vfs::Filesystem;
use anyhow::{Context, Result};

/// Emit the word breaker for `word_breaking`.
///
/// Custom sources are consumed: the list is taken out of the descriptor so it
/// never reaches runtime configuration.
pub fn emit_word_breaker(
    fs: &dyn Filesystem,
    paths: &BuildPaths,
    transpiler: &dyn Transpiler,
    word_breaking: &mut WordBreakingSource,
    writer: &mut ScriptWriter,
) -> Result<()> {
    match word_breaking.sources.take() {
        Some(sources) => {
            let root_class = word_breaking
                .root_class
                .clone()
                .ok_or(BuildError::MissingRootClass {
                    context: "custom word breaker",
                })?;
            let files = read_sources(fs, paths, &sources)?;
            writer.push(&transpile_all(transpiler, &files)?);
            writer.push(&format!(
                "LMLayerWorker.loadWordBreaker(new {root_class}());"
            ));
            tracing::info!(
                sources = files.len(),
                root_class = %root_class,
                "emitted custom word breaker"
            );
        }
        None => {
            let config =
                serde_json::to_string(word_breaking).context("serialize word breaker config")?;
            writer.push(&format!(
                "LMLayerWorker.loadWordBreaker(new wordBreakers.DefaultWordBreaker({config}));"
            ));
            tracing::info!("emitted default word breaker");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpile::PassthroughTranspiler;
    use crate::vfs::MemoryFilesystem;
    use std::path::PathBuf;

    fn paths() -> BuildPaths {
        BuildPaths::new(PathBuf::from("/g/a/en.x/build")).expect("paths")
    }

    #[test]
    fn default_breaker_embeds_config_without_sources() {
        let fs = MemoryFilesystem::new();
        let mut wb: WordBreakingSource =
            serde_json::from_str(r#"{"joiners":["'"]}"#).expect("parse");
        let mut writer = ScriptWriter::new();

        emit_word_breaker(&fs, &paths(), &PassthroughTranspiler, &mut wb, &mut writer)
            .expect("emit");
        assert_eq!(
            writer.body(),
            "LMLayerWorker.loadWordBreaker(new wordBreakers.DefaultWordBreaker({\"joiners\":[\"'\"]}));\n"
        );
    }

    #[test]
    fn custom_breaker_consumes_sources() {
        let fs = MemoryFilesystem::new();
        fs.insert("/g/a/en.x/source/wb.js", "class Wb {}");
        let mut wb: WordBreakingSource =
            serde_json::from_str(r#"{"sources":["wb.js"],"rootClass":"Wb"}"#).expect("parse");
        let mut writer = ScriptWriter::new();

        emit_word_breaker(&fs, &paths(), &PassthroughTranspiler, &mut wb, &mut writer)
            .expect("emit");
        assert_eq!(
            writer.body(),
            "class Wb {}\nLMLayerWorker.loadWordBreaker(new Wb());\n"
        );
        assert!(wb.sources.is_none());
        assert_eq!(
            serde_json::to_string(&wb).expect("serialize"),
            r#"{"rootClass":"Wb"}"#
        );
    }

    #[test]
    fn custom_breaker_needs_root_class() {
        let fs = MemoryFilesystem::new();
        let mut wb = WordBreakingSource {
            sources: Some(vec!["wb.js".to_string()]),
            ..WordBreakingSource::default()
        };
        let err = emit_word_breaker(
            &fs,
            &paths(),
            &PassthroughTranspiler,
            &mut wb,
            &mut ScriptWriter::new(),
        )
        .expect_err("missing root class");
        assert_eq!(err.to_string(), "custom word breaker requires rootClass");
    }
}
