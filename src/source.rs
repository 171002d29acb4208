//! Author-facing model description and source aggregation.
use crate::error::BuildError;
use crate::layout::BuildPaths;
use crate::vfs::Filesystem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Declared model format. Adding a variant forces every match to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Custom,
    FstFoma,
    Trie,
}

impl ModelFormat {
    pub fn parse(tag: &str) -> Result<Self, BuildError> {
        match tag {
            "custom-1.0" => Ok(ModelFormat::Custom),
            "fst-foma-1.0" => Ok(ModelFormat::FstFoma),
            "trie-1.0" => Ok(ModelFormat::Trie),
            other => Err(BuildError::UnknownFormat(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Custom => "custom-1.0",
            ModelFormat::FstFoma => "fst-foma-1.0",
            ModelFormat::Trie => "trie-1.0",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model description as written by the author.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalModelSource {
    /// Kept as the raw tag so unknown formats surface as a format error, not a parse error.
    pub format: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_breaking: Option<WordBreakingSource>,
}

/// Word-breaking sub-descriptor. Anything besides `sources` and `rootClass`
/// is runtime configuration handed to the word breaker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBreakingSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_class: Option<String>,
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

/// One author source file, read verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

pub fn load_model_source(fs: &dyn Filesystem, path: &Path) -> Result<LexicalModelSource> {
    let text = fs.read_to_string(path)?;
    let source: LexicalModelSource = serde_json::from_str(&text)
        .with_context(|| format!("parse model source {}", path.display()))?;
    Ok(source)
}

/// Read every listed source, in the order the author listed them.
pub fn read_sources(
    fs: &dyn Filesystem,
    paths: &BuildPaths,
    sources: &[String],
) -> Result<Vec<SourceFile>> {
    let mut files = Vec::with_capacity(sources.len());
    for rel in sources {
        let path = paths.source_file(rel);
        let text = fs
            .read_to_string(&path)
            .with_context(|| format!("read model source {rel}"))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read source");
        files.push(SourceFile { path, text });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryFilesystem;

    #[test]
    fn format_tags_are_closed() {
        for format in [ModelFormat::Custom, ModelFormat::FstFoma, ModelFormat::Trie] {
            assert_eq!(ModelFormat::parse(format.as_str()).expect("known"), format);
        }
        let err = ModelFormat::parse("trie-2.0").expect_err("unknown");
        assert_eq!(err.to_string(), "unknown model format 'trie-2.0'");
    }

    #[test]
    fn word_breaking_keeps_extra_config() {
        let source: LexicalModelSource = serde_json::from_str(
            r#"{"format":"trie-1.0","sources":["w.tsv"],
                "wordBreaking":{"allowedCharacters":{"initials":"abc"},"rootClass":"Wb"}}"#,
        )
        .expect("parse");
        let wb = source.word_breaking.expect("word breaking");
        assert_eq!(wb.root_class.as_deref(), Some("Wb"));
        assert!(wb.sources.is_none());
        assert_eq!(wb.config["allowedCharacters"]["initials"], "abc");
    }

    #[test]
    fn read_sources_preserves_order() {
        let fs = MemoryFilesystem::new();
        fs.insert("/g/a/en.x/source/b.js", "B");
        fs.insert("/g/a/en.x/source/a.js", "A");
        let paths = BuildPaths::new(PathBuf::from("/g/a/en.x/build")).expect("paths");

        let files = read_sources(&fs, &paths, &["b.js".to_string(), "a.js".to_string()])
            .expect("read");
        let texts: Vec<&str> = files.iter().map(|file| file.text.as_str()).collect();
        assert_eq!(texts, vec!["B", "A"]);

        let err = read_sources(&fs, &paths, &["missing.js".to_string()]).expect_err("missing");
        assert!(format!("{err:#}").contains("missing.js"));
    }
}
