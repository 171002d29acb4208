//! Manifest merge.
//!
//! Author-supplied values always win. Blank fields are filled from the
//! compiled package, then from fixed defaults. File sizes and the included
//! asset list are recomputed on every build.
use crate::config::CompilerConfig;
use crate::identity::{ModelIdentifier, ModelLocation};
use crate::layout::{package_filename, script_filename};
use crate::metadata::ModelInfo;
use crate::package::{PackageDescriptor, PackageFile};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Asset tag recorded when the package ships font files.
pub const FONTS_ASSET: &str = "fonts";
/// Version recorded when neither the author nor the package gives one.
pub const FALLBACK_VERSION: &str = "1.0";

fn font_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(ttf|otf|ttc|woff2?)$").expect("regex for font files"))
}

/// Build facts the merge draws on.
pub struct MergeInputs<'a> {
    pub id: &'a ModelIdentifier,
    pub location: &'a ModelLocation,
    pub package: &'a PackageDescriptor,
    pub package_file_size: u64,
    pub js_file_size: u64,
    pub now: DateTime<Utc>,
    pub config: &'a CompilerConfig,
}

fn is_blank(value: &Option<String>) -> bool {
    !matches!(value.as_deref(), Some(text) if !text.trim().is_empty())
}

fn fill(slot: &mut Option<String>, candidates: impl IntoIterator<Item = Option<String>>) {
    if !is_blank(slot) {
        return;
    }
    if let Some(value) = candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
    {
        *slot = Some(value);
    }
}

/// `["fonts"]` when any packaged file is a font, otherwise empty.
pub fn package_includes(files: &[PackageFile]) -> Vec<String> {
    if files.iter().any(|file| font_file_regex().is_match(&file.name)) {
        vec![FONTS_ASSET.to_string()]
    } else {
        Vec::new()
    }
}

pub fn merge_model_info(mut info: ModelInfo, inputs: &MergeInputs<'_>) -> ModelInfo {
    let package = inputs.package;
    let model = package.lexical_model(inputs.id);
    let author = package.info.author.as_ref();

    fill(&mut info.id, [Some(inputs.id.to_string())]);
    fill(
        &mut info.name,
        [
            model.and_then(|model| model.name.clone()),
            package.info.name.clone(),
            Some(inputs.id.to_string()),
        ],
    );
    fill(&mut info.license, [Some(inputs.config.default_license.clone())]);
    fill(
        &mut info.version,
        [package.info.version.clone(), Some(FALLBACK_VERSION.to_string())],
    );

    let languages_blank =
        !matches!(info.languages.as_ref(), Some(languages) if !languages.is_empty());
    if languages_blank {
        let mut languages: Vec<String> = model
            .map(|model| model.languages.iter().map(|lang| lang.id.clone()).collect())
            .unwrap_or_default();
        if languages.is_empty() {
            languages.push(inputs.id.bcp47().to_string());
        }
        info.languages = Some(languages);
    }

    fill(
        &mut info.author_name,
        [
            author.map(|author| author.name.clone()),
            Some(inputs.id.author().to_string()),
        ],
    );
    fill(
        &mut info.author_email,
        [author.and_then(|author| author.email.clone())],
    );
    if info.author_email.is_none() {
        info.author_email = Some(String::new());
    }
    let name = info.name.clone();
    fill(&mut info.description, [package.info.description.clone(), name]);
    fill(
        &mut info.last_modified_date,
        [Some(inputs.now.to_rfc3339_opts(SecondsFormat::Millis, true))],
    );
    fill(&mut info.package_filename, [Some(package_filename(inputs.id))]);
    fill(&mut info.js_filename, [Some(script_filename(inputs.id))]);
    fill(
        &mut info.min_keyman_version,
        [Some(inputs.config.min_keyman_version.clone())],
    );
    let source_path = match inputs.config.source_path_prefix.as_deref() {
        Some(prefix) => format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            inputs.location.source_path()
        ),
        None => inputs.location.source_path(),
    };
    fill(&mut info.source_path, [Some(source_path)]);

    info.package_file_size = Some(inputs.package_file_size);
    info.js_file_size = Some(inputs.js_file_size);
    info.package_includes = Some(package_includes(&package.files));
    info
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
