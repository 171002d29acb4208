//! The `.model_info` manifest: loading the author's copy and writing the merged one.
use crate::vfs::Filesystem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Published metadata record for a model.
///
/// Every field is optional on input; after the merge step all of them are set.
/// Keys the compiler does not know are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_includes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_keyman_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Load the author-supplied manifest.
pub fn load_model_info(fs: &dyn Filesystem, path: &Path) -> Result<ModelInfo> {
    let text = fs.read_to_string(path)?;
    let info: ModelInfo = serde_json::from_str(&text)
        .with_context(|| format!("parse model info {}", path.display()))?;
    Ok(info)
}

/// Render the manifest in its published, pretty-printed form.
pub fn render_model_info(info: &ModelInfo) -> Result<String> {
    serde_json::to_string_pretty(info).context("serialize model info")
}

pub fn write_model_info(fs: &dyn Filesystem, path: &Path, info: &ModelInfo) -> Result<()> {
    let text = render_model_info(info)?;
    fs.write(path, text.as_bytes())
}
