use std::path::{Component, Path, PathBuf};

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join a descriptor-relative file reference, accepting `\` separators.
pub fn join_portable(base: &Path, reference: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for part in reference.split(['\\', '/']).filter(|part| !part.is_empty()) {
        joined.push(part);
    }
    normalize_lexically(&joined)
}

/// Final segment of a `\`- or `/`-separated file reference.
pub fn portable_file_name(reference: &str) -> &str {
    reference
        .rsplit(['\\', '/'])
        .find(|part| !part.is_empty())
        .unwrap_or(reference)
}
