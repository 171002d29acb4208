//! Validation failures raised by the build pipeline itself.
//!
//! Collaborator and I/O failures are not represented here; they travel as
//! plain `anyhow` errors with context attached at the call site.
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of pipeline-detected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Discovery,
    Identity,
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Discovery => "discovery",
            ErrorKind::Identity => "identity",
            ErrorKind::Format => "format",
        })
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    /// Zero and multiple candidates share this variant; `found` tells them apart.
    #[error(
        "info file not found: expected exactly one *{suffix} file in {}, found {found}",
        dir.display()
    )]
    InfoFileNotFound {
        dir: PathBuf,
        suffix: &'static str,
        found: usize,
    },

    #[error("invalid model identifier '{id}': should be author.bcp47.uniq, each segment matching [a-z_][a-z0-9_]*")]
    InvalidIdentifier { id: String },

    #[error("invalid build path: expected '{expected}' from .../<author>/<bcp47>.<uniq>/build, found '{found}'")]
    PathMismatch { expected: String, found: String },

    #[error("unknown model format '{0}'")]
    UnknownFormat(String),

    #[error("unimplemented model format '{0}'")]
    UnimplementedFormat(String),

    #[error("{context} requires rootClass")]
    MissingRootClass { context: &'static str },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::InfoFileNotFound { .. } => ErrorKind::Discovery,
            BuildError::InvalidIdentifier { .. } | BuildError::PathMismatch { .. } => {
                ErrorKind::Identity
            }
            BuildError::UnknownFormat(_)
            | BuildError::UnimplementedFormat(_)
            | BuildError::MissingRootClass { .. } => ErrorKind::Format,
        }
    }
}

/// Return the pipeline error kind carried by an `anyhow` chain, if any.
pub fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BuildError>())
        .map(BuildError::kind)
}
