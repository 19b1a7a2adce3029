use std::path::PathBuf;

use thiserror::Error;

use crate::scope::{ContentKind, Scope};

/// Errors produced by the store and its collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no base directory available for the {scope} scope")]
    BaseDirUnavailable { scope: Scope },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {kind} resource at {path:?}: {message}")]
    Decode {
        path: PathBuf,
        kind: ContentKind,
        message: String,
    },

    #[error("failed to encode {kind} resource: {message}")]
    Encode { kind: ContentKind, message: String },

    #[error("failed to read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("unknown scope '{0}' (expected 'cache' or 'documents')")]
    UnknownScope(String),

    #[error("unknown content kind '{0}' (expected 'dictionary', 'generic', 'text' or 'image')")]
    UnknownContentKind(String),
}

pub type Result<T> = std::result::Result<T, Error>;
