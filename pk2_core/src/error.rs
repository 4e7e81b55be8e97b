//! Error types for pk2_core.

use thiserror::Error;

/// Result type alias using pk2_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a folder tree.
#[derive(Error, Debug)]
pub enum Error {
    /// A constructor precondition was violated.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// An entry with the same case-insensitive name already exists in the parent.
    #[error("Duplicate {kind} '{name}' in folder '{parent}'")]
    DuplicateEntry {
        kind: &'static str,
        name: String,
        parent: String,
    },

    /// A folder id does not refer to a live node.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// A lookup path could not be interpreted.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Manifest document could not be parsed.
    #[error("Invalid manifest: {source}")]
    Manifest {
        #[from]
        source: serde_json::Error,
    },

    /// I/O error while reading a manifest.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a DuplicateEntry error for a subfolder.
    pub fn duplicate_folder(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Error::DuplicateEntry {
            kind: "folder",
            name: name.into(),
            parent: parent.into(),
        }
    }

    /// Create a DuplicateEntry error for a file.
    pub fn duplicate_file(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Error::DuplicateEntry {
            kind: "file",
            name: name.into(),
            parent: parent.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
