use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while planning or writing a package.
///
/// Every variant except [`BuildError::Io`] and [`BuildError::Manifest`] is a
/// known build failure: its message alone explains the problem. The remaining
/// two wrap unexpected lower-level failures and carry their source chain.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error(
        "package {package} which is required by {importer} is not specified as a dependency in package.json"
    )]
    #[diagnostic(
        code(packing::undeclared_dependency),
        help("add '{package}' to the dependencies of the root package.json")
    )]
    UndeclaredDependency { package: String, importer: String },

    #[error("{message}")]
    #[diagnostic(code(packing::path_escape))]
    PathEscape { path: PathBuf, message: String },

    #[error("file {} not found", .path.display())]
    #[diagnostic(code(packing::not_found))]
    NotFound { path: PathBuf },

    #[error("{} is not a file or directory", .path.display())]
    #[diagnostic(code(packing::not_file_or_directory))]
    NotFileOrDirectory { path: PathBuf },

    #[error("'{name}' is reserved for the generated package manifest")]
    #[diagnostic(
        code(packing::reserved_destination),
        help("rename the file with an explicit {{\"name\", \"src\"}} entry")
    )]
    ReservedDestination { name: String },

    #[error("invalid glob pattern '{pattern}': {message}")]
    #[diagnostic(code(packing::invalid_pattern))]
    InvalidPattern { pattern: String, message: String },

    #[error("package '{name}' is not declared in packing.json")]
    #[diagnostic(code(packing::unknown_package))]
    UnknownPackage { name: String },

    #[error("failed to access '{}'", .path.display())]
    #[diagnostic(code(packing::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize package.json")]
    #[diagnostic(code(packing::manifest))]
    Manifest(#[from] serde_json::Error),
}

impl BuildError {
    /// Map an I/O error on `path`, turning "not found" into [`BuildError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            BuildError::NotFound { path }
        } else {
            BuildError::Io { path, source }
        }
    }

    /// Whether this is part of the known failure taxonomy (as opposed to an
    /// unexpected internal error that deserves full diagnostic detail).
    pub fn is_known(&self) -> bool {
        !matches!(self, BuildError::Io { .. } | BuildError::Manifest(_))
    }
}
